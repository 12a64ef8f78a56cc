//! Per-step validation
//!
//! Pure checks over the draft. Each returns a [`FieldErrors`] map; an empty
//! map means the step may be left forwards.
//!
//! | step | checks |
//! |------|--------|
//! | 1 | name, category, emails, UAE phones, address, city, contact name, root password |
//! | 2, substep 0 | at least one journey or validation API selected |
//! | 2, substep >= 1 | none |
//! | 3 | initial credits not negative |
//! | 4 | none |

use crate::config::ValidationRules;
use crate::draft::OrganizationDraft;
use crate::error::{ConfigError, FieldErrors};
use crate::progression::{config_count, Cursor, Step};
use crate::store::SERVICES_FIELD;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

const PASSWORD_MESSAGE: &str =
    "Password must be 8+ chars with uppercase, lowercase, number, special char";

/// Step validator built from [`ValidationRules`]
#[derive(Debug, Clone)]
pub struct Validator {
    rules: ValidationRules,
    phone_pattern: Regex,
}

impl Validator {
    /// Compile the rules
    ///
    /// # Errors
    /// [`ConfigError::InvalidRule`] if the phone rule does not form a pattern
    pub fn new(rules: ValidationRules) -> Result<Self, ConfigError> {
        let pattern = format!(
            r"^{}[0-9]{{{}}}$",
            regex::escape(&rules.phone_country_code),
            rules.phone_digits
        );
        let phone_pattern =
            Regex::new(&pattern).map_err(|e| ConfigError::InvalidRule(e.to_string()))?;
        Ok(Self {
            rules,
            phone_pattern,
        })
    }

    /// Rules this validator enforces
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Validate the screen under `cursor`
    #[must_use]
    pub fn validate(&self, draft: &OrganizationDraft, cursor: Cursor) -> FieldErrors {
        let errors = match cursor.step() {
            Step::OrganizationDetails => self.organization_details(draft),
            Step::ModuleConfiguration if cursor.sub_step() == 0 => Self::service_selection(draft),
            // TODO: require at least one channel and one document per journey screen;
            // a journey can currently be created with neither.
            Step::ModuleConfiguration => FieldErrors::new(),
            Step::PricingCredits => Self::pricing(draft),
            Step::AdditionalFeatures => FieldErrors::new(),
        };
        if !errors.is_empty() {
            tracing::debug!(%cursor, failed = errors.len(), "step validation failed");
        }
        errors
    }

    /// Step 1 checks
    #[must_use]
    pub fn organization_details(&self, draft: &OrganizationDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if draft.name.chars().count() < self.rules.name_min_length {
            errors.insert("name", "Organization name is required");
        }
        if draft.organization_category.is_empty() {
            errors.insert("organization_category", "Category is required");
        }
        if !is_valid_email(&draft.email) {
            errors.insert("email", "Valid email is required");
        }
        if !self.is_valid_phone(&draft.phone) {
            errors.insert("phone", "Valid UAE phone is required");
        }
        if draft.address.is_empty() {
            errors.insert("address", "Address is required");
        }
        if draft.city.is_empty() {
            errors.insert("city", "City is required");
        }
        if draft.primary_contact_name.is_empty() {
            errors.insert("primary_contact_name", "Contact name is required");
        }
        if !is_valid_email(&draft.primary_contact_email) {
            errors.insert("primary_contact_email", "Valid email is required");
        }
        if !self.is_valid_phone(&draft.primary_contact_phone) {
            errors.insert("primary_contact_phone", "Valid UAE phone is required");
        }
        if !self.is_strong_password(&draft.root_password) {
            errors.insert("root_password", PASSWORD_MESSAGE);
        }

        errors
    }

    /// Step 2 overview check
    #[must_use]
    pub fn service_selection(draft: &OrganizationDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if config_count(draft) == 0 {
            errors.insert(SERVICES_FIELD, "Select at least one service");
        }
        errors
    }

    /// Step 3 checks
    #[must_use]
    pub fn pricing(draft: &OrganizationDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if draft.initial_credits < 0 {
            errors.insert("initial_credits", "Credits cannot be negative");
        }
        errors
    }

    /// Country code followed by exactly the configured number of ASCII digits;
    /// whitespace is ignored
    #[must_use]
    pub fn is_valid_phone(&self, phone: &str) -> bool {
        let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
        self.phone_pattern.is_match(&compact)
    }

    /// Length plus one each of uppercase, lowercase, digit and symbol
    #[must_use]
    pub fn is_strong_password(&self, password: &str) -> bool {
        password.chars().count() >= self.rules.password_min_length
            && password.chars().any(|c| c.is_ascii_uppercase())
            && password.chars().any(|c| c.is_ascii_lowercase())
            && password.chars().any(|c| c.is_ascii_digit())
            && password.chars().any(|c| self.rules.password_symbols.contains(c))
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationRules::default()).expect("default phone rule is valid")
    }
}

/// Single `@`, no whitespace, a dot in the domain part
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FormStore, TextField};
    use kyc_catalog::{JourneyKind, ValidationApiKind};
    use proptest::prelude::*;

    fn valid_details() -> OrganizationDraft {
        OrganizationDraft::demo()
    }

    #[test]
    fn demo_draft_passes_step_one() {
        let errors = Validator::default().organization_details(&valid_details());
        assert!(errors.is_empty(), "{errors}");
    }

    #[test]
    fn blank_draft_fails_every_step_one_field_in_order() {
        let errors = Validator::default().organization_details(&OrganizationDraft::default());
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![
                "name",
                "organization_category",
                "email",
                "phone",
                "address",
                "city",
                "primary_contact_name",
                "primary_contact_email",
                "primary_contact_phone",
                "root_password",
            ]
        );
    }

    #[test]
    fn weak_password_is_rejected_and_strong_one_accepted() {
        let validator = Validator::default();
        let mut store = FormStore::new(valid_details());

        store.set_text(TextField::RootPassword, "abcdefgh");
        let errors = validator.organization_details(store.draft());
        assert_eq!(errors.get("root_password"), Some(PASSWORD_MESSAGE));

        store.set_text(TextField::RootPassword, "Abcdef1!");
        let errors = validator.organization_details(store.draft());
        assert!(!errors.contains("root_password"));
    }

    #[test]
    fn password_symbol_must_come_from_the_fixed_set() {
        let validator = Validator::default();
        assert!(!validator.is_strong_password("Abcdef1~"));
        assert!(validator.is_strong_password("Abcdef1{"));
        assert!(!validator.is_strong_password("Ab1!"));
    }

    #[test]
    fn phone_ignores_spaces_and_needs_nine_digits() {
        let validator = Validator::default();
        assert!(validator.is_valid_phone("+971 50 123 4567"));
        assert!(validator.is_valid_phone("+971501234567"));
        assert!(!validator.is_valid_phone("+971 50 123 456"));
        assert!(!validator.is_valid_phone("+971 50 123 45678"));
        assert!(!validator.is_valid_phone("00971501234567"));
    }

    #[test]
    fn phone_rejects_non_ascii_digits() {
        // Arabic-Indic digits for 50 123 4567
        let arabic_indic = "+971 \u{665}\u{660} \u{661}\u{662}\u{663} \u{664}\u{665}\u{666}\u{667}";
        let validator = Validator::default();
        assert!(!validator.is_valid_phone(arabic_indic));
        assert!(!validator.is_valid_phone("+971 50 123 456\u{967}"));

        let mut draft = valid_details();
        draft.phone = arabic_indic.to_string();
        let errors = validator.organization_details(&draft);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["phone"]);
    }

    #[test]
    fn email_needs_single_at_and_dotted_domain() {
        assert!(is_valid_email("ops@acme.ae"));
        assert!(!is_valid_email("ops@acme"));
        assert!(!is_valid_email("ops@@acme.ae"));
        assert!(!is_valid_email("o ps@acme.ae"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn short_name_fails() {
        let mut draft = valid_details();
        draft.name = "A".to_string();
        let errors = Validator::default().organization_details(&draft);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn custom_country_code_is_escaped() {
        let rules = ValidationRules {
            phone_country_code: "+966".to_string(),
            phone_digits: 9,
            ..ValidationRules::default()
        };
        let validator = Validator::new(rules).unwrap();
        assert!(validator.is_valid_phone("+966 50 123 4567"));
        assert!(!validator.is_valid_phone("+971 50 123 4567"));
    }

    #[test]
    fn empty_selection_yields_exactly_one_error() {
        let draft = OrganizationDraft::default();
        let errors = Validator::default().validate(&draft, Cursor::new(Step::ModuleConfiguration, 0));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(SERVICES_FIELD), Some("Select at least one service"));
    }

    #[test]
    fn a_validation_api_alone_satisfies_selection() {
        let mut store = FormStore::new(OrganizationDraft::default());
        store.toggle_validation_api(ValidationApiKind::EidValidation);
        assert!(Validator::service_selection(store.draft()).is_empty());
    }

    #[test]
    fn configuration_screens_accept_empty_journey_config() {
        let mut store = FormStore::new(OrganizationDraft::default());
        store.toggle_journey(JourneyKind::Rekyc);
        for doc in kyc_catalog::DocumentType::ALL {
            if store.draft().journey_configs[&JourneyKind::Rekyc].documents_allowed[doc].enabled {
                store.toggle_document(JourneyKind::Rekyc, *doc).unwrap();
            }
        }
        let errors =
            Validator::default().validate(store.draft(), Cursor::new(Step::ModuleConfiguration, 1));
        assert!(errors.is_empty());
    }

    #[test]
    fn negative_credits_fail_step_three() {
        let mut draft = OrganizationDraft::default();
        draft.initial_credits = -1;
        let errors = Validator::default().validate(&draft, Cursor::new(Step::PricingCredits, 0));
        assert!(errors.contains("initial_credits"));

        draft.initial_credits = 0;
        assert!(Validator::pricing(&draft).is_empty());
    }

    #[test]
    fn step_four_has_no_constraints() {
        let errors = Validator::default()
            .validate(&OrganizationDraft::default(), Cursor::new(Step::AdditionalFeatures, 0));
        assert!(errors.is_empty());
    }

    proptest! {
        #[test]
        fn prop_any_nine_digits_form_a_valid_phone(digits in "[0-9]{9}") {
            let formatted = format!("+971 {} {} {}", &digits[..2], &digits[2..5], &digits[5..]);
            prop_assert!(Validator::default().is_valid_phone(&formatted));
        }

        #[test]
        fn prop_passwords_without_digits_fail(p in "[A-Za-z!@#]{8,20}") {
            prop_assert!(!Validator::default().is_strong_password(&p));
        }
    }
}
