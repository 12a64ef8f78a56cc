//! Form-data store
//!
//! Owns the [`OrganizationDraft`] plus the field errors from the last
//! transition attempt. Every setter makes one targeted update and clears the
//! recorded error for the field it touches. No setter validates across
//! fields; that happens only when the session tries to move forward.

use crate::config::ValidationRules;
use crate::draft::{DocumentRule, JourneyConfig, OrganizationDraft, ValidationApiConfig};
use crate::error::{FieldErrors, StoreError};
use kyc_catalog::{
    category, check_response_field, response_field_category, Channel, DocumentType, InputMethod,
    JourneyKind, ProcessingMode, ValidationApiKind, VerificationMethod,
};
use serde::{Deserialize, Serialize};

/// Error key for the "select at least one service" check
pub const SERVICES_FIELD: &str = "enabled_journeys";

/// Free-text fields of the organization-details step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    /// Organization name
    Name,
    /// Business category
    OrganizationCategory,
    /// Registration number
    RegistrationNumber,
    /// Organization email
    Email,
    /// Organization phone
    Phone,
    /// Street address
    Address,
    /// City
    City,
    /// Country
    Country,
    /// Primary contact name
    PrimaryContactName,
    /// Primary contact email
    PrimaryContactEmail,
    /// Primary contact phone
    PrimaryContactPhone,
    /// Root password
    RootPassword,
}

impl TextField {
    /// Field name, also the key its validation error is reported under
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::OrganizationCategory => "organization_category",
            Self::RegistrationNumber => "registration_number",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::Country => "country",
            Self::PrimaryContactName => "primary_contact_name",
            Self::PrimaryContactEmail => "primary_contact_email",
            Self::PrimaryContactPhone => "primary_contact_phone",
            Self::RootPassword => "root_password",
        }
    }

    /// Whether the field holds a phone number
    #[inline]
    #[must_use]
    pub const fn is_phone(self) -> bool {
        matches!(self, Self::Phone | Self::PrimaryContactPhone)
    }

    fn slot(self, draft: &mut OrganizationDraft) -> &mut String {
        match self {
            Self::Name => &mut draft.name,
            Self::OrganizationCategory => &mut draft.organization_category,
            Self::RegistrationNumber => &mut draft.registration_number,
            Self::Email => &mut draft.email,
            Self::Phone => &mut draft.phone,
            Self::Address => &mut draft.address,
            Self::City => &mut draft.city,
            Self::Country => &mut draft.country,
            Self::PrimaryContactName => &mut draft.primary_contact_name,
            Self::PrimaryContactEmail => &mut draft.primary_contact_email,
            Self::PrimaryContactPhone => &mut draft.primary_contact_phone,
            Self::RootPassword => &mut draft.root_password,
        }
    }
}

/// One pricing attribute update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "field", content = "value")]
pub enum PricingUpdate {
    /// Price per transaction; non-finite or negative input becomes 0
    PricePerTransaction(f64),
    /// Included transactions
    IncludedTransactions(u64),
}

/// One numeric parameter of a validation API
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "field", content = "value")]
pub enum ValidationApiParam {
    /// Overall hit ceiling
    TotalHitLimit(u64),
    /// Price per API call
    ApiPricePerCall(f64),
    /// API hit ceiling
    ApiHitLimit(u64),
    /// Price per batch record
    BatchPricePerRecord(f64),
    /// Batch hit ceiling
    BatchHitLimit(u64),
    /// Records per batch file
    BatchMaxSize(u64),
    /// Files per batch upload
    BatchMaxFiles(u64),
}

impl ValidationApiParam {
    fn apply(self, config: &mut ValidationApiConfig) {
        match self {
            Self::TotalHitLimit(v) => config.total_hit_limit = v,
            Self::ApiPricePerCall(v) => config.api_price_per_call = sanitize_amount(v),
            Self::ApiHitLimit(v) => config.api_hit_limit = v,
            Self::BatchPricePerRecord(v) => config.batch_price_per_record = sanitize_amount(v),
            Self::BatchHitLimit(v) => config.batch_hit_limit = v,
            Self::BatchMaxSize(v) => config.batch_max_size = v,
            Self::BatchMaxFiles(v) => config.batch_max_files = v,
        }
    }
}

fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Flip membership of `item` in an ordered set, appending when added
fn toggle_member<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if let Some(pos) = items.iter().position(|i| *i == item) {
        items.remove(pos);
        false
    } else {
        items.push(item);
        true
    }
}

/// Normalise phone input into `<code> NN NNN NNNN` as the user types
///
/// Keeps at most `rules.phone_digits` national digits. Input that does not
/// start with the country code is reset to the bare code.
#[must_use]
pub fn format_phone(raw: &str, rules: &ValidationRules) -> String {
    let code = rules.phone_country_code.as_str();
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let national: String = kept
        .strip_prefix(code)
        .unwrap_or("")
        .chars()
        .filter(char::is_ascii_digit)
        .take(rules.phone_digits)
        .collect();

    match national.len() {
        0 => code.to_string(),
        1..=2 => format!("{code} {national}"),
        3..=5 => format!("{code} {} {}", &national[..2], &national[2..]),
        _ => format!(
            "{code} {} {} {}",
            &national[..2],
            &national[2..5],
            &national[5..]
        ),
    }
}

/// Holder of the draft and its recorded field errors
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    draft: OrganizationDraft,
    errors: FieldErrors,
}

impl FormStore {
    /// Wrap a draft, restoring its invariants first
    #[must_use]
    pub fn new(mut draft: OrganizationDraft) -> Self {
        draft.normalize();
        Self {
            draft,
            errors: FieldErrors::new(),
        }
    }

    /// The draft
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &OrganizationDraft {
        &self.draft
    }

    /// Errors from the last transition attempt, minus fields edited since
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Replace the recorded errors
    pub fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    /// Drop every recorded error
    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Take the draft out of the store
    #[must_use]
    pub fn into_draft(self) -> OrganizationDraft {
        self.draft
    }

    fn journey_mut(&mut self, journey: JourneyKind) -> Result<&mut JourneyConfig, StoreError> {
        self.draft
            .journey_configs
            .get_mut(&journey)
            .ok_or(StoreError::JourneyNotEnabled(journey))
    }

    fn validation_mut(&mut self, api: ValidationApiKind) -> &mut ValidationApiConfig {
        self.draft
            .validation_config
            .entry(api)
            .or_insert_with(|| ValidationApiConfig::defaults_for(api))
    }

    // -- organization details ------------------------------------------------

    /// Set a free-text field
    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        *field.slot(&mut self.draft) = value.into();
        self.errors.remove(field.as_str());
    }

    /// Set a phone field, normalising the input with [`format_phone`]
    pub fn set_phone(&mut self, field: TextField, raw: &str, rules: &ValidationRules) {
        let formatted = if field.is_phone() {
            format_phone(raw, rules)
        } else {
            raw.to_string()
        };
        self.set_text(field, formatted);
    }

    /// Set whether the root user mirrors the primary contact
    pub fn set_root_user_same_as_contact(&mut self, same: bool) {
        self.draft.root_user_same_as_contact = same;
        self.errors.remove("root_user_same_as_contact");
    }

    /// Set the starting credit balance
    pub fn set_initial_credits(&mut self, credits: i64) {
        self.draft.initial_credits = credits;
        self.errors.remove("initial_credits");
    }

    // -- journeys ------------------------------------------------------------

    /// Enable or disable a journey; returns whether it is now enabled
    ///
    /// Enabling appends the journey and creates a fresh default configuration.
    /// Disabling removes both; a later re-enable does not restore the old one.
    pub fn toggle_journey(&mut self, journey: JourneyKind) -> bool {
        let enabled = toggle_member(&mut self.draft.enabled_journeys, journey);
        if enabled {
            self.draft
                .journey_configs
                .insert(journey, JourneyConfig::new(journey));
        } else {
            self.draft.journey_configs.shift_remove(&journey);
        }
        self.errors.remove(SERVICES_FIELD);
        tracing::debug!(%journey, enabled, "journey toggled");
        enabled
    }

    /// Flip a delivery channel of a journey
    ///
    /// # Errors
    /// [`StoreError::JourneyNotEnabled`] if the journey has no configuration
    pub fn toggle_channel(&mut self, journey: JourneyKind, channel: Channel) -> Result<bool, StoreError> {
        let config = self.journey_mut(journey)?;
        let on = toggle_member(&mut config.channels, channel);
        self.errors.remove("channels");
        Ok(on)
    }

    /// Flip whether a document type is accepted by a journey
    ///
    /// # Errors
    /// [`StoreError::JourneyNotEnabled`] if the journey has no configuration
    pub fn toggle_document(&mut self, journey: JourneyKind, document: DocumentType) -> Result<bool, StoreError> {
        let config = self.journey_mut(journey)?;
        let rule = config.documents_allowed.entry(document).or_insert(DocumentRule {
            enabled: false,
            input_method: InputMethod::All,
        });
        rule.enabled = !rule.enabled;
        let on = rule.enabled;
        self.errors.remove("documents_allowed");
        Ok(on)
    }

    /// Set how a document type is captured in a journey
    ///
    /// # Errors
    /// [`StoreError::JourneyNotEnabled`] if the journey has no configuration
    pub fn set_document_input_method(
        &mut self,
        journey: JourneyKind,
        document: DocumentType,
        method: InputMethod,
    ) -> Result<(), StoreError> {
        let config = self.journey_mut(journey)?;
        config
            .documents_allowed
            .entry(document)
            .or_insert(DocumentRule {
                enabled: false,
                input_method: InputMethod::All,
            })
            .input_method = method;
        self.errors.remove("documents_allowed");
        Ok(())
    }

    /// Flip a biometric verification method of a journey
    ///
    /// # Errors
    /// [`StoreError::JourneyNotEnabled`] if the journey has no configuration
    pub fn toggle_verification_method(
        &mut self,
        journey: JourneyKind,
        method: VerificationMethod,
    ) -> Result<bool, StoreError> {
        let config = self.journey_mut(journey)?;
        let on = toggle_member(&mut config.verification_methods, method);
        self.errors.remove("verification_methods");
        Ok(on)
    }

    /// Flip one response-template field of a journey
    ///
    /// # Errors
    /// Journey not enabled, or a category/field the catalog does not declare
    pub fn toggle_response_field(
        &mut self,
        journey: JourneyKind,
        category_key: &str,
        field: &str,
    ) -> Result<bool, StoreError> {
        check_response_field(category_key, field)?;
        let config = self.journey_mut(journey)?;
        let selected = config
            .response_template
            .enabled_fields
            .entry(category_key.to_string())
            .or_default();
        let on = toggle_member(selected, field.to_string());
        self.errors.remove("response_template");
        Ok(on)
    }

    /// Select every field of a response category, or none
    ///
    /// # Errors
    /// Journey not enabled, or an undeclared category
    pub fn set_all_fields_in_category(
        &mut self,
        journey: JourneyKind,
        category_key: &str,
        select_all: bool,
    ) -> Result<(), StoreError> {
        let category = response_field_category(category_key)?;
        let config = self.journey_mut(journey)?;
        let fields = if select_all {
            category.fields.iter().map(|f| (*f).to_string()).collect()
        } else {
            Vec::new()
        };
        config
            .response_template
            .enabled_fields
            .insert(category_key.to_string(), fields);
        self.errors.remove("response_template");
        Ok(())
    }

    /// Set the response webhook of a journey
    ///
    /// # Errors
    /// [`StoreError::JourneyNotEnabled`] if the journey has no configuration
    pub fn set_webhook_url(&mut self, journey: JourneyKind, url: impl Into<String>) -> Result<(), StoreError> {
        self.journey_mut(journey)?.response_template.webhook_url = url.into();
        self.errors.remove("webhook_url");
        Ok(())
    }

    // -- pricing and org flags -------------------------------------------------

    /// Update one pricing attribute of a journey (or the `validation` entry)
    ///
    /// # Errors
    /// [`StoreError::UnknownPricingKey`] if the entry does not exist
    pub fn set_pricing(&mut self, key: &str, update: PricingUpdate) -> Result<(), StoreError> {
        let entry = self
            .draft
            .pricing
            .get_mut(key)
            .ok_or_else(|| StoreError::UnknownPricingKey(key.to_string()))?;
        match update {
            PricingUpdate::PricePerTransaction(v) => entry.price_per_transaction = sanitize_amount(v),
            PricingUpdate::IncludedTransactions(v) => entry.included_transactions = v,
        }
        self.errors.remove("pricing");
        Ok(())
    }

    /// Set an organization feature flag
    pub fn set_org_config(&mut self, key: impl Into<String>, on: bool) {
        let key = key.into();
        self.errors.remove(&key);
        self.draft.org_configs.insert(key, on);
    }

    // -- non-configurable services --------------------------------------------

    /// Flip a non-configurable service; returns whether it is now on
    pub fn toggle_service(&mut self, service_id: &str) -> bool {
        let slot = self
            .draft
            .enabled_services
            .entry(service_id.to_string())
            .or_insert(false);
        *slot = !*slot;
        let on = *slot;
        self.errors.remove("enabled_services");
        on
    }

    /// Switch every service of a non-configurable category on or off
    ///
    /// # Errors
    /// Unknown category, or a category configured per service
    pub fn set_category_services(&mut self, category_key: &str, enable: bool) -> Result<(), StoreError> {
        let category = category(category_key)?;
        if category.configurable.needs_substep() {
            return Err(StoreError::ConfigurableCategory(category_key.to_string()));
        }
        for service in category.services {
            self.draft
                .enabled_services
                .insert(service.id.to_string(), enable);
        }
        self.errors.remove("enabled_services");
        Ok(())
    }

    /// Number of switched-on services in a category
    ///
    /// # Errors
    /// Unknown category
    pub fn enabled_service_count(&self, category_key: &str) -> Result<usize, StoreError> {
        let category = category(category_key)?;
        Ok(category
            .services
            .iter()
            .filter(|s| self.draft.is_service_enabled(s.id))
            .count())
    }

    /// Expand or collapse the API module list
    pub fn toggle_api_modules_visibility(&mut self) -> bool {
        self.draft.show_api_modules = !self.draft.show_api_modules;
        self.draft.show_api_modules
    }

    // -- validation APIs -------------------------------------------------------

    /// Flip whether a validation API is selected; numeric parameters are kept
    pub fn toggle_validation_api(&mut self, api: ValidationApiKind) -> bool {
        let config = self.validation_mut(api);
        config.enabled = !config.enabled;
        let enabled = config.enabled;
        self.errors.remove(SERVICES_FIELD);
        tracing::debug!(%api, enabled, "validation api toggled");
        enabled
    }

    /// Flip API or batch processing of a validation API
    pub fn toggle_processing_mode(&mut self, api: ValidationApiKind, mode: ProcessingMode) -> bool {
        let config = self.validation_mut(api);
        let flag = match mode {
            ProcessingMode::Api => &mut config.api_enabled,
            ProcessingMode::Batch => &mut config.batch_enabled,
        };
        *flag = !*flag;
        let on = *flag;
        self.errors.remove("validation_config");
        on
    }

    /// Set one numeric parameter of a validation API
    pub fn set_validation_api_param(&mut self, api: ValidationApiKind, param: ValidationApiParam) {
        param.apply(self.validation_mut(api));
        self.errors.remove("validation_config");
    }
}
