//! Organization draft
//!
//! The single record the wizard edits. It is created when the wizard mounts,
//! mutated only through [`crate::FormStore`], and handed whole to the
//! organization gateway on submit.
//!
//! Invariants:
//! - `journey_configs` has an entry iff the journey is in `enabled_journeys`
//! - `enabled_journeys` keeps toggle order and holds no duplicates
//! - `validation_config` always holds every validation API, in catalog order

use indexmap::IndexMap;
use kyc_catalog::{
    toggle_service_ids, Channel, DocumentType, InputMethod, JourneyKind, ValidationApiKind,
    VerificationMethod, ORG_CONFIG_DEFAULTS,
};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Pricing key shared by all validation APIs
pub const VALIDATION_PRICING_KEY: &str = "validation";

const HASH_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const HASH_LEN: usize = 8;

/// Journey configuration identifier, `<JOURNEY>_<8 base36 chars>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JourneyConfigId(String);

impl JourneyConfigId {
    /// Generate a fresh id for `journey`
    #[must_use]
    pub fn generate(journey: JourneyKind) -> Self {
        Self::generate_with(journey, &mut rand::thread_rng())
    }

    /// Generate with a caller-supplied RNG
    #[must_use]
    pub fn generate_with<R: Rng + ?Sized>(journey: JourneyKind, rng: &mut R) -> Self {
        let hash: String = (0..HASH_LEN)
            .map(|_| char::from(HASH_ALPHABET[rng.gen_range(0..HASH_ALPHABET.len())]))
            .collect();
        Self(format!("{}_{hash}", journey.as_str().to_uppercase()))
    }

    /// The id as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JourneyConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a document type is accepted and how it is captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRule {
    /// Document accepted by the journey
    pub enabled: bool,
    /// Capture method
    pub input_method: InputMethod,
}

/// Response-template selection of a journey
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTemplate {
    /// Selected field names per response-field category
    pub enabled_fields: IndexMap<String, Vec<String>>,
    /// Result encoding
    pub format: String,
    /// Callback receiving results, empty when unset
    pub webhook_url: String,
}

impl Default for ResponseTemplate {
    fn default() -> Self {
        Self {
            enabled_fields: IndexMap::new(),
            format: "json".to_string(),
            webhook_url: String::new(),
        }
    }
}

/// Per-journey configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyConfig {
    /// Generated identifier
    pub journey_config_id: JourneyConfigId,
    /// Delivery channels in selection order
    pub channels: Vec<Channel>,
    /// Accepted documents
    pub documents_allowed: IndexMap<DocumentType, DocumentRule>,
    /// Biometric methods in selection order
    pub verification_methods: Vec<VerificationMethod>,
    /// Result field selection
    pub response_template: ResponseTemplate,
}

impl JourneyConfig {
    /// Fresh default configuration for `journey`
    #[must_use]
    pub fn new(journey: JourneyKind) -> Self {
        Self::with_id(JourneyConfigId::generate(journey))
    }

    /// Default configuration under a given id
    #[must_use]
    pub fn with_id(journey_config_id: JourneyConfigId) -> Self {
        let documents_allowed = DocumentType::ALL
            .iter()
            .map(|doc| {
                let rule = DocumentRule {
                    enabled: !matches!(doc, DocumentType::GccId),
                    input_method: InputMethod::All,
                };
                (*doc, rule)
            })
            .collect();

        Self {
            journey_config_id,
            channels: Vec::new(),
            documents_allowed,
            verification_methods: vec![VerificationMethod::Face],
            response_template: ResponseTemplate::default(),
        }
    }

    /// Enabled document types in catalog order
    #[must_use]
    pub fn enabled_documents(&self) -> Vec<DocumentType> {
        self.documents_allowed
            .iter()
            .filter(|(_, rule)| rule.enabled)
            .map(|(doc, _)| *doc)
            .collect()
    }

    /// Number of selected fields in one response category
    #[must_use]
    pub fn selected_field_count(&self, category: &str) -> usize {
        self.response_template
            .enabled_fields
            .get(category)
            .map_or(0, Vec::len)
    }

    /// Number of selected fields across all response categories
    #[must_use]
    pub fn total_selected_fields(&self) -> usize {
        self.response_template.enabled_fields.values().map(Vec::len).sum()
    }
}

/// Configuration of one validation API
///
/// Numeric parameters survive toggling `enabled` off so that re-enabling
/// restores them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationApiConfig {
    /// API selected on the overview
    pub enabled: bool,
    /// Real-time API processing on
    pub api_enabled: bool,
    /// Batch processing on
    pub batch_enabled: bool,
    /// Overall hit ceiling
    pub total_hit_limit: u64,
    /// Price per API call
    pub api_price_per_call: f64,
    /// API hit ceiling
    pub api_hit_limit: u64,
    /// Price per batch record
    pub batch_price_per_record: f64,
    /// Batch hit ceiling
    pub batch_hit_limit: u64,
    /// Records per batch file
    pub batch_max_size: u64,
    /// Files per batch upload
    pub batch_max_files: u64,
}

impl ValidationApiConfig {
    /// Disabled configuration with the default limits for `api`
    #[must_use]
    pub fn defaults_for(api: ValidationApiKind) -> Self {
        let (total, api_hits, batch_hits, batch_size) = match api {
            ValidationApiKind::EidValidation => (100_000, 70_000, 30_000, 1000),
            ValidationApiKind::PassportValidation => (50_000, 35_000, 15_000, 500),
        };
        Self {
            enabled: false,
            api_enabled: false,
            batch_enabled: false,
            total_hit_limit: total,
            api_price_per_call: 1.0,
            api_hit_limit: api_hits,
            batch_price_per_record: 0.5,
            batch_hit_limit: batch_hits,
            batch_max_size: batch_size,
            batch_max_files: 10,
        }
    }
}

/// Price and bundle size of one module
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingEntry {
    /// Price charged per transaction
    pub price_per_transaction: f64,
    /// Transactions included in the base plan
    pub included_transactions: u64,
}

impl PricingEntry {
    const fn new(price_per_transaction: f64, included_transactions: u64) -> Self {
        Self {
            price_per_transaction,
            included_transactions,
        }
    }
}

/// The in-progress organization
///
/// Deserializing normalizes the draft, so a loaded draft meets the same
/// invariants as one built through [`crate::FormStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, remote = "Self")]
pub struct OrganizationDraft {
    /// Organization name
    pub name: String,
    /// Business category
    pub organization_category: String,
    /// Trade registration number
    pub registration_number: String,
    /// Organization contact email
    pub email: String,
    /// Organization contact phone
    pub phone: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Country
    pub country: String,

    /// Root user mirrors the primary contact
    pub root_user_same_as_contact: bool,
    /// Primary contact name
    pub primary_contact_name: String,
    /// Primary contact email
    pub primary_contact_email: String,
    /// Primary contact phone
    pub primary_contact_phone: String,
    /// Root user password
    pub root_password: String,

    /// Enabled journeys in toggle order
    pub enabled_journeys: Vec<JourneyKind>,
    /// Configuration per enabled journey
    pub journey_configs: IndexMap<JourneyKind, JourneyConfig>,
    /// Configuration per validation API, always complete
    pub validation_config: IndexMap<ValidationApiKind, ValidationApiConfig>,
    /// On/off state of non-configurable services
    pub enabled_services: IndexMap<String, bool>,
    /// API module list expanded on the overview
    pub show_api_modules: bool,

    /// Organization feature flags
    pub org_configs: IndexMap<String, bool>,
    /// Pricing per journey plus the shared validation entry
    pub pricing: IndexMap<String, PricingEntry>,
    /// Starting credit balance
    pub initial_credits: i64,
}

impl Default for OrganizationDraft {
    fn default() -> Self {
        let validation_config = ValidationApiKind::ALL
            .iter()
            .map(|api| (*api, ValidationApiConfig::defaults_for(*api)))
            .collect();

        let enabled_services = toggle_service_ids()
            .into_iter()
            .map(|id| (id.to_string(), false))
            .collect();

        let org_configs = ORG_CONFIG_DEFAULTS
            .iter()
            .map(|(key, on)| ((*key).to_string(), *on))
            .collect();

        let pricing = [
            (JourneyKind::Onboarding.as_str(), PricingEntry::new(5.0, 1000)),
            (JourneyKind::Rekyc.as_str(), PricingEntry::new(3.0, 500)),
            (JourneyKind::Authorise.as_str(), PricingEntry::new(2.0, 2000)),
            (JourneyKind::OneToMany.as_str(), PricingEntry::new(1.0, 5000)),
            (VALIDATION_PRICING_KEY, PricingEntry::new(0.5, 10_000)),
        ]
        .into_iter()
        .map(|(key, entry)| (key.to_string(), entry))
        .collect();

        Self {
            name: String::new(),
            organization_category: String::new(),
            registration_number: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            country: "UAE".to_string(),
            root_user_same_as_contact: true,
            primary_contact_name: String::new(),
            primary_contact_email: String::new(),
            primary_contact_phone: String::new(),
            root_password: String::new(),
            enabled_journeys: Vec::new(),
            journey_configs: IndexMap::new(),
            validation_config,
            enabled_services,
            show_api_modules: false,
            org_configs,
            pricing,
            initial_credits: 10_000,
        }
    }
}

impl Serialize for OrganizationDraft {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OrganizationDraft::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for OrganizationDraft {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut draft = OrganizationDraft::deserialize(deserializer)?;
        draft.normalize();
        Ok(draft)
    }
}

impl OrganizationDraft {
    /// Blank draft
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Demo-populated draft the wizard mounts with
    #[must_use]
    pub fn demo() -> Self {
        let mut draft = Self {
            name: "Acme Financial Services".to_string(),
            organization_category: "Financial".to_string(),
            registration_number: "REG-2024-78523".to_string(),
            email: "contact@acmefinancial.ae".to_string(),
            phone: "+971 50 123 4567".to_string(),
            address: "Tower 5, Floor 12, Business Bay".to_string(),
            city: "Dubai".to_string(),
            primary_contact_name: "Ahmed Al Rashid".to_string(),
            primary_contact_email: "ahmed.rashid@acmefinancial.ae".to_string(),
            primary_contact_phone: "+971 55 987 6543".to_string(),
            root_password: "Demo@1234".to_string(),
            ..Self::default()
        };
        draft.enabled_journeys.push(JourneyKind::Onboarding);
        draft
            .journey_configs
            .insert(JourneyKind::Onboarding, JourneyConfig::new(JourneyKind::Onboarding));
        draft
    }

    /// Whether `journey` is enabled
    #[inline]
    #[must_use]
    pub fn is_journey_enabled(&self, journey: JourneyKind) -> bool {
        self.enabled_journeys.contains(&journey)
    }

    /// Whether validation API `api` is selected
    #[inline]
    #[must_use]
    pub fn is_validation_api_enabled(&self, api: ValidationApiKind) -> bool {
        self.validation_config.get(&api).is_some_and(|c| c.enabled)
    }

    /// Selected validation APIs in catalog declaration order
    ///
    /// Journeys are walked in toggle order, validation APIs in catalog order.
    #[must_use]
    pub fn enabled_validation_apis(&self) -> Vec<ValidationApiKind> {
        ValidationApiKind::ALL
            .iter()
            .copied()
            .filter(|api| self.is_validation_api_enabled(*api))
            .collect()
    }

    /// Whether a non-configurable service is switched on
    #[inline]
    #[must_use]
    pub fn is_service_enabled(&self, service_id: &str) -> bool {
        self.enabled_services.get(service_id).copied().unwrap_or(false)
    }

    /// Restore the draft invariants
    ///
    /// - duplicate journeys are dropped, keeping the first toggle
    /// - every enabled journey gets a config, orphan configs are removed
    /// - `validation_config` is rebuilt in catalog order, filling defaults
    /// - missing service, feature-flag and pricing keys take their defaults
    pub fn normalize(&mut self) {
        for journey in std::mem::take(&mut self.enabled_journeys) {
            if !self.enabled_journeys.contains(&journey) {
                self.enabled_journeys.push(journey);
            }
        }

        let mut configs = std::mem::take(&mut self.journey_configs);
        self.journey_configs = self
            .enabled_journeys
            .iter()
            .map(|journey| {
                let config = configs
                    .shift_remove(journey)
                    .unwrap_or_else(|| JourneyConfig::new(*journey));
                (*journey, config)
            })
            .collect();

        let mut apis = std::mem::take(&mut self.validation_config);
        self.validation_config = ValidationApiKind::ALL
            .iter()
            .map(|api| {
                let config = apis
                    .shift_remove(api)
                    .unwrap_or_else(|| ValidationApiConfig::defaults_for(*api));
                (*api, config)
            })
            .collect();

        let defaults = Self::default();
        for (id, on) in defaults.enabled_services {
            self.enabled_services.entry(id).or_insert(on);
        }
        for (key, on) in defaults.org_configs {
            self.org_configs.entry(key).or_insert(on);
        }
        for (key, entry) in defaults.pricing {
            self.pricing.entry(key).or_insert(entry);
        }
    }

    /// Check the journey/config invariant
    #[must_use]
    pub fn journeys_consistent(&self) -> bool {
        self.enabled_journeys.len() == self.journey_configs.len()
            && self
                .enabled_journeys
                .iter()
                .all(|j| self.journey_configs.contains_key(j))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn journey_config_id_has_upper_prefix_and_base36_hash() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = JourneyConfigId::generate_with(JourneyKind::OneToMany, &mut rng);
        let (prefix, hash) = id.as_str().rsplit_once('_').unwrap();

        assert_eq!(prefix, "ONE_TO_MANY");
        assert_eq!(hash.len(), 8);
        assert!(hash.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn default_journey_config_accepts_eid_and_passport() {
        let config = JourneyConfig::new(JourneyKind::Onboarding);
        assert_eq!(
            config.enabled_documents(),
            vec![DocumentType::EmiratesId, DocumentType::Passport]
        );
        assert_eq!(config.verification_methods, vec![VerificationMethod::Face]);
        assert!(config.channels.is_empty());
        assert_eq!(config.response_template.format, "json");
        assert_eq!(config.total_selected_fields(), 0);
    }

    #[test]
    fn blank_draft_has_every_validation_api_disabled() {
        let draft = OrganizationDraft::default();
        let keys: Vec<_> = draft.validation_config.keys().copied().collect();
        assert_eq!(keys, ValidationApiKind::ALL);
        assert!(draft.enabled_validation_apis().is_empty());
        assert_eq!(draft.country, "UAE");
        assert_eq!(draft.initial_credits, 10_000);
        assert!(draft.journeys_consistent());
    }

    #[test]
    fn validation_defaults_differ_per_api() {
        let eid = ValidationApiConfig::defaults_for(ValidationApiKind::EidValidation);
        let passport = ValidationApiConfig::defaults_for(ValidationApiKind::PassportValidation);
        assert_eq!(eid.total_hit_limit, 100_000);
        assert_eq!(passport.batch_max_size, 500);
        assert!(!eid.enabled && !eid.api_enabled && !eid.batch_enabled);
    }

    #[test]
    fn demo_draft_enables_onboarding_with_config() {
        let draft = OrganizationDraft::demo();
        assert_eq!(draft.enabled_journeys, vec![JourneyKind::Onboarding]);
        assert!(draft.journeys_consistent());
        assert!(draft
            .journey_configs[&JourneyKind::Onboarding]
            .journey_config_id
            .as_str()
            .starts_with("ONBOARDING_"));
    }

    #[test]
    fn draft_serializes_with_wire_keys() {
        let draft = OrganizationDraft::demo();
        let json = serde_json::to_value(&draft).unwrap();

        assert_eq!(json["enabled_journeys"][0], "onboarding");
        assert!(json["journey_configs"]["onboarding"]["documents_allowed"]["emirates_id"]["enabled"]
            .as_bool()
            .unwrap());
        assert_eq!(json["validation_config"]["eid_validation"]["batch_max_files"], 10);

        let back: OrganizationDraft = serde_json::from_value(json).unwrap();
        assert_eq!(back, draft);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let draft: OrganizationDraft =
            serde_json::from_str(r#"{ "name": "Beta Bank", "enabled_journeys": [] }"#).unwrap();
        assert_eq!(draft.name, "Beta Bank");
        assert_eq!(draft.validation_config.len(), 2);
        assert_eq!(draft.pricing[VALIDATION_PRICING_KEY].included_transactions, 10_000);
    }

    #[test]
    fn loaded_draft_drops_duplicate_journeys_and_fills_configs() {
        let draft: OrganizationDraft = serde_json::from_str(
            r#"{
                "enabled_journeys": ["rekyc", "rekyc", "onboarding"],
                "journey_configs": {},
                "validation_config": {
                    "passport_validation": {
                        "enabled": true, "api_enabled": true, "batch_enabled": false,
                        "total_hit_limit": 5, "api_price_per_call": 2.0, "api_hit_limit": 5,
                        "batch_price_per_record": 1.0, "batch_hit_limit": 0,
                        "batch_max_size": 1, "batch_max_files": 1
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            draft.enabled_journeys,
            vec![JourneyKind::Rekyc, JourneyKind::Onboarding]
        );
        assert!(draft.journeys_consistent());
        assert_eq!(
            draft.journey_configs.keys().copied().collect::<Vec<_>>(),
            draft.enabled_journeys
        );

        let keys: Vec<_> = draft.validation_config.keys().copied().collect();
        assert_eq!(keys, ValidationApiKind::ALL);
        assert_eq!(
            draft.enabled_validation_apis(),
            vec![ValidationApiKind::PassportValidation]
        );
        assert_eq!(
            draft.validation_config[&ValidationApiKind::PassportValidation].total_hit_limit,
            5
        );
        assert_eq!(
            draft.validation_config[&ValidationApiKind::EidValidation],
            ValidationApiConfig::defaults_for(ValidationApiKind::EidValidation)
        );
    }

    #[test]
    fn loaded_draft_drops_configs_of_disabled_journeys() {
        let mut json = serde_json::to_value(OrganizationDraft::demo()).unwrap();
        json["enabled_journeys"] = serde_json::json!([]);
        json["pricing"] = serde_json::json!({});

        let draft: OrganizationDraft = serde_json::from_value(json).unwrap();
        assert!(draft.journey_configs.is_empty());
        assert!(draft.journeys_consistent());
        assert_eq!(draft.pricing, OrganizationDraft::default().pricing);
    }

    #[test]
    fn normalize_keeps_existing_config_ids() {
        let mut draft = OrganizationDraft::demo();
        let id = draft.journey_configs[&JourneyKind::Onboarding]
            .journey_config_id
            .clone();
        draft.enabled_journeys.push(JourneyKind::Onboarding);

        draft.normalize();
        assert_eq!(draft.enabled_journeys, vec![JourneyKind::Onboarding]);
        assert_eq!(
            draft.journey_configs[&JourneyKind::Onboarding].journey_config_id,
            id
        );
    }
}
