//! Service categories and their services
//!
//! Read-only description of what an organization can be onboarded with.
//! Categories marked [`Configurability::Journey`] get one configuration
//! sub-screen per enabled service; the validation category gets one per
//! enabled API; the rest are plain on/off switches.

use crate::error::CatalogError;
use crate::ids::JourneyKind;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

/// Category key of the KYC journeys
pub const KYC_SERVICE: &str = "kyc_service";
/// Category key of the authentication journeys
pub const AUTHENTICATION_SERVICE: &str = "authentication_service";
/// Category key of the validation APIs
pub const VALIDATION_SERVICE: &str = "validation_service";
/// Category key of the supplementary services
pub const ADDITIONAL_SERVICES: &str = "additional_services";
/// Category key of the individual API modules
pub const API_MODULES: &str = "api_modules";

/// Whether enabling a service in a category requires its own sub-screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Configurability {
    /// Each enabled service is a journey with its own configuration screen
    Journey,
    /// Each enabled service is a validation API with its own configuration screen
    Validation,
    /// Services are toggled on the overview only
    None,
}

impl Configurability {
    /// True for journey categories only
    #[inline]
    #[must_use]
    pub const fn is_journey(self) -> bool {
        matches!(self, Self::Journey)
    }

    /// True when services of the category get a dedicated sub-screen
    #[inline]
    #[must_use]
    pub const fn needs_substep(self) -> bool {
        !matches!(self, Self::None)
    }
}

// Wire shape is `true`, `false` or `"validation"`.
impl Serialize for Configurability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Journey => serializer.serialize_bool(true),
            Self::None => serializer.serialize_bool(false),
            Self::Validation => serializer.serialize_str("validation"),
        }
    }
}

/// Optional add-on of a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubOption {
    /// Service identifier the add-on is tracked under
    pub id: &'static str,
    /// Display label
    pub label: &'static str,
    /// Short description
    pub description: &'static str,
}

/// A single service offered within a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Service {
    /// Stable identifier
    pub id: &'static str,
    /// Display label
    pub label: &'static str,
    /// Short description
    pub description: &'static str,
    /// Add-ons toggled alongside the service
    #[serde(skip_serializing_if = "<[SubOption]>::is_empty")]
    pub sub_options: &'static [SubOption],
}

impl Service {
    const fn new(id: &'static str, label: &'static str, description: &'static str) -> Self {
        Self {
            id,
            label,
            description,
            sub_options: &[],
        }
    }
}

/// A group of services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Stable category key
    pub key: &'static str,
    /// Display label
    pub label: &'static str,
    /// Short description
    pub description: &'static str,
    /// Sub-screen behaviour
    pub configurable: Configurability,
    /// Journeys of this category carry delivery channels
    pub has_delivery_modes: bool,
    /// Collapsed on the overview unless the user asks for it
    pub hidden_by_default: bool,
    /// Services in declaration order
    pub services: &'static [Service],
}

impl Category {
    /// Look up a service of this category
    #[must_use]
    pub fn service(&self, id: &str) -> Option<&'static Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Whether the service id belongs to this category
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.service(id).is_some()
    }
}

static CATEGORIES: [Category; 5] = [
    Category {
        key: KYC_SERVICE,
        label: "KYC Service",
        description: "Identity verification services with journey configuration",
        configurable: Configurability::Journey,
        has_delivery_modes: true,
        hidden_by_default: false,
        services: &[
            Service::new("onboarding", "Onboarding", "New customer registration"),
            Service::new("rekyc", "Re-KYC", "Periodic identity reverification"),
        ],
    },
    Category {
        key: AUTHENTICATION_SERVICE,
        label: "Authentication Service",
        description: "User authentication and verification services",
        configurable: Configurability::Journey,
        has_delivery_modes: true,
        hidden_by_default: false,
        services: &[
            Service::new("authorise", "Authorise", "Transaction authorization"),
            Service::new("one_to_many", "One-to-Many", "Face search in database"),
        ],
    },
    Category {
        key: VALIDATION_SERVICE,
        label: "Validation Service",
        description: "EID and Passport validation with API and Batch options",
        configurable: Configurability::Validation,
        has_delivery_modes: false,
        hidden_by_default: false,
        services: &[
            Service::new("eid_validation", "Emirates ID", "Emirates ID validation"),
            Service::new("passport_validation", "Passport", "Passport validation"),
        ],
    },
    Category {
        key: ADDITIONAL_SERVICES,
        label: "Additional Services",
        description: "Supplementary service modules",
        configurable: Configurability::None,
        has_delivery_modes: false,
        hidden_by_default: false,
        services: &[Service {
            id: "population_migration",
            label: "Population Migration",
            description: "Bulk data migration service",
            sub_options: &[SubOption {
                id: "biometric_verification",
                label: "Biometric Verification",
                description: "Include biometric identity verification",
            }],
        }],
    },
    Category {
        key: API_MODULES,
        label: "API Modules",
        description: "Individual API endpoints available for integration",
        configurable: Configurability::None,
        has_delivery_modes: false,
        hidden_by_default: true,
        services: &[
            Service::new("person_detail", "Person Detail", "Get person details"),
            Service::new("person_gov_photo", "Person Gov Photo", "Government photo retrieval"),
            Service::new("digital_eid", "Digital EID", "Digital Emirates ID"),
            Service::new("search_name_dob", "Search Name/DOB", "Search by name and date of birth"),
            Service::new("immigration_details", "Immigration Details", "Immigration status details"),
            Service::new("sponsor_details", "Sponsor Details", "Sponsor information"),
            Service::new("fingerprint_fetch", "Fingerprint Fetch", "Retrieve fingerprint data"),
            Service::new("fingerprint_match", "Fingerprint Match", "Match fingerprint data"),
            Service::new("face_compare", "Face Compare", "Compare two faces"),
            Service::new("face_person_match", "Face Person Match", "Match face to person record"),
            Service::new("document_ocr", "Document OCR", "Extract text from documents"),
            Service::new("person_live_photo", "Person Live Photo", "Capture live photo"),
            Service::new(
                "person_live_image_exists",
                "Person Live Image Exists",
                "Check if live image exists",
            ),
            Service::new("record_exists", "Record Exists", "Check if person record exists"),
            Service::new("person_authenticate", "Person Authenticate", "Authenticate person identity"),
            Service::new("customer_bio", "Customer Bio", "Customer biometric data"),
        ],
    },
];

/// All categories in display order
#[inline]
#[must_use]
pub fn categories() -> &'static [Category] {
    &CATEGORIES
}

/// Look up a category by key
///
/// # Errors
/// Returns [`CatalogError::UnknownCategory`] for undeclared keys
pub fn category(key: &str) -> Result<&'static Category, CatalogError> {
    CATEGORIES
        .iter()
        .find(|c| c.key == key)
        .ok_or_else(|| CatalogError::UnknownCategory(key.to_string()))
}

/// Union of service ids across journey categories
#[must_use]
pub fn configurable_journey_ids() -> BTreeSet<&'static str> {
    CATEGORIES
        .iter()
        .filter(|c| c.configurable.is_journey())
        .flat_map(|c| c.services.iter().map(|s| s.id))
        .collect()
}

/// Find a service and its category by service id
#[must_use]
pub fn find_service(id: &str) -> Option<(&'static Category, &'static Service)> {
    CATEGORIES
        .iter()
        .find_map(|c| c.service(id).map(|s| (c, s)))
}

/// Category a journey is declared in
#[must_use]
pub fn category_of_journey(journey: JourneyKind) -> &'static Category {
    match journey {
        JourneyKind::Onboarding | JourneyKind::Rekyc => &CATEGORIES[0],
        JourneyKind::Authorise | JourneyKind::OneToMany => &CATEGORIES[1],
    }
}

/// The validation category
#[inline]
#[must_use]
pub fn validation_category() -> &'static Category {
    &CATEGORIES[2]
}

/// Service ids of non-configurable categories, flattened with their add-ons
///
/// These are the keys of an organization's `enabled_services` map.
#[must_use]
pub fn toggle_service_ids() -> Vec<&'static str> {
    CATEGORIES
        .iter()
        .filter(|c| !c.configurable.needs_substep())
        .flat_map(|c| {
            c.services
                .iter()
                .flat_map(|s| std::iter::once(s.id).chain(s.sub_options.iter().map(|o| o.id)))
        })
        .collect()
}
