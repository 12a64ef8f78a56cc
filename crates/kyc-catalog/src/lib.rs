//! KYC Service Catalog
//!
//! Static, read-only description of everything a private organization can be
//! onboarded with.
//!
//! # Overview
//!
//! - **Service categories**: KYC and authentication journeys, validation
//!   APIs, additional services and API modules
//! - **Typed identifiers**: journeys, validation APIs, channels, documents,
//!   input and verification methods
//! - **Response-template fields**: the per-category field catalog a journey
//!   selects its result fields from
//! - **Steps**: wizard step titles and descriptions
//!
//! # Example
//!
//! ```rust
//! use kyc_catalog::{categories, configurable_journey_ids, JourneyKind};
//!
//! let journeys = configurable_journey_ids();
//! assert!(journeys.contains(JourneyKind::Rekyc.as_str()));
//! assert_eq!(categories().len(), 5);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod ids;
pub mod response_fields;
pub mod services;
pub mod steps;

// Re-exports
pub use error::CatalogError;
pub use ids::{
    Channel, DocumentType, InputMethod, JourneyKind, ProcessingMode, ValidationApiKind,
    VerificationMethod,
};
pub use response_fields::{
    check_response_field, response_field_categories, response_field_category,
    ResponseFieldCategory,
};
pub use services::{
    categories, category, category_of_journey, configurable_journey_ids, find_service,
    toggle_service_ids, validation_category, Category, Configurability, Service, SubOption,
};
pub use steps::{StepInfo, ORG_CONFIG_DEFAULTS, STEPS};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for catalog lookups
    pub use crate::{
        Category, CatalogError, Channel, Configurability, DocumentType, InputMethod, JourneyKind,
        ProcessingMode, ValidationApiKind, VerificationMethod,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
