//! Typed catalog identifiers
//!
//! Every identifier that the onboarding flow keys data by is a closed enum
//! with a stable snake_case wire name. `ALL` lists variants in catalog
//! declaration order, which is the order the wizard walks them in.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! catalog_id {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All variants in catalog declaration order
            pub const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];

            /// Stable wire identifier
            #[inline]
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CatalogError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok(Self::$variant), )+
                    other => Err(CatalogError::UnknownId {
                        kind: $kind,
                        id: other.to_string(),
                    }),
                }
            }
        }
    };
}

catalog_id! {
    /// A configurable KYC or authentication journey
    JourneyKind, "journey" {
        /// New customer registration
        Onboarding => "onboarding",
        /// Periodic identity reverification
        Rekyc => "rekyc",
        /// Transaction authorization
        Authorise => "authorise",
        /// Face search in database
        OneToMany => "one_to_many",
    }
}

catalog_id! {
    /// Document validation API configured for API and/or batch processing
    ValidationApiKind, "validation api" {
        /// Emirates ID validation
        EidValidation => "eid_validation",
        /// Passport validation
        PassportValidation => "passport_validation",
    }
}

catalog_id! {
    /// Delivery channel for a journey
    Channel, "channel" {
        /// Native SDK integration
        Sdk => "sdk",
        /// Web-based remote flow
        RemoteLink => "remote_link",
        /// Direct API integration
        Api => "api",
    }
}

catalog_id! {
    /// Identity document accepted by a journey
    DocumentType, "document type" {
        /// Emirates ID card
        EmiratesId => "emirates_id",
        /// Passport
        Passport => "passport",
        /// GCC national ID
        GccId => "gcc_id",
    }
}

catalog_id! {
    /// How a document's data is captured
    InputMethod, "input method" {
        /// Scan or manual entry
        All => "all",
        /// Scan only
        Scan => "scan",
        /// Manual entry only
        Manual => "manual",
    }
}

catalog_id! {
    /// Biometric verification method
    VerificationMethod, "verification method" {
        /// Face recognition
        Face => "face",
        /// Fingerprint
        Fingerprint => "fingerprint",
    }
}

catalog_id! {
    /// Processing mode of a validation API
    ProcessingMode, "processing mode" {
        /// Real-time API validation
        Api => "api",
        /// Bulk validation via CSV
        Batch => "batch",
    }
}

impl Default for InputMethod {
    fn default() -> Self {
        Self::All
    }
}

impl JourneyKind {
    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Onboarding => "Onboarding",
            Self::Rekyc => "Re-KYC",
            Self::Authorise => "Authorise",
            Self::OneToMany => "One-to-Many",
        }
    }
}

impl ValidationApiKind {
    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EidValidation => "Emirates ID",
            Self::PassportValidation => "Passport",
        }
    }
}

impl DocumentType {
    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EmiratesId => "Emirates ID",
            Self::Passport => "Passport",
            Self::GccId => "GCC ID",
        }
    }
}

impl ProcessingMode {
    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Api => "API Based",
            Self::Batch => "Batch Processing",
        }
    }
}
