//! Catalog lookup errors

/// Errors raised when resolving identifiers against the catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Identifier is not declared in the catalog
    #[error("unknown {kind} id: {id}")]
    UnknownId {
        /// Identifier family, e.g. "journey"
        kind: &'static str,
        /// Rejected identifier
        id: String,
    },

    /// Category key is not declared in the catalog
    #[error("unknown service category: {0}")]
    UnknownCategory(String),

    /// Response-template field does not belong to its category
    #[error("field '{field}' is not part of response category '{category}'")]
    UnknownResponseField {
        /// Response-template category key
        category: String,
        /// Rejected field name
        field: String,
    },
}
