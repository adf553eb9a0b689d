//! Error types for schema generation
//!
//! Any of these aborts the whole run: downstream consumers assume one
//! complete, self-consistent output file or none at all.

/// Error type for schema generation
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A relation field points at an entity that is not part of the graph
    #[error("unknown entity `{target}` referenced by `{entity}.{field}`")]
    UnknownEntity {
        /// Entity owning the dangling relation field
        entity: String,
        /// The relation field name
        field: String,
        /// The unresolved target entity name
        target: String,
    },

    /// A connect shape is required but the target entity has no identity field
    #[error("entity `{0}` has no identity field to build a connect shape from")]
    MissingIdentity(String),

    /// Two entities share a name, making cross-references ambiguous
    #[error("duplicate entity name `{0}`")]
    DuplicateEntity(String),
}
