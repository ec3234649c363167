/// Failures surfaced by registration lookups and materialization.
///
/// Driver failures are carried through [`Error::Postgres`] untouched;
/// nothing here retries or translates them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The entity type was never added to the [`Model`](crate::Model).
    #[error("entity type {0} is not registered in the model")]
    Unregistered(&'static str),
    /// The entity type is registered but has no view mapping to name a table after.
    #[error("entity type {0} is not mapped to a view")]
    Unmapped(&'static str),
    /// The entity type declares no columns, so no table shape can be derived.
    #[error("entity type {0} declares no columns")]
    Columnless(&'static str),
    /// A declared column has no value accessor on the entity.
    #[error("entity type {entity} has no accessor for column {column}")]
    Accessor {
        entity: &'static str,
        column: &'static str,
    },
    /// The cancellation token fired before the pipeline completed.
    #[error("materialization cancelled")]
    Cancelled,
    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),
    #[error("DB_URL: {0}")]
    Environment(#[from] std::env::VarError),
}

impl Error {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
