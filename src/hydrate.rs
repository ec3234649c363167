use super::*;
use tokio_postgres::Row;

/// Decoding records back out of query rows.
///
/// Complements [`Entity`], which handles writing. [`Query::load`] uses this
/// to turn a materialized relation back into typed values. Implementations
/// usually read by column name so extra joined columns are ignored.
pub trait Hydrate: Sized {
    fn hydrate(row: &Row) -> Result<Self, PgErr>;
}
