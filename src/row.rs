use super::*;
use std::pin::Pin;
use tokio_postgres::binary_copy::BinaryCopyInWriter;
use tokio_postgres::types::ToSql;

/// Reads an entity's values in column order.
///
/// Every declared column must have an accessor; the writer relies on the
/// slice lining up with the wire types it was opened with.
pub(crate) fn values<'r, T: Entity>(
    record: &'r T,
    columns: &[Column],
) -> Result<Vec<&'r (dyn ToSql + Sync)>, Error> {
    columns
        .iter()
        .map(|column| {
            record.get(column.name()).ok_or(Error::Accessor {
                entity: std::any::type_name::<T>(),
                column: column.name(),
            })
        })
        .collect()
}

/// Writes one entity to the binary COPY stream as a single row.
pub(crate) async fn write<T: Entity>(
    record: &T,
    columns: &[Column],
    writer: Pin<&mut BinaryCopyInWriter>,
) -> Result<(), Error> {
    let ref values = values(record, columns)?;
    writer.write(values).await.map_err(Error::from)
}
