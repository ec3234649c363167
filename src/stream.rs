use super::*;
use std::future::Future;
use tokio_postgres::binary_copy::BinaryCopyInWriter;
use tokio_util::sync::CancellationToken;

/// Races a driver call against the cancellation token.
///
/// Biased toward the token so an already-cancelled call never starts the
/// driver future at all.
pub(crate) async fn cancellable<F, T, E>(token: &CancellationToken, future: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, E>>,
    E: Into<Error>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Error::Cancelled),
        result = future => result.map_err(Into::into),
    }
}

/// Issues the `create temporary table` DDL for `entity`.
pub(crate) async fn create<S: Session>(
    session: &S,
    entity: &EntityType,
    token: &CancellationToken,
) -> Result<(), Error> {
    let ref sql = entity.creates()?;
    log::debug!("creating temporary table ({})", entity.relation()?);
    cancellable(token, session.batch(sql)).await
}

/// Streams `records` into the temporary table over binary COPY.
///
/// The writer is pinned to this frame. If any step fails or the token
/// fires, it is dropped unfinished and the driver aborts the COPY with
/// `CopyFail`, so no rows from this call are committed. Returns the row
/// count reported by the server.
pub(crate) async fn import<S, T, I>(
    session: &S,
    entity: &EntityType,
    records: I,
    token: &CancellationToken,
) -> Result<u64, Error>
where
    S: Session,
    T: Entity,
    I: IntoIterator<Item = T>,
{
    let ref sql = entity.copy()?;
    let columns = entity.columns();
    let sink = cancellable(token, session.sink(sql)).await?;
    let writer = BinaryCopyInWriter::new(sink, &entity.types());
    futures::pin_mut!(writer);
    for record in records {
        if token.is_cancelled() {
            log::warn!("import into ({}) cancelled", entity.relation()?);
            return Err(Error::Cancelled);
        }
        cancellable(token, crate::row::write(&record, columns, writer.as_mut())).await?;
    }
    let n = cancellable(token, writer.finish()).await?;
    log::debug!("imported {} rows into ({})", n, entity.relation()?);
    Ok(n)
}
