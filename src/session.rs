use super::*;
use bytes::Bytes;
use std::sync::Arc;
use tokio_postgres::Client;
use tokio_postgres::CopyInSink;
use tokio_postgres::Row;
use tokio_postgres::Transaction;
use tokio_postgres::types::ToSql;

/// Session defines the slice of the driver that materialization needs:
/// raw statement execution, a binary COPY IN channel, and parameterized reads.
///
/// Temporary tables created with `on commit drop` only survive inside an
/// explicit transaction, so [`Transaction`] is the usual implementor.
#[async_trait::async_trait]
pub trait Session: Send + Sync {
    async fn batch(&self, sql: &str) -> Result<(), PgErr>;
    async fn sink(&self, sql: &str) -> Result<CopyInSink<Bytes>, PgErr>;
    async fn rows(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>, PgErr>;
}

#[async_trait::async_trait]
impl Session for Client {
    async fn batch(&self, sql: &str) -> Result<(), PgErr> {
        self.batch_execute(sql).await
    }
    async fn sink(&self, sql: &str) -> Result<CopyInSink<Bytes>, PgErr> {
        self.copy_in(sql).await
    }
    async fn rows(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>, PgErr> {
        self.query(sql, params).await
    }
}

#[async_trait::async_trait]
impl<'a> Session for Transaction<'a> {
    async fn batch(&self, sql: &str) -> Result<(), PgErr> {
        self.batch_execute(sql).await
    }
    async fn sink(&self, sql: &str) -> Result<CopyInSink<Bytes>, PgErr> {
        self.copy_in(sql).await
    }
    async fn rows(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>, PgErr> {
        self.query(sql, params).await
    }
}

#[async_trait::async_trait]
impl Session for Arc<Client> {
    async fn batch(&self, sql: &str) -> Result<(), PgErr> {
        self.as_ref().batch(sql).await
    }
    async fn sink(&self, sql: &str) -> Result<CopyInSink<Bytes>, PgErr> {
        self.as_ref().sink(sql).await
    }
    async fn rows(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>, PgErr> {
        self.as_ref().rows(sql, params).await
    }
}

#[async_trait::async_trait]
impl<S> Session for &S
where
    S: Session + ?Sized,
{
    async fn batch(&self, sql: &str) -> Result<(), PgErr> {
        (**self).batch(sql).await
    }
    async fn sink(&self, sql: &str) -> Result<CopyInSink<Bytes>, PgErr> {
        (**self).sink(sql).await
    }
    async fn rows(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>, PgErr> {
        (**self).rows(sql, params).await
    }
}
