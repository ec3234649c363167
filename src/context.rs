use super::*;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A session paired with the model that describes its entities.
///
/// Usually wraps a borrowed [`Transaction`](tokio_postgres::Transaction):
/// temporary tables are created `on commit drop`, so they live exactly as
/// long as the transaction the context was built on.
pub struct Context<S> {
    session: S,
    model: Arc<Model>,
}

impl<S: Session> Context<S> {
    pub fn new(session: S, model: Arc<Model>) -> Self {
        Self { session, model }
    }
    pub fn session(&self) -> &S {
        &self.session
    }
    pub fn model(&self) -> &Model {
        &self.model
    }
    pub fn into_session(self) -> S {
        self.session
    }

    /// Registered descriptor for `T`.
    pub fn entity<T: Entity>(&self) -> Result<&EntityType, Error> {
        self.model
            .find::<T>()
            .ok_or(Error::Unregistered(std::any::type_name::<T>()))
    }

    /// Query over `T`'s view relation, without creating or loading anything.
    pub fn set<T: Entity>(&self) -> Result<Query<'_, S, T>, Error> {
        let relation = self.entity::<T>()?.relation()?;
        Ok(Query::new(&self.session, relation))
    }

    /// Creates `T`'s temporary table, bulk-loads `entities` into it over
    /// binary COPY, and returns a query over the table.
    ///
    /// The three steps run strictly in order: if the DDL fails nothing is
    /// imported, and if the import fails no row from this call survives.
    /// Calling again in the same transaction reuses the table and appends.
    /// The returned query has not been executed.
    pub async fn materialize<T, I>(
        &self,
        entities: I,
        token: &CancellationToken,
    ) -> Result<Query<'_, S, T>, Error>
    where
        T: Entity,
        I: IntoIterator<Item = T>,
    {
        let entity = self.entity::<T>()?;
        stream::create(&self.session, entity, token).await?;
        stream::import(&self.session, entity, entities, token).await?;
        self.set::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use bytes::Bytes;
    use std::sync::Mutex;
    use tokio_postgres::CopyInSink;
    use tokio_postgres::Row;
    use tokio_postgres::types::ToSql;

    /// Records DDL and refuses to open a COPY channel.
    #[derive(Default)]
    struct Recorder {
        statements: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn statements(&self) -> Vec<String> {
            self.statements.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Session for Recorder {
        async fn batch(&self, sql: &str) -> Result<(), PgErr> {
            self.statements.lock().unwrap().push(sql.to_string());
            Ok(())
        }
        async fn sink(&self, sql: &str) -> Result<CopyInSink<Bytes>, PgErr> {
            unreachable!("recorder cannot open {}", sql)
        }
        async fn rows(&self, _: &str, _: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>, PgErr> {
            Ok(Vec::new())
        }
    }

    fn model() -> Arc<Model> {
        let mut builder = ModelBuilder::new();
        builder.add_temporary_tables(&[Module::new("fixtures")
            .temporary::<Point>()
            .temporary::<Hollow>()
            .entity::<Label>()]);
        builder.entity::<Label>().has_key(&["id"]);
        Arc::new(builder.build())
    }

    #[tokio::test]
    async fn unregistered_type_issues_nothing() {
        let context = Context::new(Recorder::default(), Arc::new(Model::default()));
        let token = CancellationToken::new();
        let result = context.materialize(vec![Point { x: 1, y: None }], &token).await;
        assert!(matches!(result, Err(Error::Unregistered(_))));
        assert!(context.session().statements().is_empty());
    }

    #[tokio::test]
    async fn unmapped_type_issues_nothing() {
        let context = Context::new(Recorder::default(), model());
        let token = CancellationToken::new();
        let label = Label {
            id: 1,
            text: String::from("one"),
        };
        let result = context.materialize(vec![label], &token).await;
        assert!(matches!(result, Err(Error::Unmapped(_))));
        assert!(context.session().statements().is_empty());
    }

    #[tokio::test]
    async fn columnless_type_issues_nothing() {
        let context = Context::new(Recorder::default(), model());
        let token = CancellationToken::new();
        let result = context.materialize(vec![Hollow], &token).await;
        assert!(matches!(result, Err(Error::Columnless(_))));
        assert!(context.session().statements().is_empty());
    }

    #[tokio::test]
    async fn cancelled_before_start_issues_nothing() {
        let context = Context::new(Recorder::default(), model());
        let token = CancellationToken::new();
        token.cancel();
        let result = context.materialize(Vec::<Point>::new(), &token).await;
        assert!(result.unwrap_err().is_cancelled());
        assert!(context.session().statements().is_empty());
    }

    #[test]
    fn set_targets_view_relation() {
        let context = Context::new(Recorder::default(), model());
        let query = context.set::<Point>().unwrap();
        assert_eq!(query.relation(), "points_tmp");
        assert_eq!(query.sql(), "SELECT * FROM points_tmp");
    }

    #[tokio::test]
    async fn set_runs_on_context_session() {
        let context = Context::new(Recorder::default(), model());
        let query = context.set::<Point>().unwrap();
        assert_eq!(query.count(&[]).await.unwrap(), 0);
        assert!(query.rows(&[]).await.unwrap().is_empty());
    }
}
