use super::*;
use std::marker::PhantomData;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Lazily evaluated query over a single relation.
///
/// Starts out as `SELECT * FROM <relation>` and is refined by value with
/// [`select`](Self::select), [`join`](Self::join), [`filter`](Self::filter),
/// [`order_by`](Self::order_by) and [`limit`](Self::limit). Nothing runs
/// until [`rows`](Self::rows), [`load`](Self::load) or [`count`](Self::count)
/// is awaited, and it runs on the session the query was created from.
///
/// Clause text is spliced in verbatim; bind user input through `params`.
pub struct Query<'c, S, T> {
    session: &'c S,
    relation: String,
    projection: Option<String>,
    joins: Vec<String>,
    filters: Vec<String>,
    order: Vec<String>,
    limit: Option<u64>,
    entity: PhantomData<fn() -> T>,
}

impl<'c, S, T> Query<'c, S, T>
where
    S: Session,
    T: Entity,
{
    pub fn new(session: &'c S, relation: impl Into<String>) -> Self {
        Self {
            session,
            relation: relation.into(),
            projection: None,
            joins: Vec::new(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            entity: PhantomData,
        }
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }
    pub fn session(&self) -> &'c S {
        self.session
    }

    /// Replaces the `*` projection.
    pub fn select(mut self, projection: impl Into<String>) -> Self {
        self.projection = Some(projection.into());
        self
    }
    /// Appends a full join clause, e.g. `JOIN users u ON u.id = points_tmp.owner`.
    pub fn join(mut self, clause: impl Into<String>) -> Self {
        self.joins.push(clause.into());
        self
    }
    /// Adds a predicate; predicates are combined with `AND`.
    pub fn filter(mut self, predicate: impl Into<String>) -> Self {
        self.filters.push(predicate.into());
        self
    }
    pub fn order_by(mut self, expression: impl Into<String>) -> Self {
        self.order.push(expression.into());
        self
    }
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn sql(&self) -> String {
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.projection.as_deref().unwrap_or("*"),
            self.relation
        );
        for join in self.joins.iter() {
            sql.push(' ');
            sql.push_str(join);
        }
        if !self.filters.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.filters.join(" AND "));
        }
        if !self.order.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order.join(", "));
        }
        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }
        sql
    }

    pub async fn rows(&self, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>, Error> {
        let ref sql = self.sql();
        log::debug!("querying ({})", self.relation);
        self.session.rows(sql, params).await.map_err(Error::from)
    }

    pub async fn load(&self, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<T>, Error>
    where
        T: Hydrate,
    {
        self.rows(params)
            .await?
            .iter()
            .map(T::hydrate)
            .collect::<Result<Vec<T>, PgErr>>()
            .map_err(Error::from)
    }

    pub async fn count(&self, params: &[&(dyn ToSql + Sync)]) -> Result<i64, Error> {
        let ref sql = format!("SELECT COUNT(*) FROM ({}) AS counted", self.sql());
        let count = self
            .session
            .rows(sql, params)
            .await?
            .first()
            .map(|row| row.try_get::<_, i64>(0))
            .transpose()?
            .unwrap_or(0);
        Ok(count)
    }
}

impl<'c, S, T> Clone for Query<'c, S, T> {
    fn clone(&self) -> Self {
        Self {
            session: self.session,
            relation: self.relation.clone(),
            projection: self.projection.clone(),
            joins: self.joins.clone(),
            filters: self.filters.clone(),
            order: self.order.clone(),
            limit: self.limit,
            entity: PhantomData,
        }
    }
}

impl<'c, S, T> std::fmt::Debug for Query<'c, S, T>
where
    S: Session,
    T: Entity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Query").field(&self.sql()).finish()
    }
}
