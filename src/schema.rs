use tokio_postgres::types::ToSql;
use tokio_postgres::types::Type;

/// A mapped property of an [`Entity`].
///
/// Carries two views of the same type: the SQL text emitted into DDL
/// (`integer`, `text`, `timestamptz`, ...) and the wire [`Type`] that the
/// binary COPY writer encodes values against. The two must agree or the
/// server will reject the import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: &'static str,
    sql: &'static str,
    kind: Type,
    nullable: bool,
}

impl Column {
    /// A column emitted without a nullability qualifier.
    pub const fn required(name: &'static str, sql: &'static str, kind: Type) -> Self {
        Self {
            name,
            sql,
            kind,
            nullable: false,
        }
    }
    /// A column emitted with the `null` qualifier.
    pub const fn optional(name: &'static str, sql: &'static str, kind: Type) -> Self {
        Self {
            name,
            sql,
            kind,
            nullable: true,
        }
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn sql(&self) -> &'static str {
        self.sql
    }
    pub fn kind(&self) -> &Type {
        &self.kind
    }
    pub fn nullable(&self) -> bool {
        self.nullable
    }
    /// Column definition as it appears inside `create table (...)`.
    ///
    /// Non-nullable columns get no qualifier at all; `not null` is never
    /// emitted, so the server's own default applies.
    pub fn definition(&self) -> String {
        match self.nullable {
            true => format!("{} {} null", self.name, self.sql),
            false => format!("{} {}", self.name, self.sql),
        }
    }
}

/// Record type that can be mapped onto a relation.
///
/// Implementations describe their shape statically and expose each column
/// value through [`get`](Entity::get), which stands in for reflective
/// property access. Column order in [`columns`](Entity::columns) is the
/// order used for both table creation and binary import.
///
/// ```ignore
/// struct Point {
///     x: i32,
///     y: Option<i32>,
/// }
///
/// impl Entity for Point {
///     fn name() -> &'static str {
///         "points_tmp"
///     }
///     fn columns() -> &'static [Column] {
///         const COLUMNS: &[Column] = &[
///             Column::required("x", "integer", Type::INT4),
///             Column::optional("y", "integer", Type::INT4),
///         ];
///         COLUMNS
///     }
///     fn get(&self, column: &str) -> Option<&(dyn ToSql + Sync)> {
///         match column {
///             "x" => Some(&self.x),
///             "y" => Some(&self.y),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Entity: Send + Sync + Sized + 'static {
    /// Default relation name, used whenever a view mapping leaves its name unset.
    fn name() -> &'static str;
    /// Mapped columns in creation and import order.
    fn columns() -> &'static [Column];
    /// Current value of the named column.
    fn get(&self, column: &str) -> Option<&(dyn ToSql + Sync)>;
}
