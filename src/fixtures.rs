//! Entity fixtures shared by unit tests.
use super::*;
use tokio_postgres::types::ToSql;
use tokio_postgres::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: Option<i32>,
}

impl Entity for Point {
    fn name() -> &'static str {
        "points_tmp"
    }
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::required("x", "integer", Type::INT4),
            Column::optional("y", "integer", Type::INT4),
        ];
        COLUMNS
    }
    fn get(&self, column: &str) -> Option<&(dyn ToSql + Sync)> {
        match column {
            "x" => Some(&self.x),
            "y" => Some(&self.y),
            _ => None,
        }
    }
}

impl TemporaryTable for Point {}

/// Plain entity without the temporary marker.
#[derive(Debug, Clone)]
pub struct Label {
    pub id: i64,
    pub text: String,
}

impl Entity for Label {
    fn name() -> &'static str {
        "labels"
    }
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::required("id", "bigint", Type::INT8),
            Column::required("text", "text", Type::TEXT),
        ];
        COLUMNS
    }
    fn get(&self, column: &str) -> Option<&(dyn ToSql + Sync)> {
        match column {
            "id" => Some(&self.id),
            "text" => Some(&self.text),
            _ => None,
        }
    }
}

/// Temporary entity with no columns.
#[derive(Debug, Clone)]
pub struct Hollow;

impl Entity for Hollow {
    fn name() -> &'static str {
        "hollow"
    }
    fn columns() -> &'static [Column] {
        &[]
    }
    fn get(&self, _: &str) -> Option<&(dyn ToSql + Sync)> {
        None
    }
}

impl TemporaryTable for Hollow {}

/// Temporary entity that declares a column it cannot read.
#[derive(Debug, Clone)]
pub struct Lopsided {
    pub a: i32,
}

impl Entity for Lopsided {
    fn name() -> &'static str {
        "lopsided"
    }
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::required("a", "integer", Type::INT4),
            Column::required("b", "integer", Type::INT4),
        ];
        COLUMNS
    }
    fn get(&self, column: &str) -> Option<&(dyn ToSql + Sync)> {
        match column {
            "a" => Some(&self.a),
            _ => None,
        }
    }
}

impl TemporaryTable for Lopsided {}
