use super::*;
use std::any::TypeId;
use std::collections::HashMap;
use tokio_postgres::types::Type;

/// Where an entity's view mapping takes its name from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum View {
    /// Left unset; resolves to [`Entity::name`].
    Default,
    Named(String),
}

/// Model-owned metadata for one registered entity type.
///
/// Built up through [`ModelBuilder::entity`] and read back through
/// [`Model::find`]. Statement rendering lives here so that table creation
/// and binary import are derived from the same ordered column list.
#[derive(Debug, Clone)]
pub struct EntityType {
    name: &'static str,
    table: &'static str,
    key: Vec<&'static str>,
    keyless: bool,
    view: Option<View>,
    columns: &'static [Column],
}

impl EntityType {
    fn of<T: Entity>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            table: T::name(),
            key: Vec::new(),
            keyless: false,
            view: None,
            columns: T::columns(),
        }
    }

    pub fn has_key(&mut self, columns: &[&'static str]) -> &mut Self {
        self.key = columns.to_vec();
        self.keyless = false;
        self
    }
    pub fn has_no_key(&mut self) -> &mut Self {
        self.key.clear();
        self.keyless = true;
        self
    }
    /// Maps the entity to a view. `None` leaves the name unset so it
    /// resolves to the entity's default name.
    pub fn to_view(&mut self, name: Option<&str>) -> &mut Self {
        self.view = Some(match name {
            Some(name) => View::Named(name.to_string()),
            None => View::Default,
        });
        self
    }

    /// Rust type name of the entity.
    pub fn type_name(&self) -> &'static str {
        self.name
    }
    /// Relation name the entity defaults to.
    pub fn default_name(&self) -> &'static str {
        self.table
    }
    pub fn key(&self) -> &[&'static str] {
        &self.key
    }
    pub fn is_keyless(&self) -> bool {
        self.keyless
    }
    pub fn is_view(&self) -> bool {
        self.view.is_some()
    }
    pub fn view_name(&self) -> Option<&str> {
        match self.view.as_ref()? {
            View::Default => Some(self.table),
            View::Named(name) => Some(name),
        }
    }
    pub fn columns(&self) -> &'static [Column] {
        self.columns
    }
    /// Wire types for the binary COPY writer, in column order.
    pub fn types(&self) -> Vec<Type> {
        self.columns.iter().map(|c| c.kind().clone()).collect()
    }

    /// Relation the temporary table is created under.
    pub fn relation(&self) -> Result<&str, Error> {
        let name = self.view_name().ok_or(Error::Unmapped(self.name))?;
        match self.columns.is_empty() {
            true => Err(Error::Columnless(self.name)),
            false => Ok(name),
        }
    }
    /// `create temporary table if not exists` DDL for the view relation.
    pub fn creates(&self) -> Result<String, Error> {
        let relation = self.relation()?;
        let columns = self
            .columns
            .iter()
            .map(Column::definition)
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!(
            "create temporary table if not exists {}({}) on commit drop",
            relation, columns
        ))
    }
    /// `copy ... FROM STDIN (FORMAT BINARY)` command for the view relation.
    pub fn copy(&self) -> Result<String, Error> {
        let relation = self.relation()?;
        let columns = self
            .columns
            .iter()
            .map(Column::name)
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!(
            "copy {}({}) FROM STDIN (FORMAT BINARY)",
            relation, columns
        ))
    }
}

/// Mutable registration state, frozen into a [`Model`] by [`build`](Self::build).
#[derive(Debug, Default)]
pub struct ModelBuilder {
    entities: HashMap<TypeId, EntityType>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns the descriptor for `T`, registering it on first use.
    pub fn entity<T: Entity>(&mut self) -> &mut EntityType {
        self.entities
            .entry(TypeId::of::<T>())
            .or_insert_with(EntityType::of::<T>)
    }
    pub fn build(self) -> Model {
        Model {
            entities: self.entities,
        }
    }
}

/// Immutable entity metadata, keyed by Rust type.
#[derive(Debug, Default, Clone)]
pub struct Model {
    entities: HashMap<TypeId, EntityType>,
}

impl Model {
    pub fn find<T: Entity>(&self) -> Option<&EntityType> {
        self.entities.get(&TypeId::of::<T>())
    }
    pub fn entities(&self) -> impl Iterator<Item = &EntityType> {
        self.entities.values()
    }
    pub fn len(&self) -> usize {
        self.entities.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    fn point() -> EntityType {
        let mut builder = ModelBuilder::new();
        builder.entity::<Point>().has_no_key().to_view(None);
        builder.build().find::<Point>().cloned().expect("registered")
    }

    #[test]
    fn creates_point_table() {
        assert_eq!(
            point().creates().unwrap(),
            "create temporary table if not exists points_tmp(x integer, y integer null) on commit drop"
        );
    }

    #[test]
    fn copies_in_creation_order() {
        assert_eq!(
            point().copy().unwrap(),
            "copy points_tmp(x, y) FROM STDIN (FORMAT BINARY)"
        );
    }

    #[test]
    fn view_name_defaults_to_entity_name() {
        assert_eq!(point().view_name(), Some("points_tmp"));
    }

    #[test]
    fn view_name_override() {
        let mut builder = ModelBuilder::new();
        builder.entity::<Point>().to_view(Some("elsewhere"));
        let model = builder.build();
        let entity = model.find::<Point>().unwrap();
        assert_eq!(entity.view_name(), Some("elsewhere"));
        assert!(entity.creates().unwrap().contains(" elsewhere(x integer"));
    }

    #[test]
    fn unviewed_entity_is_unmapped() {
        let mut builder = ModelBuilder::new();
        builder.entity::<Label>().has_key(&["id"]);
        let model = builder.build();
        let entity = model.find::<Label>().unwrap();
        assert_eq!(entity.key(), &["id"]);
        assert!(!entity.is_keyless());
        assert!(matches!(entity.creates(), Err(Error::Unmapped(_))));
        assert!(matches!(entity.copy(), Err(Error::Unmapped(_))));
    }

    #[test]
    fn columnless_entity_is_rejected() {
        let mut builder = ModelBuilder::new();
        builder.entity::<Hollow>().to_view(None);
        let model = builder.build();
        let entity = model.find::<Hollow>().unwrap();
        assert!(matches!(entity.creates(), Err(Error::Columnless(_))));
    }

    #[test]
    fn types_follow_columns() {
        assert_eq!(point().types(), vec![Type::INT4, Type::INT4]);
    }

    #[test]
    fn unregistered_lookup_misses() {
        let model = ModelBuilder::new().build();
        assert!(model.find::<Point>().is_none());
        assert!(model.is_empty());
    }
}
