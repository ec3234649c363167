use super::*;

/// Marker for entities that are backed by a temporary table rather than a
/// persistent relation.
///
/// Only types carrying this marker are picked up by
/// [`ModelBuilder::add_temporary_tables`].
pub trait TemporaryTable: Entity {}

/// One entity type a [`Module`] declares.
#[derive(Clone, Copy)]
pub struct Registration {
    name: &'static str,
    temporary: bool,
    declare: fn(&mut ModelBuilder) -> &mut EntityType,
}

impl Registration {
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn is_temporary(&self) -> bool {
        self.temporary
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("temporary", &self.temporary)
            .finish()
    }
}

/// Explicit list of the entity types a part of the program owns.
///
/// Types opt in by being added here at startup; nothing is discovered at
/// runtime, so registration order and content are deterministic.
#[derive(Debug, Clone, Default)]
pub struct Module {
    name: &'static str,
    types: Vec<Registration>,
}

impl Module {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            types: Vec::new(),
        }
    }
    /// Declares a plain entity type.
    pub fn entity<T: Entity>(mut self) -> Self {
        self.types.push(Registration {
            name: std::any::type_name::<T>(),
            temporary: false,
            declare: ModelBuilder::entity::<T>,
        });
        self
    }
    /// Declares an entity type backed by a temporary table.
    pub fn temporary<T: TemporaryTable>(mut self) -> Self {
        self.types.push(Registration {
            name: std::any::type_name::<T>(),
            temporary: true,
            declare: ModelBuilder::entity::<T>,
        });
        self
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn registrations(&self) -> &[Registration] {
        &self.types
    }
}

impl ModelBuilder {
    /// Registers every [`TemporaryTable`] type declared by `modules` as a
    /// keyless entity mapped to a view under its default name.
    ///
    /// Must run once at startup, before any query is issued. Types without
    /// the marker are skipped, and finding none is not an error.
    pub fn add_temporary_tables(&mut self, modules: &[Module]) -> &mut Self {
        for module in modules {
            for registration in module.types.iter().filter(|r| r.temporary) {
                log::debug!(
                    "registering temporary table {} ({})",
                    registration.name,
                    module.name
                );
                (registration.declare)(self).has_no_key().to_view(None);
            }
        }
        self
    }
}
