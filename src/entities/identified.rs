use super::id_generator::{self, IdGenerator};
use crate::repositories::{IdError, IdRepository};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Plain snapshot of an entity's identifier and name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: u64,
    pub name: String,
}

/// Identifier and display name shared by all scene objects.
///
/// Every mutation goes through the instance's own lock, so the entity can be
/// renamed from any thread holding a shared reference. Reads take the same
/// lock briefly and may return a value that a concurrent writer is about to
/// replace.
///
/// Identifiers passed to [`IdentifiedEntity::with_id`] and
/// [`IdentifiedEntity::set_id`] are not checked for uniqueness. Use an
/// [`IdRepository`] when collisions have to be rejected.
pub struct IdentifiedEntity {
    identity: Mutex<Identity>,
}

impl IdentifiedEntity {
    /// Creates an entity with a fresh identifier from the process-wide generator.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_generator(id_generator::process_generator(), name)
    }

    pub fn with_generator(generator: &dyn IdGenerator, name: impl Into<String>) -> Self {
        Self::from_identity(Identity {
            id: generator.next_id(),
            name: name.into(),
        })
    }

    pub fn with_id(id: u64, name: impl Into<String>) -> Self {
        log::debug!("creating entity with explicit id {id}");
        Self::from_identity(Identity {
            id,
            name: name.into(),
        })
    }

    /// Creates an entity with an id recorded in `repo`.
    ///
    /// Clones of the entity and entities assigned from it share the id without
    /// being recorded. A repository built with a generator other than the
    /// process-wide one must not be mixed with [`IdentifiedEntity::new`].
    pub fn registered(repo: &mut dyn IdRepository, name: impl Into<String>) -> Self {
        Self::from_identity(Identity {
            id: repo.generate_id(),
            name: name.into(),
        })
    }

    pub fn try_registered_with_id(
        repo: &mut dyn IdRepository,
        id: u64,
        name: impl Into<String>,
    ) -> Result<Self, IdError> {
        let id = repo.take_id(id)?;
        Ok(Self::with_id(id, name))
    }

    pub fn from_identity(identity: Identity) -> Self {
        Self {
            identity: Mutex::new(identity),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Identity> {
        // Both fields are replaced wholesale, so a panicking writer cannot leave
        // them half-updated.
        self.identity.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> u64 {
        self.lock().id
    }

    pub fn name(&self) -> String {
        self.lock().name.clone()
    }

    pub fn identity(&self) -> Identity {
        self.lock().clone()
    }

    pub fn equals(&self, other: &IdentifiedEntity) -> bool {
        self == other
    }

    pub fn set_id(&self, id: u64) {
        let mut identity = self.lock();
        log::trace!("entity {} changes id to {id}", identity.id);
        identity.id = id;
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        let mut identity = self.lock();
        log::trace!("entity {} renamed to {name:?}", identity.id);
        identity.name = name;
    }

    /// Moves the entity to `id` in `repo`, keeping the current one if `id` is taken.
    pub fn try_set_registered_id(
        &self,
        repo: &mut dyn IdRepository,
        id: u64,
    ) -> Result<(), IdError> {
        let mut identity = self.lock();
        identity.id = repo.swap_id(identity.id, id)?;
        Ok(())
    }

    /// Copies both fields from `other` and returns `self` for chaining.
    pub fn assign(&self, other: &IdentifiedEntity) -> &Self {
        // Snapshot first, so two locks are never held at once.
        let source = other.identity();
        let mut identity = self.lock();
        log::trace!("entity {} assigned from {}", identity.id, source.id);
        *identity = source;
        drop(identity);
        self
    }

    pub fn to_json(&self) -> serde_json::Value {
        let identity = self.lock();
        serde_json::json!({
            "id": identity.id,
            "name": identity.name,
        })
    }
}

impl Default for IdentifiedEntity {
    fn default() -> Self {
        Self::new("")
    }
}

impl Clone for IdentifiedEntity {
    fn clone(&self) -> Self {
        Self::from_identity(self.identity())
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl PartialEq for IdentifiedEntity {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }

        self.identity() == other.identity()
    }
}

impl Eq for IdentifiedEntity {}

impl From<Identity> for IdentifiedEntity {
    fn from(identity: Identity) -> Self {
        Self::from_identity(identity)
    }
}

impl fmt::Debug for IdentifiedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let identity = self.lock();
        f.debug_struct("IdentifiedEntity")
            .field("id", &identity.id)
            .field("name", &identity.name)
            .finish()
    }
}

impl fmt::Display for IdentifiedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let identity = self.lock();
        write!(f, "{} (#{})", identity.name, identity.id)
    }
}

impl Serialize for IdentifiedEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.identity().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for IdentifiedEntity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let identity = Identity::deserialize(deserializer)?;
        Ok(Self::with_id(identity.id, identity.name))
    }
}
