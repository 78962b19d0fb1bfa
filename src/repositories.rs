use crate::entities::id_generator::{self, IdGenerator};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    #[error("id {0} is already taken")]
    IdTaken(u64),
}

/// Bookkeeping of identifiers handed out to live entities.
pub trait IdRepository {
    fn generate_id(&mut self) -> u64;
    fn take_id(&mut self, id: u64) -> Result<u64, IdError>;
    fn return_id(&mut self, id: u64);

    fn swap_id(&mut self, old_id: u64, new_id: u64) -> Result<u64, IdError> {
        if old_id == new_id {
            return Ok(new_id);
        }

        let id = self.take_id(new_id)?;
        self.return_id(old_id);
        Ok(id)
    }
}

/// Rejects identifiers that are still in use.
///
/// Fresh ids come from the process-wide generator by default, the same source
/// `IdentifiedEntity::new` draws from, so the two never hand out the same id.
#[derive(Debug)]
pub struct UniqueIdRepository {
    generator: Box<dyn IdGenerator>,
    ids: HashSet<u64>,
}

impl UniqueIdRepository {
    pub fn new() -> Self {
        Self::with_generator(id_generator::process_generator())
    }

    pub fn with_generator(generator: impl IdGenerator + 'static) -> Self {
        Self {
            generator: Box::new(generator),
            ids: HashSet::new(),
        }
    }

    pub fn is_taken(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for UniqueIdRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl IdRepository for UniqueIdRepository {
    fn generate_id(&mut self) -> u64 {
        loop {
            let id = self.generator.next_id();
            if self.ids.insert(id) {
                return id;
            }
        }
    }

    fn take_id(&mut self, id: u64) -> Result<u64, IdError> {
        if self.ids.insert(id) {
            Ok(id)
        } else {
            log::warn!("rejected id {id}, already in use");
            Err(IdError::IdTaken(id))
        }
    }

    fn return_id(&mut self, id: u64) {
        self.ids.remove(&id);
    }
}

/// Accepts every identifier, leaving uniqueness to the caller.
#[derive(Debug)]
pub struct ExactIdRepository {
    generator: Box<dyn IdGenerator>,
}

impl ExactIdRepository {
    pub fn new() -> Self {
        Self::with_generator(id_generator::process_generator())
    }

    pub fn with_generator(generator: impl IdGenerator + 'static) -> Self {
        Self {
            generator: Box::new(generator),
        }
    }
}

impl Default for ExactIdRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl IdRepository for ExactIdRepository {
    fn generate_id(&mut self) -> u64 {
        self.generator.next_id()
    }

    fn take_id(&mut self, id: u64) -> Result<u64, IdError> {
        Ok(id)
    }

    fn return_id(&mut self, _id: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::id_generator::SequentialIdGenerator;

    #[test]
    fn generated_ids_are_distinct() {
        let mut repo = UniqueIdRepository::new();
        let a = repo.generate_id();
        let b = repo.generate_id();
        assert_ne!(a, b);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn generate_skips_taken_ids() {
        let mut repo = UniqueIdRepository::with_generator(SequentialIdGenerator::new());
        repo.take_id(0).unwrap();
        repo.take_id(1).unwrap();
        assert_eq!(repo.generate_id(), 2);
    }

    #[test]
    fn default_repository_follows_process_generator() {
        let mut repo = UniqueIdRepository::new();
        let issued = id_generator::process_generator().next_id();
        assert!(repo.generate_id() > issued);
    }

    #[test]
    fn taken_id_is_rejected() {
        let mut repo = UniqueIdRepository::new();
        assert_eq!(repo.take_id(7), Ok(7));
        assert_eq!(repo.take_id(7), Err(IdError::IdTaken(7)));
    }

    #[test]
    fn returned_id_can_be_taken_again() {
        let mut repo = UniqueIdRepository::new();
        repo.take_id(3).unwrap();
        repo.return_id(3);
        assert!(!repo.is_taken(3));
        assert_eq!(repo.take_id(3), Ok(3));
    }

    #[test]
    fn failed_swap_keeps_old_id() {
        let mut repo = UniqueIdRepository::new();
        repo.take_id(1).unwrap();
        repo.take_id(2).unwrap();

        assert_eq!(repo.swap_id(1, 2), Err(IdError::IdTaken(2)));
        assert!(repo.is_taken(1));

        assert_eq!(repo.swap_id(1, 5), Ok(5));
        assert!(!repo.is_taken(1));
        assert!(repo.is_taken(5));
    }

    #[test]
    fn swap_to_same_id_is_noop() {
        let mut repo = UniqueIdRepository::new();
        repo.take_id(4).unwrap();
        assert_eq!(repo.swap_id(4, 4), Ok(4));
        assert!(repo.is_taken(4));
    }

    #[test]
    fn exact_repository_allows_collisions() {
        let mut repo = ExactIdRepository::with_generator(SequentialIdGenerator::new());
        assert_eq!(repo.take_id(9), Ok(9));
        assert_eq!(repo.take_id(9), Ok(9));
        assert_eq!(repo.generate_id(), 0);
        assert_eq!(repo.generate_id(), 1);
    }

    #[test]
    fn error_message() {
        assert_eq!(IdError::IdTaken(12).to_string(), "id 12 is already taken");
    }
}
