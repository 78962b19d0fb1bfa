pub mod entities;
pub mod repositories;

pub use entities::{
    entity::SceneObject,
    id_generator::{IdGenerator, RandomIdGenerator, SequentialIdGenerator},
    identified::{Identity, IdentifiedEntity},
};
pub use repositories::{ExactIdRepository, IdError, IdRepository, UniqueIdRepository};
