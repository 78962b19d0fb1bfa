pub mod entity;
pub mod id_generator;
pub mod identified;
