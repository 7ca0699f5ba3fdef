//! Domain layer: entities, value objects and ports.

pub mod entity;
pub mod gateway;
pub mod repository;
pub mod value_object;
