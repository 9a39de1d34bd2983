//! Domain layer: pure algorithms, entities, and collaborator traits.

pub mod classify;
pub mod collaborators;
pub mod discovery;
pub mod entities;
pub mod extract;
pub mod normalize;
