//! Infrastructure layer: persistence backends and collaborator stubs.

pub mod collaborators;
pub mod persistence;
