//! Application layer: services that orchestrate domain logic over the
//! persistence and collaborator boundaries.

pub mod services;
