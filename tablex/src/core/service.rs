//! High level operations exposed to the HTTP layer.

pub mod extraction;
pub mod upload;
