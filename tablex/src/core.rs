//! The core module defines the business logic of tablex.
//! It provides the traits and models the adapters in [app](crate::app) implement.

pub mod batch;
pub mod extract;
pub mod extractor;
pub mod model;
pub mod service;
pub mod settings;
pub mod store;
pub mod upload;
