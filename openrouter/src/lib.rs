//! Minimal client for the OpenRouter chat completion API.

pub mod chat;
pub mod error;
pub mod models;

mod client;

pub use client::{OpenRouter, Settings, DEFAULT_OPENROUTER_ENDPOINT};
