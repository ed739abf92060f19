//! Core types for ollama-db
//!
//! Domain types, CSV parsing and environment-driven configuration shared
//! across all other crates.

mod config;
pub mod constants;
mod employee;
pub mod env_config;
mod error;

pub use config::{DbConfig, OllamaConfig};
pub use constants::*;
pub use employee::{Employee, parse_employees_csv, read_employees_csv};
pub use env_config::env_parse_with_default;
pub use error::*;
