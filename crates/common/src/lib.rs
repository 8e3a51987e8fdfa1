//! Common types and utilities for the K-line webhook receiver

pub mod config;
pub mod error;

pub use config::{Config, VerificationMode};
pub use error::{Error, Result};
