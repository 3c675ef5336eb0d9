//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (capacity > 0, buffer > 0)
//! - Validate enumerated string settings
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::observability::logging::LogFormat;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cache.capacity must be greater than 0")]
    ZeroCacheCapacity,

    #[error("access_log.buffer_size must be greater than 0")]
    ZeroAccessLogBuffer,

    #[error("observability.log_level must not be empty")]
    EmptyLogLevel,

    #[error("observability.log_format '{0}' is not one of: pretty, json")]
    UnknownLogFormat(String),
}

pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.cache.capacity == 0 {
        errors.push(ValidationError::ZeroCacheCapacity);
    }
    if config.access_log.buffer_size == 0 {
        errors.push(ValidationError::ZeroAccessLogBuffer);
    }
    if config.observability.log_level.trim().is_empty() {
        errors.push(ValidationError::EmptyLogLevel);
    }
    if LogFormat::parse(&config.observability.log_format).is_none() {
        errors.push(ValidationError::UnknownLogFormat(
            config.observability.log_format.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
