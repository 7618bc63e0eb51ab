//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (durations > 0, sampling rate within bounds)
//! - Validate addresses and log levels before anything is bound or installed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("observability.otlp.endpoint must not be empty")]
    EmptyOtlpEndpoint,

    #[error("observability.otlp.sampling_rate {0} must be within 0.0..=1.0")]
    InvalidSamplingRate(f64),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let durations = [
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("shutdown.grace_period_secs", config.shutdown.grace_period_secs),
        ("shutdown.teardown_timeout_secs", config.shutdown.teardown_timeout_secs),
    ];
    for (field, value) in durations {
        if value == 0 {
            errors.push(ValidationError::ZeroDuration { field });
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if let Some(otlp) = &config.observability.otlp {
        if otlp.endpoint.trim().is_empty() {
            errors.push(ValidationError::EmptyOtlpEndpoint);
        }
        if !(0.0..=1.0).contains(&otlp.sampling_rate) {
            errors.push(ValidationError::InvalidSamplingRate(otlp.sampling_rate));
        }
        if otlp.export_timeout_secs == 0 {
            errors.push(ValidationError::ZeroDuration {
                field: "observability.otlp.export_timeout_secs",
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::OtlpConfig;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&ServiceConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "localhost".into();
        config.shutdown.grace_period_secs = 0;
        config.observability.log_level = "loud".into();
        config.observability.otlp = Some(OtlpConfig {
            endpoint: " ".into(),
            sampling_rate: 1.5,
            ..OtlpConfig::default()
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBindAddress("localhost".into()),
                ValidationError::ZeroDuration {
                    field: "shutdown.grace_period_secs"
                },
                ValidationError::InvalidLogLevel("loud".into()),
                ValidationError::EmptyOtlpEndpoint,
                ValidationError::InvalidSamplingRate(1.5),
            ]
        );
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = ServiceConfig::default();
        config.observability.log_level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}
