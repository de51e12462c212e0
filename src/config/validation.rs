//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check route patterns compile (unique names, known types)
//! - Check binding tables reference declared captures
//! - Validate the bind address and proxy URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServerConfig;
use crate::routing;

/// A single semantic configuration problem.
#[derive(Debug)]
pub enum ValidationError {
    BadBindAddress(String),
    BadMaxConnections,
    BadBackendUrl(String),
    BadRoute(String),
    UnboundCapture { pattern: String, capture: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::BadBindAddress(addr) => {
                write!(f, "invalid bind address `{}`", addr)
            }
            ValidationError::BadMaxConnections => {
                write!(f, "max_connections must be at least 1")
            }
            ValidationError::BadBackendUrl(url) => {
                write!(f, "invalid backend URL `{}`", url)
            }
            ValidationError::BadRoute(msg) => write!(f, "{}", msg),
            ValidationError::UnboundCapture { pattern, capture } => write!(
                f,
                "route `{}`: binding references unknown capture `{}`",
                pattern, capture
            ),
        }
    }
}

/// Validate a loaded configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    // A zero-permit cap would never serve a request.
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::BadMaxConnections);
    }

    if config.proxy.enabled && url::Url::parse(&config.proxy.backend_url).is_err() {
        errors.push(ValidationError::BadBackendUrl(config.proxy.backend_url.clone()));
    }

    match routing::compile(&config.routes) {
        Ok(compiled) => {
            for route in &compiled {
                for capture in route.template.params.values() {
                    if !route.param_order.iter().any(|(name, _)| name == capture) {
                        errors.push(ValidationError::UnboundCapture {
                            pattern: route.pattern.clone(),
                            capture: capture.clone(),
                        });
                    }
                }
            }
        }
        Err(e) => errors.push(ValidationError::BadRoute(e.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
