//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::routing::RouteSpec;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    RoutesFile(serde_json::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::RoutesFile(e) => write!(f, "Routes file error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file, merging the optional
/// JSON routes file into the inline route declarations.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: ServerConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    if let Some(routes_file) = &config.routes_file {
        let raw = fs::read_to_string(routes_file).map_err(ConfigError::Io)?;
        let extra: Vec<RouteSpec> =
            serde_json::from_str(&raw).map_err(ConfigError::RoutesFile)?;
        config.routes.extend(extra);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_merges_routes_file() {
        let dir = tempfile::tempdir().unwrap();
        let routes_path = dir.path().join("routes.json");
        let mut routes = fs::File::create(&routes_path).unwrap();
        write!(
            routes,
            r#"[{{"path":"/route/:q<int>","template":{{"path":"/route","params":{{"query":"q"}}}}}}]"#
        )
        .unwrap();

        let config_path = dir.path().join("pageserve.toml");
        let mut config = fs::File::create(&config_path).unwrap();
        write!(
            config,
            "routes_file = \"{}\"\n",
            routes_path.display()
        )
        .unwrap();

        let loaded = load_config(&config_path).unwrap();
        assert_eq!(loaded.routes.len(), 1);
        assert_eq!(loaded.routes[0].template.path, "/route");
    }

    #[test]
    fn test_invalid_route_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("pageserve.toml");
        fs::write(
            &config_path,
            r#"
            [[routes]]
            path = "/a/:x<bool>"

            [routes.template]
            path = "/a"
            "#,
        )
        .unwrap();

        assert!(matches!(
            load_config(&config_path),
            Err(ConfigError::Validation(_))
        ));
    }
}
