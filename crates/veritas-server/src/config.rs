//! Server configuration

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use veritas_classifiers::ArtifactPaths;

use crate::cli::Cli;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Artifact locations
    #[serde(default)]
    pub artifacts: ArtifactPaths,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Request body size limit in bytes; unlimited when absent
    #[serde(default)]
    pub max_body_bytes: Option<usize>,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file {}", config_path))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", config_path))?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            config.port = port;
        }

        if let Some(vectorizer) = &cli.vectorizer {
            config.artifacts.vectorizer = vectorizer.clone();
        }

        if let Some(model) = &cli.model {
            config.artifacts.classifier = model.clone();
        }

        Ok(config)
    }

    /// Socket address to bind
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.listen, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.listen, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            artifacts: ArtifactPaths::default(),
            cors: CorsConfig::default(),
            max_body_bytes: None,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_when_file_missing() {
        let config = ServerConfig::load("/nonexistent/veritas.yaml", &Cli::default()).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:5000");
        assert_eq!(config.artifacts.vectorizer, PathBuf::from("tfidf_vectorizer.json"));
        assert_eq!(config.max_body_bytes, None);
    }

    #[test]
    fn test_file_then_cli_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
listen: "0.0.0.0"
port: 8080
artifacts:
  vectorizer: /models/vec.json
  classifier: /models/clf.json
cors:
  allowed_origins: ["http://localhost:3000"]
max_body_bytes: 10485760
"#,
        )
        .unwrap();

        let cli = Cli {
            port: Some(9000),
            model: Some(PathBuf::from("/override/clf.json")),
            ..Cli::default()
        };
        let config = ServerConfig::load(path.to_str().unwrap(), &cli).unwrap();

        assert_eq!(config.listen, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.artifacts.vectorizer, PathBuf::from("/models/vec.json"));
        assert_eq!(config.artifacts.classifier, PathBuf::from("/override/clf.json"));
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.max_body_bytes, Some(10 * 1024 * 1024));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "port: [not a number").unwrap();
        assert!(ServerConfig::load(path.to_str().unwrap(), &Cli::default()).is_err());
    }

    #[test]
    fn test_bad_listen_address() {
        let config = ServerConfig {
            listen: "not an address".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
