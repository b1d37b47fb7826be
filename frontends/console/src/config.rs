use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Frontend configuration: where the backend lives and how long to
/// wait for it.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiEndpoints,
    /// HTTP timeout in seconds applied to every request.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Base URL per entity collection.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEndpoints {
    pub categories: String,
    pub products: String,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiEndpoints {
                categories: "http://localhost:3000/api/categories".to_string(),
                products: "http://localhost:3000/api/products".to_string(),
            },
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        Self::from_yaml(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config YAML {}: {}", path.display(), e))
    }

    fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_config() {
        let yaml = r#"
api:
  categories: "https://shop.example/api/categories"
  products: "https://shop.example/api/products"
request_timeout_secs: 10
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.api.categories, "https://shop.example/api/categories");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_timeout_defaults_when_omitted() {
        let yaml = r#"
api:
  categories: "http://localhost:3000/api/categories"
  products: "http://localhost:3000/api/products"
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_default_points_at_localhost() {
        let config = AppConfig::default();
        assert!(config.api.categories.starts_with("http://localhost"));
        assert!(config.api.products.ends_with("/products"));
    }
}
