//! Client configuration.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Credentials and message scrubbing settings for a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// AbuseIPDB API key (supports ${ENV_VAR} syntax in files).
    pub api_key: String,

    /// Strings to redact from report messages, usually our own IPv4/IPv6
    /// addresses and hostname.
    #[serde(default, alias = "self_ips")]
    pub self_identifiers: Vec<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, self_identifiers: Vec<String>) -> Self {
        Self {
            api_key: api_key.into(),
            self_identifiers,
        }
    }

    /// Load configuration from a YAML (or JSON) file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.is_file() {
            anyhow::bail!("The file [{}] does not exist.", path.display());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                anyhow::anyhow!("The file [{}] is not readable.", path.display())
            } else {
                anyhow::anyhow!("Failed to read [{}]: {}", path.display(), e)
            }
        })?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text, expanding environment variables.
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let expanded = expand_env_vars(content)?;
        let config: ClientConfig = serde_yaml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!("api_key is empty");
        }

        if self.self_identifiers.iter().any(|s| s.trim().is_empty()) {
            anyhow::bail!("self_identifiers must not contain empty entries");
        }

        Ok(())
    }

    /// Generate example configuration YAML.
    pub fn example() -> String {
        r#"# AbuseIPDB client configuration

api_key: "${ABUSEIPDB_API_KEY}"   # Use environment variable

# Removed from report messages before they are sent
self_identifiers:
  - "203.0.113.10"
  - "2001:db8::10"
  - "mail.example.org"
"#
        .to_string()
    }
}

/// Expand environment variables in the format ${VAR_NAME}.
fn expand_env_vars(content: &str) -> anyhow::Result<String> {
    let mut result = content.to_string();
    let re = Regex::new(r"\$\{([^}]+)\}")?;

    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        let var_value = std::env::var(var_name).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_expand_env_vars() {
        std::env::set_var("ABUSEIPDB_CLIENT_TEST_KEY", "secret123");
        let input = "api_key: \"${ABUSEIPDB_CLIENT_TEST_KEY}\"";
        let result = expand_env_vars(input).unwrap();
        assert_eq!(result, "api_key: \"secret123\"");
        std::env::remove_var("ABUSEIPDB_CLIENT_TEST_KEY");
    }

    #[test]
    fn test_expand_env_vars_missing() {
        let input = "api_key: \"${NONEXISTENT_VAR}\"";
        let result = expand_env_vars(input).unwrap();
        assert_eq!(result, "api_key: \"\"");
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
api_key: "abc"
self_identifiers:
  - "10.0.0.5"
  - "host.example.org"
"#;
        let config = ClientConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.self_identifiers, vec!["10.0.0.5", "host.example.org"]);
    }

    #[test]
    fn test_parse_legacy_json() {
        let json = r#"{"api_key": "abc", "self_ips": ["10.0.0.5"]}"#;
        let config = ClientConfig::from_yaml(json).unwrap();
        assert_eq!(config.self_identifiers, vec!["10.0.0.5"]);
    }

    #[test]
    fn test_self_identifiers_default_empty() {
        let config = ClientConfig::from_yaml("api_key: abc\n").unwrap();
        assert!(config.self_identifiers.is_empty());
    }

    #[test]
    fn test_validate_empty_key() {
        assert!(ClientConfig::new("", vec![]).validate().is_err());
        assert!(ClientConfig::from_yaml("api_key: \"${NONEXISTENT_VAR}\"\n").is_err());
    }

    #[test]
    fn test_validate_empty_identifier() {
        let config = ClientConfig::new("abc", vec!["10.0.0.5".to_string(), " ".to_string()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_file() {
        let file = create_temp_config("api_key: \"xyz\"\nself_ips:\n  - \"::1\"\n");
        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.api_key, "xyz");
        assert_eq!(config.self_identifiers, vec!["::1"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ClientConfig::load(Path::new("/nonexistent/abuseipdb.yaml")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_example_parses() {
        std::env::set_var("ABUSEIPDB_API_KEY", "example-key");
        let config = ClientConfig::from_yaml(&ClientConfig::example()).unwrap();
        assert_eq!(config.self_identifiers.len(), 3);
    }
}
