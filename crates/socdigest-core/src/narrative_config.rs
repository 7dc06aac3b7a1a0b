use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Settings for the OpenAI-compatible chat completion service.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    /// Name of the environment variable holding the bearer token. The token
    /// itself never appears in the config file.
    pub api_key_env: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NarrativeConfig {
    pub api: ApiSettings,
}

/// Load the narrative service configuration from a YAML file.
///
/// A missing file yields `Ok(None)`: the caller runs without narrative text.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read, parsed, or
/// fails validation.
pub fn load_narrative_config(path: &Path) -> Result<Option<NarrativeConfig>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::ConfigFileIo {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    let config: NarrativeConfig =
        serde_yaml::from_str(&content).map_err(ConfigError::ConfigFileParse)?;
    validate_narrative_config(&config)?;
    Ok(Some(config))
}

fn validate_narrative_config(config: &NarrativeConfig) -> Result<(), ConfigError> {
    let api = &config.api;
    for (field, value) in [
        ("base_url", &api.base_url),
        ("api_key_env", &api.api_key_env),
        ("model", &api.model),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "api.{field} must not be empty"
            )));
        }
    }
    if !(api.base_url.starts_with("http://") || api.base_url.starts_with("https://")) {
        return Err(ConfigError::Validation(format!(
            "api.base_url must be an http(s) URL, got {:?}",
            api.base_url
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_valid_file() {
        let file = write_yaml(
            "api:\n  base_url: https://api.example.com/v1\n  api_key_env: EXAMPLE_KEY\n  model: small-model\n",
        );
        let config = load_narrative_config(file.path()).unwrap().unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com/v1");
        assert_eq!(config.api.api_key_env, "EXAMPLE_KEY");
        assert_eq!(config.api.model, "small-model");
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_narrative_config(&dir.path().join("absent.yaml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let file = write_yaml("api: [unterminated\n");
        assert!(matches!(
            load_narrative_config(file.path()),
            Err(ConfigError::ConfigFileParse(_))
        ));
    }

    #[test]
    fn missing_field_is_parse_error() {
        let file = write_yaml("api:\n  base_url: https://api.example.com/v1\n  model: m\n");
        assert!(matches!(
            load_narrative_config(file.path()),
            Err(ConfigError::ConfigFileParse(_))
        ));
    }

    #[test]
    fn empty_model_fails_validation() {
        let file = write_yaml(
            "api:\n  base_url: https://api.example.com/v1\n  api_key_env: KEY\n  model: \"  \"\n",
        );
        let err = load_narrative_config(file.path()).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref msg) if msg.contains("api.model")),
            "got {err:?}"
        );
    }

    #[test]
    fn non_http_base_url_fails_validation() {
        let file = write_yaml("api:\n  base_url: ftp://nope\n  api_key_env: KEY\n  model: m\n");
        assert!(matches!(
            load_narrative_config(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }
}
