//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::VeilConfig;
use super::secret_string;
use crate::domain::errors::VeilError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into VeilConfig
/// 4. Applies environment variable overrides (VEIL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use veil::config::loader::load_config;
///
/// let config = load_config("veil.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VeilConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VeilError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VeilError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text, with the same steps as [`load_config`]
pub fn load_config_from_str(contents: &str) -> Result<VeilConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: VeilConfig = toml::from_str(&contents)
        .map_err(|e| VeilError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        VeilError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Built-in configuration with environment overrides, used when no file is given
pub fn default_config() -> Result<VeilConfig> {
    let mut config = VeilConfig::default();
    apply_env_overrides(&mut config)?;
    config.validate().map_err(|e| {
        VeilError::Configuration(format!("Configuration validation failed: {}", e))
    })?;
    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("environment variable pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied verbatim.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(VeilError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using VEIL_* prefix
///
/// Environment variables follow the pattern: VEIL_<SECTION>_<KEY>
/// For example: VEIL_RECOGNIZER_ENDPOINT, VEIL_DETECTOR_MODE
fn apply_env_overrides(config: &mut VeilConfig) -> Result<()> {
    let parse_bool = |name: &str, val: String| -> Result<bool> {
        val.parse()
            .map_err(|_| VeilError::Configuration(format!("Invalid boolean for {name}: {val}")))
    };

    if let Ok(val) = std::env::var("VEIL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    config
        .detector
        .apply_env_overrides()
        .map_err(|e| VeilError::Configuration(format!("{e:#}")))?;

    if let Ok(val) = std::env::var("VEIL_RECOGNIZER_ENABLED") {
        config.recognizer.enabled = parse_bool("VEIL_RECOGNIZER_ENABLED", val)?;
    }
    if let Ok(val) = std::env::var("VEIL_RECOGNIZER_ENDPOINT") {
        config.recognizer.endpoint = val;
    }
    if let Ok(val) = std::env::var("VEIL_RECOGNIZER_API_TOKEN") {
        config.recognizer.api_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("VEIL_RECOGNIZER_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.recognizer.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("VEIL_RECOGNIZER_OFFSET_UNIT") {
        config.recognizer.offset_unit = val.parse().map_err(VeilError::Configuration)?;
    }

    config
        .audit
        .apply_env_overrides()
        .map_err(|e| VeilError::Configuration(format!("{e:#}")))?;

    if let Ok(val) = std::env::var("VEIL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_bool("VEIL_LOGGING_LOCAL_ENABLED", val)?;
    }
    if let Ok(val) = std::env::var("VEIL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("VEIL_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("VEIL_TEST_SUBST_TOKEN", "test_value");
        let input = "api_token = \"${VEIL_TEST_SUBST_TOKEN}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "api_token = \"test_value\"\n");
        std::env::remove_var("VEIL_TEST_SUBST_TOKEN");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("VEIL_TEST_MISSING_VAR");
        let input = "api_token = \"${VEIL_TEST_MISSING_VAR}\"";
        assert!(substitute_env_vars(input).is_err());
    }

    #[test]
    fn test_comments_are_not_substituted() {
        std::env::remove_var("VEIL_TEST_COMMENTED_VAR");
        let input = "# api_token = \"${VEIL_TEST_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-veil.toml");
        assert!(matches!(result, Err(VeilError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        std::env::set_var("VEIL_TEST_LOADER_TOKEN", "hf_loader");
        let toml_content = r#"
[application]
log_level = "warn"

[detector]
types = ["email", "phone"]
confidence_threshold = 0.9
mode = "remove"

[recognizer]
enabled = true
endpoint = "https://inference.example.com/models/pii"
api_token = "${VEIL_TEST_LOADER_TOKEN}"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "warn");
        assert_eq!(config.detector.confidence_threshold, 0.9);
        assert_eq!(
            config
                .recognizer
                .api_token
                .as_ref()
                .map(|t| t.expose_secret().as_ref().to_string()),
            Some("hf_loader".to_string())
        );
        std::env::remove_var("VEIL_TEST_LOADER_TOKEN");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = load_config_from_str("[detector]\nconfidence_threshold = 1.5\n");
        assert!(matches!(result, Err(VeilError::Configuration(_))));
    }
}
