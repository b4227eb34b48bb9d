//! Detector and anonymization configuration

use crate::anonymization::models::PiiType;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Substitution style applied to detected spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnonymizationMode {
    /// Replace every character with `*`
    #[default]
    Mask,
    /// Replace with `[TYPE]` / `[TYPE_N]` placeholders
    Label,
    /// Excise the span
    Remove,
    /// Synonym for `Label`
    Replace,
}

impl fmt::Display for AnonymizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mask => write!(f, "mask"),
            Self::Label => write!(f, "label"),
            Self::Remove => write!(f, "remove"),
            Self::Replace => write!(f, "replace"),
        }
    }
}

impl FromStr for AnonymizationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mask" => Ok(Self::Mask),
            "label" => Ok(Self::Label),
            "remove" => Ok(Self::Remove),
            "replace" => Ok(Self::Replace),
            _ => Err(format!(
                "Invalid anonymization mode '{s}'. Must be one of: mask, label, remove, replace"
            )),
        }
    }
}

/// Detector configuration supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Enabled PII types; detections of other types are discarded
    #[serde(default = "default_types")]
    pub types: BTreeSet<PiiType>,

    /// Detections scoring below this are discarded
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Substitution style for rendered output
    #[serde(default)]
    pub mode: AnonymizationMode,

    /// Path to a pattern library TOML file replacing the built-in patterns
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,
}

fn default_types() -> BTreeSet<PiiType> {
    [
        PiiType::Email,
        PiiType::Phone,
        PiiType::Name,
        PiiType::CreditCard,
        PiiType::Ssn,
        PiiType::Address,
        PiiType::IpAddress,
    ]
    .into_iter()
    .collect()
}

fn default_confidence_threshold() -> f32 {
    0.8
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            types: default_types(),
            confidence_threshold: default_confidence_threshold(),
            mode: AnonymizationMode::default(),
            pattern_library: None,
        }
    }
}

impl DetectorConfig {
    /// Whether detections of `pii_type` are kept
    pub fn is_enabled(&self, pii_type: PiiType) -> bool {
        self.types.contains(&pii_type)
    }

    /// Whether a detection with this type and score passes both filters
    pub fn accepts(&self, pii_type: PiiType, confidence: f32) -> bool {
        confidence >= self.confidence_threshold && self.is_enabled(pii_type)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            anyhow::bail!(
                "confidence_threshold must be between 0.0 and 1.0, got {}",
                self.confidence_threshold
            );
        }

        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                anyhow::bail!("Pattern library file not found: {}", path.display());
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                anyhow::bail!("Pattern library must be a TOML file: {}", path.display());
            }
        }

        Ok(())
    }

    /// Apply a partial update
    pub fn apply(&mut self, update: DetectorConfigUpdate) {
        if let Some(types) = update.types {
            self.types = types;
        }
        if let Some(threshold) = update.confidence_threshold {
            self.confidence_threshold = threshold;
        }
        if let Some(mode) = update.mode {
            self.mode = mode;
        }
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("VEIL_DETECTOR_TYPES") {
            self.types = parse_type_list(&val)?;
        }

        if let Ok(val) = std::env::var("VEIL_DETECTOR_CONFIDENCE_THRESHOLD") {
            self.confidence_threshold = val
                .parse()
                .context("Invalid VEIL_DETECTOR_CONFIDENCE_THRESHOLD value")?;
        }

        if let Ok(val) = std::env::var("VEIL_DETECTOR_MODE") {
            self.mode = val.parse().map_err(anyhow::Error::msg)?;
        }

        if let Ok(val) = std::env::var("VEIL_DETECTOR_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        Ok(())
    }
}

/// Partial detector configuration update
#[derive(Debug, Clone, Default)]
pub struct DetectorConfigUpdate {
    /// New enabled types
    pub types: Option<BTreeSet<PiiType>>,
    /// New confidence threshold
    pub confidence_threshold: Option<f32>,
    /// New substitution mode
    pub mode: Option<AnonymizationMode>,
}

/// Parse a comma-separated list of PII type tags
pub fn parse_type_list(list: &str) -> Result<BTreeSet<PiiType>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<PiiType>().map_err(anyhow::Error::msg))
        .collect()
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/detections.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("audit.log_path cannot be empty when auditing is enabled");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("VEIL_AUDIT_ENABLED") {
            self.enabled = val.parse().context("Invalid VEIL_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("VEIL_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("VEIL_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid VEIL_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.confidence_threshold, 0.8);
        assert_eq!(config.mode, AnonymizationMode::Mask);
        assert_eq!(config.types.len(), 7);
        assert!(config.is_enabled(PiiType::Email));
        assert!(!config.is_enabled(PiiType::Passport));
        assert!(!config.is_enabled(PiiType::Custom));
    }

    #[test]
    fn test_accepts_applies_both_filters() {
        let config = DetectorConfig::default();
        assert!(config.accepts(PiiType::Email, 0.8));
        assert!(!config.accepts(PiiType::Email, 0.79));
        assert!(!config.accepts(PiiType::Passport, 0.99));
    }

    #[test]
    fn test_config_validation() {
        let mut config = DetectorConfig::default();
        assert!(config.validate().is_ok());

        config.confidence_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_pattern_library_rejected() {
        let config = DetectorConfig {
            pattern_library: Some(PathBuf::from("/nonexistent/patterns.toml")),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_update() {
        let mut config = DetectorConfig::default();
        config.apply(DetectorConfigUpdate {
            confidence_threshold: Some(0.5),
            ..Default::default()
        });
        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.mode, AnonymizationMode::Mask);
        assert_eq!(config.types.len(), 7);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("LABEL".parse::<AnonymizationMode>().unwrap(), AnonymizationMode::Label);
        assert!("shuffle".parse::<AnonymizationMode>().is_err());
    }

    #[test]
    fn test_parse_type_list() {
        let types = parse_type_list("email, ssn,creditCard").unwrap();
        assert_eq!(types.len(), 3);
        assert!(types.contains(&PiiType::CreditCard));
        assert!(parse_type_list("email,bogus").is_err());
    }

    #[test]
    fn test_types_deserialize_from_toml() {
        let config: DetectorConfig = toml::from_str(
            r#"
            types = ["email", "ipAddress"]
            confidence_threshold = 0.9
            mode = "remove"
            "#,
        )
        .unwrap();
        assert_eq!(config.types.len(), 2);
        assert!(config.is_enabled(PiiType::IpAddress));
        assert_eq!(config.mode, AnonymizationMode::Remove);
    }
}
