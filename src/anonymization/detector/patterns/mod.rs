//! Pattern library for fallback PII detection

use crate::anonymization::models::PiiType;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Regex patterns for this type
    pub patterns: Vec<String>,
    /// Confidence score (0.0 - 1.0) assigned to every match
    pub confidence: f32,
    /// PII type tag
    pub category: String,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Name of the library entry the pattern came from
    pub name: String,
    /// Compiled regex
    pub regex: Regex,
    /// PII type reported for matches
    pub pii_type: PiiType,
    /// Confidence score
    pub confidence: f32,
}

/// Pattern library container
///
/// Entries are kept sorted by name so that scanning order, and therefore
/// the output of the matcher, never depends on hash seeds.
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: BTreeMap<String, PatternDefinition>,
}

/// Pattern registry for fallback detection
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
    patterns_by_type: HashMap<PiiType, Vec<CompiledPattern>>,
}

impl PatternRegistry {
    /// Create a new pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        let mut patterns = Vec::new();
        let mut patterns_by_type: HashMap<PiiType, Vec<CompiledPattern>> = HashMap::new();

        for (name, def) in library.patterns {
            let pii_type: PiiType = def
                .category
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Invalid type in pattern '{name}'"))?;

            if !(0.0..=1.0).contains(&def.confidence) {
                anyhow::bail!(
                    "Confidence of pattern '{name}' must be between 0.0 and 1.0, got {}",
                    def.confidence
                );
            }

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str)
                    .with_context(|| format!("Invalid regex in pattern '{name}': {pattern_str}"))?;

                let compiled = CompiledPattern {
                    name: name.clone(),
                    regex,
                    pii_type,
                    confidence: def.confidence,
                };

                patterns.push(compiled.clone());
                patterns_by_type.entry(pii_type).or_default().push(compiled);
            }
        }

        Ok(Self {
            patterns,
            patterns_by_type,
        })
    }

    /// Create a registry with the built-in patterns
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Registry from an optional library file, built-ins otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::default_patterns(),
        }
    }

    /// Get all patterns
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Get patterns for a specific type
    pub fn patterns_for_type(&self, pii_type: PiiType) -> Option<&[CompiledPattern]> {
        self.patterns_by_type.get(&pii_type).map(|v| v.as_slice())
    }
}
