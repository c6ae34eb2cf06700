//! Generator configuration

use crate::error::GenError;
use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options that shape the generated C. Every field has a default, so an
/// empty file (or no file) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Headers declaring the native types, included by the generated header
    pub types_headers: Vec<String>,

    /// Header providing the cJSON API
    pub json_header: String,

    /// Tolerance for `float` equality
    pub float_epsilon: f64,

    /// Tolerance for `double` equality
    pub double_epsilon: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            types_headers: vec!["types.h".to_string()],
            json_header: "cJSON.h".to_string(),
            float_epsilon: 1e-6,
            double_epsilon: 1e-9,
        }
    }
}

impl GeneratorConfig {
    /// Load a YAML configuration file
    pub fn load(path: &Path) -> Result<Self, GenError> {
        let content = fs::read_to_string(path).map_err(|e| GenError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content).map_err(|message| GenError::Config { path: path.to_path_buf(), message })
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: GeneratorConfig = serde_yml::from_str(content).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        for header in &self.types_headers {
            validate_header_name(header)?;
        }
        validate_header_name(&self.json_header)?;

        for (name, value) in [("float_epsilon", self.float_epsilon), ("double_epsilon", self.double_epsilon)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be a positive finite number, got {}", name, value));
            }
        }

        Ok(())
    }
}

/* Header names are written between quotes in an #include line */
fn validate_header_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("header names must not be empty".to_string());
    }
    if name.contains(['"', '\n', '\r']) {
        return Err(format!("header name {:?} cannot appear in an #include", name));
    }
    Ok(())
}
