use crate::error::{Error, Result};
use serde::Deserialize;

pub const DEFAULT_HEIGHT_VARIABLE: &str = "--fontScalerHeight";
pub const DEFAULT_MAX_FONT_SIZE_VARIABLE: &str = "--maxFontSize";
pub const DEFAULT_MIN_FONT_SIZE_VARIABLE: &str = "--minFontSize";
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessages {
    pub invalid_target: String,
    pub invalid_height: String,
    pub max_iterations: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            invalid_target: "Font scaler target must be an element node".to_string(),
            invalid_height: "Font scaler could not resolve a positive target height".to_string(),
            max_iterations: "Font scaler exceeded the maximum number of iterations".to_string(),
        }
    }
}

/// Effective, immutable configuration of one scaler instance.
///
/// Built once from [`ConfigOverrides`] merged over the defaults; there is no way to mutate it
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalerConfig {
    height_variable: String,
    max_font_size_variable: String,
    min_font_size_variable: String,
    max_iterations: u32,
    error_messages: ErrorMessages,
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            height_variable: DEFAULT_HEIGHT_VARIABLE.to_string(),
            max_font_size_variable: DEFAULT_MAX_FONT_SIZE_VARIABLE.to_string(),
            min_font_size_variable: DEFAULT_MIN_FONT_SIZE_VARIABLE.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            error_messages: ErrorMessages::default(),
        }
    }
}

impl ScalerConfig {
    /// Merges `overrides` over the defaults. Keys left unset keep their default value.
    pub fn from_overrides(overrides: ConfigOverrides) -> Result<Self> {
        let mut config = Self::default();
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            height_variable_name,
            max_font_size_variable_name,
            min_font_size_variable_name,
            max_iterations,
            error_messages,
        } = overrides;

        if let Some(v) = height_variable_name {
            self.height_variable = v;
        }
        if let Some(v) = max_font_size_variable_name {
            self.max_font_size_variable = v;
        }
        if let Some(v) = min_font_size_variable_name {
            self.min_font_size_variable = v;
        }
        if let Some(v) = max_iterations {
            self.max_iterations = v;
        }
        if let Some(msgs) = error_messages {
            if let Some(v) = msgs.invalid_target {
                self.error_messages.invalid_target = v;
            }
            if let Some(v) = msgs.invalid_height {
                self.error_messages.invalid_height = v;
            }
            if let Some(v) = msgs.max_iterations {
                self.error_messages.max_iterations = v;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig {
                message: "maxIterations must be at least 1".to_string(),
            });
        }
        for (key, name) in [
            ("heightVariableName", &self.height_variable),
            ("maxFontSizeVariableName", &self.max_font_size_variable),
            ("minFontSizeVariableName", &self.min_font_size_variable),
        ] {
            if name.trim().is_empty() {
                return Err(Error::InvalidConfig {
                    message: format!("{key} must not be empty"),
                });
            }
        }
        Ok(())
    }

    pub fn height_variable(&self) -> &str {
        &self.height_variable
    }

    pub fn max_font_size_variable(&self) -> &str {
        &self.max_font_size_variable
    }

    pub fn min_font_size_variable(&self) -> &str {
        &self.min_font_size_variable
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn error_messages(&self) -> &ErrorMessages {
        &self.error_messages
    }
}

/// Sparse configuration record supplied at construction.
///
/// Deserializes from the camelCase JSON shape (`{"maxIterations": 50, "errorMessages":
/// {"invalidHeight": "..."}}`); unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverrides {
    pub height_variable_name: Option<String>,
    pub max_font_size_variable_name: Option<String>,
    pub min_font_size_variable_name: Option<String>,
    pub max_iterations: Option<u32>,
    pub error_messages: Option<ErrorMessageOverrides>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ErrorMessageOverrides {
    pub invalid_target: Option<String>,
    pub invalid_height: Option<String>,
    pub max_iterations: Option<String>,
}

impl ConfigOverrides {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_height_variable(mut self, name: impl Into<String>) -> Self {
        self.height_variable_name = Some(name.into());
        self
    }

    pub fn with_max_font_size_variable(mut self, name: impl Into<String>) -> Self {
        self.max_font_size_variable_name = Some(name.into());
        self
    }

    pub fn with_min_font_size_variable(mut self, name: impl Into<String>) -> Self {
        self.min_font_size_variable_name = Some(name.into());
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_overrides_keep_defaults() {
        let config = ScalerConfig::from_overrides(ConfigOverrides::default()).unwrap();
        assert_eq!(config, ScalerConfig::default());
        assert_eq!(config.height_variable(), "--fontScalerHeight");
        assert_eq!(config.max_font_size_variable(), "--maxFontSize");
        assert_eq!(config.min_font_size_variable(), "--minFontSize");
        assert_eq!(config.max_iterations(), DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn sparse_json_overrides_merge_over_defaults() {
        let overrides = ConfigOverrides::from_value(json!({
            "heightVariableName": "--cardHeight",
            "maxIterations": 40,
            "errorMessages": { "invalidHeight": "card has no height" }
        }))
        .unwrap();
        let config = ScalerConfig::from_overrides(overrides).unwrap();

        assert_eq!(config.height_variable(), "--cardHeight");
        assert_eq!(config.max_font_size_variable(), "--maxFontSize");
        assert_eq!(config.max_iterations(), 40);
        assert_eq!(config.error_messages().invalid_height, "card has no height");
        assert_eq!(
            config.error_messages().invalid_target,
            ErrorMessages::default().invalid_target
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ConfigOverrides::from_json_str(r#"{"maxIteration": 3}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)), "{err}");
    }

    #[test]
    fn zero_iteration_ceiling_is_invalid() {
        let err =
            ScalerConfig::from_overrides(ConfigOverrides::default().with_max_iterations(0))
                .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }), "{err}");
    }

    #[test]
    fn blank_variable_names_are_invalid() {
        let err = ScalerConfig::from_overrides(ConfigOverrides::default().with_height_variable(" "))
            .unwrap_err();
        assert!(err.to_string().contains("heightVariableName"), "{err}");
    }
}
