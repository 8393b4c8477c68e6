//! Configuration module for Blackbox.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, defaults, and a builder pattern for
//! programmatic use by the host application.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level configuration for the crash capture subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub reporting: ReportingConfig,
    pub capture: CaptureConfig,
    /// Ordered substrings identifying failure messages that are known,
    /// already mitigated, and must not produce a crash report. Matching is
    /// first-match-wins in this order.
    #[serde(default)]
    pub known_failures: Vec<String>,
}

/// Report persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingConfig {
    /// Directory where the local report database lives.
    pub report_dir: PathBuf,
}

/// Stack capture and snapshot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Maximum number of symbolized frames emitted per report.
    pub max_frames: usize,
    /// Maximum number of (name, pid) pairs in the process enumeration.
    pub process_list_cap: usize,
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/blackbox/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("blackbox")
            .join("config.yaml")
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            report_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                .join("blackbox")
                .join("reports"),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_frames: 50,
            process_list_cap: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"capture.max_frames"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Hard ceiling on `capture.max_frames`, matching the platform backtrace
/// limit (skip + capture must stay below 63).
const MAX_FRAMES_CEILING: usize = 62;

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.capture.max_frames == 0 || self.capture.max_frames > MAX_FRAMES_CEILING {
            errors.push(ValidationError {
                field: "capture.max_frames".into(),
                message: format!("must be in range 1..={MAX_FRAMES_CEILING}"),
            });
        }
        if self.capture.process_list_cap == 0 {
            errors.push(ValidationError {
                field: "capture.process_list_cap".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.reporting.report_dir.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "reporting.report_dir".into(),
                message: "must not be empty".into(),
            });
        }
        for (i, pattern) in self.known_failures.iter().enumerate() {
            if pattern.is_empty() {
                errors.push(ValidationError {
                    field: format!("known_failures[{i}]"),
                    message: "empty pattern matches every message".into(),
                });
            }
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use blackbox_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .report_dir(PathBuf::from("/var/lib/blackbox/reports"))
///     .known_failure("Failed to recreate D3D11")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn report_dir(mut self, dir: PathBuf) -> Self {
        self.config.reporting.report_dir = dir;
        self
    }

    pub fn max_frames(mut self, n: usize) -> Self {
        self.config.capture.max_frames = n;
        self
    }

    pub fn process_list_cap(mut self, n: usize) -> Self {
        self.config.capture.process_list_cap = n;
        self
    }

    /// Append one known-failure substring. Order of calls is match order.
    pub fn known_failure(mut self, pattern: impl Into<String>) -> Self {
        self.config.known_failures.push(pattern.into());
        self
    }

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let cfg = Config::default();
        assert_eq!(cfg.capture.max_frames, 50);
        assert_eq!(cfg.capture.process_list_cap, 64);
        assert!(cfg
            .reporting
            .report_dir
            .to_string_lossy()
            .contains("blackbox"));
        assert!(cfg.known_failures.is_empty());
    }

    #[test]
    fn default_config_passes_validation() {
        let errors = Config::default().validate();
        assert!(errors.is_empty(), "unexpected validation errors: {errors:?}");
    }

    #[test]
    fn load_from_yaml_file() {
        let yaml = r#"
reporting:
  report_dir: /tmp/blackbox-reports
capture:
  max_frames: 40
  process_list_cap: 32
known_failures:
  - "Failed to recreate D3D11"
  - "device removed"
"#;
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(
            cfg.reporting.report_dir,
            PathBuf::from("/tmp/blackbox-reports")
        );
        assert_eq!(cfg.capture.max_frames, 40);
        assert_eq!(cfg.capture.process_list_cap, 32);
        assert_eq!(cfg.known_failures.len(), 2);
        assert_eq!(cfg.known_failures[0], "Failed to recreate D3D11");
    }

    #[test]
    fn load_or_default_returns_default_on_missing_file() {
        let cfg = Config::load_or_default(Path::new("/nonexistent/config.yaml"));
        assert_eq!(cfg.capture.max_frames, 50);
    }

    #[test]
    fn load_returns_error_on_invalid_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"not: [valid: yaml: {{{").unwrap();
        tmp.flush().unwrap();

        assert!(Config::load(tmp.path()).is_err());
    }

    #[test]
    fn validate_catches_zero_max_frames() {
        let mut cfg = Config::default();
        cfg.capture.max_frames = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "capture.max_frames"));
    }

    #[test]
    fn validate_catches_max_frames_above_platform_ceiling() {
        let mut cfg = Config::default();
        cfg.capture.max_frames = 63;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "capture.max_frames"));
    }

    #[test]
    fn validate_catches_zero_process_list_cap() {
        let mut cfg = Config::default();
        cfg.capture.process_list_cap = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "capture.process_list_cap"));
    }

    #[test]
    fn validate_catches_empty_known_failure_pattern() {
        let mut cfg = Config::default();
        cfg.known_failures = vec!["real pattern".into(), String::new()];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "known_failures[1]"));
    }

    #[test]
    fn builder_starts_from_defaults_and_overrides() {
        let cfg = ConfigBuilder::new()
            .report_dir(PathBuf::from("/custom/reports"))
            .max_frames(30)
            .process_list_cap(16)
            .known_failure("device removed")
            .known_failure("swapchain lost")
            .build();

        assert_eq!(cfg.reporting.report_dir, PathBuf::from("/custom/reports"));
        assert_eq!(cfg.capture.max_frames, 30);
        assert_eq!(cfg.capture.process_list_cap, 16);
        assert_eq!(
            cfg.known_failures,
            vec!["device removed".to_string(), "swapchain lost".to_string()]
        );
    }

    #[test]
    fn builder_build_validated_fails_for_invalid_config() {
        let result = ConfigBuilder::new().max_frames(0).build_validated();
        assert!(result.is_err());
    }

    #[test]
    fn default_path_ends_with_config_yaml() {
        let p = Config::default_path();
        assert!(p.ends_with("blackbox/config.yaml"));
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError {
            field: "capture.max_frames".into(),
            message: "must be in range 1..=62".into(),
        };
        assert_eq!(err.to_string(), "capture.max_frames: must be in range 1..=62");
    }
}
