//! Configuration for Nova's method-inheritance analysis.
//!
//! Every version-gated decision the analysis makes (private interface methods, redundant
//! `strictfp`, ...) is answered from an [`InheritConfig`] value rather than from scattered
//! release checks.

use std::path::Path;

use nova_types::{JavaLanguageLevel, Severity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod logging;

pub use logging::{init_tracing, LoggingConfig};

/// Oldest release with default/static interface methods.
const MIN_RELEASE: u16 = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid value for `{key}`: {message}")]
    InvalidValue { key: &'static str, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep the message and location only; the default `Display` embeds a source snippet.
        let message = err.message().to_owned();
        match err.span() {
            Some(span) => ConfigError::Toml(format!("{message} (at byte {})", span.start)),
            None => ConfigError::Toml(message),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InheritConfig {
    pub java: JavaConfig,
    pub diagnostics: DiagnosticsConfig,
    pub resolution: ResolutionConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JavaConfig {
    /// Java feature release the sources are compiled for (e.g. 8, 17, 21).
    #[serde(alias = "source")]
    pub release: u16,
    /// Whether `--enable-preview` is in effect.
    pub preview: bool,
}

impl Default for JavaConfig {
    fn default() -> Self {
        let level = JavaLanguageLevel::default();
        Self {
            release: level.major,
            preview: level.preview,
        }
    }
}

/// How a version-gated diagnostic is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Ignore,
}

impl DiagnosticLevel {
    /// `None` means the diagnostic is suppressed.
    pub fn severity(self) -> Option<Severity> {
        match self {
            DiagnosticLevel::Error => Some(Severity::Error),
            DiagnosticLevel::Warning => Some(Severity::Warning),
            DiagnosticLevel::Ignore => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Severity of the "`strictfp` is not required" diagnostic (release 17 and later).
    pub redundant_strictfp: DiagnosticLevel,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            redundant_strictfp: DiagnosticLevel::Warning,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolutionConfig {
    /// Worker threads for batch resolution. `0` picks one per CPU, `1` resolves inline.
    pub threads: usize,
}

impl InheritConfig {
    pub fn for_release(release: u16) -> Self {
        let mut config = Self::default();
        config.java.release = release;
        config
    }

    pub fn language_level(&self) -> JavaLanguageLevel {
        JavaLanguageLevel::new(self.java.release).with_preview(self.java.preview)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: InheritConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::load_from_str(&text)?;
        tracing::debug!(target: "nova.config", path = %path.display(), release = config.java.release, "loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.java.release < MIN_RELEASE {
            return Err(ConfigError::InvalidValue {
                key: "java.release",
                message: format!(
                    "release {} predates interface default methods (minimum {MIN_RELEASE})",
                    self.java.release
                ),
            });
        }
        Ok(())
    }
}
