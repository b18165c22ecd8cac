use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    /// Default `tracing` filter directives. `RUST_LOG` takes
    /// precedence if it is set.
    ///
    /// **Environment variables**:
    /// - `SKETCHBOOK_LOGGING_LEVEL`
    #[serde(default = "Logging::default_level")]
    pub level: String,
    /// **Environment variables**:
    /// - `SKETCHBOOK_LOGGING_STYLE`
    #[serde(default)]
    pub style: LoggingStyle,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoggingStyle {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl Logging {
    fn default_level() -> String {
        String::from("info")
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            style: LoggingStyle::default(),
        }
    }
}
