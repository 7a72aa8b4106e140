use std::fmt;

use serde::{Deserialize, Serialize};

/// Non-fatal condition raised while decoding or scoring a replay.
///
/// The record is still produced; callers decide whether to keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "DiagnosticSummary")]
pub enum Diagnostic {
    /// Game mode other than osu!standard. Only the shared layout was decoded.
    UnsupportedMode { mode: u8 },
    /// Bytes remained after the last schema field.
    TrailingBytes { count: usize },
    /// No hit objects were judged, so accuracy has no value.
    UndefinedAccuracy,
}

impl Diagnostic {
    /// Stable identifier (e.g., `OSR-TRAILING-BYTES`).
    pub fn id(&self) -> &'static str {
        match self {
            Diagnostic::UnsupportedMode { .. } => "OSR-UNSUPPORTED-MODE",
            Diagnostic::TrailingBytes { .. } => "OSR-TRAILING-BYTES",
            Diagnostic::UndefinedAccuracy => "OSR-UNDEFINED-ACCURACY",
        }
    }

    pub fn summary(&self) -> DiagnosticSummary {
        DiagnosticSummary {
            id: self.id().to_string(),
            message: self.to_string(),
        }
    }
}

impl From<Diagnostic> for DiagnosticSummary {
    fn from(value: Diagnostic) -> Self {
        value.summary()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnsupportedMode { mode } => {
                write!(f, "game mode {mode} is not osu!standard")
            }
            Diagnostic::TrailingBytes { count } => {
                write!(f, "{count} bytes left over after the last field")
            }
            Diagnostic::UndefinedAccuracy => write!(f, "replay has no hit objects"),
        }
    }
}

/// Serializable form of a [`Diagnostic`] used in reports.
///
/// # Examples
/// ```
/// use osrgraph_core::Diagnostic;
///
/// let summary = Diagnostic::TrailingBytes { count: 3 }.summary();
/// assert_eq!(summary.id, "OSR-TRAILING-BYTES");
/// assert!(summary.message.contains('3'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticSummary {
    pub id: String,
    pub message: String,
}
