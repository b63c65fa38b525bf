//! Non-fatal conditions raised while building a dashboard view.

use serde::{Deserialize, Serialize};

/// What degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// An expected file is absent or unreadable.
    MissingSource,
    /// No column matched a logical field; the dependent feature is off.
    UnresolvableField,
    /// The filters matched zero rows.
    EmptyResult,
    /// Some date-like values could not be parsed and were skipped.
    MalformedDate,
}

impl NoticeKind {
    /// Get a human-readable label for the notice kind.
    pub fn label(&self) -> &'static str {
        match self {
            NoticeKind::MissingSource => "Missing Source",
            NoticeKind::UnresolvableField => "Unresolvable Field",
            NoticeKind::EmptyResult => "Empty Result",
            NoticeKind::MalformedDate => "Malformed Date",
        }
    }

    /// Default severity for this kind.
    pub fn severity(&self) -> Severity {
        match self {
            NoticeKind::MissingSource | NoticeKind::MalformedDate => Severity::Warning,
            NoticeKind::UnresolvableField | NoticeKind::EmptyResult => Severity::Info,
        }
    }
}

/// Severity level of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only; a feature is hidden or empty.
    Info,
    /// Input problem the analyst should look at.
    Warning,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
        }
    }
}

/// A user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub severity: Severity,
    /// What the notice is about: a file path, a field, a dataset name.
    pub subject: String,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Emit the notice through the `log` facade at a matching level.
    pub fn log(&self) {
        match self.severity {
            Severity::Warning => log::warn!("{}: {}", self.kind.label(), self.message),
            Severity::Info => log::info!("{}: {}", self.kind.label(), self.message),
        }
    }
}
