//! Output stream categories and log message levels

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five independent output streams a scripting engine emits
/// during execution.
///
/// Items are delivered in emission order within a category; no ordering is
/// guaranteed across categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputCategory {
    /// Debug stream (`Write-Debug`)
    Debug,

    /// Verbose stream (`Write-Verbose`)
    Verbose,

    /// Warning stream (`Write-Warning`)
    Warning,

    /// Error stream (`Write-Error` and uncaught script errors)
    Error,

    /// Normal/success output stream (`Write-Output`, pipeline output)
    Output,
}

impl OutputCategory {
    /// All categories, in a fixed order
    pub const ALL: [OutputCategory; 5] = [
        OutputCategory::Debug,
        OutputCategory::Verbose,
        OutputCategory::Warning,
        OutputCategory::Error,
        OutputCategory::Output,
    ];

    /// The log level items from this category are forwarded at
    pub fn message_level(self) -> MessageLevel {
        match self {
            OutputCategory::Debug | OutputCategory::Verbose => MessageLevel::Debug,
            OutputCategory::Warning => MessageLevel::Warning,
            OutputCategory::Error => MessageLevel::Error,
            OutputCategory::Output => MessageLevel::Information,
        }
    }
}

impl fmt::Display for OutputCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputCategory::Debug => "debug",
            OutputCategory::Verbose => "verbose",
            OutputCategory::Warning => "warning",
            OutputCategory::Error => "error",
            OutputCategory::Output => "output",
        };
        f.write_str(name)
    }
}

/// Severity of a log event produced while running a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
    Debug,
    Information,
    Warning,
    Error,
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageLevel::Debug => "DEBUG",
            MessageLevel::Information => "INFO",
            MessageLevel::Warning => "WARN",
            MessageLevel::Error => "ERROR",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_level_mapping() {
        assert_eq!(OutputCategory::Debug.message_level(), MessageLevel::Debug);
        assert_eq!(OutputCategory::Verbose.message_level(), MessageLevel::Debug);
        assert_eq!(OutputCategory::Warning.message_level(), MessageLevel::Warning);
        assert_eq!(OutputCategory::Error.message_level(), MessageLevel::Error);
        assert_eq!(OutputCategory::Output.message_level(), MessageLevel::Information);
    }

    #[test]
    fn test_all_contains_every_category() {
        assert_eq!(OutputCategory::ALL.len(), 5);
        for category in OutputCategory::ALL {
            assert!(OutputCategory::ALL.contains(&category));
        }
    }
}
