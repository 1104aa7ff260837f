//! The single value every tool returns

use std::fmt;

/// Formatted text result of a tool call.
///
/// `is_error` only marks the result for the protocol layer; the text is the
/// complete answer either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Human-readable result
    pub result: String,
    /// Whether the text describes invalid input or an unusable tool
    pub is_error: bool,
}

impl ToolOutput {
    /// A normal answer, including "not found" style answers
    pub fn success(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            is_error: false,
        }
    }

    /// An answer describing why the call could not be carried out
    pub fn error(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            is_error: true,
        }
    }

    /// Append text to the result
    pub fn append(mut self, text: &str) -> Self {
        self.result.push_str(text);
        self
    }
}

impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.result)
    }
}
