//! Command output rendering
//!
//! Reports go to stdout as human-readable text or as one JSON document.
//! Logs go to stderr, so JSON output can be piped.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render a report in the requested format
pub fn render<T>(format: OutputFormat, report: &T) -> Result<String>
where
    T: Serialize + fmt::Display,
{
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        valid: bool,
    }

    impl fmt::Display for Sample {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "valid: {}", self.valid)
        }
    }

    #[test]
    fn test_render_formats() {
        let sample = Sample { valid: true };
        assert_eq!(render(OutputFormat::Text, &sample).unwrap(), "valid: true");

        let json: serde_json::Value =
            serde_json::from_str(&render(OutputFormat::Json, &sample).unwrap()).unwrap();
        assert_eq!(json["valid"], true);
    }
}
