//! Replay scripts: one JSON observation per line.
//!
//! ```text
//! # comments and blank lines are skipped
//! {"op":"create","name":"Windows","path":"C:"}
//! {"op":"rename","current_name":"Linux","current_path":"C:","original_name":"Windows"}
//! {"op":"history","name":"Linux","path":"C:"}
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: {source}")]
    Parse {
        /// 1-based line number in the script.
        line: usize,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScriptError>;

/// One observed mutation, query or reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Create {
        name: String,
        path: String,
    },
    Rename {
        current_name: String,
        current_path: String,
        original_name: String,
    },
    Move {
        current_name: String,
        current_path: String,
        original_name: String,
        original_path: String,
    },
    Paste {
        current_name: String,
        current_path: String,
        original_name: String,
        original_path: String,
    },
    Delete {
        name: String,
        path: String,
    },
    /// Print the history of the entry currently at `(name, path)`.
    History {
        name: String,
        path: String,
    },
    Clear,
}

/// Parse a whole script. Stops at the first malformed line.
pub fn parse_script(text: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step = serde_json::from_str(line).map_err(|source| ScriptError::Parse {
            line: index + 1,
            source,
        })?;
        steps.push(step);
    }
    Ok(steps)
}

/// Read and parse a script file.
pub fn load_script(path: &Path) -> Result<Vec<Step>> {
    let text = fs::read_to_string(path)?;
    parse_script(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_step_kind() {
        let script = r#"
{"op":"create","name":"a","path":"p"}
{"op":"rename","current_name":"b","current_path":"p","original_name":"a"}
{"op":"move","current_name":"b","current_path":"q","original_name":"b","original_path":"p"}
{"op":"paste","current_name":"b","current_path":"r","original_name":"b","original_path":"q"}
{"op":"delete","name":"b","path":"r"}
{"op":"history","name":"b","path":"r"}
{"op":"clear"}
"#;
        let steps = parse_script(script).unwrap();
        assert_eq!(steps.len(), 7);
        assert_eq!(
            steps[1],
            Step::Rename {
                current_name: "b".into(),
                current_path: "p".into(),
                original_name: "a".into(),
            }
        );
        assert_eq!(steps[6], Step::Clear);
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let script = "# setup\n\n   \n{\"op\":\"clear\"}\n# done\n";
        assert_eq!(parse_script(script).unwrap(), vec![Step::Clear]);
    }

    #[test]
    fn test_error_reports_line_number() {
        let script = "{\"op\":\"clear\"}\n# note\n{\"op\":\"explode\"}\n";
        let err = parse_script(script).unwrap_err();
        match err {
            ScriptError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let err = parse_script("{\"op\":\"rename\",\"current_name\":\"b\"}").unwrap_err();
        assert!(err.to_string().starts_with("line 1:"));
    }

    #[test]
    fn test_backslash_paths_survive_parsing() {
        let steps = parse_script(r#"{"op":"create","name":"X","path":"C:\\"}"#).unwrap();
        assert_eq!(
            steps[0],
            Step::Create {
                name: "X".into(),
                path: "C:\\".into(),
            }
        );
    }
}
