// diag.rs — Error taxonomy for a generation run
//
// All variants are fatal: the run aborts before any output file is written,
// so a build can never pick up partially-consistent generated sources.
// Policy skips (row-vector lines, excluded calls, ignored signatures) are
// not errors and never appear here.
//
// Preconditions: none (types only).
// Postconditions: none (types only).
// Failure modes: none.
// Side effects: none.

use std::fmt;
use std::path::PathBuf;

/// A fatal generation error.
#[derive(Debug)]
pub enum GenError {
    /// Parse-level: missing separators or unbalanced nesting in a record.
    MalformedSignature { record: String, detail: String },
    /// Expansion-level: a type outside the closed vocabulary. Never mapped
    /// to a default type.
    UnknownTypeToken { token: String, record: String },
    /// Usage-level: requested function names that never appeared in the
    /// input stream. Collected and reported once at end of run.
    UnresolvedFunctionFilter { names: Vec<String> },
    /// Reading or writing a file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The external signature front-end failed or produced no stream.
    FrontEnd { command: String, detail: String },
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::MalformedSignature { record, detail } => {
                write!(f, "malformed signature '{}': {}", record.trim_end(), detail)
            }
            GenError::UnknownTypeToken { token, record } => {
                write!(
                    f,
                    "unknown type token '{}' in signature '{}'",
                    token,
                    record.trim_end()
                )
            }
            GenError::UnresolvedFunctionFilter { names } => {
                write!(
                    f,
                    "functions not found in signature stream: {}",
                    names.join(", ")
                )
            }
            GenError::Io { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
            GenError::FrontEnd { command, detail } => {
                write!(f, "signature front-end '{}' failed: {}", command, detail)
            }
        }
    }
}

impl std::error::Error for GenError {}
