//! Extract per-line change records from unified diffs.
//!
//! The core is [`unified::parse_changes`], which walks `diff -u` style text and reports every
//! added and removed line together with its line number. Producing that text is left to a
//! [`source::DiffSource`]; [`compare::compare_files`] ties the two together.
pub mod compare;
pub mod header;
pub mod source;
pub mod structured;
pub mod timestamp;
pub mod unified;

pub use compare::compare_files;
pub use header::{parse_diff, parse_file_headers, FileHeader, ParsedDiff};
pub use source::{DiffOutput, DiffSource, ProcessDiffSource, TextDiffSource};
pub use structured::changes_between;
pub use unified::{parse_changes, ChangeKind, ChangeRecord, ChangeStats, HunkHeader};

/// Errors raised while reading diff headers or obtaining a diff
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The files are binary and differ
    BinaryFiles(String, String),

    /// A syntax error in the diff text
    PatchSyntax(&'static str, String),

    /// A malformed file header line
    MalformedPatchHeader(&'static str, String),

    /// The diff could not be produced at all
    SourceUnavailable {
        /// What was asked to produce the diff (a program or a file path)
        source_name: String,
        /// Why it failed
        reason: String,
    },
}

impl Error {
    /// Build a [`Error::SourceUnavailable`]
    pub fn source_unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Whether the diff source failed, as opposed to the diff text being unusable
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. })
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::BinaryFiles(oldname, newname) => {
                write!(f, "Binary files {} and {} differ", oldname, newname)
            }
            Self::PatchSyntax(msg, line) => write!(f, "Patch syntax error: {} in {:?}", msg, line),
            Self::MalformedPatchHeader(msg, line) => {
                write!(f, "Malformed patch header: {} in {}", msg, line)
            }
            Self::SourceUnavailable {
                source_name,
                reason,
            } => write!(f, "Diff source unavailable: {}: {}", source_name, reason),
        }
    }
}

impl std::error::Error for Error {}
