//! Producers of unified diff text
use crate::timestamp::format_patch_date;
use crate::Error;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Result of asking a [`DiffSource`] to compare two files
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffOutput {
    /// The files have the same contents
    Identical,

    /// The files differ; holds the unified diff text
    Changed(String),
}

impl DiffOutput {
    /// Whether the files have the same contents
    pub fn is_identical(&self) -> bool {
        matches!(self, Self::Identical)
    }

    /// Get the diff text, or `None` if the files are identical
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Identical => None,
            Self::Changed(text) => Some(text),
        }
    }
}

/// Something that can produce a unified diff of two files
pub trait DiffSource {
    /// Compare two files.
    ///
    /// Fails with [`Error::SourceUnavailable`] if either file can not be read or the
    /// diff can not be produced.
    fn obtain_diff(&self, old: &Path, new: &Path) -> Result<DiffOutput, Error>;
}

/// Runs an external `diff` program
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessDiffSource {
    program: PathBuf,
    args: Vec<String>,
}

impl Default for ProcessDiffSource {
    fn default() -> Self {
        Self {
            program: PathBuf::from("diff"),
            args: vec!["-u".to_string()],
        }
    }
}

impl ProcessDiffSource {
    /// Run `diff -u` from the search path
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different program
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Replace the arguments passed before the two file names
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The program that will be run
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl DiffSource for ProcessDiffSource {
    fn obtain_diff(&self, old: &Path, new: &Path) -> Result<DiffOutput, Error> {
        let program = self.program.display().to_string();
        log::debug!(
            "running {} {} {} {}",
            program,
            self.args.join(" "),
            old.display(),
            new.display()
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(old)
            .arg(new)
            .output()
            .map_err(|e| Error::source_unavailable(&program, format!("failed to execute: {}", e)))?;

        // diff exits with 0 for identical files, 1 for differences and 2 for trouble
        match output.status.code() {
            Some(0) => Ok(DiffOutput::Identical),
            Some(1) if !output.stdout.is_empty() => String::from_utf8(output.stdout)
                .map(DiffOutput::Changed)
                .map_err(|e| Error::source_unavailable(&program, format!("output is not UTF-8: {}", e))),
            code => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let code = code.map_or_else(|| "none".to_string(), |c| c.to_string());
                log::debug!("{} failed with exit code {}", program, code);
                Err(Error::source_unavailable(
                    program,
                    format!("exit code {}: {}", code, stderr.trim()),
                ))
            }
        }
    }
}

/// Reads both files and diffs them in-process with `similar`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextDiffSource {
    context_lines: usize,
}

impl Default for TextDiffSource {
    fn default() -> Self {
        Self { context_lines: 3 }
    }
}

impl TextDiffSource {
    /// Diff with three lines of context, like `diff -u`
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unchanged lines shown around each change
    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    /// Number of unchanged lines shown around each change
    pub fn context_lines(&self) -> usize {
        self.context_lines
    }
}

fn read_file(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::source_unavailable(path.display().to_string(), e.to_string()))
}

/// Name and modification time, separated by a tab as `diff -u` does
fn file_header(path: &Path) -> String {
    match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => format!(
            "{}\t{}",
            path.display(),
            format_patch_date(&DateTime::<Local>::from(modified).fixed_offset())
        ),
        Err(_) => path.display().to_string(),
    }
}

impl DiffSource for TextDiffSource {
    fn obtain_diff(&self, old: &Path, new: &Path) -> Result<DiffOutput, Error> {
        let old_text = read_file(old)?;
        let new_text = read_file(new)?;
        if old_text == new_text {
            log::debug!("{} and {} are identical", old.display(), new.display());
            return Ok(DiffOutput::Identical);
        }

        let diff = similar::TextDiff::from_lines(&old_text, &new_text);
        let text = diff
            .unified_diff()
            .context_radius(self.context_lines)
            .header(&file_header(old), &file_header(new))
            .to_string();
        Ok(DiffOutput::Changed(text))
    }
}
