//! File headers of a unified diff
use crate::timestamp::{parse_patch_date, ParsePatchDateError};
use crate::unified::{parse_changes, ChangeRecord};
use crate::Error;
use chrono::{DateTime, FixedOffset};

static BINARY_FILES_RE: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| {
        lazy_regex::Regex::new(r"^Binary files (.+) and (.+) differ").unwrap()
    });

/// One of the `---`/`+++` lines at the top of a diff
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileHeader {
    /// Name of the file
    pub name: String,

    /// Timestamp, exactly as written after the tab
    pub timestamp: Option<String>,
}

impl FileHeader {
    fn parse(line: &str, prefix: &'static str) -> Result<Self, Error> {
        let rest = line
            .trim_end_matches(['\r', '\n'])
            .strip_prefix(prefix)
            .ok_or_else(|| Error::MalformedPatchHeader(prefix, line.to_string()))?;
        match rest.split('\t').collect::<Vec<_>>()[..] {
            [name, ts] => Ok(Self {
                name: name.to_string(),
                timestamp: Some(ts.to_string()),
            }),
            [name] => Ok(Self {
                name: name.to_string(),
                timestamp: None,
            }),
            _ => Err(Error::MalformedPatchHeader("Too many tabs", line.to_string())),
        }
    }

    /// Parse the timestamp, if there is one
    pub fn modified(&self) -> Option<Result<DateTime<FixedOffset>, ParsePatchDateError>> {
        self.timestamp.as_deref().map(parse_patch_date)
    }
}

/// Parse the two file header lines at the start of a diff
pub fn parse_file_headers(diff_text: &str) -> Result<(FileHeader, FileHeader), Error> {
    let mut lines = diff_text.split('\n');
    let line = lines
        .next()
        .filter(|l| !l.is_empty())
        .ok_or_else(|| Error::PatchSyntax("No input", String::new()))?;

    if let Some(captures) = BINARY_FILES_RE.captures(line) {
        return Err(Error::BinaryFiles(
            captures[1].to_string(),
            captures[2].to_string(),
        ));
    }
    let orig = FileHeader::parse(line, "--- ")?;

    let line = lines
        .next()
        .filter(|l| !l.is_empty())
        .ok_or_else(|| Error::PatchSyntax("No mod line", line.to_string()))?;
    let modified = FileHeader::parse(line, "+++ ")?;

    Ok((orig, modified))
}

/// A diff with its file headers and change records
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedDiff {
    /// Header of the original file
    pub orig: FileHeader,

    /// Header of the modified file
    pub modified: FileHeader,

    /// Changed lines, in the order they appear
    pub changes: Vec<ChangeRecord>,
}

/// Parse a diff including its file headers.
///
/// Unlike [`parse_changes`], this fails when the first two lines are not file headers.
pub fn parse_diff(diff_text: &str) -> Result<ParsedDiff, Error> {
    let (orig, modified) = parse_file_headers(diff_text)?;
    log::debug!("parsing diff of {} and {}", orig.name, modified.name);
    Ok(ParsedDiff {
        orig,
        modified,
        changes: parse_changes(diff_text),
    })
}

#[cfg(test)]
mod parse_file_headers_tests {
    use super::*;

    #[test]
    fn test_simple() {
        let text = "--- baz\t2009-10-14 19:49:59 +0000\n+++ quxx\t2009-10-14 19:51:00 +0000\n";
        let (old, new) = parse_file_headers(text).unwrap();
        assert_eq!(
            old,
            FileHeader {
                name: "baz".to_string(),
                timestamp: Some("2009-10-14 19:49:59 +0000".to_string()),
            }
        );
        assert_eq!(new.name, "quxx");
        assert_eq!(new.modified().unwrap().unwrap().timestamp(), 1255549860);
    }

    #[test]
    fn test_no_timestamp() {
        let (old, new) = parse_file_headers("--- a/f\n+++ b/f\n").unwrap();
        assert_eq!(old.name, "a/f");
        assert_eq!(old.timestamp, None);
        assert!(old.modified().is_none());
        assert_eq!(new.name, "b/f");
    }

    #[test]
    fn test_binary() {
        let e = parse_file_headers("Binary files qoo and bar differ\n").unwrap_err();
        assert_eq!(e, Error::BinaryFiles("qoo".to_string(), "bar".to_string()));
    }

    #[test]
    fn test_missing() {
        assert!(matches!(
            parse_file_headers(""),
            Err(Error::PatchSyntax("No input", _))
        ));
        assert!(matches!(
            parse_file_headers("--- a\n"),
            Err(Error::PatchSyntax("No mod line", _))
        ));
        assert!(matches!(
            parse_file_headers("+++ b\n--- a\n"),
            Err(Error::MalformedPatchHeader("--- ", _))
        ));
    }
}
