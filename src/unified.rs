//! Parsing of unified diffs into change records

/// The line diff prints after a line that has no terminating newline
pub const NO_NL: &str = "\\ No newline at end of file";

/// Whether a line was added or removed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The line only exists in the new file
    Added,

    /// The line only exists in the old file
    Removed,
}

impl ChangeKind {
    /// Get the character that introduces this kind of line in a unified diff
    pub fn marker(&self) -> char {
        match self {
            Self::Added => '+',
            Self::Removed => '-',
        }
    }
}

/// A single added or removed line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Whether the line was added or removed
    pub kind: ChangeKind,

    /// Text of the line, without its leading marker
    pub content: String,

    /// 1-based line number; in the new file for additions, in the old file for removals
    pub line_number: usize,
}

impl ChangeRecord {
    /// Create a new change record
    pub fn new(kind: ChangeKind, content: impl Into<String>, line_number: usize) -> Self {
        Self {
            kind,
            content: content.into(),
            line_number,
        }
    }

    /// Create a record for an added line
    pub fn added(content: impl Into<String>, line_number: usize) -> Self {
        Self::new(ChangeKind::Added, content, line_number)
    }

    /// Create a record for a removed line
    pub fn removed(content: impl Into<String>, line_number: usize) -> Self {
        Self::new(ChangeKind::Removed, content, line_number)
    }

    /// Whether the line only exists in the new file
    pub fn is_added(&self) -> bool {
        self.kind == ChangeKind::Added
    }

    /// Whether the line only exists in the old file
    pub fn is_removed(&self) -> bool {
        self.kind == ChangeKind::Removed
    }
}

impl std::fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.kind.marker(), self.content)
    }
}

/// Number of added and removed lines in a set of records
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangeStats {
    /// Number of added lines
    pub added: usize,

    /// Number of removed lines
    pub removed: usize,
}

impl ChangeStats {
    /// Count the records of each kind
    pub fn from_records(records: &[ChangeRecord]) -> Self {
        records.iter().fold(Self::default(), |mut stats, record| {
            match record.kind {
                ChangeKind::Added => stats.added += 1,
                ChangeKind::Removed => stats.removed += 1,
            }
            stats
        })
    }

    /// Total number of changed lines
    pub fn total(&self) -> usize {
        self.added + self.removed
    }
}

/// A parsed `@@ -a,b +c,d @@` line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HunkHeader {
    /// Position in the original file
    pub orig_pos: usize,

    /// Number of lines in the original file, if given
    pub orig_range: Option<usize>,

    /// Position in the modified file
    pub mod_pos: usize,

    /// Number of lines in the modified file, if given
    pub mod_range: Option<usize>,

    /// Text following the closing `@@`, such as a function name from `diff -p`
    pub tail: Option<String>,
}

impl HunkHeader {
    /// Parse a hunk header.
    ///
    /// Returns `None` for anything that is not a hunk header; callers treat such lines as
    /// ordinary diff lines. Ranges are never checked against the lines that follow.
    ///
    /// Only the modified-file position has to fit in a `usize`. An original-file position
    /// that does not is clamped to `usize::MAX`, and counts that do not become `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let re = lazy_regex::regex!(r"^@@\s*-(\d+)(?:,(\d+))?\s*\+(\d+)(?:,(\d+))?\s*@@");
        let captures = re.captures(line)?;
        let number = |i: usize| -> Option<usize> { captures.get(i)?.as_str().parse().ok() };
        let orig_pos = number(1).unwrap_or(usize::MAX);
        let orig_range = number(2);
        let mod_pos = number(3)?;
        let mod_range = number(4);
        let tail = line[captures.get(0)?.end()..].trim();
        Some(Self {
            orig_pos,
            orig_range,
            mod_pos,
            mod_range,
            tail: (!tail.is_empty()).then(|| tail.to_string()),
        })
    }

    fn range_str(pos: usize, range: Option<usize>) -> String {
        match range {
            Some(range) => format!("{},{}", pos, range),
            None => format!("{}", pos),
        }
    }
}

impl std::fmt::Display for HunkHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "@@ -{} +{} @@",
            Self::range_str(self.orig_pos, self.orig_range),
            Self::range_str(self.mod_pos, self.mod_range)
        )?;
        if let Some(tail) = &self.tail {
            write!(f, " {}", tail)?;
        }
        Ok(())
    }
}

/// Position within the hunk currently being read.
///
/// Additions and removals are counted separately from the start of the hunk, since they land
/// at different positions in the two files. Only context lines move the shared cursor.
struct HunkCursor {
    line_no: usize,
    add_offset: usize,
    del_offset: usize,
}

impl HunkCursor {
    fn at(line_no: usize) -> Self {
        Self {
            line_no,
            add_offset: 0,
            del_offset: 0,
        }
    }

    fn next_added(&mut self) -> usize {
        let line_no = self.line_no.saturating_add(self.add_offset);
        self.add_offset += 1;
        line_no
    }

    fn next_removed(&mut self) -> usize {
        let line_no = self.line_no.saturating_add(self.del_offset);
        self.del_offset += 1;
        line_no
    }
}

/// Parse unified diff text into change records.
///
/// The first two lines are taken to be the `---`/`+++` file headers and are skipped without
/// being looked at. Every other line is trimmed before it is classified. Lines that are not
/// hunk headers, changes or the no-newline marker count as context, so malformed input is
/// tolerated rather than rejected.
///
/// # Arguments
/// * `diff_text`: Unified diff as produced by `diff -u`
pub fn parse_changes(diff_text: &str) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();
    let mut cursor = HunkCursor::at(1);

    for line in diff_text.split('\n').skip(2).map(str::trim) {
        if let Some(header) = HunkHeader::parse(line) {
            log::trace!("hunk {} starts at new line {}", header, header.mod_pos);
            cursor = HunkCursor::at(header.mod_pos);
            continue;
        }
        if line.starts_with('+') && !line.starts_with("+++") {
            let line_number = cursor.next_added();
            changes.push(ChangeRecord::added(&line[1..], line_number));
        } else if line.starts_with('-') && !line.starts_with("---") {
            let line_number = cursor.next_removed();
            changes.push(ChangeRecord::removed(&line[1..], line_number));
        } else if !line.starts_with("+++") && !line.starts_with("---") && line != NO_NL {
            cursor.line_no = cursor.line_no.saturating_add(1);
        }
    }

    changes
}
