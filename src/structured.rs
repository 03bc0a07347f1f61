//! Change records computed straight from a line diff, without going through diff text
use crate::unified::ChangeRecord;
use similar::{ChangeTag, TextDiff};

/// Compare two texts line by line.
///
/// Removed lines report their position in `old` and added lines their position in `new`.
/// Line terminators are not part of the content.
pub fn changes_between(old: &str, new: &str) -> Vec<ChangeRecord> {
    let diff = TextDiff::from_lines(old, new);
    diff.iter_all_changes()
        .filter_map(|change| {
            let value = change.value();
            let content = value.strip_suffix('\n').unwrap_or(value);
            let content = content.strip_suffix('\r').unwrap_or(content);
            match change.tag() {
                ChangeTag::Delete => Some(ChangeRecord::removed(content, change.old_index()? + 1)),
                ChangeTag::Insert => Some(ChangeRecord::added(content, change.new_index()? + 1)),
                ChangeTag::Equal => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod changes_between_tests {
    use super::*;
    use crate::unified::{parse_changes, ChangeStats};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple() {
        assert_eq!(
            changes_between("unchanged\nold line\n", "unchanged\nnew line\nanother new line\n"),
            vec![
                ChangeRecord::removed("old line", 2),
                ChangeRecord::added("new line", 2),
                ChangeRecord::added("another new line", 3),
            ]
        );
    }

    #[test]
    fn test_identical() {
        assert!(changes_between("a\nb\n", "a\nb\n").is_empty());
        assert!(changes_between("", "").is_empty());
    }

    #[test]
    fn test_positions_per_file() {
        let old = "a\nb\nc\nd\n";
        let new = "x\ny\na\nb\nd\n";
        assert_eq!(
            changes_between(old, new),
            vec![
                ChangeRecord::added("x", 1),
                ChangeRecord::added("y", 2),
                ChangeRecord::removed("c", 3),
            ]
        );
    }

    #[test]
    fn test_missing_trailing_newline() {
        assert_eq!(
            changes_between("a\nb", "a\nc"),
            vec![ChangeRecord::removed("b", 2), ChangeRecord::added("c", 2)]
        );
    }

    #[test]
    fn test_agrees_with_text_path_on_counts() {
        let old = "one\ntwo\nthree\nfour\nfive\nsix\nseven\neight\nnine\nten\n";
        let new = "one\n2\nthree\nfour\nfive\nsix\nseven\neight\nnine\nten\neleven\n";
        let text = TextDiff::from_lines(old, new)
            .unified_diff()
            .context_radius(1)
            .header("a", "b")
            .to_string();
        assert_eq!(
            ChangeStats::from_records(&changes_between(old, new)),
            ChangeStats::from_records(&parse_changes(&text))
        );
        assert_eq!(changes_between(old, new), parse_changes(&text));
    }
}
