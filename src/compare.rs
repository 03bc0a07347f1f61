//! Comparing two files end to end
use crate::source::{DiffOutput, DiffSource};
use crate::unified::{parse_changes, ChangeRecord};
use crate::Error;
use std::path::Path;

/// Compare two files and return the changed lines.
///
/// Identical files give an empty list. A source that can not produce a diff is an error,
/// never an empty list.
///
/// # Arguments
/// * `source`: Producer of the unified diff text
/// * `old`: Path of the original file
/// * `new`: Path of the modified file
pub fn compare_files<S>(
    source: &S,
    old: impl AsRef<Path>,
    new: impl AsRef<Path>,
) -> Result<Vec<ChangeRecord>, Error>
where
    S: DiffSource + ?Sized,
{
    let (old, new) = (old.as_ref(), new.as_ref());
    match source.obtain_diff(old, new)? {
        DiffOutput::Identical => Ok(Vec::new()),
        DiffOutput::Changed(text) => {
            let changes = parse_changes(&text);
            log::debug!(
                "{} changed lines between {} and {}",
                changes.len(),
                old.display(),
                new.display()
            );
            Ok(changes)
        }
    }
}

#[cfg(test)]
mod compare_files_tests {
    use super::*;
    use crate::source::test_support::*;
    use crate::source::{ProcessDiffSource, TextDiffSource};
    use pretty_assertions::assert_eq;

    struct FixedSource(Result<DiffOutput, Error>);

    impl DiffSource for FixedSource {
        fn obtain_diff(&self, _old: &Path, _new: &Path) -> Result<DiffOutput, Error> {
            self.0.clone()
        }
    }

    fn expected() -> Vec<ChangeRecord> {
        vec![
            ChangeRecord::removed("old line", 2),
            ChangeRecord::added("new line", 2),
            ChangeRecord::added("another new line", 3),
        ]
    }

    #[test]
    fn test_identical_is_empty() {
        let source = FixedSource(Ok(DiffOutput::Identical));
        assert!(compare_files(&source, "a", "b").unwrap().is_empty());
    }

    #[test]
    fn test_changed_is_parsed() {
        let text = "--- a/f\n+++ b/f\n@@ -1,2 +1,3 @@\n unchanged\n-old line\n+new line\n+another new line\n";
        let source = FixedSource(Ok(DiffOutput::Changed(text.to_string())));
        assert_eq!(compare_files(&source, "a", "b").unwrap(), expected());
    }

    #[test]
    fn test_failure_propagates() {
        let source = FixedSource(Err(Error::source_unavailable("diff", "not found")));
        let err = compare_files(&source, "a", "b").unwrap_err();
        assert_eq!(err, Error::source_unavailable("diff", "not found"));
    }

    #[test]
    fn test_dyn_source() {
        let source: Box<dyn DiffSource> = Box::new(FixedSource(Ok(DiffOutput::Identical)));
        assert!(compare_files(source.as_ref(), "a", "b").unwrap().is_empty());
    }

    #[test]
    fn test_text_source() {
        let (_dir, old, new) = write_pair(OLD, NEW);
        assert_eq!(
            compare_files(&TextDiffSource::new(), &old, &new).unwrap(),
            expected()
        );
        assert_eq!(
            compare_files(&TextDiffSource::new().with_context_lines(0), &old, &new).unwrap(),
            expected()
        );
    }

    #[test]
    fn test_text_source_identical() {
        let (_dir, old, new) = write_pair(NEW, NEW);
        assert!(compare_files(&TextDiffSource::new(), &old, &new)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_text_source_unreadable() {
        let (dir, old, _new) = write_pair(OLD, NEW);
        let err = compare_files(&TextDiffSource::new(), &old, dir.path().join("nope")).unwrap_err();
        assert!(err.is_source_unavailable());
    }

    #[test]
    fn test_process_source() {
        if std::process::Command::new("diff").arg("--version").output().is_err() {
            return;
        }
        let (_dir, old, new) = write_pair(OLD, NEW);
        assert_eq!(
            compare_files(&ProcessDiffSource::new(), &old, &new).unwrap(),
            expected()
        );
    }
}
