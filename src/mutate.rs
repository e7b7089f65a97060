//! Duplicate-checked PATH mutation.
//!
//! This module owns the decision logic: given the current PATH list and a
//! target directory, decide whether to append it. It never touches the store
//! itself; callers persist the returned list.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::path_list;

/// Result of attempting to add a directory to the PATH list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Already on the list under the normalized comparison; nothing to write.
    AlreadyPresent,
    /// Appended; carries the new list for the caller to persist.
    Added(Vec<String>),
    /// Refused before any mutation.
    Rejected(String),
}

/// The directory to add, with its provenance.
///
/// An explicit target must name an existing directory. The defaulted value
/// (the executable's own directory) is never validated against existence.
#[derive(Debug, Clone)]
pub struct TargetDirectory {
    path: PathBuf,
    explicit: bool,
}

impl TargetDirectory {
    /// Target supplied on the command line.
    pub fn from_argument(path: PathBuf) -> Self {
        Self {
            path,
            explicit: true,
        }
    }

    /// Default target: the directory holding the running executable.
    pub fn from_executable_dir() -> Result<Self, Error> {
        let exe = env::current_exe()
            .map_err(|e| Error::Unknown(format!("cannot determine executable path: {e}")))?;
        let dir = exe
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::Unknown("executable has no parent directory".to_string()))?;
        Ok(Self {
            path: dir,
            explicit: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn display_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Decide whether to add `target` to `list`.
///
/// Explicit targets that do not exist are rejected before the list is even
/// inspected. A duplicate (case-insensitive) returns `AlreadyPresent` so the
/// caller skips the write entirely; repeated runs cause no environment churn
/// and no spurious elevation prompts. Otherwise the target is appended at the
/// end, preserving the order of every existing entry.
pub fn add(list: &[String], target: &TargetDirectory) -> MutationOutcome {
    if target.explicit && !target.path.is_dir() {
        return MutationOutcome::Rejected(format!(
            "Directory '{}' does not exist",
            target.path.display()
        ));
    }

    let candidate = target.display_string();
    if path_list::contains(list, &candidate) {
        return MutationOutcome::AlreadyPresent;
    }

    let mut updated = list.to_vec();
    updated.push(candidate);
    MutationOutcome::Added(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    fn list(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_add_appends_at_end_preserving_order() {
        let temp_dir = create_test_dir();
        let target = TargetDirectory::from_argument(temp_dir.path().to_path_buf());
        let before = list(&["/usr/bin", "/bin"]);

        match add(&before, &target) {
            MutationOutcome::Added(after) => {
                assert_eq!(after[..2], before[..]);
                assert_eq!(after[2], temp_dir.path().to_string_lossy());
            }
            other => panic!("expected Added, got {other:?}"),
        }
    }

    #[test]
    fn test_add_is_idempotent() {
        let temp_dir = create_test_dir();
        let target = TargetDirectory::from_argument(temp_dir.path().to_path_buf());

        let first = add(&[], &target);
        let MutationOutcome::Added(after) = first else {
            panic!("expected Added");
        };
        assert_eq!(add(&after, &target), MutationOutcome::AlreadyPresent);
    }

    #[test]
    fn test_add_detects_duplicate_under_any_casing() {
        let temp_dir = create_test_dir();
        let target = TargetDirectory::from_argument(temp_dir.path().to_path_buf());
        let existing = vec![temp_dir.path().to_string_lossy().to_uppercase()];

        // Case may differ; the entry still counts as present.
        assert_eq!(add(&existing, &target), MutationOutcome::AlreadyPresent);
    }

    #[test]
    fn test_add_rejects_missing_explicit_target() {
        let temp_dir = create_test_dir();
        let missing = temp_dir.path().join("no-such-dir");
        let target = TargetDirectory::from_argument(missing);
        let before = list(&["/usr/bin"]);

        match add(&before, &target) {
            MutationOutcome::Rejected(reason) => {
                assert!(reason.contains("does not exist"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert_eq!(before, list(&["/usr/bin"]));
    }

    #[test]
    fn test_add_skips_existence_check_for_default_target() {
        // The default target is the executable's directory; it is taken on
        // trust even if a test fabricates a non-existent one.
        let target = TargetDirectory {
            path: PathBuf::from("/definitely/not/here"),
            explicit: false,
        };
        assert!(matches!(add(&[], &target), MutationOutcome::Added(_)));
    }

    #[test]
    fn test_default_target_is_executable_dir() {
        let target = TargetDirectory::from_executable_dir().unwrap();
        assert!(!target.is_explicit());
        assert!(target.path().is_absolute());
    }
}
