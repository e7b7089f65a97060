//! Integration tests for pathadd
//!
//! These tests verify end-to-end workflows through the library API, using
//! fake capability/store implementations instead of real machine state.

use std::cell::{Cell, RefCell};

use tempfile::TempDir;

use pathadd::config::Config;
use pathadd::elevation::Privilege;
use pathadd::error::Error;
use pathadd::mutate::TargetDirectory;
use pathadd::output::OutputMode;
use pathadd::path_list;
use pathadd::run::{self, ElevationPolicy, RunOptions, RunOutcome};
use pathadd::store::PathStore;

fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

struct FakeStore {
    list: RefCell<Vec<String>>,
    writes: Cell<usize>,
}

impl FakeStore {
    fn with(parts: &[&str]) -> Self {
        Self {
            list: RefCell::new(parts.iter().map(|p| p.to_string()).collect()),
            writes: Cell::new(0),
        }
    }
}

impl PathStore for FakeStore {
    fn read_system_path(&self) -> Result<Vec<String>, Error> {
        Ok(self.list.borrow().clone())
    }

    fn write_system_path(&self, parts: &[String]) -> Result<(), Error> {
        self.writes.set(self.writes.get() + 1);
        *self.list.borrow_mut() = parts.to_vec();
        Ok(())
    }
}

struct AlwaysElevated;

impl Privilege for AlwaysElevated {
    fn is_elevated(&self) -> bool {
        true
    }

    fn relaunch_elevated(&self, _args: &[String]) -> Result<(), Error> {
        panic!("an elevated process must never relaunch");
    }
}

struct NeverElevated {
    relaunches: Cell<usize>,
}

impl Privilege for NeverElevated {
    fn is_elevated(&self) -> bool {
        false
    }

    fn relaunch_elevated(&self, _args: &[String]) -> Result<(), Error> {
        self.relaunches.set(self.relaunches.get() + 1);
        Ok(())
    }
}

fn default_options() -> RunOptions {
    RunOptions {
        policy: ElevationPolicy::Relaunch,
        dry_run: false,
    }
}

#[test]
fn test_add_new_directory_end_to_end() {
    let temp_dir = create_test_dir();
    let store = FakeStore::with(&["/usr/bin", "/bin"]);
    let target = TargetDirectory::from_argument(temp_dir.path().to_path_buf());

    let outcome = run::execute(&AlwaysElevated, &store, &target, &[], default_options()).unwrap();

    let dir = temp_dir.path().to_string_lossy().into_owned();
    assert!(matches!(outcome, RunOutcome::Added { .. }));
    assert_eq!(
        *store.list.borrow(),
        vec!["/usr/bin".to_string(), "/bin".to_string(), dir]
    );
    assert_eq!(store.writes.get(), 1);
}

#[test]
fn test_repeated_run_leaves_store_untouched() {
    let temp_dir = create_test_dir();
    let store = FakeStore::with(&[]);
    let target = TargetDirectory::from_argument(temp_dir.path().to_path_buf());

    let first = run::execute(&AlwaysElevated, &store, &target, &[], default_options()).unwrap();
    let second = run::execute(&AlwaysElevated, &store, &target, &[], default_options()).unwrap();

    assert!(matches!(first, RunOutcome::Added { .. }));
    assert!(matches!(second, RunOutcome::AlreadyPresent { .. }));
    assert_eq!(store.writes.get(), 1);
}

#[test]
fn test_unelevated_run_relaunches_and_never_touches_store() {
    let temp_dir = create_test_dir();
    let store = FakeStore::with(&["/usr/bin"]);
    let privilege = NeverElevated {
        relaunches: Cell::new(0),
    };
    let target = TargetDirectory::from_argument(temp_dir.path().to_path_buf());

    let outcome = run::execute(&privilege, &store, &target, &[], default_options()).unwrap();

    assert_eq!(outcome, RunOutcome::Relaunched);
    assert_eq!(privilege.relaunches.get(), 1);
    assert_eq!(store.writes.get(), 0);
    assert_eq!(*store.list.borrow(), vec!["/usr/bin".to_string()]);
}

#[test]
fn test_refuse_policy_reports_insufficient_privilege() {
    let temp_dir = create_test_dir();
    let store = FakeStore::with(&[]);
    let privilege = NeverElevated {
        relaunches: Cell::new(0),
    };
    let target = TargetDirectory::from_argument(temp_dir.path().to_path_buf());

    let err = run::execute(
        &privilege,
        &store,
        &target,
        &[],
        RunOptions {
            policy: ElevationPolicy::Refuse,
            dry_run: false,
        },
    )
    .unwrap_err();

    assert!(matches!(err, Error::InsufficientPrivilege));
    assert_eq!(privilege.relaunches.get(), 0);
    assert_eq!(store.writes.get(), 0);
}

#[test]
fn test_missing_directory_is_rejected_before_any_write() {
    let temp_dir = create_test_dir();
    let store = FakeStore::with(&["/usr/bin"]);
    let target = TargetDirectory::from_argument(temp_dir.path().join("gone"));

    let err = run::execute(&AlwaysElevated, &store, &target, &[], default_options()).unwrap_err();

    assert!(matches!(err, Error::TargetDoesNotExist(_)));
    assert_eq!(store.writes.get(), 0);
}

#[test]
fn test_duplicate_detection_is_case_insensitive() {
    let temp_dir = create_test_dir();
    let upper = temp_dir.path().to_string_lossy().to_uppercase();
    let store = FakeStore::with(&[upper.as_str()]);
    let target = TargetDirectory::from_argument(temp_dir.path().to_path_buf());

    let outcome = run::execute(&AlwaysElevated, &store, &target, &[], default_options()).unwrap();

    assert!(matches!(outcome, RunOutcome::AlreadyPresent { .. }));
    assert_eq!(store.writes.get(), 0);
}

#[cfg(unix)]
mod env_file {
    use super::*;
    use pathadd::store::EnvFileStore;
    use std::fs;

    #[test]
    fn test_add_through_env_file_store() {
        let temp_dir = create_test_dir();
        let env_file = temp_dir.path().join("environment");
        fs::write(&env_file, "LANG=C\nPATH=\"/usr/bin:/bin\"\n").unwrap();

        let store = EnvFileStore::new(env_file.clone());
        let target_dir = temp_dir.path().join("tool");
        fs::create_dir(&target_dir).unwrap();
        let target = TargetDirectory::from_argument(target_dir.clone());

        let outcome =
            run::execute(&AlwaysElevated, &store, &target, &[], default_options()).unwrap();
        assert!(matches!(outcome, RunOutcome::Added { .. }));

        let content = fs::read_to_string(&env_file).unwrap();
        assert!(content.contains("LANG=C"));
        assert!(content.contains(&format!(
            "PATH=\"/usr/bin:/bin:{}\"",
            target_dir.display()
        )));

        // Second run through the same store is a no-op.
        let second =
            run::execute(&AlwaysElevated, &store, &target, &[], default_options()).unwrap();
        assert!(matches!(second, RunOutcome::AlreadyPresent { .. }));
    }

    #[test]
    fn test_env_file_store_starts_empty_when_file_missing() {
        let temp_dir = create_test_dir();
        let store = EnvFileStore::new(temp_dir.path().join("environment"));
        assert!(store.read_system_path().unwrap().is_empty());
    }
}

#[test]
fn test_path_list_round_trip_preserves_order() {
    let parts = vec![
        "/usr/bin".to_string(),
        "/bin".to_string(),
        "/opt/tool/bin".to_string(),
    ];
    assert_eq!(path_list::split(&path_list::join(&parts)), parts);
}

#[test]
fn test_config_defaults_select_relaunch_policy() {
    let config = Config::default();
    assert!(config.elevation.auto_relaunch);
}

#[test]
fn test_output_mode_mapping() {
    assert_eq!(OutputMode::from_flags(true, 0), OutputMode::Quiet);
    assert_eq!(OutputMode::from_flags(false, 1), OutputMode::Verbose);
}

#[test]
fn test_cli_accepts_one_optional_directory() {
    use clap::Parser;
    use pathadd::cli::Cli;

    let cli = Cli::try_parse_from(["pathadd", "/opt/tool/bin"]).unwrap();
    assert_eq!(
        cli.directory,
        Some(std::path::PathBuf::from("/opt/tool/bin"))
    );

    let bare = Cli::try_parse_from(["pathadd"]).unwrap();
    assert!(bare.directory.is_none());

    // quiet and verbose are mutually exclusive
    assert!(Cli::try_parse_from(["pathadd", "-q", "-v"]).is_err());
}
