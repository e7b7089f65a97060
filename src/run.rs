//! Single-run orchestration.
//!
//! One invocation walks: check privilege -> (relaunch | refuse) or
//! resolve target -> decide -> (already present | append + persist).
//! The privilege state is queried once per run and never cached across runs.

use crate::elevation::Privilege;
use crate::error::Error;
use crate::mutate::{self, MutationOutcome, TargetDirectory};
use crate::store::PathStore;

/// How a missing-privilege precondition is handled. Selected once per run
/// from config and applied at the single precondition site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationPolicy {
    /// Relaunch the executable with an elevation prompt and exit.
    Relaunch,
    /// Refuse and tell the user to rerun as administrator.
    Refuse,
}

/// Terminal states of a successful run. Failure terminals are the error
/// taxonomy variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// An elevated instance was spawned; this process has nothing left to do.
    Relaunched,
    /// The directory was already on the machine PATH; nothing was written.
    AlreadyPresent { directory: String },
    /// The directory was appended; carries the persisted list.
    Added { directory: String, list: Vec<String> },
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub policy: ElevationPolicy,
    /// Decide and report without writing or elevating.
    pub dry_run: bool,
}

/// Execute one add-to-PATH run against the given capabilities.
///
/// `args` are the original command-line arguments, forwarded verbatim to an
/// elevated relaunch so the child repeats the same request.
pub fn execute(
    privilege: &dyn Privilege,
    store: &dyn PathStore,
    target: &TargetDirectory,
    args: &[String],
    options: RunOptions,
) -> Result<RunOutcome, Error> {
    if !options.dry_run && !privilege.is_elevated() {
        return match options.policy {
            ElevationPolicy::Relaunch => {
                privilege.relaunch_elevated(args)?;
                Ok(RunOutcome::Relaunched)
            }
            ElevationPolicy::Refuse => Err(Error::InsufficientPrivilege),
        };
    }

    let list = store.read_system_path()?;
    match mutate::add(&list, target) {
        MutationOutcome::Rejected(_) => {
            Err(Error::TargetDoesNotExist(target.path().to_path_buf()))
        }
        MutationOutcome::AlreadyPresent => Ok(RunOutcome::AlreadyPresent {
            directory: target.display_string(),
        }),
        MutationOutcome::Added(updated) => {
            if !options.dry_run {
                store.write_system_path(&updated)?;
            }
            Ok(RunOutcome::Added {
                directory: target.display_string(),
                list: updated,
            })
        }
    }
}
