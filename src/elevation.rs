//! Privilege detection and elevated relaunch.
//!
//! Both capabilities sit behind the `Privilege` trait so non-interactive
//! test environments can substitute a trivial always-elevated fake.

use crate::error::Error;

pub trait Privilege {
    /// True when the current process already holds administrative rights.
    fn is_elevated(&self) -> bool;

    /// Relaunch the current executable with an elevation request, forwarding
    /// `args`. Does not wait for the child; the caller reports and exits.
    fn relaunch_elevated(&self, args: &[String]) -> Result<(), Error>;
}

/// OS-backed capabilities.
pub struct OsPrivilege;

impl Privilege for OsPrivilege {
    fn is_elevated(&self) -> bool {
        is_elevated()
    }

    fn relaunch_elevated(&self, args: &[String]) -> Result<(), Error> {
        relaunch_elevated(args)
    }
}

/// Check if the current process is running with administrator privileges.
///
/// Never panics; any failure to query the OS counts as not elevated, so a
/// doomed machine-scope write is refused up front instead of failing with a
/// confusing low-level error.
pub fn is_elevated() -> bool {
    #[cfg(windows)]
    {
        use windows::Win32::UI::Shell::IsUserAnAdmin;
        unsafe { IsUserAnAdmin().as_bool() }
    }
    #[cfg(not(windows))]
    {
        // Try to open a file only root can read. A simple heuristic - not
        // 100% accurate but good enough for a short-lived CLI.
        std::fs::File::open("/etc/shadow").is_ok()
    }
}

/// Spawn an elevated instance of the current executable.
///
/// Spawns exactly one child per call and never recurses: the elevated child
/// observes `is_elevated() == true` on its own check and proceeds straight
/// to the mutation.
#[cfg(windows)]
pub fn relaunch_elevated(args: &[String]) -> Result<(), Error> {
    use windows::core::PCWSTR;
    use windows::Win32::UI::Shell::ShellExecuteW;
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOW;

    let exe = std::env::current_exe()
        .map_err(|_| Error::ElevationFailed("cannot determine executable path".to_string()))?;

    // Arguments are re-parsed by the shell on the far side; quote anything
    // that would split.
    let joined = args
        .iter()
        .map(|a| quote_arg(a))
        .collect::<Vec<_>>()
        .join(" ");

    let verb = to_wide("runas");
    let exe_w = to_wide(&exe.to_string_lossy());
    let args_w = to_wide(&joined);

    let result = unsafe {
        ShellExecuteW(
            None,
            PCWSTR(verb.as_ptr()),
            PCWSTR(exe_w.as_ptr()),
            if joined.is_empty() {
                PCWSTR::null()
            } else {
                PCWSTR(args_w.as_ptr())
            },
            PCWSTR::null(),
            SW_SHOW,
        )
    };

    // Values <= 32 are ShellExecute error codes; this includes the user
    // declining the consent prompt.
    if result.0 as isize <= 32 {
        Err(Error::ElevationFailed(format!(
            "ShellExecuteW failed with code {}",
            result.0 as isize
        )))
    } else {
        Ok(())
    }
}

/// Spawn an elevated instance of the current executable through pkexec.
#[cfg(not(windows))]
pub fn relaunch_elevated(args: &[String]) -> Result<(), Error> {
    use std::process::Command;

    let exe = std::env::current_exe()
        .map_err(|_| Error::ElevationFailed("cannot determine executable path".to_string()))?;
    let pkexec = which::which("pkexec")
        .map_err(|_| Error::ElevationFailed("pkexec not found in PATH".to_string()))?;

    // pkexec receives the argument vector directly; no shell re-parsing, so
    // no quoting needed.
    Command::new(pkexec)
        .arg(exe)
        .args(args)
        .spawn()
        .map(|_| ())
        .map_err(|e| Error::ElevationFailed(e.to_string()))
}

#[cfg(windows)]
fn quote_arg(arg: &str) -> String {
    if arg.contains(' ') || arg.contains('"') {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

#[cfg(windows)]
fn to_wide(s: &str) -> Vec<u16> {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    OsStr::new(s).encode_wide().chain(Some(0)).collect()
}
