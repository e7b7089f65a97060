//! Machine-scope PATH storage.
//!
//! The machine PATH is the single piece of shared mutable OS state this tool
//! touches. It sits behind the `PathStore` trait so tests can substitute an
//! in-memory fake instead of real environment state. The write is one
//! non-transactional set operation; the OS offers no locking, so two racing
//! instances resolve last-writer-wins. That limitation is accepted, not
//! remediated.

use crate::config::Config;
use crate::error::Error;
use crate::path_list;

pub trait PathStore {
    /// Read the machine-scope PATH as an ordered entry list.
    ///
    /// An unset or empty store yields an empty list, not an error.
    fn read_system_path(&self) -> Result<Vec<String>, Error>;

    /// Serialize the list with the platform separator and write it back in a
    /// single operation. Must only be invoked after the privilege check; the
    /// access-denied mapping here is a second line of defense.
    fn write_system_path(&self, parts: &[String]) -> Result<(), Error>;
}

/// Build the OS-backed store for this platform.
pub fn system_store(config: &Config) -> Box<dyn PathStore> {
    #[cfg(windows)]
    {
        Box::new(RegistryPathStore::new(config.store.broadcast_change))
    }
    #[cfg(not(windows))]
    {
        match &config.store.env_file {
            Some(file) => Box::new(EnvFileStore::new(file.clone())),
            None => Box::new(EnvFileStore::system()),
        }
    }
}

#[cfg(windows)]
pub use registry_store::RegistryPathStore;

/// Registry-backed store: the `Path` value of the machine environment key.
#[cfg(windows)]
mod registry_store {
    use super::*;
    use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ, KEY_SET_VALUE, REG_EXPAND_SZ, REG_SZ};
    use winreg::{RegKey, RegValue};

    const SYSTEM_ENV_KEY: &str = r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment";

    pub struct RegistryPathStore {
        broadcast_change: bool,
    }

    impl RegistryPathStore {
        pub fn new(broadcast_change: bool) -> Self {
            Self { broadcast_change }
        }
    }

    impl PathStore for RegistryPathStore {
        fn read_system_path(&self) -> Result<Vec<String>, Error> {
            let key = RegKey::predef(HKEY_LOCAL_MACHINE)
                .open_subkey_with_flags(SYSTEM_ENV_KEY, KEY_READ)
                .map_err(|e| Error::Unknown(format!("cannot open environment key: {e}")))?;
            match key.get_raw_value("Path") {
                Ok(raw) => Ok(path_list::split(&decode_reg_string(&raw.bytes))),
                Err(_) => Ok(Vec::new()),
            }
        }

        fn write_system_path(&self, parts: &[String]) -> Result<(), Error> {
            let value = path_list::join(parts);
            let key = RegKey::predef(HKEY_LOCAL_MACHINE)
                .open_subkey_with_flags(SYSTEM_ENV_KEY, KEY_READ | KEY_SET_VALUE)
                .map_err(write_error)?;

            // Preserve the existing value type; a %VAR% token forces
            // REG_EXPAND_SZ so the shell keeps expanding it.
            let mut vtype = match key.get_raw_value("Path") {
                Ok(existing) if existing.vtype == REG_SZ => REG_SZ,
                _ => REG_EXPAND_SZ,
            };
            if has_env_token(&value) {
                vtype = REG_EXPAND_SZ;
            }

            let raw = RegValue {
                bytes: encode_reg_string(&value),
                vtype,
            };
            key.set_raw_value("Path", &raw).map_err(write_error)?;

            if self.broadcast_change {
                broadcast_env_change();
            }
            Ok(())
        }
    }

    fn write_error(e: std::io::Error) -> Error {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            Error::EnvironmentWriteFailed("access denied".to_string())
        } else {
            Error::EnvironmentWriteFailed(e.to_string())
        }
    }

    /// True when the value carries a `%VAR%` token.
    fn has_env_token(value: &str) -> bool {
        let mut rest = value;
        while let Some(start) = rest.find('%') {
            let tail = &rest[start + 1..];
            match tail.find('%') {
                Some(0) => rest = &tail[1..],
                Some(_) => return true,
                None => return false,
            }
        }
        false
    }

    fn decode_reg_string(bytes: &[u8]) -> String {
        if bytes.len() < 2 {
            return String::new();
        }
        let mut utf16 = Vec::with_capacity(bytes.len() / 2);
        for chunk in bytes.chunks_exact(2) {
            utf16.push(u16::from_le_bytes([chunk[0], chunk[1]]));
        }
        while utf16.last() == Some(&0) {
            utf16.pop();
        }
        String::from_utf16_lossy(&utf16)
    }

    fn encode_reg_string(value: &str) -> Vec<u8> {
        value
            .encode_utf16()
            .chain(Some(0))
            .flat_map(|u| u.to_le_bytes())
            .collect()
    }

    /// Tell running applications the environment changed so new shells pick
    /// up the fresh PATH without a reboot.
    fn broadcast_env_change() {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;
        use windows::Win32::Foundation::{LPARAM, WPARAM};
        use windows::Win32::UI::WindowsAndMessaging::{
            HWND_BROADCAST, SMTO_ABORTIFHUNG, SendMessageTimeoutW, WM_SETTINGCHANGE,
        };

        let env: Vec<u16> = OsStr::new("Environment")
            .encode_wide()
            .chain(Some(0))
            .collect();
        let mut result = 0usize;
        unsafe {
            let _ = SendMessageTimeoutW(
                HWND_BROADCAST,
                WM_SETTINGCHANGE,
                WPARAM(0),
                LPARAM(env.as_ptr() as isize),
                SMTO_ABORTIFHUNG,
                2000,
                Some(&mut result),
            );
        }
    }
}

#[cfg(not(windows))]
pub use env_file_store::EnvFileStore;

/// File-backed store: the `PATH=` line of `/etc/environment`, the machine
/// equivalent of the Windows environment key.
#[cfg(not(windows))]
mod env_file_store {
    use super::*;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::PathBuf;

    const DEFAULT_ENV_FILE: &str = "/etc/environment";

    pub struct EnvFileStore {
        file: PathBuf,
    }

    impl EnvFileStore {
        pub fn new(file: PathBuf) -> Self {
            Self { file }
        }

        pub fn system() -> Self {
            Self::new(PathBuf::from(DEFAULT_ENV_FILE))
        }
    }

    impl PathStore for EnvFileStore {
        fn read_system_path(&self) -> Result<Vec<String>, Error> {
            let content = match fs::read_to_string(&self.file) {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => {
                    return Err(Error::Unknown(format!(
                        "cannot read {}: {e}",
                        self.file.display()
                    )))
                }
            };

            Ok(content
                .lines()
                .find_map(parse_path_line)
                .map(|raw| path_list::split(&raw))
                .unwrap_or_default())
        }

        fn write_system_path(&self, parts: &[String]) -> Result<(), Error> {
            let new_line = format!("PATH=\"{}\"", path_list::join(parts));

            let existing = match fs::read_to_string(&self.file) {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
                Err(e) => return Err(write_error(e)),
            };

            // Rewrite only the PATH line; every other line survives verbatim.
            let mut lines: Vec<String> = existing.lines().map(ToOwned::to_owned).collect();
            let mut replaced = false;
            for line in lines.iter_mut() {
                if parse_path_line(line).is_some() {
                    *line = new_line.clone();
                    replaced = true;
                    break;
                }
            }
            if !replaced {
                lines.push(new_line);
            }

            let mut content = lines.join("\n");
            content.push('\n');
            fs::write(&self.file, content).map_err(write_error)
        }
    }

    fn write_error(e: std::io::Error) -> Error {
        if e.kind() == ErrorKind::PermissionDenied {
            Error::EnvironmentWriteFailed("access denied (are you root?)".to_string())
        } else {
            Error::EnvironmentWriteFailed(e.to_string())
        }
    }

    /// Extract the raw PATH value from a `PATH=` line, unquoting if needed.
    fn parse_path_line(line: &str) -> Option<String> {
        let rest = line.trim_start().strip_prefix("PATH=")?;
        Some(rest.trim().trim_matches('"').to_string())
    }

}
