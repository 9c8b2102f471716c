// src/instance.rs

//! Detecting and signalling another running idlemon.
//!
//! An instance is any process of the current user whose executable is the
//! same file (same inode) as ours.

use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use tracing::debug;

use crate::errors::{IdlemonError, Result};

/// Request sent to a running instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceSignal {
    /// Reset its ping timer (SIGUSR1).
    Ping,
    /// Reload its config (SIGUSR2).
    Reload,
}

impl InstanceSignal {
    fn signum(self) -> libc::c_int {
        match self {
            InstanceSignal::Ping => libc::SIGUSR1,
            InstanceSignal::Reload => libc::SIGUSR2,
        }
    }
}

/// Find another running instance, if any.
pub fn find_active_instance() -> Result<Option<u32>> {
    find_instance_in(Path::new("/proc"), std::process::id())
}

/// Scan a procfs-style directory for a process, other than `own_pid`, owned
/// by the same user and running the same executable as `own_pid`.
pub fn find_instance_in(proc_root: &Path, own_pid: u32) -> Result<Option<u32>> {
    let own_dir = proc_root.join(own_pid.to_string());
    let uid = fs::metadata(&own_dir)?.uid();
    let exe_inode = fs::metadata(own_dir.join("exe"))?.ino();

    for entry in fs::read_dir(proc_root)? {
        let entry = entry?;
        let Some(pid) = entry
            .file_name()
            .to_str()
            .and_then(|name| name.parse::<u32>().ok())
        else {
            continue;
        };
        if pid == own_pid {
            continue;
        }

        let path = entry.path();
        match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() && meta.uid() == uid => {}
            _ => continue,
        }

        // Processes may exit mid-scan, and other users' exe links are
        // unreadable; both are simply skipped.
        let Ok(exe) = fs::metadata(path.join("exe")) else {
            continue;
        };
        if exe.ino() == exe_inode {
            debug!(pid, "found active instance");
            return Ok(Some(pid));
        }
    }

    Ok(None)
}

/// Send `sig` to the instance `pid`.
pub fn signal_instance(pid: u32, sig: InstanceSignal) -> Result<()> {
    let pid = libc::pid_t::try_from(pid)
        .map_err(|_| IdlemonError::Io(io::Error::other(format!("pid {pid} out of range"))))?;

    // SAFETY: kill(2) has no memory-safety preconditions.
    let rc = unsafe { libc::kill(pid, sig.signum()) };
    if rc == -1 {
        return Err(IdlemonError::Io(io::Error::last_os_error()));
    }
    Ok(())
}
