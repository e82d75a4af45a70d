//! Default log file locations.
//!
//! The game client writes its log to a platform-specific path. These are
//! probed in order when the operator does not pass an explicit path.

use std::path::PathBuf;

/// Candidate log locations for this platform, most likely first.
#[must_use]
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(home) = home_dir() {
        if cfg!(target_os = "windows") {
            candidates.push(
                home.join("AppData")
                    .join("LocalLow")
                    .join("Wizards Of The Coast")
                    .join("MTGA")
                    .join("Player.log"),
            );
        } else if cfg!(target_os = "macos") {
            candidates.push(
                home.join("Library")
                    .join("Logs")
                    .join("Wizards Of The Coast")
                    .join("MTGA")
                    .join("Player.log"),
            );
        } else {
            // Wine/Proton prefixes on Linux
            candidates.push(
                home.join(".steam/steam/steamapps/compatdata/2141910/pfx/drive_c/users/steamuser")
                    .join("AppData/LocalLow/Wizards Of The Coast/MTGA/Player.log"),
            );
            candidates.push(
                home.join(".wine/drive_c/users")
                    .join(whoami())
                    .join("AppData/LocalLow/Wizards Of The Coast/MTGA/Player.log"),
            );
        }
    }
    candidates
}

/// First candidate that exists on disk.
#[must_use]
pub fn default_log_path() -> Option<PathBuf> {
    candidate_paths().into_iter().find(|p| p.exists())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os(if cfg!(target_os = "windows") {
        "USERPROFILE"
    } else {
        "HOME"
    })
    .map(PathBuf::from)
}

fn whoami() -> String {
    std::env::var("USER").unwrap_or_else(|_| "user".to_string())
}
