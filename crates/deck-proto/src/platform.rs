//! Where chdeck keeps its files, and how it finds helper binaries.
//!
//! `CHDECK_HOME` overrides both directories (config in the root, data in
//! `data/`).  On Windows a `config.toml` beside the executable makes the
//! install portable in the same layout.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "chdeck";
const HOME_ENV: &str = "CHDECK_HOME";
const MPV_ENV: &str = "CHDECK_MPV";

/// Root of a self-contained install, if one is in effect.
fn portable_root() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Some(PathBuf::from(home));
    }
    if cfg!(windows) {
        let dir = exe_dir()?;
        if dir.join("config.toml").exists() {
            return Some(dir);
        }
    }
    None
}

pub fn config_dir() -> PathBuf {
    if let Some(root) = portable_root() {
        return root;
    }
    if cfg!(windows) {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    } else {
        // ~/.config on macOS too, so dotfiles stay in one place.
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR)
    }
}

/// Channel map and log file live here.
pub fn data_dir() -> PathBuf {
    if let Some(root) = portable_root() {
        return root.join("data");
    }
    if cfg!(windows) {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join(APP_DIR)
    }
}

pub fn log_file() -> PathBuf {
    data_dir().join("chdeck.log")
}

fn exe_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

fn first_existing(dirs: impl IntoIterator<Item = PathBuf>, names: &[&str]) -> Option<PathBuf> {
    dirs.into_iter()
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|p| p.is_file())
}

/// Look a helper binary up: `env_var` first, then beside the executable
/// (or in its `external/` folder), then `PATH`.
fn find_binary(env_var: &str, names: &[&str]) -> Option<PathBuf> {
    if let Some(p) = std::env::var_os(env_var).map(PathBuf::from) {
        if p.is_file() {
            return Some(p);
        }
        tracing::warn!("{} points at {}, which does not exist", env_var, p.display());
    }
    let bundled = exe_dir()
        .map(|dir| vec![dir.join("external"), dir])
        .unwrap_or_default();
    first_existing(bundled, names).or_else(|| {
        let path = std::env::var_os("PATH")?;
        first_existing(std::env::split_paths(&path), names)
    })
}

/// mpv plays the hover and click cues.
pub fn find_mpv_binary() -> Option<PathBuf> {
    let names: &[&str] = if cfg!(windows) {
        &["mpv.exe", "mpv.com"]
    } else {
        &["mpv"]
    };
    find_binary(MPV_ENV, names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_lives_in_data_dir() {
        assert_eq!(log_file().parent(), Some(data_dir().as_path()));
    }

    #[test]
    fn test_first_existing_prefers_earlier_dirs() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        std::fs::write(b.path().join("mpv"), "").unwrap();
        let found = first_existing(
            vec![a.path().to_path_buf(), b.path().to_path_buf()],
            &["mpv"],
        );
        assert_eq!(found, Some(b.path().join("mpv")));

        std::fs::write(a.path().join("mpv"), "").unwrap();
        let found = first_existing(
            vec![a.path().to_path_buf(), b.path().to_path_buf()],
            &["mpv"],
        );
        assert_eq!(found, Some(a.path().join("mpv")));
    }

    #[test]
    fn test_directories_ignore_missing_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("mpv")).unwrap();
        assert_eq!(first_existing(vec![dir.path().to_path_buf()], &["mpv"]), None);
    }
}
