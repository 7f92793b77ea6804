use crate::config::Config;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PRAYER_DIR: &str = ".prayer";
pub const CONFIG_FILE: &str = ".prayer/config.yaml";

pub const DEFAULT_DATA_FILE: &str = "prayer_list_data.json";
pub const DEFAULT_STATUS_FILE: &str = "bot_status.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn prayer_dir(root: &Path) -> PathBuf {
    root.join(PRAYER_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Canonical backend file. Absolute `data_file` values are used as-is.
pub fn data_path(root: &Path, config: &Config) -> PathBuf {
    resolve(root, &config.data_file)
}

pub fn status_path(root: &Path, config: &Config) -> PathBuf {
    resolve(root, &config.status_file)
}

/// Resolve a config-relative path against the project root.
pub fn resolve(root: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        let config = Config::default();
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/proj/.prayer/config.yaml")
        );
        assert_eq!(
            data_path(root, &config),
            PathBuf::from("/tmp/proj/prayer_list_data.json")
        );
        assert_eq!(
            status_path(root, &config),
            PathBuf::from("/tmp/proj/bot_status.json")
        );
    }

    #[test]
    fn absolute_paths_are_kept() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            resolve(root, Path::new("/var/data/list.json")),
            PathBuf::from("/var/data/list.json")
        );
    }
}
