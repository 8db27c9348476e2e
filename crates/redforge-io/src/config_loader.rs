// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Locates and parses the user configuration file.

use redforge_core::config::{UserConfig, UserConfigData, CONFIG_FILENAME};
use redforge_core::ConfigError;
use std::path::{Path, PathBuf};

/// Loads the user configuration.
///
/// An explicit path must exist. Otherwise the nearest `.xf.yaml` in the
/// current directory or one of its ancestors is used, then the one in the
/// home directory; when neither exists an empty configuration is returned.
pub fn load_user_config(explicit: Option<&Path>) -> Result<UserConfig, ConfigError> {
    let cwd = std::env::current_dir().ok();
    let home = dirs::home_dir();
    load_user_config_from(explicit, cwd.as_deref(), home.as_deref())
}

/// [`load_user_config`] with the search roots supplied by the caller.
pub fn load_user_config_from(
    explicit: Option<&Path>,
    cwd: Option<&Path>,
    home: Option<&Path>,
) -> Result<UserConfig, ConfigError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        return parse_file(path);
    }

    let found = cwd
        .and_then(find_config_file)
        .or_else(|| home.map(|h| h.join(CONFIG_FILENAME)).filter(|p| p.is_file()));
    match found {
        Some(path) => parse_file(&path),
        None => {
            log::debug!("No {CONFIG_FILENAME} found, using an empty configuration");
            Ok(UserConfig::default())
        }
    }
}

/// Returns the nearest configuration file in `start` or its ancestors.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

fn parse_file(path: &Path) -> Result<UserConfig, ConfigError> {
    log::debug!("Loading user config from {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;
    if text.trim().is_empty() {
        return Ok(UserConfig::default());
    }
    let data: UserConfigData = serde_yaml::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;
    Ok(UserConfig::new(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn nearest_ancestor_wins_over_home() {
        let root = tempfile::tempdir().unwrap();
        let home = root.path().join("home");
        let work = root.path().join("work").join("deep").join("er");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&work).unwrap();
        fs::write(home.join(CONFIG_FILENAME), "modderName: home\n").unwrap();
        fs::write(root.path().join("work").join(CONFIG_FILENAME), "modderName: work\n").unwrap();

        let config = load_user_config_from(None, Some(&work), Some(&home)).unwrap();
        assert_eq!(config.modder_name(), Some("work"));
    }

    #[test]
    fn falls_back_to_home_then_to_empty() {
        let root = tempfile::tempdir().unwrap();
        let home = root.path().join("home");
        fs::create_dir_all(&home).unwrap();

        let empty = load_user_config_from(None, None, Some(&home)).unwrap();
        assert_eq!(empty.modder_name(), None);

        fs::write(home.join(CONFIG_FILENAME), "modderName: home\n").unwrap();
        let config = load_user_config_from(None, None, Some(&home)).unwrap();
        assert_eq!(config.modder_name(), Some("home"));
    }

    #[test]
    fn explicit_path_must_exist_and_parse() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("nope.yaml");
        assert_eq!(
            load_user_config_from(Some(&missing), None, None).unwrap_err(),
            ConfigError::NotFound(missing)
        );

        let broken = root.path().join("broken.yaml");
        fs::write(&broken, "projects: [unclosed").unwrap();
        assert!(matches!(
            load_user_config_from(Some(&broken), None, None),
            Err(ConfigError::Parse { .. })
        ));
    }
}
