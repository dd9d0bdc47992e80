//! Where Crossover keeps its files when the config does not say.
//!
//! Both roots come from `dirs` and end in a `Crossover` folder, so on Linux
//! state lands in `~/.local/share/Crossover` and the config file in
//! `~/.config/Crossover`.

use std::path::PathBuf;

use crate::constants::APP_NAME;
use crate::error::{XoError, XoResult};

/// Root for persisted bot state and log files.
pub fn data_dir() -> XoResult<PathBuf> {
    dirs::data_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or_else(|| XoError::Config("could not determine data directory".into()))
}

/// Root for `config.toml`.
pub fn config_dir() -> XoResult<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or_else(|| XoError::Config("could not determine config directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_are_app_scoped() {
        if let Ok(dir) = data_dir() {
            assert!(dir.ends_with(APP_NAME));
        }
        if let Ok(dir) = config_dir() {
            assert!(dir.ends_with(APP_NAME));
        }
    }
}
