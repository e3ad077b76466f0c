//! JSON file persistence for strategy state.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::error::TrendgateError;
use crate::domain::state::StrategyState;
use crate::ports::state_port::StatePort;

pub struct JsonStateAdapter {
    path: PathBuf,
}

impl JsonStateAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatePort for JsonStateAdapter {
    /// Missing file means first run; an undecodable file is reported as
    /// a warning and also treated as first run. Neither is fatal.
    fn load(&self) -> Result<StrategyState, TrendgateError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StrategyState::default()),
            Err(e) => {
                return Err(TrendgateError::State {
                    reason: format!("failed to read {}: {}", self.path.display(), e),
                });
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => Ok(state),
            Err(e) => {
                eprintln!(
                    "warning: state file {} is unreadable ({}); starting from a clean slate",
                    self.path.display(),
                    e
                );
                Ok(StrategyState::default())
            }
        }
    }

    /// Write to a sibling temp file and rename over the target, so a
    /// failed write leaves the previous record intact.
    fn save(&self, state: &StrategyState) -> Result<(), TrendgateError> {
        let json = serde_json::to_string_pretty(state).map_err(|e| TrendgateError::State {
            reason: format!("failed to encode state: {e}"),
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
