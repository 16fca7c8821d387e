//! Daemon configuration read from the environment at startup.

use anyhow::{anyhow, Context};
use std::path::PathBuf;

use crate::aggregate::LOW_ATTENDANCE_THRESHOLD;
use crate::recognizer::CommandRecognizer;

pub const ENV_RECOGNIZER: &str = "ATTENDANCED_RECOGNIZER";
pub const ENV_RECOGNIZER_ARGS: &str = "ATTENDANCED_RECOGNIZER_ARGS";
pub const ENV_LOW_THRESHOLD: &str = "ATTENDANCED_LOW_THRESHOLD";
pub const ENV_WORKSPACE: &str = "ATTENDANCED_WORKSPACE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    pub recognizer: Option<PathBuf>,
    pub recognizer_args: Vec<String>,
    pub low_threshold: u32,
    pub workspace: Option<PathBuf>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            recognizer: None,
            recognizer_args: Vec::new(),
            low_threshold: LOW_ATTENDANCE_THRESHOLD,
            workspace: None,
        }
    }
}

impl DaemonConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DaemonConfig::from_env`] with an injectable source, so tests never touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let low_threshold = match non_empty(ENV_LOW_THRESHOLD) {
            Some(raw) => {
                let v: u32 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be an integer, got {:?}", ENV_LOW_THRESHOLD, raw))?;
                if v > 100 {
                    return Err(anyhow!("{} must be between 0 and 100, got {}", ENV_LOW_THRESHOLD, v));
                }
                v
            }
            None => LOW_ATTENDANCE_THRESHOLD,
        };

        Ok(Self {
            recognizer: non_empty(ENV_RECOGNIZER).map(PathBuf::from),
            recognizer_args: non_empty(ENV_RECOGNIZER_ARGS)
                .map(|raw| raw.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            low_threshold,
            workspace: non_empty(ENV_WORKSPACE).map(PathBuf::from),
        })
    }

    pub fn recognizer(&self) -> Option<CommandRecognizer> {
        self.recognizer
            .as_ref()
            .map(|p| CommandRecognizer::new(p.clone(), self.recognizer_args.clone()))
    }
}
