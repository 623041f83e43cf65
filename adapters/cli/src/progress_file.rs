use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use crown_arena_core::PlayerProgress;

/// JSON file holding the player's progress between matches.
#[derive(Clone, Debug)]
pub(crate) struct ProgressFile {
    path: PathBuf,
}

impl ProgressFile {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored progress; a missing file yields fresh progress.
    pub(crate) fn load(&self) -> Result<PlayerProgress> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(PlayerProgress::default())
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to read {}", self.path.display()))
            }
        };
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse progress file {}", self.path.display()))
    }

    pub(crate) fn save(&self, progress: &PlayerProgress) -> Result<()> {
        let json = serde_json::to_string_pretty(progress).context("failed to encode progress")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

/// Match reward waiting to be credited.
#[derive(Debug, Default)]
pub(crate) struct PendingReward(Option<u64>);

impl PendingReward {
    /// Records the reward announced by the match; later announcements are
    /// ignored.
    pub(crate) fn record(&mut self, reward: u64) {
        if self.0.is_none() {
            self.0 = Some(reward);
        }
    }

    /// Moves the reward into `progress`, returning the credited amount.
    pub(crate) fn credit(&mut self, progress: &mut PlayerProgress) -> Option<u64> {
        let reward = self.0.take()?;
        progress.credit(reward);
        Some(reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crown_arena_core::{CardId, Level};

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("crown-arena-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn missing_files_start_fresh() {
        let file = ProgressFile::new(scratch_path("missing"));
        let _ = fs::remove_file(file.path());
        assert_eq!(file.load().expect("fresh progress"), PlayerProgress::default());
    }

    #[test]
    fn saved_progress_loads_back() {
        let file = ProgressFile::new(scratch_path("saved"));
        let mut progress = PlayerProgress::default();
        progress.credit(450);
        let _ = progress
            .card_levels
            .insert(CardId::Knight, Level::new(12).expect("valid level"));

        file.save(&progress).expect("writable temp dir");
        assert_eq!(file.load().expect("readable"), progress);
        fs::remove_file(file.path()).expect("file exists");
    }

    #[test]
    fn rewards_are_credited_once() {
        let mut pending = PendingReward::default();
        pending.record(200);
        pending.record(50);
        let mut progress = PlayerProgress::default();

        assert_eq!(pending.credit(&mut progress), Some(200));
        assert_eq!(pending.credit(&mut progress), None);
        assert_eq!(progress.currency, 200);
    }
}
