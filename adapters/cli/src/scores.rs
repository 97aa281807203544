//! Best-score store persisted as a TOML table.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::warn;
use quiz_defence_simulation::ScoreStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct ScoreFile {
    #[serde(default)]
    best: BTreeMap<String, u64>,
}

/// Score store backed by a TOML file that is rewritten on every record.
#[derive(Debug)]
pub(crate) struct FileScoreStore {
    path: PathBuf,
    contents: ScoreFile,
}

impl FileScoreStore {
    /// Opens the store at `path`; a missing file starts out empty.
    pub(crate) fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let contents = match fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text)
                .with_context(|| format!("failed to parse score file at {}", path.display()))?,
            Err(error) if error.kind() == ErrorKind::NotFound => ScoreFile::default(),
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to read score file at {}", path.display()))
            }
        };
        Ok(Self { path, contents })
    }

    fn save(&self) -> Result<()> {
        let text = toml::to_string(&self.contents).context("failed to encode scores as toml")?;
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write score file at {}", self.path.display()))
    }
}

impl ScoreStore for FileScoreStore {
    fn best(&self, game: &str) -> Option<u64> {
        self.contents.best.get(game).copied()
    }

    fn record(&mut self, game: &str, score: u64) {
        let _ = self.contents.best.insert(game.to_owned(), score);
        if let Err(error) = self.save() {
            warn!("best score {score} kept in memory only: {error:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("quiz-defence-{name}-{}.toml", std::process::id()))
    }

    #[test]
    fn missing_file_is_empty() {
        let store = FileScoreStore::open(scratch_path("missing")).expect("open");
        assert_eq!(store.best("quiz-defence"), None);
    }

    #[test]
    fn recorded_scores_survive_reopening() {
        let path = scratch_path("persist");
        let mut store = FileScoreStore::open(&path).expect("open");
        store.record("quiz-defence", 340);

        let reopened = FileScoreStore::open(&path).expect("reopen");
        assert_eq!(reopened.best("quiz-defence"), Some(340));
        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn malformed_file_is_reported() {
        let path = scratch_path("malformed");
        fs::write(&path, "best = 12").expect("write");

        let error = FileScoreStore::open(&path).unwrap_err();
        assert!(format!("{error:#}").contains("failed to parse score file"));
        fs::remove_file(path).expect("cleanup");
    }
}
