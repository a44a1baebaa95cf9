//! Local top-ten leaderboard stored as JSON.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use raycast_arena_core::SessionSummary;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of entries kept.
pub(crate) const CAPACITY: usize = 10;
/// Longest stored name, in characters.
pub(crate) const MAX_NAME_CHARS: usize = 10;
/// Name recorded when the player did not provide one.
pub(crate) const DEFAULT_NAME: &str = "Anonymous";

/// Errors raised while reading or writing the leaderboard file.
#[derive(Debug, Error)]
pub(crate) enum LeaderboardError {
    /// The file exists but could not be read.
    #[error("failed to read leaderboard {path}: {source}")]
    Read {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The file could not be written.
    #[error("failed to write leaderboard {path}: {source}")]
    Write {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The file does not contain a leaderboard.
    #[error("leaderboard {path} is malformed: {source}")]
    Malformed {
        /// Offending path.
        path: PathBuf,
        /// Underlying JSON failure.
        source: serde_json::Error,
    },
}

/// One recorded session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Entry {
    pub(crate) name: String,
    pub(crate) score: u64,
    pub(crate) waves_survived: u32,
    pub(crate) kills: u32,
    pub(crate) accuracy_percent: f32,
}

impl Entry {
    fn new(name: &str, summary: &SessionSummary) -> Self {
        Self {
            name: normalise_name(name),
            score: summary.score,
            waves_survived: summary.waves_survived,
            kills: summary.kills,
            accuracy_percent: summary.accuracy_percent,
        }
    }
}

/// Best sessions, highest score first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Leaderboard {
    entries: Vec<Entry>,
}

impl Leaderboard {
    /// Reads the leaderboard at `path`; a missing file is an empty leaderboard.
    pub(crate) fn load(path: &Path) -> Result<Self, LeaderboardError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(LeaderboardError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut leaderboard: Self =
            serde_json::from_str(&contents).map_err(|source| LeaderboardError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        leaderboard.normalise();
        Ok(leaderboard)
    }

    /// Writes the leaderboard to `path` as pretty-printed JSON.
    pub(crate) fn save(&self, path: &Path) -> Result<(), LeaderboardError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|source| LeaderboardError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        fs::write(path, json).map_err(|source| LeaderboardError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Records a finished session and returns its zero-based rank if it made the cut.
    pub(crate) fn record(&mut self, name: &str, summary: &SessionSummary) -> Option<usize> {
        let entry = Entry::new(name, summary);
        // Ties keep earlier sessions ahead.
        let rank = self
            .entries
            .iter()
            .position(|existing| existing.score < entry.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(rank, entry);
        self.entries.truncate(CAPACITY);
        (rank < CAPACITY).then_some(rank)
    }

    /// Recorded entries, highest score first.
    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn normalise(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(CAPACITY);
    }
}

fn normalise_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return DEFAULT_NAME.to_owned();
    }
    trimmed.chars().take(MAX_NAME_CHARS).collect()
}
