use std::collections::HashMap;

/// Persistent record of the best score reached per game.
pub trait ScoreStore {
    /// Best score recorded for `game`, if any.
    fn best(&self, game: &str) -> Option<u64>;

    /// Stores `score` as the best score for `game`.
    fn record(&mut self, game: &str, score: u64);
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn best(&self, game: &str) -> Option<u64> {
        (**self).best(game)
    }

    fn record(&mut self, game: &str, score: u64) {
        (**self).record(game, score);
    }
}

/// Score store that lives only as long as the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryScoreStore {
    scores: HashMap<String, u64>,
}

impl MemoryScoreStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn best(&self, game: &str) -> Option<u64> {
        self.scores.get(game).copied()
    }

    fn record(&mut self, game: &str, score: u64) {
        let _ = self.scores.insert(game.to_owned(), score);
    }
}
