//! Mini-game scores and completion rewards
//!
//! Canvas games report a final score here. Scores are clamped to the game's
//! `max_score` and the reward settings cap, turned into XP and coins through
//! the [`RewardGrantor`], then kept in a short per-game history and a top-10
//! table.

mod catalog;

pub use catalog::{Difficulty, MINIGAMES, Minigame};

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::progression::{ProgressionError, RewardGrantor, RewardOutcome, ScoreRewards};
use crate::store::{self, SharedStore, StoreError, keys};
use crate::time_bucket::now_ms;

/// Recent scores kept per game
pub const SCORE_HISTORY_LIMIT: usize = 10;

/// Entries kept in each highscore table
pub const HIGHSCORE_LIMIT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum MinigameError {
    #[error("Mini-game not found: {0}")]
    UnknownGame(String),

    #[error(transparent)]
    Progression(#[from] ProgressionError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// One recorded score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub username: String,
    pub score: u32,
    pub timestamp: i64,
}

/// Result of submitting a score
#[derive(Debug, Clone)]
pub struct ScoreSubmission {
    /// Score after clamping
    pub score: u32,
    /// True if the score entered the highscore table
    pub is_highscore: bool,
    pub outcome: RewardOutcome,
}

#[derive(Clone)]
pub struct MinigameService {
    store: SharedStore,
    grantor: RewardGrantor,
    /// Serializes score history and highscore updates
    scores_lock: Arc<Mutex<()>>,
}

impl MinigameService {
    pub fn new(store: SharedStore, grantor: RewardGrantor) -> Self {
        Self {
            store,
            grantor,
            scores_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn games(&self) -> &'static [Minigame] {
        MINIGAMES
    }

    fn game(&self, game_id: &str) -> Result<&'static Minigame, MinigameError> {
        Minigame::find(game_id).ok_or_else(|| MinigameError::UnknownGame(game_id.to_string()))
    }

    /// Score as it is paid and recorded, capped by the game and the reward settings
    fn effective_score(&self, game: &Minigame, score: u32) -> u32 {
        self.grantor.clamp_score(score.min(game.max_score))
    }

    /// Grant the reward for a finished run, then record its score
    pub fn submit_score(&self, game_id: &str, score: u32) -> Result<ScoreSubmission, MinigameError> {
        let game = self.game(game_id)?;
        let score = self.effective_score(game, score);

        // A run that could not be rewarded leaves no score behind
        let outcome = self
            .grantor
            .reward_minigame_completion(game.id, score, game.base_xp, game.base_coins)?;

        let entry = ScoreEntry {
            username: outcome.profile.username.clone(),
            score,
            timestamp: now_ms(),
        };
        let is_highscore = {
            let _guard = self.scores_lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.push_score_history(game.id, entry.clone())?;
            self.push_highscore(game.id, entry)?
        };
        tracing::info!(game = game.id, score, is_highscore, "Mini-game completed");

        Ok(ScoreSubmission {
            score,
            is_highscore,
            outcome,
        })
    }

    fn push_score_history(&self, game_id: &str, entry: ScoreEntry) -> Result<(), StoreError> {
        let mut all = self.all_score_histories()?;
        let scores = all.entry(game_id.to_string()).or_default();
        scores.push(entry);
        if scores.len() > SCORE_HISTORY_LIMIT {
            let excess = scores.len() - SCORE_HISTORY_LIMIT;
            scores.drain(..excess);
        }
        store::write_json(self.store.as_ref(), keys::USER_SCORES, &all)
    }

    /// Insert into the highscore table, returning whether the entry was kept
    fn push_highscore(&self, game_id: &str, entry: ScoreEntry) -> Result<bool, StoreError> {
        let mut table = self.highscores(game_id, HIGHSCORE_LIMIT)?;
        // Ties lose against older entries
        let kept = table.len() < HIGHSCORE_LIMIT || table.last().is_some_and(|lowest| entry.score > lowest.score);
        table.push(entry);
        // Stable sort keeps earlier entries ahead on ties
        table.sort_by(|a, b| b.score.cmp(&a.score));
        table.truncate(HIGHSCORE_LIMIT);
        store::write_json(self.store.as_ref(), &keys::highscores(game_id), &table)?;
        Ok(kept)
    }

    /// Best scores for a game, highest first
    pub fn highscores(&self, game_id: &str, limit: usize) -> Result<Vec<ScoreEntry>, StoreError> {
        let mut table: Vec<ScoreEntry> =
            store::read_json(self.store.as_ref(), &keys::highscores(game_id))?.unwrap_or_default();
        table.truncate(limit);
        Ok(table)
    }

    fn all_score_histories(&self) -> Result<BTreeMap<String, Vec<ScoreEntry>>, StoreError> {
        Ok(store::read_json(self.store.as_ref(), keys::USER_SCORES)?.unwrap_or_default())
    }

    /// Recent scores for a game, oldest first
    pub fn score_history(&self, game_id: &str) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(self.all_score_histories()?.remove(game_id).unwrap_or_default())
    }

    /// Best recent score (0 if never played)
    pub fn best_score(&self, game_id: &str) -> Result<u32, StoreError> {
        Ok(self
            .score_history(game_id)?
            .iter()
            .map(|s| s.score)
            .max()
            .unwrap_or(0))
    }

    /// Rewards a score would earn, zero for unknown games
    pub fn projected_rewards(&self, game_id: &str, score: u32) -> ScoreRewards {
        match Minigame::find(game_id) {
            Some(game) => ScoreRewards::for_score(self.effective_score(game, score), game.base_xp, game.base_coins),
            None => ScoreRewards { xp: 0, coins: 0 },
        }
    }
}
