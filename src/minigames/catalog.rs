//! Mini-game definitions

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        })
    }
}

/// A mini-game and its reward tuning
#[derive(Debug, Clone)]
pub struct Minigame {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub base_xp: u64,
    pub base_coins: u64,
    /// Scores above this are clamped before rewards are computed
    pub max_score: u32,
    pub time_limit_secs: Option<u32>,
}

impl Minigame {
    pub fn find(id: &str) -> Option<&'static Minigame> {
        MINIGAMES.iter().find(|g| g.id == id)
    }
}

pub static MINIGAMES: &[Minigame] = &[
    Minigame {
        id: "zucaritas",
        name: "Tony the Tiger's Challenge",
        description: "Test your strength catching cereal in the bowl",
        difficulty: Difficulty::Medium,
        base_xp: 40,
        base_coins: 15,
        max_score: 1000,
        time_limit_secs: None,
    },
    Minigame {
        id: "choco-krispis",
        name: "Adventure with Melvin",
        description: "Collect balls and dodge obstacles",
        difficulty: Difficulty::Easy,
        base_xp: 60,
        base_coins: 8,
        max_score: 1000,
        time_limit_secs: Some(60),
    },
    Minigame {
        id: "froot-loops",
        name: "Sam the Toucan's Flight",
        description: "Help Sam fly and collect colorful rings",
        difficulty: Difficulty::Hard,
        base_xp: 50,
        base_coins: 12,
        max_score: 1000,
        time_limit_secs: None,
    },
];
