use serde::{Deserialize, Serialize};

/// One achievement definition from a game's schema, independent of any
/// player's progress. Hidden achievements omit description and icons upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementSchemaEntry {
    pub name: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub icongray: String,
}

/// A player-status entry that passed the `achieved == 1` filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub apiname: String,
    /// Epoch seconds; Steam reports 0 for some legacy unlocks.
    #[serde(default)]
    pub unlocktime: i64,
}

/// Schema entry merged with the player's unlock status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedAchievement {
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub description: String,
    pub icon: String,
    pub icongray: String,
    pub achieved: bool,
    pub unlocktime: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalAchievementPercentage {
    pub name: String,
    pub percent: f64,
}

/// A user-favorited achievement kept on disk for quick access.
/// Unique per (appid, name) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinnedAchievement {
    pub name: String,
    pub appid: u32,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "gameName", default)]
    pub game_name: String,
}

/// Result of a secondary (per-game) endpoint that degrades instead of
/// erroring. `degraded` distinguishes "empty because the game has no such
/// data" from "empty because upstream failed".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftList<T> {
    pub items: Vec<T>,
    pub degraded: bool,
}

impl<T> SoftList<T> {
    pub fn ok(items: Vec<T>) -> Self {
        Self {
            items,
            degraded: false,
        }
    }

    pub fn degraded() -> Self {
        Self {
            items: Vec::new(),
            degraded: true,
        }
    }
}
