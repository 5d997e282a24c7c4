use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedGame {
    pub appid: u32,
    #[serde(default)]
    pub name: String,
    /// Total playtime in minutes, as reported by Steam.
    #[serde(default)]
    pub playtime_forever: u32,
    #[serde(default)]
    pub img_icon_url: String,
    #[serde(default)]
    pub img_logo_url: String,
    /// Derived from the appid via the Steam CDN header template; not part of
    /// the upstream payload.
    #[serde(default)]
    pub header_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_achievements: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_achievements: Option<usize>,
    /// True when either per-game achievement lookup fell back to an empty
    /// result after an upstream failure, so 0/0 counts may not be real zeros.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats_degraded: Option<bool>,
}

/// On-disk owned-games cache. Whole-file replace on every write; a read value
/// is usable only while `now - timestamp` is under the 24h window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameCache {
    /// Epoch milliseconds at write time.
    pub timestamp: i64,
    pub games: Vec<OwnedGame>,
}
