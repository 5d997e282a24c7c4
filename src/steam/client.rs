use crate::models::achievement::{
    AchievementSchemaEntry, DetailedAchievement, GlobalAchievementPercentage, SoftList,
    UnlockedAchievement,
};
use crate::models::game::OwnedGame;
use serde_json::Value;
use std::collections::HashMap;

pub const STEAM_API_BASE_URL: &str = "https://api.steampowered.com";

const HEADER_IMAGE_CDN: &str = "https://cdn.cloudflare.steamstatic.com/steam/apps";

/// Credentials resolved once at startup instead of read from the process
/// environment at every call site.
#[derive(Debug, Clone, Default)]
pub struct SteamConfig {
    pub api_key: Option<String>,
    pub steam_id: Option<String>,
}

impl SteamConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("STEAM_KEY").ok().filter(|v| !v.is_empty()),
            steam_id: std::env::var("STEAM_ID").ok().filter(|v| !v.is_empty()),
        }
    }
}

/// Thin client over the Steam Web API. The primary owned-games endpoint
/// errors on missing credentials or an unexpected body; every per-game
/// endpoint degrades to an empty `SoftList` so one misbehaving title cannot
/// abort a multi-game fetch.
pub struct SteamClient {
    http: reqwest::Client,
    base_url: String,
    config: SteamConfig,
}

impl SteamClient {
    pub fn new(config: SteamConfig) -> Self {
        Self::with_base_url(config, STEAM_API_BASE_URL)
    }

    /// Base-URL override for tests pointing at a local server.
    pub fn with_base_url(config: SteamConfig, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        }
    }

    async fn get_json(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, String> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| format!("Request error: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Steam API returned HTTP {status}"));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| format!("Response body error: {e}"))
    }

    /// Fetches the full owned-games list for the effective steam id. The one
    /// "primary" endpoint: missing credentials, network failure, and an
    /// unexpected body shape all surface as errors to the caller.
    pub async fn get_owned_games(
        &self,
        steam_id_override: Option<&str>,
    ) -> Result<Vec<OwnedGame>, String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or("Missing Steam API key in configuration")?;
        let steam_id = steam_id_override
            .or(self.config.steam_id.as_deref())
            .ok_or("Missing Steam ID in configuration")?;

        let body = self
            .get_json(
                "/IPlayerService/GetOwnedGames/v1/",
                &[
                    ("key", api_key),
                    ("steamid", steam_id),
                    ("format", "json"),
                    ("include_appinfo", "true"),
                ],
            )
            .await
            .map_err(|e| format!("Failed to fetch owned games: {e}"))?;

        parse_owned_games(&body)
    }

    /// Achievements the player has unlocked for one game, filtered to
    /// `achieved == 1`. Never errors: upstream failure degrades to an empty
    /// list so a batch over the whole library keeps going.
    pub async fn get_player_achievements(
        &self,
        appid: u32,
        steam_id_override: Option<&str>,
    ) -> SoftList<UnlockedAchievement> {
        let (Some(api_key), Some(steam_id)) = (
            self.config.api_key.as_deref(),
            steam_id_override.or(self.config.steam_id.as_deref()),
        ) else {
            log::warn!("Skipping player achievements for appid {appid}: missing credentials");
            return SoftList::degraded();
        };

        let appid_param = appid.to_string();
        let fetched = self
            .get_json(
                "/ISteamUserStats/GetPlayerAchievements/v1/",
                &[
                    ("key", api_key),
                    ("steamid", steam_id),
                    ("appid", appid_param.as_str()),
                    ("format", "json"),
                ],
            )
            .await
            .and_then(|body| parse_player_achievements(&body));

        match fetched {
            Ok(items) => SoftList::ok(items),
            Err(e) => {
                log::warn!("Failed to fetch player achievements for appid {appid}: {e}");
                SoftList::degraded()
            }
        }
    }

    /// Full achievement schema for one game; public data, no steam id needed.
    /// Same soft-failure policy as `get_player_achievements`.
    pub async fn get_schema_for_game(&self, appid: u32) -> SoftList<AchievementSchemaEntry> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            log::warn!("Skipping game schema for appid {appid}: missing API key");
            return SoftList::degraded();
        };

        let appid_param = appid.to_string();
        let fetched = self
            .get_json(
                "/ISteamUserStats/GetSchemaForGame/v2/",
                &[
                    ("key", api_key),
                    ("appid", appid_param.as_str()),
                    ("format", "json"),
                ],
            )
            .await
            .and_then(|body| parse_game_schema(&body));

        match fetched {
            Ok(items) => SoftList::ok(items),
            Err(e) => {
                log::warn!("Failed to fetch game schema for appid {appid}: {e}");
                SoftList::degraded()
            }
        }
    }

    /// Community-wide completion percentages; key-less public endpoint.
    pub async fn get_global_achievement_percentages(
        &self,
        appid: u32,
    ) -> SoftList<GlobalAchievementPercentage> {
        let appid_param = appid.to_string();
        let fetched = self
            .get_json(
                "/ISteamUserStats/GetGlobalAchievementPercentagesForApp/v2/",
                &[("gameid", appid_param.as_str()), ("format", "json")],
            )
            .await
            .and_then(|body| parse_global_percentages(&body));

        match fetched {
            Ok(items) => SoftList::ok(items),
            Err(e) => {
                log::warn!("Failed to fetch global percentages for appid {appid}: {e}");
                SoftList::degraded()
            }
        }
    }

    /// Schema and player status fetched concurrently, then merged into the
    /// detailed per-achievement view. Empty schema means empty output.
    pub async fn get_game_details(
        &self,
        appid: u32,
        steam_id_override: Option<&str>,
    ) -> SoftList<DetailedAchievement> {
        let (schema, unlocked) = tokio::join!(
            self.get_schema_for_game(appid),
            self.get_player_achievements(appid, steam_id_override),
        );

        let degraded = schema.degraded || unlocked.degraded;
        if schema.items.is_empty() {
            return SoftList {
                items: Vec::new(),
                degraded,
            };
        }

        SoftList {
            items: merge_achievements(schema.items, &unlocked.items),
            degraded,
        }
    }
}

pub fn header_image_url(appid: u32) -> String {
    format!("{HEADER_IMAGE_CDN}/{appid}/header.jpg")
}

/// Expects `{ response: { games: [...] } }`; anything else is the
/// unexpected-structure error the primary endpoint is allowed to raise.
pub(crate) fn parse_owned_games(body: &Value) -> Result<Vec<OwnedGame>, String> {
    let games = body
        .pointer("/response/games")
        .and_then(Value::as_array)
        .ok_or("Unexpected API response structure for GetOwnedGames")?;

    let mut parsed = Vec::with_capacity(games.len());
    for entry in games {
        let mut game: OwnedGame = serde_json::from_value(entry.clone())
            .map_err(|e| format!("Malformed game entry: {e}"))?;
        game.header_image = header_image_url(game.appid);
        parsed.push(game);
    }

    Ok(parsed)
}

/// Expects `{ playerstats: { achievements: [...] } }` and keeps only entries
/// with `achieved == 1`. A `playerstats.success == false` body is the
/// legitimate no-stats case, not a failure.
pub(crate) fn parse_player_achievements(body: &Value) -> Result<Vec<UnlockedAchievement>, String> {
    if let Some(entries) = body
        .pointer("/playerstats/achievements")
        .and_then(Value::as_array)
    {
        let unlocked = entries
            .iter()
            .filter(|entry| entry.get("achieved").and_then(Value::as_i64) == Some(1))
            .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
            .collect();
        return Ok(unlocked);
    }

    if body.pointer("/playerstats/success").and_then(Value::as_bool) == Some(false) {
        // No achievements for this game or user
        return Ok(Vec::new());
    }

    Err("Unexpected API response structure for GetPlayerAchievements".to_string())
}

/// Expects `{ game: { availableGameStats: { achievements: [...] } } }`. A
/// `game` object without `availableGameStats` is a game with no stats at all.
pub(crate) fn parse_game_schema(body: &Value) -> Result<Vec<AchievementSchemaEntry>, String> {
    if let Some(entries) = body
        .pointer("/game/availableGameStats/achievements")
        .and_then(Value::as_array)
    {
        let schema = entries
            .iter()
            .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
            .collect();
        return Ok(schema);
    }

    if let Some(game) = body.get("game") {
        if game.get("availableGameStats").is_none() {
            return Ok(Vec::new());
        }
    }

    Err("Unexpected API response structure for GetSchemaForGame".to_string())
}

/// Expects `{ achievementpercentages: { achievements: [...] } }`. Steam has
/// served `percent` both as a number and as a string, so accept either.
pub(crate) fn parse_global_percentages(
    body: &Value,
) -> Result<Vec<GlobalAchievementPercentage>, String> {
    let entries = body
        .pointer("/achievementpercentages/achievements")
        .and_then(Value::as_array)
        .ok_or("Unexpected API response structure for GetGlobalAchievementPercentagesForApp")?;

    let percentages = entries
        .iter()
        .map(|entry| {
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let percent = match entry.get("percent") {
                Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
                Some(Value::String(s)) => s.parse().unwrap_or(0.0),
                _ => 0.0,
            };
            GlobalAchievementPercentage { name, percent }
        })
        .collect();

    Ok(percentages)
}

/// Merges a game's schema with the player's unlocked entries. Output has
/// exactly the schema's entries in schema order; an entry absent from the
/// unlocked set is not achieved and carries unlocktime 0.
pub fn merge_achievements(
    schema: Vec<AchievementSchemaEntry>,
    unlocked: &[UnlockedAchievement],
) -> Vec<DetailedAchievement> {
    let unlock_times: HashMap<&str, i64> = unlocked
        .iter()
        .map(|entry| (entry.apiname.as_str(), entry.unlocktime))
        .collect();

    schema
        .into_iter()
        .map(|entry| {
            let unlocktime = unlock_times.get(entry.name.as_str()).copied();
            DetailedAchievement {
                achieved: unlocktime.is_some(),
                unlocktime: unlocktime.unwrap_or(0),
                name: entry.name,
                display_name: entry.display_name,
                description: entry.description,
                icon: entry.icon,
                icongray: entry.icongray,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn owned_games_parse_derives_header_image_from_appid() {
        let body = json!({
            "response": {
                "game_count": 2,
                "games": [
                    {"appid": 10, "name": "Game A", "playtime_forever": 120,
                     "img_icon_url": "abc", "img_logo_url": "def"},
                    {"appid": 440, "name": "Game B", "playtime_forever": 0,
                     "img_icon_url": "ghi", "img_logo_url": "jkl"}
                ]
            }
        });

        let games = parse_owned_games(&body).expect("parse owned games");
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].appid, 10);
        assert_eq!(games[0].name, "Game A");
        assert_eq!(
            games[0].header_image,
            "https://cdn.cloudflare.steamstatic.com/steam/apps/10/header.jpg"
        );
        assert_eq!(
            games[1].header_image,
            "https://cdn.cloudflare.steamstatic.com/steam/apps/440/header.jpg"
        );
    }

    #[test]
    fn owned_games_parse_rejects_missing_games_field() {
        let body = json!({"response": {}});
        assert!(parse_owned_games(&body).is_err());

        let body = json!({"unexpected": true});
        assert!(parse_owned_games(&body).is_err());
    }

    #[test]
    fn player_achievements_parse_keeps_only_achieved_entries() {
        let body = json!({
            "playerstats": {
                "steamID": "765611",
                "gameName": "Game A",
                "achievements": [
                    {"apiname": "ACH_1", "achieved": 1, "unlocktime": 1700000000},
                    {"apiname": "ACH_2", "achieved": 0, "unlocktime": 0},
                    {"apiname": "ACH_3", "achieved": 1, "unlocktime": 0}
                ],
                "success": true
            }
        });

        let unlocked = parse_player_achievements(&body).expect("parse achievements");
        assert_eq!(unlocked.len(), 2);
        assert_eq!(unlocked[0].apiname, "ACH_1");
        assert_eq!(unlocked[0].unlocktime, 1700000000);
        assert_eq!(unlocked[1].apiname, "ACH_3");
    }

    #[test]
    fn player_achievements_parse_treats_success_false_as_no_stats() {
        let body = json!({
            "playerstats": {
                "error": "Requested app has no stats",
                "success": false
            }
        });

        let unlocked = parse_player_achievements(&body).expect("no-stats case");
        assert!(unlocked.is_empty());
    }

    #[test]
    fn player_achievements_parse_rejects_unexpected_shape() {
        let body = json!({"something": "else"});
        assert!(parse_player_achievements(&body).is_err());
    }

    #[test]
    fn game_schema_parse_handles_games_without_stats() {
        let body = json!({
            "game": {
                "gameName": "Stat-less Game",
                "gameVersion": "1"
            }
        });

        let schema = parse_game_schema(&body).expect("no-stats schema");
        assert!(schema.is_empty());
    }

    #[test]
    fn game_schema_parse_reads_wire_field_names() {
        let body = json!({
            "game": {
                "availableGameStats": {
                    "achievements": [
                        {"name": "ACH_1", "displayName": "First", "description": "Do the thing",
                         "icon": "https://x/icon.jpg", "icongray": "https://x/gray.jpg"},
                        {"name": "ACH_HIDDEN", "displayName": "Secret"}
                    ]
                }
            }
        });

        let schema = parse_game_schema(&body).expect("parse schema");
        assert_eq!(schema.len(), 2);
        assert_eq!(schema[0].display_name, "First");
        assert_eq!(schema[1].name, "ACH_HIDDEN");
        // Hidden achievements come without description or icons.
        assert_eq!(schema[1].description, "");
        assert_eq!(schema[1].icon, "");
    }

    #[test]
    fn global_percentages_parse_accepts_numeric_and_string_percent() {
        let body = json!({
            "achievementpercentages": {
                "achievements": [
                    {"name": "ACH_1", "percent": 88.5},
                    {"name": "ACH_2", "percent": "12.3"}
                ]
            }
        });

        let percentages = parse_global_percentages(&body).expect("parse percentages");
        assert_eq!(percentages.len(), 2);
        assert!((percentages[0].percent - 88.5).abs() < 1e-9);
        assert!((percentages[1].percent - 12.3).abs() < 1e-9);
    }

    #[test]
    fn merge_marks_achieved_by_membership_and_defaults_unlocktime_to_zero() {
        let schema = vec![
            AchievementSchemaEntry {
                name: "ACH_1".to_string(),
                display_name: "First".to_string(),
                description: String::new(),
                icon: String::new(),
                icongray: String::new(),
            },
            AchievementSchemaEntry {
                name: "ACH_2".to_string(),
                display_name: "Second".to_string(),
                description: String::new(),
                icon: String::new(),
                icongray: String::new(),
            },
            AchievementSchemaEntry {
                name: "ACH_3".to_string(),
                display_name: "Third".to_string(),
                description: String::new(),
                icon: String::new(),
                icongray: String::new(),
            },
        ];
        let unlocked = vec![UnlockedAchievement {
            apiname: "ACH_2".to_string(),
            unlocktime: 1700000000,
        }];

        let merged = merge_achievements(schema, &unlocked);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].name, "ACH_1");
        assert!(!merged[0].achieved);
        assert_eq!(merged[0].unlocktime, 0);
        assert!(merged[1].achieved);
        assert_eq!(merged[1].unlocktime, 1700000000);
        assert!(!merged[2].achieved);
    }

    #[test]
    fn merge_with_empty_status_list_yields_all_locked() {
        let schema = vec![AchievementSchemaEntry {
            name: "ACH_1".to_string(),
            display_name: "First".to_string(),
            description: String::new(),
            icon: String::new(),
            icongray: String::new(),
        }];

        let merged = merge_achievements(schema, &[]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].display_name, "First");
        assert!(!merged[0].achieved);
        assert_eq!(merged[0].unlocktime, 0);
    }

    #[test]
    fn merge_is_deterministic_for_identical_inputs() {
        let schema = || {
            vec![AchievementSchemaEntry {
                name: "ACH_1".to_string(),
                display_name: "First".to_string(),
                description: "d".to_string(),
                icon: "i".to_string(),
                icongray: "g".to_string(),
            }]
        };
        let unlocked = vec![UnlockedAchievement {
            apiname: "ACH_1".to_string(),
            unlocktime: 42,
        }];

        let first = merge_achievements(schema(), &unlocked);
        let second = merge_achievements(schema(), &unlocked);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }
}
