use crate::models::game::{GameCache, OwnedGame};
use crate::steam::client::{header_image_url, SteamClient};
use std::fs;
use std::path::Path;

const GAMES_CACHE_FILE: &str = "games_cache.json";

/// Cache freshness window in milliseconds. A cached list is usable only
/// while `now - timestamp < CACHE_MAX_AGE_MS`; there is no grace period at
/// the boundary.
pub const CACHE_MAX_AGE_MS: i64 = 24 * 60 * 60 * 1000;

#[tauri::command]
pub async fn get_owned_games(
    app: tauri::AppHandle,
    client: tauri::State<'_, SteamClient>,
) -> Result<Vec<OwnedGame>, String> {
    let data_dir = crate::commands::user::resolve_data_dir(&app)?;
    get_owned_games_internal(client.inner(), &data_dir).await
}

/// The aggregated owned-games fetch: base list from a fresh cache or a live
/// call (which repopulates the cache), then per-game achievement counts
/// re-fetched live for every game regardless of cache hit.
pub async fn get_owned_games_internal(
    client: &SteamClient,
    data_dir: &Path,
) -> Result<Vec<OwnedGame>, String> {
    let stored_steam_id = crate::commands::user::read_steam_id(data_dir);
    let steam_id = stored_steam_id.as_deref();

    let now_ms = chrono::Utc::now().timestamp_millis();
    let games = match read_games_cache(data_dir).filter(|cache| cache_is_fresh(cache, now_ms)) {
        Some(cache) => {
            log::debug!("Serving {} games from cache", cache.games.len());
            cache.games
        }
        None => {
            let games = client.get_owned_games(steam_id).await?;
            if let Err(e) = write_games_cache(data_dir, &games, now_ms) {
                // A failed cache write only costs the next call a refetch.
                log::warn!("Failed to write games cache: {e}");
            }
            games
        }
    };

    Ok(enrich_with_achievement_counts(client, games, steam_id).await)
}

/// Fans out two lookups per game (schema and player achievements) across the
/// whole list at once and joins them back in input order. Sub-fetches never
/// fail the batch; a failed title just reports degraded 0/0 counts.
pub async fn enrich_with_achievement_counts(
    client: &SteamClient,
    games: Vec<OwnedGame>,
    steam_id: Option<&str>,
) -> Vec<OwnedGame> {
    let lookups = games.iter().map(|game| {
        let appid = game.appid;
        async move {
            tokio::join!(
                client.get_schema_for_game(appid),
                client.get_player_achievements(appid, steam_id),
            )
        }
    });
    let results = futures::future::join_all(lookups).await;

    games
        .into_iter()
        .zip(results)
        .map(|(mut game, (schema, unlocked))| {
            game.header_image = header_image_url(game.appid);
            game.total_achievements = Some(schema.items.len());
            game.unlocked_achievements = Some(unlocked.items.len());
            game.stats_degraded = Some(schema.degraded || unlocked.degraded);
            game
        })
        .collect()
}

pub fn read_games_cache(data_dir: &Path) -> Option<GameCache> {
    let path = data_dir.join(GAMES_CACHE_FILE);
    if !path.exists() {
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(cache) => Some(cache),
            Err(e) => {
                log::warn!("Ignoring unparsable games cache: {e}");
                None
            }
        },
        Err(e) => {
            log::warn!("Failed to read games cache: {e}");
            None
        }
    }
}

pub fn cache_is_fresh(cache: &GameCache, now_ms: i64) -> bool {
    now_ms - cache.timestamp < CACHE_MAX_AGE_MS
}

pub fn write_games_cache(data_dir: &Path, games: &[OwnedGame], now_ms: i64) -> Result<(), String> {
    fs::create_dir_all(data_dir).map_err(|e| format!("Failed to create data directory: {e}"))?;

    let cache = GameCache {
        timestamp: now_ms,
        games: games.to_vec(),
    };
    let raw = serde_json::to_string_pretty(&cache)
        .map_err(|e| format!("Failed to serialize games cache: {e}"))?;
    fs::write(data_dir.join(GAMES_CACHE_FILE), raw)
        .map_err(|e| format!("Failed to write games cache: {e}"))
}
