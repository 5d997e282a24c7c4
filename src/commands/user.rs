use crate::models::achievement::PinnedAchievement;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tauri::Manager;

const STEAM_ID_FILE: &str = "steam_id.json";
const PINNED_FILE: &str = "pinned_achievements.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SteamIdRecord {
    #[serde(rename = "steamId")]
    steam_id: String,
}

#[tauri::command]
pub async fn get_steam_id(app: tauri::AppHandle) -> Result<Option<String>, String> {
    Ok(read_steam_id(&resolve_data_dir(&app)?))
}

#[tauri::command]
pub async fn set_steam_id(app: tauri::AppHandle, steam_id: String) -> Result<(), String> {
    write_steam_id(&resolve_data_dir(&app)?, &steam_id)
}

#[tauri::command]
pub async fn get_pinned_achievements(
    app: tauri::AppHandle,
) -> Result<Vec<PinnedAchievement>, String> {
    Ok(read_pinned_achievements(&resolve_data_dir(&app)?))
}

#[tauri::command]
pub async fn pin_achievement(
    app: tauri::AppHandle,
    achievement: PinnedAchievement,
) -> Result<Vec<PinnedAchievement>, String> {
    pin_achievement_internal(&resolve_data_dir(&app)?, achievement)
}

#[tauri::command]
pub async fn unpin_achievement(
    app: tauri::AppHandle,
    name: String,
    appid: u32,
) -> Result<Vec<PinnedAchievement>, String> {
    unpin_achievement_internal(&resolve_data_dir(&app)?, &name, appid)
}

pub(crate) fn resolve_data_dir(app: &tauri::AppHandle) -> Result<PathBuf, String> {
    app.path()
        .app_data_dir()
        .map_err(|e| format!("Failed to resolve app data directory: {e}"))
}

pub fn read_steam_id(data_dir: &Path) -> Option<String> {
    let path = data_dir.join(STEAM_ID_FILE);
    if !path.exists() {
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(raw) => match serde_json::from_str::<SteamIdRecord>(&raw) {
            Ok(record) => Some(record.steam_id),
            Err(e) => {
                log::warn!("Ignoring unparsable steam id file: {e}");
                None
            }
        },
        Err(e) => {
            log::warn!("Failed to read steam id file: {e}");
            None
        }
    }
}

pub fn write_steam_id(data_dir: &Path, steam_id: &str) -> Result<(), String> {
    let record = SteamIdRecord {
        steam_id: steam_id.to_string(),
    };
    write_json_document(&data_dir.join(STEAM_ID_FILE), &record)
}

pub fn read_pinned_achievements(data_dir: &Path) -> Vec<PinnedAchievement> {
    let path = data_dir.join(PINNED_FILE);
    if !path.exists() {
        return Vec::new();
    }

    match fs::read_to_string(&path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("Ignoring unparsable pinned achievements file: {e}");
            Vec::new()
        }),
        Err(e) => {
            log::warn!("Failed to read pinned achievements file: {e}");
            Vec::new()
        }
    }
}

/// Appends the achievement unless an entry with the same (appid, name) pair
/// already exists; returns the stored list either way. Whole-file rewrite
/// with no locking: fine for a single-instance desktop process, lost updates
/// between concurrent writers are an accepted limitation.
pub fn pin_achievement_internal(
    data_dir: &Path,
    achievement: PinnedAchievement,
) -> Result<Vec<PinnedAchievement>, String> {
    let mut pinned = read_pinned_achievements(data_dir);

    let already_pinned = pinned
        .iter()
        .any(|entry| entry.appid == achievement.appid && entry.name == achievement.name);
    if !already_pinned {
        pinned.push(achievement);
        write_json_document(&data_dir.join(PINNED_FILE), &pinned)?;
    }

    Ok(pinned)
}

/// Removes every entry matching (appid, name). Unpinning something that was
/// never pinned is a no-op, not an error.
pub fn unpin_achievement_internal(
    data_dir: &Path,
    name: &str,
    appid: u32,
) -> Result<Vec<PinnedAchievement>, String> {
    let mut pinned = read_pinned_achievements(data_dir);
    let before = pinned.len();

    pinned.retain(|entry| !(entry.appid == appid && entry.name == name));
    if pinned.len() != before {
        write_json_document(&data_dir.join(PINNED_FILE), &pinned)?;
    }

    Ok(pinned)
}

fn write_json_document<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create data directory: {e}"))?;
    }

    let raw = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize {}: {e}", path.display()))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}
