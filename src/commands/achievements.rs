use crate::models::achievement::{DetailedAchievement, GlobalAchievementPercentage, SoftList};
use crate::steam::client::SteamClient;

#[tauri::command]
pub async fn get_game_details(
    app: tauri::AppHandle,
    client: tauri::State<'_, SteamClient>,
    appid: u32,
) -> Result<SoftList<DetailedAchievement>, String> {
    let data_dir = crate::commands::user::resolve_data_dir(&app)?;
    let stored_steam_id = crate::commands::user::read_steam_id(&data_dir);
    Ok(client
        .get_game_details(appid, stored_steam_id.as_deref())
        .await)
}

#[tauri::command]
pub async fn get_global_achievement_percentages(
    client: tauri::State<'_, SteamClient>,
    appid: u32,
) -> Result<SoftList<GlobalAchievementPercentage>, String> {
    Ok(client.get_global_achievement_percentages(appid).await)
}
