pub mod commands;
pub mod models;
pub mod steam;

use commands::{
    achievements::{get_game_details, get_global_achievement_percentages},
    library::get_owned_games,
    user::{
        get_pinned_achievements, get_steam_id, pin_achievement, set_steam_id, unpin_achievement,
    },
};
use steam::client::{SteamClient, SteamConfig};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(SteamClient::new(SteamConfig::from_env()))
        .invoke_handler(tauri::generate_handler![
            get_owned_games,
            get_game_details,
            get_global_achievement_percentages,
            get_steam_id,
            set_steam_id,
            get_pinned_achievements,
            pin_achievement,
            unpin_achievement,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
