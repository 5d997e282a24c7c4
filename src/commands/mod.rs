pub mod achievements;
pub mod library;
pub mod user;
