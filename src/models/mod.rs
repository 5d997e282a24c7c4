pub mod achievement;
pub mod game;
