pub mod game;
pub mod library;
