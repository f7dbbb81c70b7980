mod game_settings;
mod player_icon;

pub use game_settings::*;
pub use player_icon::*;
