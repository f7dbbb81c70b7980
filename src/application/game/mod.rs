mod command;
mod delete_history_segment;
mod edit_history;
mod get_history;
mod get_scoreboard;
mod manage_players;
mod record_end_round;
mod record_score_change;
mod reset_game;
mod undo_last_action;
mod update_settings;

pub use command::*;
pub use delete_history_segment::*;
pub use edit_history::*;
pub use get_history::*;
pub use get_scoreboard::*;
pub use manage_players::*;
pub use record_end_round::*;
pub use record_score_change::*;
pub use reset_game::*;
pub use undo_last_action::*;
pub use update_settings::*;
