mod end_round;
mod game;
mod history;
mod player;
mod score_change;

pub use end_round::*;
pub use game::*;
pub use history::*;
pub use player::*;
pub use score_change::*;
