mod progress;
mod undo;

pub use progress::*;
pub use undo::*;
