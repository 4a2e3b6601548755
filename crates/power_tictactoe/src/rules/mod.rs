//! Win and draw rules.

mod outcome;
mod win;

pub use outcome::Outcome;
pub use win::{Line, WinLines, evaluate, winning_lines};
