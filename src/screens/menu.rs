// src/screens/menu.rs
use crate::config::{MAX_TOTAL_SCORE, TOTAL_ROUNDS};

pub fn render() -> String {
    format!(
        "GUESS THE COLOR\n\
         {TOTAL_ROUNDS} rounds. Find each target on the wheel; hue counts more than saturation.\n\
         Best possible game: {MAX_TOTAL_SCORE} points.\n\
         type 'start' to play, 'help' for commands"
    )
}
