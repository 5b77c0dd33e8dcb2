pub mod gameplay;
pub mod leaderboard;
pub mod menu;
pub mod name_entry;
pub mod select_score;

use crate::config::SWATCH_LIGHTNESS;
use crate::gameplay::color::{ColorSample, hsl_to_rgb};

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    None,
    Navigate(Screen),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Round,
    Result,
    NameEntry,
    SelectScore,
    Leaderboard,
}

pub const HELP: &str = "\
commands:
  start              begin a new game
  pick <x> <y>       choose a point on the wheel
  confirm            lock in the pick (or the selected score)
  next               go to the next round
  name <nickname>    save under this nickname ('save' keeps the suggested one)
  choose <n>         select which saved score counts
  retry              retry a failed save
  quit               leave";

/// A short block of background color in ANSI true color.
pub fn swatch(color: ColorSample) -> String {
    let [r, g, b] = hsl_to_rgb(color.hue, color.saturation, SWATCH_LIGHTNESS);
    format!("\x1b[48;2;{r};{g};{b}m      \x1b[0m")
}
