// src/screens/gameplay.rs
use crate::config::{MAX_ROUND_SCORE, TOTAL_ROUNDS};
use crate::gameplay::color::{ColorSample, WheelGeometry};
use crate::gameplay::round::Round;
use crate::screens::swatch;

pub fn render_round(round: &Round, total_so_far: u32, tentative: Option<ColorSample>, wheel: WheelGeometry) -> String {
    let mut out = format!(
        "Round {} / {}    Score: {}\n\
         target  {}\n\
         wheel: center ({:.0}, {:.0}), radius {:.0}; angle is hue, distance is saturation",
        round.index,
        TOTAL_ROUNDS,
        total_so_far,
        swatch(round.target),
        wheel.center.x,
        wheel.center.y,
        wheel.radius,
    );
    match tentative {
        Some(picked) => out.push_str(&format!("\npicked  {}  ({picked})  'confirm' to lock in", swatch(picked))),
        None => out.push_str("\n'pick <x> <y>' to choose"),
    }
    out
}

pub fn render_result(round: &Round, percentile: Option<u32>, is_last: bool) -> String {
    let mut out = format!("target  {}  ({})", swatch(round.target), round.target);
    if let Some(picked) = round.picked {
        out.push_str(&format!("\npicked  {}  ({picked})", swatch(picked)));
    }
    if let Some(score) = round.score {
        out.push_str(&format!("\naccuracy {score} / {MAX_ROUND_SCORE}"));
    }
    if let Some(p) = percentile {
        out.push_str(&format!("\nbetter than {p}% of players"));
    }
    out.push_str(if is_last { "\n'next' for your result" } else { "\n'next' to continue" });
    out
}
