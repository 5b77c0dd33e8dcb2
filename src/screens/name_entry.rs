// src/screens/name_entry.rs
use crate::config::MAX_TOTAL_SCORE;

pub fn render(total: u32, round_scores: &[u32], suggested: Option<&str>) -> String {
    let cards: Vec<String> = round_scores.iter().map(|s| format!("[{s}]")).collect();
    let mut out = format!("Final score: {total} / {MAX_TOTAL_SCORE}   {}", cards.join(" "));
    match suggested {
        Some(name) => out.push_str(&format!("\n'save' to save as '{name}', or 'name <nickname>'")),
        None => out.push_str("\n'name <nickname>' to save your score"),
    }
    out
}
