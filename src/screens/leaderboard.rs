// src/screens/leaderboard.rs
use crate::gameplay::leaderboard::Leaderboard;

pub fn render(board: &Leaderboard, highlight: Option<usize>, can_retry_save: bool) -> String {
    let mut out = String::from("LEADERBOARD");
    let stats = board.stats();
    out.push_str(&format!(
        "\nplayers {}   top {}   average {}   (updated {})",
        stats.players,
        stats.top_score,
        stats.average_score,
        board.fetched_at.format("%H:%M:%S")
    ));

    if let Some(err) = &board.error {
        out.push_str(&format!("\ncould not load the leaderboard: {err}"));
    }
    for (i, entry) in board.entries.iter().enumerate() {
        let marker = if highlight == Some(i) { "*" } else { " " };
        out.push_str(&format!("\n{marker}{:>4}  {:<24} {:>3}", entry.rank, entry.nickname, entry.score));
    }

    if can_retry_save {
        out.push_str("\nyour score was not saved; 'retry' to try again");
    }
    out.push_str("\n'start' to play again");
    out
}
