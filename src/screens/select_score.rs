// src/screens/select_score.rs
use crate::config::MAX_TOTAL_SCORE;
use crate::gameplay::reconcile::Choice;

pub fn render(choice: &Choice) -> String {
    let mut out = String::from("You already have saved scores. Which one should count?");
    for (i, option) in choice.options.iter().enumerate() {
        let marker = if choice.selected == Some(i) { ">" } else { " " };
        out.push_str(&format!(
            "\n{marker} {}. {:>3} / {}  {}",
            i + 1,
            option.score,
            MAX_TOTAL_SCORE,
            option.kind.label()
        ));
    }
    if let Some(err) = &choice.last_error {
        out.push_str(&format!("\ncould not save your choice ({err}); 'confirm' to try again"));
    }
    out.push_str(if choice.confirm_enabled() {
        "\n'choose <n>' to change, 'confirm' to save"
    } else {
        "\n'choose <n>' to pick one"
    });
    out
}
