use crate::gameplay::color::Point;

/// One line of console input, already split into what the game understands.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Start,
    Pick(Point),
    Confirm,
    Next,
    /// `None` accepts the prefilled name.
    Name(Option<String>),
    Choose(usize),
    Retry,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "start" | "restart" => Some(Command::Start),
        "pick" | "p" => {
            let mut coords = rest.split(|c: char| c.is_whitespace() || c == ',').filter(|s| !s.is_empty());
            let x = coords.next()?.parse::<f64>().ok()?;
            let y = coords.next()?.parse::<f64>().ok()?;
            if coords.next().is_some() || !x.is_finite() || !y.is_finite() {
                return None;
            }
            Some(Command::Pick(Point::new(x, y)))
        }
        "confirm" | "ok" => Some(Command::Confirm),
        "next" | "n" => Some(Command::Next),
        "name" => Some(Command::Name(Some(rest.to_string()).filter(|s| !s.is_empty()))),
        "save" => Some(Command::Name(None)),
        // shown 1-based
        "choose" | "c" => rest.parse::<usize>().ok().filter(|n| *n > 0).map(|n| Command::Choose(n - 1)),
        "retry" => Some(Command::Retry),
        "help" | "?" => Some(Command::Help),
        "quit" | "exit" | "q" => Some(Command::Quit),
        _ => None,
    }
}
