use crate::playback::Command;

/// Speed multipliers offered to the user
pub const SPEED_PRESETS: [f64; 5] = [0.5, 1.0, 2.0, 5.0, 10.0];

pub const HELP: &str = "\
Controls:
  p, space      play / pause
  play, pause   play or pause explicitly
  r, reset      rewind to the start
  +, -          next / previous speed preset (0.5x 1x 2x 5x 10x)
  speed <x>     set any positive speed, also `2x`
  h, ?          show this help
  q, quit       exit";

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(Command),
    Help,
    Quit,
    Invalid(String),
}

/// Parse a speed multiplier, with or without a trailing `x`
pub fn parse_speed(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    let number = trimmed
        .strip_suffix('x')
        .or_else(|| trimmed.strip_suffix('X'))
        .unwrap_or(trimmed);

    match number.trim().parse::<f64>() {
        Ok(speed) if speed.is_finite() && speed > 0.0 => Ok(speed),
        _ => Err(format!("speed must be a positive number, got {raw:?}")),
    }
}

/// Next preset above `current`, or the fastest preset
pub fn faster(current: f64) -> f64 {
    SPEED_PRESETS
        .iter()
        .copied()
        .find(|&preset| preset > current)
        .unwrap_or(SPEED_PRESETS[SPEED_PRESETS.len() - 1])
}

/// Next preset below `current`, or the slowest preset
pub fn slower(current: f64) -> f64 {
    SPEED_PRESETS
        .iter()
        .rev()
        .copied()
        .find(|&preset| preset < current)
        .unwrap_or(SPEED_PRESETS[0])
}

/// Parse one line typed by the user
///
/// `current_speed` is used for relative speed changes.
pub fn parse_input(line: &str, current_speed: f64) -> Input {
    // a bare space still means play/pause
    if line == " " {
        return Input::Command(Command::TogglePlay);
    }

    let line = line.trim().to_lowercase();
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Input::Invalid(String::new());
    };

    match (word, words.next()) {
        ("p" | "space" | "toggle", None) => Input::Command(Command::TogglePlay),
        ("play", None) => Input::Command(Command::Play),
        ("pause" | "stop", None) => Input::Command(Command::Pause),
        ("r" | "reset", None) => Input::Command(Command::Reset),
        ("+" | "faster", None) => Input::Command(Command::SetSpeed(faster(current_speed))),
        ("-" | "slower", None) => Input::Command(Command::SetSpeed(slower(current_speed))),
        ("speed" | "s", Some(value)) => match parse_speed(value) {
            Ok(speed) => Input::Command(Command::SetSpeed(speed)),
            Err(e) => Input::Invalid(e),
        },
        ("h" | "?" | "help", None) => Input::Help,
        ("q" | "quit" | "exit", None) => Input::Quit,
        (word, None) if word.ends_with('x') => match parse_speed(word) {
            Ok(speed) => Input::Command(Command::SetSpeed(speed)),
            Err(e) => Input::Invalid(e),
        },
        _ => Input::Invalid(format!("unknown command {line:?}, type `h` for help")),
    }
}
