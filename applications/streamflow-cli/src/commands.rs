//! Interactive command parsing

use crate::error::CliError;
use std::str::FromStr;
use streamflow_playback::RepeatMode;

/// One line typed at the player prompt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Toggle,
    Next,
    Previous,
    Shuffle,
    Repeat,
    /// Seek to a percentage of the track (0-100)
    Seek(f64),
    Volume(i32),
    Mute,
    /// Pretend the current track finished
    End,
    Status,
    Stop,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();
        let arg = words.next();

        let command = match (name.as_str(), arg) {
            ("toggle" | "t" | "p", None) => Command::Toggle,
            ("next" | "n", None) => Command::Next,
            ("prev" | "previous" | "b", None) => Command::Previous,
            ("shuffle" | "s", None) => Command::Shuffle,
            ("repeat" | "r", None) => Command::Repeat,
            ("seek", Some(percent)) => Command::Seek(parse_number(percent)? / 100.0),
            ("vol" | "volume", Some(level)) => Command::Volume(parse_number(level)? as i32),
            ("mute" | "m", None) => Command::Mute,
            ("end", None) => Command::End,
            ("status" | "st", None) => Command::Status,
            ("stop", None) => Command::Stop,
            ("help" | "?", None) => Command::Help,
            ("quit" | "q" | "exit", None) => Command::Quit,
            _ => return Err(CliError::InvalidCommand(line.trim().to_string())),
        };

        if words.next().is_some() {
            return Err(CliError::InvalidCommand(line.trim().to_string()));
        }
        Ok(command)
    }
}

fn parse_number(raw: &str) -> Result<f64, CliError> {
    raw.trim_end_matches('%')
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| CliError::InvalidCommand(format!("not a number: {}", raw)))
}

/// Parse a repeat mode name, as accepted by `--repeat`
pub fn parse_repeat(raw: &str) -> Result<RepeatMode, String> {
    match raw.to_ascii_lowercase().as_str() {
        "off" | "none" => Ok(RepeatMode::Off),
        "all" => Ok(RepeatMode::All),
        "one" => Ok(RepeatMode::One),
        other => Err(format!("expected off, all or one, got '{}'", other)),
    }
}

pub const HELP: &str = "\
commands:
  toggle (t)     play/pause, or restart when idle
  next (n)       skip to the next track
  prev (b)       skip to the previous track
  shuffle (s)    toggle shuffle
  repeat (r)     cycle repeat off -> all -> one
  seek <0-100>   jump to a percentage of the track
  vol <0-100>    set volume
  mute (m)       toggle mute
  end            treat the current track as finished
  status (st)    show what is playing
  stop           stop and clear the queue
  quit (q)       exit";
