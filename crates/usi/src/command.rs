//! Lines a GUI sends to an engine.

use crate::UsiError;

/// A parsed GUI line.
#[derive(Debug, Clone, PartialEq)]
pub enum GuiCommand {
    Usi,
    IsReady,
    SetOption { name: String, value: Option<String> },
    UsiNewGame,
    /// `sfen` is `None` for `startpos`.
    Position {
        sfen: Option<String>,
        moves: Vec<String>,
    },
    Go(GoOptions),
    Stop,
    /// The game ended (`win`, `lose`, or `draw`).
    GameOver(String),
    Quit,
    /// Anything unrecognised, kept verbatim so engines can ignore it.
    Unknown(String),
}

/// Arguments of `go`. All times are milliseconds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoOptions {
    pub movetime: Option<u64>,
    pub depth: Option<u32>,
    /// Per-move time once the main clock is spent.
    pub byoyomi: Option<u64>,
    /// Main clock of the first side (`b`).
    pub btime: Option<u64>,
    /// Main clock of the second side (`w`).
    pub wtime: Option<u64>,
    pub binc: Option<u64>,
    pub winc: Option<u64>,
    pub infinite: bool,
}

impl GoOptions {
    /// Options for a fixed-time search.
    pub fn movetime(ms: u64) -> Self {
        GoOptions {
            movetime: Some(ms),
            ..Default::default()
        }
    }

    /// Format the arguments after `go`.
    fn to_usi(&self) -> String {
        let mut parts = vec!["go".to_string()];
        let numbers = [
            ("btime", self.btime),
            ("wtime", self.wtime),
            ("binc", self.binc),
            ("winc", self.winc),
            ("byoyomi", self.byoyomi),
            ("movetime", self.movetime),
        ];
        for (key, value) in numbers {
            if let Some(v) = value {
                parts.push(format!("{} {}", key, v));
            }
        }
        if let Some(d) = self.depth {
            parts.push(format!("depth {}", d));
        }
        if self.infinite {
            parts.push("infinite".to_string());
        }
        parts.join(" ")
    }
}

impl GuiCommand {
    /// Parse a USI command string.
    pub fn parse(input: &str) -> Result<Self, UsiError> {
        let input = input.trim();
        let mut parts = input.split_whitespace();

        let cmd = parts.next().unwrap_or("");

        match cmd {
            "usi" => Ok(GuiCommand::Usi),
            "isready" => Ok(GuiCommand::IsReady),
            "usinewgame" => Ok(GuiCommand::UsiNewGame),
            "stop" => Ok(GuiCommand::Stop),
            "quit" => Ok(GuiCommand::Quit),
            "gameover" => Ok(GuiCommand::GameOver(parts.collect::<Vec<_>>().join(" "))),
            "setoption" => Self::parse_setoption(parts),
            "position" => Self::parse_position(parts),
            "go" => Self::parse_go(parts),
            "" => Ok(GuiCommand::Unknown(String::new())),
            _ => Ok(GuiCommand::Unknown(input.to_string())),
        }
    }

    fn parse_setoption<'a>(parts: impl Iterator<Item = &'a str>) -> Result<Self, UsiError> {
        let parts: Vec<&str> = parts.collect();
        if parts.first() != Some(&"name") {
            return Err(UsiError::ParseError(
                "Expected 'name' after 'setoption'".to_string(),
            ));
        }
        let rest = &parts[1..];
        let (name, value) = match rest.iter().position(|&s| s == "value") {
            Some(idx) => (rest[..idx].join(" "), Some(rest[idx + 1..].join(" "))),
            None => (rest.join(" "), None),
        };
        if name.is_empty() {
            return Err(UsiError::ParseError("Empty option name".to_string()));
        }
        Ok(GuiCommand::SetOption { name, value })
    }

    fn parse_position<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Self, UsiError> {
        let mut sfen = None;

        match parts.next() {
            Some("startpos") => {}
            Some("sfen") => {
                let mut sfen_parts = Vec::new();
                for part in parts.by_ref() {
                    if part == "moves" {
                        break;
                    }
                    sfen_parts.push(part);
                }
                if sfen_parts.is_empty() {
                    return Err(UsiError::ParseError("Empty SFEN".to_string()));
                }
                sfen = Some(sfen_parts.join(" "));
                let moves = parts.map(|s| s.to_string()).collect();
                return Ok(GuiCommand::Position { sfen, moves });
            }
            Some(other) => {
                return Err(UsiError::ParseError(format!(
                    "Expected 'startpos' or 'sfen', got '{}'",
                    other
                )));
            }
            None => {
                return Err(UsiError::ParseError(
                    "Expected 'startpos' or 'sfen'".to_string(),
                ));
            }
        }

        let remaining: Vec<&str> = parts.collect();
        let moves = match remaining.iter().position(|&s| s == "moves") {
            Some(idx) => remaining[idx + 1..].iter().map(|s| s.to_string()).collect(),
            None => Vec::new(),
        };

        Ok(GuiCommand::Position { sfen, moves })
    }

    fn parse_go<'a>(parts: impl Iterator<Item = &'a str>) -> Result<Self, UsiError> {
        let mut opts = GoOptions::default();
        let parts: Vec<&str> = parts.collect();
        let mut i = 0;

        while i < parts.len() {
            let next = parts.get(i + 1);
            match parts[i] {
                "movetime" => opts.movetime = next.and_then(|s| s.parse().ok()),
                "depth" => opts.depth = next.and_then(|s| s.parse().ok()),
                "byoyomi" => opts.byoyomi = next.and_then(|s| s.parse().ok()),
                "btime" => opts.btime = next.and_then(|s| s.parse().ok()),
                "wtime" => opts.wtime = next.and_then(|s| s.parse().ok()),
                "binc" => opts.binc = next.and_then(|s| s.parse().ok()),
                "winc" => opts.winc = next.and_then(|s| s.parse().ok()),
                "infinite" => {
                    opts.infinite = true;
                    i += 1;
                    continue;
                }
                _ => {
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        Ok(GuiCommand::Go(opts))
    }

    /// Format the command as a USI line (without the trailing newline).
    pub fn to_usi(&self) -> String {
        match self {
            GuiCommand::Usi => "usi".to_string(),
            GuiCommand::IsReady => "isready".to_string(),
            GuiCommand::UsiNewGame => "usinewgame".to_string(),
            GuiCommand::SetOption { name, value } => match value {
                Some(v) => format!("setoption name {} value {}", name, v),
                None => format!("setoption name {}", name),
            },
            GuiCommand::Position { sfen, moves } => {
                let mut line = match sfen {
                    Some(s) => format!("position sfen {}", s),
                    None => "position startpos".to_string(),
                };
                if !moves.is_empty() {
                    line.push_str(" moves ");
                    line.push_str(&moves.join(" "));
                }
                line
            }
            GuiCommand::Go(opts) => opts.to_usi(),
            GuiCommand::Stop => "stop".to_string(),
            GuiCommand::GameOver(result) => format!("gameover {}", result),
            GuiCommand::Quit => "quit".to_string(),
            GuiCommand::Unknown(s) => s.clone(),
        }
    }
}
