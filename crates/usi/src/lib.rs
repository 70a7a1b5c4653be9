//! USI (Universal Shogi Interface) protocol library.
//!
//! This crate provides types and parsing for the USI protocol spoken by
//! shogi engines, usable from both sides of the pipe.
//!
//! # Commands (GUI to engine)
//!
//! - `usi`, answered by `id` lines and `usiok`
//! - `setoption name <id> [value <x>]`
//! - `isready`, answered by `readyok` once options are applied
//! - `usinewgame`
//! - `position sfen <sfen> | startpos [moves <move>...]`
//! - `go [movetime <ms>] [depth <d>] [byoyomi <ms>] [btime ..] [wtime ..]`
//! - `stop`, `gameover <result>`, `quit`
//!
//! # Messages (engine to GUI)
//!
//! - `id name|author`, `usiok`, `readyok`
//! - `info ...` with `score cp <n>` or `score mate <plies>`
//! - `bestmove <move>|resign|win`

mod command;
mod info;

pub use command::{GoOptions, GuiCommand};
pub use info::{EngineInfo, InfoBuilder, Score};

use std::io::{BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UsiError {
    #[error("unrecognised command: {0}")]
    InvalidCommand(String),
    #[error("malformed {0}")]
    ParseError(String),
    #[error("input closed")]
    Eof,
    #[error("usi i/o: {0}")]
    IoError(#[from] std::io::Error),
}

/// A line an engine writes to its GUI.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    Id {
        name: Option<String>,
        author: Option<String>,
    },
    UsiOk,
    ReadyOk,
    Info(EngineInfo),
    /// Best move found, `resign`, or `win`.
    BestMove { mv: String, ponder: Option<String> },
    /// Anything else (option declarations, vendor chatter).
    Other(String),
}

impl EngineMessage {
    pub fn to_usi(&self) -> String {
        match self {
            EngineMessage::Id { name, author } => [("name", name), ("author", author)]
                .iter()
                .filter_map(|(key, value)| value.as_ref().map(|v| format!("id {} {}", key, v)))
                .collect::<Vec<_>>()
                .join("\n"),
            EngineMessage::UsiOk => "usiok".to_string(),
            EngineMessage::ReadyOk => "readyok".to_string(),
            EngineMessage::Info(info) => info.to_usi(),
            EngineMessage::BestMove { mv, ponder: Some(reply) } => {
                format!("bestmove {} ponder {}", mv, reply)
            }
            EngineMessage::BestMove { mv, ponder: None } => format!("bestmove {}", mv),
            EngineMessage::Other(s) => s.clone(),
        }
    }

    /// Parse a line written by an engine.
    ///
    /// Returns `None` for blank lines. A `bestmove` with no move token
    /// yields an empty `mv`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let mut parts = line.split_whitespace();
        let msg = match parts.next()? {
            "usiok" => EngineMessage::UsiOk,
            "readyok" => EngineMessage::ReadyOk,
            "info" => EngineMessage::Info(EngineInfo::parse(line)?),
            "bestmove" => {
                let mv = parts.next().unwrap_or("").to_string();
                let ponder = match parts.next() {
                    Some("ponder") => parts.next().map(str::to_string),
                    _ => None,
                };
                EngineMessage::BestMove { mv, ponder }
            }
            "id" => {
                let rest = parts.clone().skip(1).collect::<Vec<_>>().join(" ");
                match parts.next() {
                    Some("name") => EngineMessage::Id {
                        name: Some(rest),
                        author: None,
                    },
                    Some("author") => EngineMessage::Id {
                        name: None,
                        author: Some(rest),
                    },
                    _ => EngineMessage::Other(line.to_string()),
                }
            }
            _ => EngineMessage::Other(line.to_string()),
        };
        Some(msg)
    }
}

/// Simple USI engine wrapper for writing engines.
pub struct UsiEngine<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> UsiEngine<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Blocks for the next GUI line.
    ///
    /// Returns [`UsiError::Eof`] once the input is closed.
    pub fn read_command(&mut self) -> Result<GuiCommand, UsiError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(UsiError::Eof);
        }
        GuiCommand::parse(&line)
    }

    /// Writes one message and flushes.
    pub fn send(&mut self, msg: &EngineMessage) -> Result<(), UsiError> {
        writeln!(self.writer, "{}", msg.to_usi())?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn send_id(&mut self, name: &str, author: &str) -> Result<(), UsiError> {
        self.send(&EngineMessage::Id {
            name: Some(name.to_string()),
            author: Some(author.to_string()),
        })
    }

    pub fn send_usiok(&mut self) -> Result<(), UsiError> {
        self.send(&EngineMessage::UsiOk)
    }

    pub fn send_readyok(&mut self) -> Result<(), UsiError> {
        self.send(&EngineMessage::ReadyOk)
    }

    pub fn send_bestmove(&mut self, mv: &str) -> Result<(), UsiError> {
        self.send(&EngineMessage::BestMove {
            mv: mv.to_string(),
            ponder: None,
        })
    }

    pub fn send_info(&mut self, info: EngineInfo) -> Result<(), UsiError> {
        self.send(&EngineMessage::Info(info))
    }
}

/// Create a USI engine using stdin/stdout.
pub fn stdio_engine() -> UsiEngine<std::io::BufReader<std::io::Stdin>, std::io::Stdout> {
    UsiEngine::new(std::io::BufReader::new(std::io::stdin()), std::io::stdout())
}
