//! USI info command types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An engine score, relative to the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Score {
    Cp(i32),
    /// Plies to mate; negative when the side to move is getting mated.
    Mate(i32),
}

impl Score {
    /// Magnitude a mate score saturates toward.
    pub const MATE_VALUE: i32 = 100_000;

    /// Collapses the score to a single number.
    ///
    /// `mate n` becomes `sign(n) * (MATE_VALUE - |n|)` so shorter mates rank
    /// higher; `mate 0` is treated as positive.
    pub fn to_value(self) -> i32 {
        match self {
            Score::Cp(cp) => cp,
            Score::Mate(m) => {
                let magnitude = Self::MATE_VALUE - m.saturating_abs().min(Self::MATE_VALUE);
                if m < 0 {
                    -magnitude
                } else {
                    magnitude
                }
            }
        }
    }
}

/// One parsed `info` line. Fields the engine did not send stay unset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineInfo {
    pub depth: Option<u32>,
    pub seldepth: Option<u32>,
    /// Relative to the side to move.
    pub score: Option<Score>,
    pub nodes: Option<u64>,
    pub nps: Option<u64>,
    /// Milliseconds since `go`.
    pub time: Option<u64>,
    pub pv: Vec<String>,
    pub currmove: Option<String>,
    /// Per mille.
    pub hashfull: Option<u32>,
    /// Free text after `string`, always last on the line.
    pub string: Option<String>,
}

/// Keys followed by exactly one numeric value.
const NUMERIC_KEYS: [&str; 6] = ["depth", "seldepth", "time", "nodes", "nps", "hashfull"];

/// Keys that end a `pv` list.
const KEYWORDS: [&str; 11] = [
    "depth", "seldepth", "time", "nodes", "nps", "hashfull", "score", "currmove", "pv",
    "multipv", "string",
];

impl EngineInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_usi(&self) -> String {
        self.to_string()
    }

    fn numeric(&self, key: &str) -> Option<u64> {
        match key {
            "depth" => self.depth.map(u64::from),
            "seldepth" => self.seldepth.map(u64::from),
            "time" => self.time,
            "nodes" => self.nodes,
            "nps" => self.nps,
            "hashfull" => self.hashfull.map(u64::from),
            _ => None,
        }
    }

    fn set_numeric(&mut self, key: &str, value: &str) {
        match key {
            "depth" => self.depth = value.parse().ok(),
            "seldepth" => self.seldepth = value.parse().ok(),
            "time" => self.time = value.parse().ok(),
            "nodes" => self.nodes = value.parse().ok(),
            "nps" => self.nps = value.parse().ok(),
            "hashfull" => self.hashfull = value.parse().ok(),
            _ => {}
        }
    }

    /// Parses an `info ...` line. Unknown keys are skipped and a malformed
    /// value leaves its field unset.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace().peekable();
        if tokens.next()? != "info" {
            return None;
        }

        let mut info = EngineInfo::new();
        while let Some(key) = tokens.next() {
            match key {
                k if NUMERIC_KEYS.contains(&k) => {
                    if let Some(value) = tokens.next() {
                        info.set_numeric(k, value);
                    }
                }
                "score" => {
                    let kind = tokens.next();
                    let value = tokens.next().and_then(|v| v.parse().ok());
                    info.score = match (kind, value) {
                        (Some("cp"), Some(v)) => Some(Score::Cp(v)),
                        (Some("mate"), Some(v)) => Some(Score::Mate(v)),
                        _ => None,
                    };
                    tokens.next_if(|t| matches!(*t, "lowerbound" | "upperbound"));
                }
                "currmove" => info.currmove = tokens.next().map(str::to_string),
                "pv" => {
                    while let Some(mv) = tokens.next_if(|t| !KEYWORDS.contains(t)) {
                        info.pv.push(mv.to_string());
                    }
                }
                "string" => {
                    let rest: Vec<&str> = tokens.by_ref().collect();
                    info.string = Some(rest.join(" "));
                }
                _ => {}
            }
        }
        Some(info)
    }
}

impl fmt::Display for EngineInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("info")?;
        for key in NUMERIC_KEYS {
            if let Some(value) = self.numeric(key) {
                write!(f, " {} {}", key, value)?;
            }
        }
        match self.score {
            Some(Score::Cp(cp)) => write!(f, " score cp {}", cp)?,
            Some(Score::Mate(m)) => write!(f, " score mate {}", m)?,
            None => {}
        }
        if let Some(mv) = &self.currmove {
            write!(f, " currmove {}", mv)?;
        }
        if !self.pv.is_empty() {
            write!(f, " pv {}", self.pv.join(" "))?;
        }
        if let Some(text) = &self.string {
            write!(f, " string {}", text)?;
        }
        Ok(())
    }
}

/// Builds the `info` lines an engine sends while searching.
#[derive(Default)]
pub struct InfoBuilder {
    info: EngineInfo,
}

impl InfoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.info.depth = Some(depth);
        self
    }

    pub fn score_cp(mut self, cp: i32) -> Self {
        self.info.score = Some(Score::Cp(cp));
        self
    }

    pub fn nodes(mut self, nodes: u64) -> Self {
        self.info.nodes = Some(nodes);
        self
    }

    pub fn time(mut self, millis: u64) -> Self {
        self.info.time = Some(millis);
        self
    }

    pub fn pv(mut self, line: Vec<String>) -> Self {
        self.info.pv = line;
        self
    }

    pub fn build(self) -> EngineInfo {
        self.info
    }
}
