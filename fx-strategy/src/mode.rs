use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Multi-provider dispatch strategy, selected per request or set as
/// the process default via config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Race,
    Robin,
    First,
    Random,
    Priority,
    Aggregate,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Race => "race",
            Mode::Robin => "robin",
            Mode::First => "first",
            Mode::Random => "random",
            Mode::Priority => "priority",
            Mode::Aggregate => "aggregate",
        };
        f.write_str(s)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "race" => Ok(Mode::Race),
            "robin" => Ok(Mode::Robin),
            "first" => Ok(Mode::First),
            "random" => Ok(Mode::Random),
            "priority" => Ok(Mode::Priority),
            "aggregate" => Ok(Mode::Aggregate),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}
