use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

/// Descriptor used for a step that runs as soon as its predecessor finishes.
pub const START_IMMEDIATELY: &str = "Start immediately";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DelayUnit {
    #[default]
    Mins,
    Hours,
}

impl DelayUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DelayUnit::Mins => "mins",
            DelayUnit::Hours => "hours",
        }
    }

    pub fn minutes(&self) -> i64 {
        match self {
            DelayUnit::Mins => 1,
            DelayUnit::Hours => 60,
        }
    }
}

impl fmt::Display for DelayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DelayUnit {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mins" => Ok(DelayUnit::Mins),
            "hours" => Ok(DelayUnit::Hours),
            other => Err(WorkflowError::InvalidDelayUnit(other.to_string())),
        }
    }
}

/// Structured wait before a step fires.
///
/// The `delay` string stored on a node is only a rendering of this pair;
/// [`Delay::render`] and [`Delay::parse`] are inverses of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Delay {
    pub value: u32,
    pub unit: DelayUnit,
}

impl Delay {
    pub const IMMEDIATE: Delay = Delay {
        value: 0,
        unit: DelayUnit::Mins,
    };

    pub fn new(value: u32, unit: DelayUnit) -> Self {
        Self { value, unit }
    }

    pub fn mins(value: u32) -> Self {
        Self::new(value, DelayUnit::Mins)
    }

    pub fn hours(value: u32) -> Self {
        Self::new(value, DelayUnit::Hours)
    }

    pub fn is_immediate(&self) -> bool {
        self.value == 0
    }

    /// Zero renders as [`START_IMMEDIATELY`] whatever the unit.
    pub fn render(&self) -> String {
        if self.is_immediate() {
            START_IMMEDIATELY.to_string()
        } else {
            format!("{} {} delay", self.value, self.unit)
        }
    }

    /// Accepts only the exact text [`Delay::render`] produces, so a stored
    /// descriptor always agrees with its structured value.
    pub fn parse(descriptor: &str) -> Result<Self, WorkflowError> {
        if descriptor == START_IMMEDIATELY {
            return Ok(Delay::IMMEDIATE);
        }

        let invalid = || WorkflowError::InvalidDelay(descriptor.to_string());
        let mut parts = descriptor.split_whitespace();
        let (Some(value), Some(unit), Some("delay"), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let value: u32 = value.parse().map_err(|_| invalid())?;
        if value == 0 {
            return Err(invalid());
        }
        let unit = unit.parse::<DelayUnit>().map_err(|_| invalid())?;
        let delay = Delay { value, unit };
        if delay.render() != descriptor {
            return Err(invalid());
        }
        Ok(delay)
    }

    pub fn to_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.value) * self.unit.minutes())
    }
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
