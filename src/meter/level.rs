use serde::{Serialize, Serializer};
use std::fmt;

/// Discrete speaking intensity, from silent (0) to loudest (4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    #[default]
    Silent,
    Low,
    Medium,
    High,
    Peak,
}

impl Level {
    pub fn as_u8(self) -> u8 {
        match self {
            Level::Silent => 0,
            Level::Low => 1,
            Level::Medium => 2,
            Level::High => 3,
            Level::Peak => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::Silent => "silent",
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
            Level::Peak => "peak",
        }
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Silent,
            1 => Level::Low,
            2 => Level::Medium,
            3 => Level::High,
            _ => Level::Peak,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

// Serialized as the integer value so downstream consumers see 0..=4.
impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}
