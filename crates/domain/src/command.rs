//! Zone addresses and the logical commands a bridge understands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidArgument;

/// Lowest brightness level the bridge accepts.
pub const MIN_BRIGHTNESS: u8 = 2;
/// Highest brightness level the bridge accepts.
pub const MAX_BRIGHTNESS: u8 = 27;

/// Validate a raw brightness level.
///
/// # Errors
///
/// Returns [`InvalidArgument::Brightness`] unless `level` is in `2..=27`.
pub fn brightness(level: i64) -> Result<u8, InvalidArgument> {
    u8::try_from(level)
        .ok()
        .filter(|l| (MIN_BRIGHTNESS..=MAX_BRIGHTNESS).contains(l))
        .ok_or(InvalidArgument::Brightness(level))
}

/// Address of a zone on a bridge: `0` targets all zones, `1..=4` a single one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct ZoneId(u8);

impl ZoneId {
    /// The aggregate "all zones" address.
    pub const ALL: Self = Self(0);
    /// Number of individually addressable zones per bridge.
    pub const COUNT: u8 = 4;

    /// Build a zone address.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::Zone`] when `index` is above 4.
    pub fn new(index: u8) -> Result<Self, InvalidArgument> {
        if index <= Self::COUNT {
            Ok(Self(index))
        } else {
            Err(InvalidArgument::Zone(index.to_string()))
        }
    }

    /// The individual zones `1..=4`, in order.
    pub fn individual() -> impl Iterator<Item = Self> {
        (1..=Self::COUNT).map(Self)
    }

    /// Whether this addresses every zone at once.
    #[must_use]
    pub fn is_all(self) -> bool {
        self.0 == 0
    }

    /// Raw index, `0` for all zones.
    #[must_use]
    pub fn index(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ZoneId {
    type Error = InvalidArgument;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ZoneId> for u8 {
    fn from(zone: ZoneId) -> Self {
        zone.0
    }
}

impl FromStr for ZoneId {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(|index| Self::new(index).ok())
            .ok_or_else(|| InvalidArgument::Zone(s.to_string()))
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A logical bridge operation, independent of the wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PowerOn,
    PowerOff,
    /// Switch to the white LEDs.
    White,
    /// Switch to a hue, see [`Color::code`](crate::color::Color::code).
    Color(u8),
    /// Brightness level in `2..=27`.
    Brightness(u8),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PowerOn => f.write_str("on"),
            Self::PowerOff => f.write_str("off"),
            Self::White => f.write_str("white"),
            Self::Color(code) => write!(f, "color({code})"),
            Self::Brightness(level) => write!(f, "brightness({level})"),
        }
    }
}

/// A [`Command`] addressed to a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneCommand {
    pub zone: ZoneId,
    pub command: Command,
}

impl ZoneCommand {
    #[must_use]
    pub fn new(zone: ZoneId, command: Command) -> Self {
        Self { zone, command }
    }
}
