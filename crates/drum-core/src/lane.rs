use crate::error::UnknownLane;
use std::fmt;
use std::str::FromStr;

pub const LANE_COUNT: usize = 3;

/// One column of the playfield, bound to one drum pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lane {
    Cymbal,
    Kick,
    HighTom,
}

impl Lane {
    pub const ALL: [Lane; LANE_COUNT] = [Lane::Cymbal, Lane::Kick, Lane::HighTom];

    /// Stable index used for per-lane arrays (left to right).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Lane::Cymbal => 0,
            Lane::Kick => 1,
            Lane::HighTom => 2,
        }
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<Lane> {
        Lane::ALL.get(index).copied()
    }

    /// Keyboard key bound to this lane; also the lane letter used by chart files.
    #[inline]
    pub fn key(self) -> &'static str {
        match self {
            Lane::Cymbal => "a",
            Lane::Kick => "s",
            Lane::HighTom => "d",
        }
    }

    /// Token the relay forwards when this pad is struck.
    #[inline]
    pub fn sensor_token(self) -> &'static str {
        match self {
            Lane::Cymbal => "CYMBAL",
            Lane::Kick => "KICK",
            Lane::HighTom => "HIGHTOM",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Lane::Cymbal => "cymbal",
            Lane::Kick => "kick",
            Lane::HighTom => "hightom",
        }
    }

    #[inline]
    pub fn from_key(key: &str) -> Option<Lane> {
        match key {
            "a" | "A" => Some(Lane::Cymbal),
            "s" | "S" => Some(Lane::Kick),
            "d" | "D" => Some(Lane::HighTom),
            _ => None,
        }
    }

    /// Exact, case-sensitive match against the relay tokens.
    #[inline]
    pub fn from_sensor_token(token: &str) -> Option<Lane> {
        Lane::ALL.into_iter().find(|l| l.sensor_token() == token)
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the chart letter (`a`/`s`/`d`), the lane name or the sensor token.
impl FromStr for Lane {
    type Err = UnknownLane;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Lane::from_key(s)
            .or_else(|| Lane::from_sensor_token(s))
            .or_else(|| {
                Lane::ALL
                    .into_iter()
                    .find(|l| l.name().eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| UnknownLane(s.to_string()))
    }
}
