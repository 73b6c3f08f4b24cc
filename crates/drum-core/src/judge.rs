use crate::constants::{
    BAD_POINTS, BAD_WINDOW, GOOD_POINTS, GOOD_WINDOW, PERFECT_POINTS, PERFECT_WINDOW,
};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Judgment {
    Perfect,
    Good,
    Bad, // also recorded for notes that fall past the miss line
}

impl Judgment {
    pub const ALL: [Judgment; 3] = [Judgment::Perfect, Judgment::Good, Judgment::Bad];

    #[inline]
    pub fn points(self) -> u32 {
        match self {
            Judgment::Perfect => PERFECT_POINTS,
            Judgment::Good => GOOD_POINTS,
            Judgment::Bad => BAD_POINTS,
        }
    }

    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Judgment::Perfect => "Perfect",
            Judgment::Good => "Good",
            Judgment::Bad => "Bad",
        }
    }
}

impl fmt::Display for Judgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Distance bands around the target line, inclusive upper bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JudgeWindows {
    pub perfect: f32,
    pub good: f32,
    pub bad: f32,
}

impl Default for JudgeWindows {
    fn default() -> Self {
        Self {
            perfect: PERFECT_WINDOW,
            good: GOOD_WINDOW,
            bad: BAD_WINDOW,
        }
    }
}

impl JudgeWindows {
    /// First matching band wins. `None` means the note is too far away to be
    /// judged and keeps falling.
    pub fn judge(&self, distance: f32) -> Option<Judgment> {
        let d = distance.abs();
        if d <= self.perfect {
            Some(Judgment::Perfect)
        } else if d <= self.good {
            Some(Judgment::Good)
        } else if d <= self.bad {
            Some(Judgment::Bad)
        } else {
            None
        }
    }
}
