use crate::constants::MAX_POINTS_PER_NOTE;
use crate::judge::Judgment;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreAccumulator {
    pub total_score: u32,
    pub total_judged_notes: u32,
    pub perfect_count: u32,
    pub good_count: u32,
    pub bad_count: u32,
}

impl ScoreAccumulator {
    pub fn record(&mut self, judgment: Judgment) {
        match judgment {
            Judgment::Perfect => self.perfect_count += 1,
            Judgment::Good => self.good_count += 1,
            Judgment::Bad => self.bad_count += 1,
        }
        self.total_score += judgment.points();
        self.total_judged_notes += 1;
    }

    pub fn count(&self, judgment: Judgment) -> u32 {
        match judgment {
            Judgment::Perfect => self.perfect_count,
            Judgment::Good => self.good_count,
            Judgment::Bad => self.bad_count,
        }
    }

    /// Percentage of the maximum score, rounded to two decimals; 0 when nothing was judged.
    pub fn accuracy(&self) -> f64 {
        if self.total_judged_notes == 0 {
            return 0.0;
        }
        let max_score = self.total_judged_notes as f64 * MAX_POINTS_PER_NOTE as f64;
        round2(self.total_score as f64 / max_score * 100.0)
    }

    pub fn result(&self) -> GameResult {
        GameResult {
            accuracy: self.accuracy(),
            score: self.total_score,
            total_notes: self.total_judged_notes,
            perfect_count: self.perfect_count,
            good_count: self.good_count,
            bad_count: self.bad_count,
        }
    }
}

/// Final summary of one playback session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub accuracy: f64,
    pub score: u32,
    pub total_notes: u32,
    pub perfect_count: u32,
    pub good_count: u32,
    pub bad_count: u32,
}

#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
