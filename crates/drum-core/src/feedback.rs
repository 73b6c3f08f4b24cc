use crate::constants::HIT_FEEDBACK_DURATION;
use crate::judge::Judgment;
use crate::lane::{Lane, LANE_COUNT};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitFeedback {
    pub judgment: Judgment,
    pub expires_at: Duration,
}

/// Self-expiring judgement labels, one slot per lane.
#[derive(Clone, Debug)]
pub struct FeedbackBoard {
    lanes: [Option<HitFeedback>; LANE_COUNT],
    duration: Duration,
}

impl Default for FeedbackBoard {
    fn default() -> Self {
        Self::new(HIT_FEEDBACK_DURATION)
    }
}

impl FeedbackBoard {
    pub fn new(duration: Duration) -> Self {
        Self {
            lanes: [None; LANE_COUNT],
            duration,
        }
    }

    /// A newer label replaces the lane's current one and restarts its timer.
    pub fn show(&mut self, lane: Lane, judgment: Judgment, now: Duration) {
        self.lanes[lane.index()] = Some(HitFeedback {
            judgment,
            expires_at: now + self.duration,
        });
    }

    pub fn expire(&mut self, now: Duration) {
        for slot in &mut self.lanes {
            if slot.is_some_and(|f| now >= f.expires_at) {
                *slot = None;
            }
        }
    }

    #[inline]
    pub fn get(&self, lane: Lane) -> Option<HitFeedback> {
        self.lanes[lane.index()]
    }

    /// Display text for the lane, empty when nothing is shown.
    pub fn label(&self, lane: Lane) -> &'static str {
        self.get(lane).map(|f| f.judgment.label()).unwrap_or("")
    }

    pub fn any_visible(&self) -> bool {
        self.lanes.iter().any(Option::is_some)
    }

    pub fn clear(&mut self) {
        self.lanes = [None; LANE_COUNT];
    }
}
