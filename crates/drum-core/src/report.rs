use crate::score::GameResult;
use serde::Serialize;

pub const DEFAULT_USER_ID: &str = "guest";

/// What the page hands to the score store once a session ends.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub user_id: String,
    pub track_id: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub result: GameResult,
}

impl ScoreRecord {
    pub fn new(
        user_id: impl Into<String>,
        track_id: impl Into<String>,
        result: GameResult,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            track_id: track_id.into(),
            timestamp: timestamp.into(),
            result,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Receives finalised scores. Fire-and-forget: reporting never fails the session.
pub trait ScoreReporter {
    fn report(&mut self, record: &ScoreRecord);
}

/// Writes records to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl ScoreReporter for LogReporter {
    fn report(&mut self, record: &ScoreRecord) {
        log::info!(
            "[score] user={} track={} score={} accuracy={:.2}% ({} notes: {}/{}/{})",
            record.user_id,
            record.track_id,
            record.result.score,
            record.result.accuracy,
            record.result.total_notes,
            record.result.perfect_count,
            record.result.good_count,
            record.result.bad_count
        );
    }
}

impl ScoreReporter for Vec<ScoreRecord> {
    fn report(&mut self, record: &ScoreRecord) {
        self.push(record.clone());
    }
}
