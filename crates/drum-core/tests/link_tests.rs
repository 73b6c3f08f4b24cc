// Host-side tests for the sensor connection lifecycle and score records.

use drum_core::*;
use std::time::Duration;

#[test]
fn refused_connection_retries_after_fixed_delay() {
    let mut link = SensorLink::default();
    assert_eq!(link.state(), LinkState::Connecting { attempt: 1 });
    // relay not running: close without ever opening
    assert_eq!(link.on_close(), Some(Duration::from_secs(1)));
    assert_eq!(link.state(), LinkState::Reconnecting { attempt: 2 });
    assert!(link.begin_reconnect());
    assert_eq!(link.state(), LinkState::Connecting { attempt: 2 });
    assert_eq!(link.attempts(), 2);
}

#[test]
fn retries_indefinitely() {
    let mut link = SensorLink::default();
    for attempt in 2..200 {
        assert_eq!(link.on_close(), Some(SENSOR_RECONNECT_DELAY));
        assert!(link.begin_reconnect());
        assert_eq!(link.attempts(), attempt);
    }
}

#[test]
fn dropped_open_connection_reconnects() {
    let mut link = SensorLink::new(LinkParams {
        reconnect_delay: Duration::from_millis(250),
    });
    link.on_open();
    assert!(link.is_open());
    assert_eq!(link.on_close(), Some(Duration::from_millis(250)));
    assert!(!link.is_open());
    assert!(link.begin_reconnect());
    link.on_open();
    assert!(link.is_open());
}

#[test]
fn close_stops_reconnecting() {
    let mut link = SensorLink::default();
    link.on_open();
    link.close();
    assert!(link.is_closed());
    assert_eq!(link.on_close(), None);
    assert!(!link.begin_reconnect());
    link.on_open();
    assert!(link.is_closed());
}

#[test]
fn close_while_waiting_cancels_the_pending_retry() {
    let mut link = SensorLink::default();
    link.on_close();
    link.close();
    assert!(!link.begin_reconnect());
}

#[test]
fn score_record_flattens_the_result() {
    let mut acc = ScoreAccumulator::default();
    acc.record(Judgment::Perfect);
    acc.record(Judgment::Good);
    let record = ScoreRecord::new("player1", "warmup", acc.result(), "2024-01-01T00:00:00.000Z");
    let json: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
    assert_eq!(json["userId"], "player1");
    assert_eq!(json["trackId"], "warmup");
    assert_eq!(json["timestamp"], "2024-01-01T00:00:00.000Z");
    assert_eq!(json["score"], 15);
    assert_eq!(json["accuracy"], 75.0);
    assert_eq!(json["totalNotes"], 2);
}

#[test]
fn reporters_receive_records() {
    let record = ScoreRecord::new(DEFAULT_USER_ID, "warmup", GameResult::default(), "t");
    let mut sink: Vec<ScoreRecord> = Vec::new();
    sink.report(&record);
    LogReporter.report(&record);
    assert_eq!(sink, vec![record]);
}
