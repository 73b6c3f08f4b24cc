// Host-side tests for the pure presentation helpers and bundled charts.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod style {
    include!("../src/style.rs");
}

use drum_core::{Chart, ChartLibrary, ChartSource, Lane, TARGET_LINE_Y};
use style::*;

const TRACKS_JSON: &str = include_str!("../charts/tracks.json");

#[test]
fn lane_colours_follow_pressed_flag() {
    assert_eq!(lane_background(0, false), "#afa1d5");
    assert_eq!(lane_background(1, false), "#a287b9");
    assert_eq!(lane_background(2, false), "#c0abc8");
    assert_eq!(lane_background(0, true), "#c3b1da");
    assert_eq!(lane_background(1, true), "#ad9cc3");
    assert_eq!(lane_background(2, true), "#dabfdc");
}

#[test]
fn lane_colour_index_is_clamped() {
    assert_eq!(lane_background(7, false), LANE_IDLE_COLORS[2]);
}

#[test]
fn px_rounds_to_whole_pixels() {
    assert_eq!(px(0.0), "0px");
    assert_eq!(px(530.0), "530px");
    assert_eq!(px(12.6), "13px");
    assert_eq!(px(-4.2), "-4px");
}

#[test]
fn feedback_sits_above_target_line() {
    assert_eq!(feedback_top(TARGET_LINE_Y), "500px");
}

#[test]
fn progress_is_zero_until_duration_known() {
    assert_eq!(progress_width(3.0, f64::NAN), "0%");
    assert_eq!(progress_width(3.0, 0.0), "0%");
    assert_eq!(progress_width(f64::NAN, 10.0), "0%");
}

#[test]
fn progress_is_clamped_percentage() {
    assert_eq!(progress_width(0.0, 200.0), "0.00%");
    assert_eq!(progress_width(50.0, 200.0), "25.00%");
    assert_eq!(progress_width(1.0, 3.0), "33.33%");
    assert_eq!(progress_width(250.0, 200.0), "100.00%");
}

#[test]
fn note_class_names_lane_key() {
    assert_eq!(note_class(Lane::Cymbal.key()), "note note_a");
    assert_eq!(note_class(Lane::HighTom.key()), "note note_d");
}

#[test]
fn bundled_tracks_parse() {
    let library = ChartLibrary::from_json(TRACKS_JSON).expect("bundled charts are valid");
    assert_eq!(library.track_ids(), vec!["backbeat", "fills", "warmup"]);
    for id in library.track_ids() {
        let chart: &Chart = library.chart(id).unwrap();
        assert!(!chart.is_empty(), "{} has notes", id);
        assert!(!chart.title.is_empty());
        let times: Vec<f64> = chart.entries().iter().map(|e| e.time_sec).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]), "{} is sorted", id);
    }
}

#[test]
fn bundled_tracks_use_every_lane() {
    let library = ChartLibrary::from_json(TRACKS_JSON).unwrap();
    let fills = library.chart("fills").unwrap();
    for lane in Lane::ALL {
        assert!(fills.notes_in_lane(lane) > 0, "{} unused", lane);
    }
}
