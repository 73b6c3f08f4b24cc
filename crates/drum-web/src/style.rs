// Pure presentation helpers; no DOM access so they can be tested on the host.

// Lane backgrounds, left to right: idle / pressed
pub const LANE_IDLE_COLORS: [&str; 3] = ["#afa1d5", "#a287b9", "#c0abc8"];
pub const LANE_PRESSED_COLORS: [&str; 3] = ["#c3b1da", "#ad9cc3", "#dabfdc"];

// Hit label sits this far above the target line
pub const FEEDBACK_OFFSET_PX: f32 = 30.0;

#[inline]
pub fn lane_background(lane_index: usize, pressed: bool) -> &'static str {
    let palette = if pressed {
        &LANE_PRESSED_COLORS
    } else {
        &LANE_IDLE_COLORS
    };
    palette[lane_index.min(palette.len() - 1)]
}

#[inline]
pub fn px(value: f32) -> String {
    format!("{}px", value.round() as i32)
}

#[inline]
pub fn feedback_top(target_line_y: f32) -> String {
    px(target_line_y - FEEDBACK_OFFSET_PX)
}

/// Elapsed share of the track as a CSS width, "0%" while the duration is unknown.
pub fn progress_width(current_sec: f64, duration_sec: f64) -> String {
    if !duration_sec.is_finite() || duration_sec <= 0.0 || !current_sec.is_finite() {
        return "0%".to_string();
    }
    let pct = (current_sec / duration_sec * 100.0).clamp(0.0, 100.0);
    format!("{:.2}%", pct)
}

/// CSS class of a note in the given lane, e.g. `note note_s`.
pub fn note_class(lane_key: &str) -> String {
    format!("note note_{}", lane_key)
}
