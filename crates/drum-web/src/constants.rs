// DOM hooks shared with the host page.

pub const GAME_CONTAINER_CLASS: &str = "game_container";
pub const LANE_CLASS_PREFIX: &str = "square"; // square1..square3
pub const TARGET_LINE_CLASS: &str = "horizontal_line";
pub const HIT_RESULT_CLASS: &str = "hit_result";
pub const TIMEBAR_ELAPSED_ID: &str = "timebar-elapsed"; // optional progress bar

// Bundled chart documents, keyed by track id
pub static TRACKS_JSON: &str = include_str!("../charts/tracks.json");
