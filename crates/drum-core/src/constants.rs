use std::time::Duration;

// Shared playfield/timing tuning constants used by the core and the web frontend.

// Playfield geometry (pixels, y grows downward)
pub const SPAWN_LINE_Y: f32 = 0.0; // where a freshly spawned note appears
pub const TARGET_LINE_Y: f32 = 530.0; // judgement line
pub const MISS_LINE_Y: f32 = 580.0; // notes strictly below this are auto-missed
pub const FALL_STEP_PER_FRAME: f32 = 5.0; // constant fall per display refresh

// Judgement windows (absolute distance to the target line)
pub const PERFECT_WINDOW: f32 = 20.0;
pub const GOOD_WINDOW: f32 = 50.0;
pub const BAD_WINDOW: f32 = 100.0;

// Points per judgement
pub const PERFECT_POINTS: u32 = 10;
pub const GOOD_POINTS: u32 = 5;
pub const BAD_POINTS: u32 = 0;
pub const MAX_POINTS_PER_NOTE: u32 = PERFECT_POINTS;

// Transient UI annotations
pub const HIT_FEEDBACK_DURATION: Duration = Duration::from_millis(300);
pub const SENSOR_FLASH_DURATION: Duration = Duration::from_millis(100); // sensor has no release signal

// Sensor relay connection
pub const SENSOR_RECONNECT_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_SENSOR_URL: &str = "ws://localhost:8081";
