//! Keyboard and sensor input, normalised into lane triggers.
//!
//! Both sources produce the same [`LaneTrigger`]; the source tag is kept for
//! logging only. Pressed flags drive the lane highlight: keys hold the flag
//! until key-up, sensor hits flash it for a fixed time because the pad sends
//! no release.

use crate::constants::SENSOR_FLASH_DURATION;
use crate::lane::{Lane, LANE_COUNT};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriggerSource {
    Keyboard,
    Sensor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaneTrigger {
    pub lane: Lane,
    pub source: TriggerSource,
}

impl LaneTrigger {
    #[inline]
    pub fn keyboard(lane: Lane) -> Self {
        Self {
            lane,
            source: TriggerSource::Keyboard,
        }
    }

    #[inline]
    pub fn sensor(lane: Lane) -> Self {
        Self {
            lane,
            source: TriggerSource::Sensor,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum PressFlag {
    #[default]
    Released,
    Held,
    Flash {
        until: Duration,
    },
}

#[derive(Clone, Debug)]
pub struct InputAdapter {
    flags: [PressFlag; LANE_COUNT],
    flash: Duration,
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new(SENSOR_FLASH_DURATION)
    }
}

impl InputAdapter {
    pub fn new(flash: Duration) -> Self {
        Self {
            flags: [PressFlag::Released; LANE_COUNT],
            flash,
        }
    }

    pub fn key_down(&mut self, key: &str) -> Option<LaneTrigger> {
        let lane = Lane::from_key(key)?;
        self.flags[lane.index()] = PressFlag::Held;
        Some(LaneTrigger::keyboard(lane))
    }

    /// Visual only; returns the released lane.
    pub fn key_up(&mut self, key: &str) -> Option<Lane> {
        let lane = Lane::from_key(key)?;
        self.flags[lane.index()] = PressFlag::Released;
        Some(lane)
    }

    /// Unrecognised tokens are dropped silently (noisy serial line).
    pub fn sensor_message(&mut self, message: &str, now: Duration) -> Option<LaneTrigger> {
        let token = message.trim();
        let Some(lane) = Lane::from_sensor_token(token) else {
            log::debug!("[input] ignoring sensor token {:?}", token);
            return None;
        };
        let slot = &mut self.flags[lane.index()];
        // a key already held stays held
        if *slot != PressFlag::Held {
            *slot = PressFlag::Flash {
                until: now + self.flash,
            };
        }
        Some(LaneTrigger::sensor(lane))
    }

    /// Release expired sensor flashes. Returns true if any flag changed.
    pub fn update(&mut self, now: Duration) -> bool {
        let mut changed = false;
        for flag in &mut self.flags {
            if let PressFlag::Flash { until } = *flag {
                if now >= until {
                    *flag = PressFlag::Released;
                    changed = true;
                }
            }
        }
        changed
    }

    #[inline]
    pub fn pressed(&self, lane: Lane) -> bool {
        self.flags[lane.index()] != PressFlag::Released
    }

    pub fn any_pressed(&self) -> bool {
        self.flags.iter().any(|f| *f != PressFlag::Released)
    }

    pub fn release_all(&mut self) {
        self.flags = [PressFlag::Released; LANE_COUNT];
    }
}
