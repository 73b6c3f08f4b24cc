#![cfg(target_arch = "wasm32")]
use anyhow::anyhow;
use drum_core::{
    Chart, ChartLibrary, ChartSource, GameSession, InputAdapter, LinkParams, LogReporter,
    PendingSpawn, PlayfieldParams, ScoreRecord, ScoreReporter, DEFAULT_SENSOR_URL,
    DEFAULT_USER_ID,
};
use instant::Instant;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod frame;
mod keyboard;
mod playfield;
mod sensor;
mod style;
mod timers;

use audio::AudioTrack;
use frame::FrameLoop;
use keyboard::KeyboardListeners;
use playfield::Playfield;
use sensor::SensorConnection;
use timers::TimeoutTimer;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("drum-web ready");
    Ok(())
}

/// Build the gameplay view for `track_id` inside the element `container_id`.
///
/// `sensor_url` defaults to the local relay.
#[wasm_bindgen]
pub fn mount(
    container_id: &str,
    track_id: &str,
    audio_url: &str,
    sensor_url: Option<String>,
) -> Result<GameView, JsValue> {
    let sensor_url = sensor_url.unwrap_or_else(|| DEFAULT_SENSOR_URL.to_string());
    GameView::build(container_id, track_id, audio_url, &sensor_url)
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}

struct GameState {
    session: GameSession<TimeoutTimer>,
    input: InputAdapter,
    epoch: Instant,
    chart: Chart,
    track_id: String,
    user_id: String,
    result_callback: Option<js_sys::Function>,
    playfield: Playfield,
    audio: AudioTrack,
    frames: FrameLoop,
    mounted: bool,
}

impl GameState {
    #[inline]
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn start_session(&mut self) {
        if !self.mounted {
            return;
        }
        let now = self.now();
        self.playfield.clear_notes();
        let id = self.session.start(&self.chart, now);
        log::info!(
            "[view] session #{} on {} ({} notes)",
            id.0,
            self.track_id,
            self.chart.len()
        );
        self.frames.start();
    }

    fn spawn(&mut self, pending: PendingSpawn) {
        let now = self.now();
        if self.session.spawn(pending, now).is_some() {
            self.frames.start();
        }
    }

    fn key_down(&mut self, key: &str) {
        let now = self.now();
        if let Some(trigger) = self.input.key_down(key) {
            self.session.trigger(trigger, now);
            self.frames.start();
        }
    }

    fn key_up(&mut self, key: &str) {
        if self.input.key_up(key).is_some() {
            self.frames.start();
        }
    }

    fn sensor_message(&mut self, message: &str) {
        let now = self.now();
        if let Some(trigger) = self.input.sensor_message(message, now) {
            self.session.trigger(trigger, now);
            self.frames.start();
        }
    }

    /// One animation frame. Returns whether another frame is needed.
    fn step(&mut self) -> bool {
        let now = self.now();
        self.input.update(now);
        self.session.frame(now);
        self.playfield
            .render(self.session.notes(), self.session.feedback(), &self.input);
        self.playfield
            .set_progress(self.audio.current_time(), self.audio.duration());
        self.session.is_running() || self.session.feedback().any_visible() || self.input.any_pressed()
    }

    fn teardown(&mut self) {
        self.mounted = false;
        self.frames.stop();
        self.session.reset();
        self.input.release_all();
        self.audio.pause();
        self.playfield.remove();
    }
}

/// Ends the running session and hands the result to the reporters. The JS
/// callback runs with no borrow held so it may call back into the view.
fn finish_session(state: &Rc<RefCell<GameState>>) {
    let (record, callback) = {
        let mut s = state.borrow_mut();
        let Some(result) = s.session.end() else {
            return;
        };
        let record = ScoreRecord::new(&s.user_id, &s.track_id, result, dom::iso_timestamp());
        (record, s.result_callback.clone())
    };
    LogReporter.report(&record);
    if let Some(callback) = callback {
        JsCallbackReporter(callback).report(&record);
    }
}

/// Passes the record to a page callback as a plain JS object.
struct JsCallbackReporter(js_sys::Function);

impl ScoreReporter for JsCallbackReporter {
    fn report(&mut self, record: &ScoreRecord) {
        let value = record
            .to_json()
            .map_err(|e| anyhow!("encode score: {}", e))
            .and_then(|json| {
                js_sys::JSON::parse(&json).map_err(|e| anyhow!("parse score: {:?}", e))
            });
        match value {
            Ok(value) => {
                if let Err(e) = self.0.call1(&JsValue::NULL, &value) {
                    log::error!("[view] result callback threw: {:?}", e);
                }
            }
            Err(e) => log::error!("[view] {:#}", e),
        }
    }
}

#[wasm_bindgen]
pub struct GameView {
    state: Rc<RefCell<GameState>>,
    sensor: Option<SensorConnection>,
    keyboard: Option<KeyboardListeners>,
}

impl GameView {
    fn build(
        container_id: &str,
        track_id: &str,
        audio_url: &str,
        sensor_url: &str,
    ) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow!("no document"))?;
        let container = dom::element_by_id(&document, container_id)
            .ok_or_else(|| anyhow!("missing #{}", container_id))?;

        let library = ChartLibrary::from_json(constants::TRACKS_JSON)?;
        let chart = library
            .chart(track_id)
            .cloned()
            .ok_or_else(|| anyhow!("unknown track {:?}", track_id))?;

        let params = PlayfieldParams::default();
        let playfield = Playfield::mount(&document, &container, &params)?;
        let audio = AudioTrack::new(audio_url)?;

        let state = Rc::new_cyclic(|weak: &Weak<RefCell<GameState>>| {
            let on_spawn = weak.clone();
            let timer = TimeoutTimer::new(move |pending| {
                if let Some(state) = on_spawn.upgrade() {
                    state.borrow_mut().spawn(pending);
                }
            });
            let on_frame = weak.clone();
            let frames = FrameLoop::new(move || match on_frame.upgrade() {
                Some(state) => state.borrow_mut().step(),
                None => false,
            });
            RefCell::new(GameState {
                session: GameSession::new(timer, params),
                input: InputAdapter::default(),
                epoch: Instant::now(),
                chart,
                track_id: track_id.to_string(),
                user_id: DEFAULT_USER_ID.to_string(),
                result_callback: None,
                playfield,
                audio,
                frames,
                mounted: true,
            })
        });

        let on_ended = Rc::downgrade(&state);
        state.borrow_mut().audio.on_ended(move || {
            if let Some(state) = on_ended.upgrade() {
                finish_session(&state);
            }
        });

        let on_down = Rc::downgrade(&state);
        let on_up = Rc::downgrade(&state);
        let keyboard = KeyboardListeners::attach(
            &window,
            move |key| {
                if let Some(state) = on_down.upgrade() {
                    state.borrow_mut().key_down(key);
                }
            },
            move |key| {
                if let Some(state) = on_up.upgrade() {
                    state.borrow_mut().key_up(key);
                }
            },
        )?;

        let on_message = Rc::downgrade(&state);
        let sensor = SensorConnection::open(sensor_url, LinkParams::default(), move |msg| {
            if let Some(state) = on_message.upgrade() {
                state.borrow_mut().sensor_message(msg);
            }
        });

        log::info!("[view] mounted {} in #{}", track_id, container_id);
        Ok(Self {
            state,
            sensor: Some(sensor),
            keyboard: Some(keyboard),
        })
    }
}

#[wasm_bindgen]
impl GameView {
    /// Start the track from the top; the session begins once the audio
    /// actually plays. Calling it mid-session restarts without a result.
    pub fn play(&self) {
        let state = self.state.borrow();
        if !state.mounted {
            return;
        }
        let on_started = Rc::downgrade(&self.state);
        state.audio.play(move || {
            if let Some(state) = on_started.upgrade() {
                state.borrow_mut().start_session();
            }
        });
    }

    /// Pause the audio and end the session, reporting its result.
    pub fn stop(&self) {
        self.state.borrow().audio.pause();
        finish_session(&self.state);
    }

    /// `callback(record)` is called once per finished session with
    /// `{userId, trackId, timestamp, accuracy, score, ...}`.
    pub fn on_result(&self, callback: js_sys::Function) {
        self.state.borrow_mut().result_callback = Some(callback);
    }

    pub fn set_user(&self, user_id: String) {
        self.state.borrow_mut().user_id = user_id;
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.state.borrow().session.is_running()
    }

    #[wasm_bindgen(getter, js_name = sensorConnected)]
    pub fn sensor_connected(&self) -> bool {
        self.sensor.as_ref().map_or(false, SensorConnection::is_open)
    }

    /// Tear everything down. The view is inert afterwards.
    pub fn unmount(&mut self) {
        if let Some(sensor) = self.sensor.take() {
            sensor.close();
        }
        self.keyboard = None;
        self.state.borrow_mut().teardown();
        log::info!("[view] unmounted");
    }
}
