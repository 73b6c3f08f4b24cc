use drum_core::{PendingSpawn, SpawnTimer};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Spawn timers backed by `setTimeout`.
///
/// Fired spawns are handed to `sink`; the sink decides which session they
/// belong to.
pub struct TimeoutTimer {
    sink: Rc<dyn Fn(PendingSpawn)>,
}

/// Keeps the callback alive until the timeout fires or is cleared.
pub struct TimeoutHandle {
    id: Option<i32>,
    _callback: Closure<dyn FnMut()>,
}

impl TimeoutTimer {
    pub fn new(sink: impl Fn(PendingSpawn) + 'static) -> Self {
        Self {
            sink: Rc::new(sink),
        }
    }
}

impl SpawnTimer for TimeoutTimer {
    type Handle = TimeoutHandle;

    // setTimeout counts from the call, so `now` is not needed here
    fn schedule(&mut self, _now: Duration, delay: Duration, spawn: PendingSpawn) -> TimeoutHandle {
        let sink = self.sink.clone();
        let callback = Closure::wrap(Box::new(move || sink(spawn)) as Box<dyn FnMut()>);
        let ms = delay.as_millis().min(i32::MAX as u128) as i32;
        let id = web::window().and_then(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                ms,
            )
            .map_err(|e| log::error!("[timers] setTimeout failed: {:?}", e))
            .ok()
        });
        TimeoutHandle {
            id,
            _callback: callback,
        }
    }

    fn cancel(&mut self, handle: TimeoutHandle) {
        if let (Some(id), Some(w)) = (handle.id, web::window()) {
            w.clear_timeout_with_handle(id);
        }
    }
}
