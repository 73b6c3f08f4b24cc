use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// requestAnimationFrame loop that parks itself when `step` returns false
/// and can be woken again with [`FrameLoop::start`].
pub struct FrameLoop {
    raf_id: Rc<Cell<Option<i32>>>,
    tick: Tick,
}

impl FrameLoop {
    pub fn new(mut step: impl FnMut() -> bool + 'static) -> Self {
        let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let tick: Tick = Rc::new(RefCell::new(None));
        let tick_weak = Rc::downgrade(&tick);
        let raf_tick = raf_id.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            raf_tick.set(None);
            if !step() {
                return;
            }
            if let Some(tick) = tick_weak.upgrade() {
                raf_tick.set(request_frame(&tick));
            }
        }) as Box<dyn FnMut()>));
        Self { raf_id, tick }
    }

    /// No-op while a frame is already pending.
    pub fn start(&self) {
        if self.raf_id.get().is_none() {
            self.raf_id.set(request_frame(&self.tick));
        }
    }

    pub fn stop(&self) {
        if let (Some(id), Some(w)) = (self.raf_id.take(), web::window()) {
            if let Err(e) = w.cancel_animation_frame(id) {
                log::warn!("[frame] cancelAnimationFrame failed: {:?}", e);
            }
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        // a pending frame must not call into a freed closure
        self.stop();
    }
}

fn request_frame(tick: &Tick) -> Option<i32> {
    let w = web::window()?;
    let tick = tick.borrow();
    let closure = tick.as_ref()?;
    w.request_animation_frame(closure.as_ref().unchecked_ref())
        .map_err(|e| log::error!("[frame] requestAnimationFrame failed: {:?}", e))
        .ok()
}
