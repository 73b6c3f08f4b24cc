use crate::dom;
use drum_core::{LinkParams, SensorLink};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// WebSocket link to the drum relay. Reconnects after every close until
/// [`SensorConnection::close`] is called.
pub struct SensorConnection {
    inner: Rc<RefCell<Inner>>,
}

struct Inner {
    url: String,
    link: SensorLink,
    socket: Option<web::WebSocket>,
    handlers: Option<Handlers>,
    on_message: Rc<dyn Fn(&str)>,
}

// Kept until the next socket replaces them; a closure may still be running
// when its socket closes.
struct Handlers {
    _open: Closure<dyn FnMut()>,
    _message: Closure<dyn FnMut(web::MessageEvent)>,
    _close: Closure<dyn FnMut(web::CloseEvent)>,
    _error: Closure<dyn FnMut(web::Event)>,
}

impl SensorConnection {
    pub fn open(url: &str, params: LinkParams, on_message: impl Fn(&str) + 'static) -> Self {
        let inner = Rc::new(RefCell::new(Inner {
            url: url.to_string(),
            link: SensorLink::new(params),
            socket: None,
            handlers: None,
            on_message: Rc::new(on_message),
        }));
        connect(&inner);
        Self { inner }
    }

    pub fn is_open(&self) -> bool {
        self.inner.borrow().link.is_open()
    }

    /// Close for good: detach handlers first so no reconnect is scheduled.
    pub fn close(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.link.close();
        if let Some(socket) = inner.detach() {
            if let Err(e) = socket.close() {
                log::warn!("[sensor] close error: {:?}", e);
            }
        }
        inner.handlers = None;
        log::info!("[sensor] closed {}", inner.url);
    }
}

impl Drop for SensorConnection {
    fn drop(&mut self) {
        if !self.inner.borrow().link.is_closed() {
            self.close();
        }
    }
}

impl Inner {
    fn detach(&mut self) -> Option<web::WebSocket> {
        let socket = self.socket.take()?;
        socket.set_onopen(None);
        socket.set_onmessage(None);
        socket.set_onclose(None);
        socket.set_onerror(None);
        Some(socket)
    }
}

fn connect(inner: &Rc<RefCell<Inner>>) {
    let url = inner.borrow().url.clone();
    let socket = match web::WebSocket::new(&url) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("[sensor] cannot open {}: {:?}", url, e);
            let delay = inner.borrow_mut().link.on_close();
            if let Some(delay) = delay {
                schedule_reconnect(Rc::downgrade(inner), delay);
            }
            return;
        }
    };
    log::info!(
        "[sensor] connecting to {} (attempt {})",
        url,
        inner.borrow().link.attempts()
    );

    let weak = Rc::downgrade(inner);
    let on_open = {
        let weak = weak.clone();
        Closure::wrap(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.borrow_mut();
                inner.link.on_open();
                log::info!("[sensor] connected to {}", inner.url);
            }
        }) as Box<dyn FnMut()>)
    };
    let on_message = {
        let weak = weak.clone();
        Closure::wrap(Box::new(move |ev: web::MessageEvent| {
            let Some(text) = ev.data().as_string() else {
                return;
            };
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let handler = inner.borrow().on_message.clone();
            handler(&text);
        }) as Box<dyn FnMut(web::MessageEvent)>)
    };
    let on_close = {
        let weak = weak.clone();
        Closure::wrap(Box::new(move |ev: web::CloseEvent| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let delay = {
                let mut inner = inner.borrow_mut();
                inner.detach();
                inner.link.on_close()
            };
            if let Some(delay) = delay {
                log::warn!(
                    "[sensor] disconnected (code {}), retrying in {} ms",
                    ev.code(),
                    delay.as_millis()
                );
                schedule_reconnect(weak.clone(), delay);
            }
        }) as Box<dyn FnMut(web::CloseEvent)>)
    };
    let on_error = Closure::wrap(Box::new(move |_ev: web::Event| {
        log::warn!("[sensor] socket error");
    }) as Box<dyn FnMut(web::Event)>);

    socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));
    socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    let mut inner = inner.borrow_mut();
    inner.socket = Some(socket);
    inner.handlers = Some(Handlers {
        _open: on_open,
        _message: on_message,
        _close: on_close,
        _error: on_error,
    });
}

fn schedule_reconnect(weak: Weak<RefCell<Inner>>, delay: Duration) {
    let ms = delay.as_millis().min(i32::MAX as u128) as i32;
    dom::set_timeout_once(ms, move || {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let again = inner.borrow_mut().link.begin_reconnect();
        if again {
            connect(&inner);
        }
    });
}
