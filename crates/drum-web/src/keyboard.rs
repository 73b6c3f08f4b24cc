use anyhow::anyhow;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type KeyHandler = Closure<dyn FnMut(web::KeyboardEvent)>;

/// Window-level keydown/keyup listeners, removed again on drop.
pub struct KeyboardListeners {
    window: web::Window,
    keydown: KeyHandler,
    keyup: KeyHandler,
}

impl KeyboardListeners {
    /// `on_down` sees only the first event of a press; auto-repeat is dropped.
    pub fn attach(
        window: &web::Window,
        mut on_down: impl FnMut(&str) + 'static,
        mut on_up: impl FnMut(&str) + 'static,
    ) -> anyhow::Result<Self> {
        let keydown = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            if ev.repeat() {
                return;
            }
            on_down(&ev.key());
        }) as Box<dyn FnMut(web::KeyboardEvent)>);
        let keyup = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            on_up(&ev.key());
        }) as Box<dyn FnMut(web::KeyboardEvent)>);

        window
            .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("keydown listener: {:?}", e))?;
        window
            .add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("keyup listener: {:?}", e))?;

        Ok(Self {
            window: window.clone(),
            keydown,
            keyup,
        })
    }
}

impl Drop for KeyboardListeners {
    fn drop(&mut self) {
        for (event, handler) in [("keydown", &self.keydown), ("keyup", &self.keyup)] {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback(event, handler.as_ref().unchecked_ref())
            {
                log::warn!("[keyboard] remove {} listener: {:?}", event, e);
            }
        }
    }
}
