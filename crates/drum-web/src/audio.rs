use anyhow::anyhow;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// The track's `<audio>` element: play/pause, progress readout and an
/// end-of-track hook.
pub struct AudioTrack {
    element: web::HtmlAudioElement,
    ended: Option<Closure<dyn FnMut()>>,
}

impl AudioTrack {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let element = web::HtmlAudioElement::new_with_src(url)
            .map_err(|e| anyhow!("Audio element for {}: {:?}", url, e))?;
        Ok(Self {
            element,
            ended: None,
        })
    }

    pub fn on_ended(&mut self, handler: impl FnMut() + 'static) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        self.element
            .set_onended(Some(closure.as_ref().unchecked_ref()));
        self.ended = Some(closure);
    }

    /// Start from the beginning; `on_started` runs once the browser accepted
    /// playback. A rejected play (autoplay policy, bad URL) is only logged.
    pub fn play(&self, on_started: impl FnOnce() + 'static) {
        self.element.set_current_time(0.0);
        let promise = match self.element.play() {
            Ok(p) => p,
            Err(e) => {
                log::error!("[audio] play error: {:?}", e);
                return;
            }
        };
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => on_started(),
                Err(e) => log::error!("[audio] play rejected: {:?}", e),
            }
        });
    }

    pub fn pause(&self) {
        if let Err(e) = self.element.pause() {
            log::warn!("[audio] pause error: {:?}", e);
        }
    }

    #[inline]
    pub fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    /// NaN until metadata has loaded.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.element.duration()
    }
}

impl Drop for AudioTrack {
    fn drop(&mut self) {
        self.element.set_onended(None);
        self.pause();
    }
}
