// host.rs - requestAnimationFrame and window resize events

use std::cell::RefCell;
use std::rc::Weak;

use log::warn;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window};

use super::canvas::{CanvasSurface, fit_to_window};
use crate::renderer::{FrameHost, StarfieldRenderer};

type Target = RefCell<StarfieldRenderer<CanvasSurface, WebHost, ChaCha8Rng>>;

pub struct WebHost {
    window: Option<Window>,
    on_frame: Option<Closure<dyn FnMut(f64)>>,
    on_resize: Option<Closure<dyn FnMut()>>,
    listening: bool,
}

impl WebHost {
    pub fn new() -> Self {
        Self {
            window: web_sys::window(),
            on_frame: None,
            on_resize: None,
            listening: false,
        }
    }

    /// Build the JS callbacks that drive `renderer`. The canvas is refit to
    /// the window before each resize reaches the renderer.
    pub(crate) fn install(&mut self, renderer: Weak<Target>, canvas: HtmlCanvasElement) {
        let frame_target = renderer.clone();
        self.on_frame = Some(Closure::<dyn FnMut(f64)>::new(move |now: f64| {
            if let Some(r) = frame_target.upgrade() {
                r.borrow_mut().frame(now);
            }
        }));

        self.on_resize = Some(Closure::<dyn FnMut()>::new(move || {
            fit_to_window(&canvas);
            if let Some(r) = renderer.upgrade() {
                r.borrow_mut().resize();
            }
        }));
    }
}

impl Default for WebHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameHost for WebHost {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let window = self.window.as_ref()?;
        let cb = self.on_frame.as_ref()?;
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("requestAnimationFrame failed: {e:?}");
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Some(window) = &self.window
            && let Err(e) = window.cancel_animation_frame(handle)
        {
            warn!("cancelAnimationFrame({handle}) failed: {e:?}");
        }
    }

    fn listen_resize(&mut self) {
        if self.listening {
            return;
        }
        let (Some(window), Some(cb)) = (&self.window, &self.on_resize) else {
            return;
        };
        match window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref()) {
            Ok(()) => self.listening = true,
            Err(e) => warn!("resize listener not registered: {e:?}"),
        }
    }

    fn unlisten_resize(&mut self) {
        if !self.listening {
            return;
        }
        if let (Some(window), Some(cb)) = (&self.window, &self.on_resize)
            && let Err(e) =
                window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
        {
            warn!("resize listener not removed: {e:?}");
        }
        self.listening = false;
    }
}
