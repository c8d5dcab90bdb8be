// web/ - Browser bindings
//
// StarfieldLoader is what the loading screen holds: start it with the
// canvas element when the view mounts, stop (or free) it on unmount.
// Frame and resize callbacks hold a Weak to the renderer, so freeing the
// loader tears everything down.

mod canvas;
mod console;
mod host;

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::config::StarfieldConfig;
use crate::renderer::{LoopState, StarfieldRenderer};

pub use canvas::{CanvasSurface, fit_to_window};
pub use console::init_logging;
pub use host::WebHost;

type SharedRenderer = Rc<RefCell<StarfieldRenderer<CanvasSurface, WebHost, ChaCha8Rng>>>;

#[wasm_bindgen]
pub struct StarfieldLoader {
    renderer: SharedRenderer,
}

#[wasm_bindgen]
impl StarfieldLoader {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::build(StarfieldConfig::default(), random_seed())
    }

    /// Config as a JSON object; fields it leaves out keep their defaults.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<StarfieldLoader, JsValue> {
        let config = StarfieldConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::build(config, random_seed()))
    }

    /// Deterministic field, for screenshots.
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(seed: u64) -> StarfieldLoader {
        Self::build(StarfieldConfig::default(), seed)
    }

    /// Start drawing on `canvas`. Without a 2D context the loader stays idle.
    pub fn start(&self, canvas: HtmlCanvasElement) {
        let mut renderer = self.renderer.borrow_mut();
        // Live callbacks belong to the running loop; leave them alone
        if renderer.state() != LoopState::Idle {
            log::debug!("star field loader already {:?}", renderer.state());
            return;
        }

        let surface = CanvasSurface::new(canvas);
        if let Some(surface) = &surface {
            fit_to_window(surface.canvas());
            let weak = Rc::downgrade(&self.renderer);
            renderer.host_mut().install(weak, surface.canvas().clone());
        }

        if let Err(e) = renderer.start(surface) {
            log::debug!("star field loader not started: {e}");
        }
    }

    pub fn stop(&self) {
        self.renderer.borrow_mut().stop();
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.renderer.borrow().state() == LoopState::Running
    }
}

impl Default for StarfieldLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl StarfieldLoader {
    fn build(config: StarfieldConfig, seed: u64) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(seed);
        let renderer = StarfieldRenderer::new(config, WebHost::new(), rng);
        Self { renderer: Rc::new(RefCell::new(renderer)) }
    }
}

/// 64 bits from two Math.random() draws.
fn random_seed() -> u64 {
    let hi = (js_sys::Math::random() * 4_294_967_296.0) as u64;
    let lo = (js_sys::Math::random() * 4_294_967_296.0) as u64;
    (hi << 32) | lo
}
