// starfield-engine - Loading screen star field
//
// A fixed cloud of stars rushes toward the viewer: each frame every star's
// depth shrinks by elapsed time, stars that pass the viewer wrap to the far
// plane, and the rest are projected with perspective onto a 2D surface.
//
// Layout:
//   sim/       star storage, depth advance, frame clock
//   render     projection, brightness, Surface trait, PixelBuffer
//   renderer   Idle -> Running -> Stopped loop driven by a FrameHost
//   headless   manually fired host (preview binary, tests)
//   web/       wasm32 only: canvas surface, rAF host, StarfieldLoader

pub mod config;
pub mod error;
pub mod headless;
pub mod render;
pub mod renderer;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::StarfieldConfig;
pub use error::{ConfigError, RenderError};
pub use headless::HeadlessHost;
pub use render::{PixelBuffer, Rgba, Surface, brightness, draw_frame, project};
pub use renderer::{FrameHost, LoopState, StarfieldRenderer};
pub use sim::{FrameClock, Star, StarField};

#[cfg(target_arch = "wasm32")]
pub use web::StarfieldLoader;
