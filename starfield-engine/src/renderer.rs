// renderer.rs - Star field animation loop
//
//   Idle --start--> Running --stop--> Stopped
//
// The host owns the real callbacks (animation frames, resize events) and
// calls back into `frame` and `resize`. The renderer only keeps the handle
// of the frame it last asked for, so `stop` can cancel it before it fires.

use std::fmt;

use log::{debug, trace, warn};
use rand::Rng;

use crate::config::StarfieldConfig;
use crate::error::RenderError;
use crate::render::{Surface, draw_frame};
use crate::sim::{FrameClock, StarField};

/// Frame scheduling and resize notification, provided by the display.
pub trait FrameHost {
    type Handle: Copy + PartialEq + fmt::Debug;

    /// Ask for one `frame` call on the next display refresh.
    /// `None` if the host could not schedule it.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    fn cancel_frame(&mut self, handle: Self::Handle);

    /// Start delivering resize events to the renderer.
    fn listen_resize(&mut self);

    fn unlisten_resize(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

enum State<H> {
    Idle,
    Running { pending: Option<H> },
    Stopped,
}

pub struct StarfieldRenderer<S, H: FrameHost, R> {
    config: StarfieldConfig,
    host: H,
    rng: R,

    state: State<H::Handle>,
    surface: Option<S>,
    field: Option<StarField>,
    clock: FrameClock,

    // Cached surface size, refreshed on resize
    w: u32,
    h: u32,

    // Last frame was skipped for a zero-sized surface
    degenerate: bool,
    frames: u64,
}

impl<S: Surface, H: FrameHost, R: Rng> StarfieldRenderer<S, H, R> {
    pub fn new(config: StarfieldConfig, host: H, rng: R) -> Self {
        Self {
            config,
            host,
            rng,
            state: State::Idle,
            surface: None,
            field: None,
            clock: FrameClock::new(),
            w: 0,
            h: 0,
            degenerate: false,
            frames: 0,
        }
    }

    /// Take the surface, seed a fresh field and schedule the first frame.
    ///
    /// Without a surface this is a no-op: no listener, no frame request,
    /// and the renderer stays `Idle`.
    pub fn start(&mut self, surface: Option<S>) -> Result<(), RenderError> {
        if !matches!(self.state, State::Idle) {
            warn!("star field start ignored, already {:?}", self.state());
            return Err(RenderError::AlreadyStarted);
        }
        let Some(surface) = surface else {
            warn!("no drawing surface, star field disabled");
            return Err(RenderError::SurfaceUnavailable);
        };

        self.w = surface.width();
        self.h = surface.height();
        self.surface = Some(surface);
        self.field = Some(StarField::new(&self.config, &mut self.rng));
        self.clock.reset();
        self.degenerate = false;
        self.frames = 0;

        self.host.listen_resize();
        let pending = self.host.request_frame();
        if pending.is_none() {
            warn!("host refused the first animation frame");
        }
        self.state = State::Running { pending };

        debug!(
            "star field started: {} stars on {}x{}",
            self.config.star_count, self.w, self.h
        );
        Ok(())
    }

    /// One display refresh. `now` is the host's monotonic timestamp in ms.
    pub fn frame(&mut self, now: f64) {
        let State::Running { pending } = &mut self.state else {
            trace!("frame at {now} ignored, renderer not running");
            return;
        };
        *pending = None;

        let (Some(field), Some(surface)) = (self.field.as_mut(), self.surface.as_mut()) else {
            return;
        };

        let elapsed = self.clock.tick(now);
        field.advance(elapsed * self.config.speed);

        match draw_frame(field, surface, self.w, self.h, &self.config) {
            Ok(drawn) => {
                if self.degenerate {
                    debug!("surface usable again at {}x{}", self.w, self.h);
                    self.degenerate = false;
                }
                trace!("frame {}: {elapsed:.2}ms, {drawn} stars drawn", self.frames);
            }
            Err(e) => {
                if !self.degenerate {
                    debug!("skipping star field frames: {e}");
                    self.degenerate = true;
                }
            }
        }
        self.frames += 1;

        let next = self.host.request_frame();
        if next.is_none() {
            warn!("host refused the next animation frame, star field halted");
        }
        self.state = State::Running { pending: next };
    }

    /// Refresh cached dimensions from the surface. Stars and clock are untouched.
    pub fn resize(&mut self) {
        if !matches!(self.state, State::Running { .. }) {
            return;
        }
        let Some(surface) = self.surface.as_ref() else {
            return;
        };

        let (w, h) = (surface.width(), surface.height());
        if (w, h) != (self.w, self.h) {
            debug!("star field resized {}x{} -> {}x{}", self.w, self.h, w, h);
        }
        self.w = w;
        self.h = h;
    }
}

impl<S, H: FrameHost, R> StarfieldRenderer<S, H, R> {
    /// Cancel any pending frame, drop the resize listener and discard the
    /// field. Returns the surface to the caller. Safe to call repeatedly.
    pub fn stop(&mut self) -> Option<S> {
        match self.state {
            State::Idle | State::Stopped => return None,
            State::Running { .. } => {}
        }

        if let State::Running { pending: Some(handle) } =
            std::mem::replace(&mut self.state, State::Stopped)
        {
            self.host.cancel_frame(handle);
        }
        self.host.unlisten_resize();
        self.field = None;

        debug!("star field stopped after {} frames", self.frames);
        self.surface.take()
    }

    pub fn state(&self) -> LoopState {
        match self.state {
            State::Idle => LoopState::Idle,
            State::Running { .. } => LoopState::Running,
            State::Stopped => LoopState::Stopped,
        }
    }

    /// Handle of the frame currently requested from the host.
    pub fn pending_frame(&self) -> Option<H::Handle> {
        match self.state {
            State::Running { pending } => pending,
            _ => None,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.w, self.h)
    }

    pub fn field(&self) -> Option<&StarField> {
        self.field.as_ref()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Frames run since the last start.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<S, H: FrameHost, R> Drop for StarfieldRenderer<S, H, R> {
    fn drop(&mut self) {
        self.stop();
    }
}
