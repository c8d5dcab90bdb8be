// headless.rs - Manually driven frame host
//
// Stands in for the browser: frame requests queue up until the caller
// fires them, resize events are delivered only while subscribed. Used by
// the preview binary and by tests.

use rand::Rng;

use crate::render::Surface;
use crate::renderer::{FrameHost, StarfieldRenderer};

#[derive(Debug, Default)]
pub struct HeadlessHost {
    next: u64,
    pending: Option<u64>,
    requested: u64,
    cancelled: Vec<u64>,
    listening: bool,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame request not yet fired or cancelled.
    pub fn pending(&self) -> Option<u64> {
        self.pending
    }

    /// Consume the pending request, as the display does right before
    /// invoking the callback.
    pub fn take_pending(&mut self) -> Option<u64> {
        self.pending.take()
    }

    /// Total frame requests seen.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Handles passed to `cancel_frame`, in call order.
    pub fn cancelled(&self) -> &[u64] {
        &self.cancelled
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }
}

impl FrameHost for HeadlessHost {
    type Handle = u64;

    fn request_frame(&mut self) -> Option<u64> {
        self.next += 1;
        self.requested += 1;
        self.pending = Some(self.next);
        Some(self.next)
    }

    fn cancel_frame(&mut self, handle: u64) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }

    fn listen_resize(&mut self) {
        self.listening = true;
    }

    fn unlisten_resize(&mut self) {
        self.listening = false;
    }
}

/// Fire the pending frame at `now`. False if nothing was pending.
pub fn fire<S: Surface, R: Rng>(
    renderer: &mut StarfieldRenderer<S, HeadlessHost, R>,
    now: f64,
) -> bool {
    if renderer.host_mut().take_pending().is_none() {
        return false;
    }
    renderer.frame(now);
    true
}

/// Deliver a resize event if the renderer is subscribed. False otherwise.
pub fn notify_resize<S: Surface, R: Rng>(renderer: &mut StarfieldRenderer<S, HeadlessHost, R>) -> bool {
    if !renderer.host().is_listening() {
        return false;
    }
    renderer.resize();
    true
}
