// sim/ - Star field simulation
//
// Stars live in camera space: x/y lateral, z depth in front of the viewer.
// The camera never moves; every star's depth shrinks instead.

mod clock;
mod field;

pub use clock::FrameClock;
pub use field::{Star, StarField, wrap_depth};
