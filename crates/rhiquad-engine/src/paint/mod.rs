//! Colors used for render-pass clears.

mod color;

pub use color::Color;
