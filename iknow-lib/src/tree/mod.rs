//! Lazily-expanding materials tree
//!
//! university → school → department → year → semester → material.
//! Universities, schools, departments and materials come from the API one
//! level per expansion; years and semesters are synthesized locally.

mod controller;
mod render;
mod source;
mod state;
mod synth;

pub use controller::*;
pub use render::*;
pub use source::ChildSource;
pub use state::*;
pub use synth::*;
