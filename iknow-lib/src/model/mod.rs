//! Typed models

mod entity;
mod node;

pub use entity::*;
pub use node::*;
