//! Structural elements module

mod element;
mod support;

pub use element::{Element, Orientation};
pub use support::Support;
