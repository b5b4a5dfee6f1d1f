//! Styled Dioxus components for the portal screens.
//!
//! Each component lives in `components/<name>/` next to its stylesheet.

pub mod components;

pub use components::*;
