//! Clipdeck Overlay Model
//!
//! Defines the data contracts of the overlay editor:
//! - **Overlay:** Rectangle and text annotations with color and anchor
//! - **Store:** The ordered overlay collection (iteration order = paint order)
//! - **Geometry:** Canvas coordinate conversion and text measurement seam
//! - **Hit-test:** Which overlay sits under a pointer position
//!
//! Coordinates are in canvas backing-store pixels unless stated otherwise.

pub mod color;
pub mod geometry;
pub mod overlay;
pub mod store;

pub use color::HexColor;
pub use geometry::*;
pub use hit_test::hit_test;
pub use overlay::*;
pub use store::*;
