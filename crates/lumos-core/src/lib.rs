//! Lumos core crate.
//!
//! This crate owns the CPU-side pieces shared by the GUI layer and the demo
//! tools: small vectors, color and pixel-format conversion, image buffers,
//! PNG/EXR file I/O and the arcball camera.

pub mod camera;
pub mod color;
pub mod data;
pub mod image;
pub mod imageio;
pub mod logging;
pub mod vector;

pub use color::{Color3f, Color3u8, Color4f, Color4u8, Rgba16f};
pub use image::{ImageData, ImageData3f, ImageData3u8, ImageData4f, ImageData4h, ImageData4u8};
pub use vector::{Vector, Vector2f, Vector2i, Vector2u, Vector3f, Vector3i, Vector4f};
