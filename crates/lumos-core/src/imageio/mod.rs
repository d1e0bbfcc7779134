//! PNG and OpenEXR file I/O.
//!
//! PNG is read and written as 8-bit RGBA. OpenEXR is read and written as
//! half-float RGBA and keeps the data window (the stored rectangle) separate
//! from the display window (the full image extent), which is what cropped
//! exports rely on.
//!
//! Every failure carries the offending path; codec errors are wrapped, not
//! replaced.

mod exr_io;
mod png_io;

pub use exr_io::{read_exr, save_exr, save_exr_block, ExrImage, PixelWindow};
pub use png_io::{read_png, save_png};
