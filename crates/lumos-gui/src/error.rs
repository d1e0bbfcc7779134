use std::panic::Location;
use std::path::PathBuf;

use gl::types::GLenum;
use thiserror::Error;

use crate::gl_names;
use crate::program::ShaderStage;

pub type GlResult<T> = Result<T, GlError>;

// The driver may queue several error flags; drain a bounded number.
const MAX_QUEUED_ERRORS: usize = 16;

#[derive(Debug, Error)]
pub enum GlError {
    #[error("OpenGL error {name} (0x{code:04X}) at {location}")]
    Driver {
        code: GLenum,
        name: &'static str,
        location: &'static Location<'static>,
    },

    #[error("framebuffer incomplete: {name} (0x{status:04X})")]
    IncompleteFramebuffer { status: GLenum, name: &'static str },

    #[error("{stage} shader compile error:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("program link error:\n{log}")]
    Link { log: String },

    #[error("failed to load shader file: {}", .path.display())]
    ShaderFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader source contains a nul byte")]
    InvalidSource { stage: ShaderStage },

    #[error(
        "upload region {width}x{height} at ({x}, {y}) exceeds texture \
         {texture_width}x{texture_height}"
    )]
    RegionOutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
        texture_width: i32,
        texture_height: i32,
    },

    #[error("no active uniform named `{0}`")]
    UnknownUniform(String),

    #[error("vertex data of {floats} floats does not divide into a stride of {stride}")]
    InvalidVertexLayout { floats: usize, stride: usize },
}

/// Checks the driver error flag, returning the first pending error.
///
/// Further queued flags are drained and logged so the next check starts
/// clean.
#[track_caller]
pub fn check_gl_errors() -> GlResult<()> {
    // SAFETY: glGetError has no preconditions beyond a current context.
    let code = unsafe { gl::GetError() };
    if code == gl::NO_ERROR {
        return Ok(());
    }

    for _ in 0..MAX_QUEUED_ERRORS {
        let extra = unsafe { gl::GetError() };
        if extra == gl::NO_ERROR {
            break;
        }
        log::warn!(
            "additional OpenGL error {} (0x{:04X})",
            gl_names::error_name(extra),
            extra
        );
    }

    let err = GlError::Driver {
        code,
        name: gl_names::error_name(code),
        location: Location::caller(),
    };
    log::error!("{err}");
    Err(err)
}
