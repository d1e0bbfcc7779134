//! Vertex + fragment draw programs.
//!
//! A [`DrawProgram`] is compiled and linked once; afterwards it keeps the
//! list of active uniforms and attributes reported by the driver. Uniforms are
//! uploaded by name through the guard returned from [`DrawProgram::bind`].

use std::ffi::CString;
use std::fmt;
use std::path::Path;
use std::ptr;

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};

use crate::binding::Bound;
use crate::error::{check_gl_errors, GlError, GlResult};
use crate::gl_names;
use crate::handle::{ProgramHandle, ProgramTraits, ShaderHandle};
use crate::uniform::Uniform;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    #[inline]
    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// One active uniform or vertex attribute as reported after linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveValueInfo {
    pub name: String,
    pub location: GLint,
    /// Array length; 1 for non-arrays.
    pub size: GLint,
    pub gl_type: GLenum,
}

impl ActiveValueInfo {
    /// GLSL spelling of `gl_type`.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        gl_names::type_name(self.gl_type)
    }

    /// Matches `name` itself, or the first element of an array uniform
    /// reported as `name[0]`.
    fn answers_to(&self, name: &str) -> bool {
        self.name == name
            || self
                .name
                .strip_suffix("[0]")
                .is_some_and(|base| base == name)
    }
}

#[derive(Debug)]
pub struct DrawProgram {
    handle: ProgramHandle,
    uniforms: Vec<ActiveValueInfo>,
    attributes: Vec<ActiveValueInfo>,
}

impl DrawProgram {
    /// Compiles both stages and links them.
    pub fn from_sources(vertex: &str, fragment: &str) -> GlResult<Self> {
        let vs = compile(ShaderStage::Vertex, vertex)?;
        let fs = compile(ShaderStage::Fragment, fragment)?;

        let handle = ProgramHandle::create()?;
        let raw = handle.raw();
        let mut status: GLint = 0;
        // SAFETY: program and shaders are live; status receives one integer.
        unsafe {
            gl::AttachShader(raw, vs.raw());
            gl::AttachShader(raw, fs.raw());
            gl::LinkProgram(raw);
            gl::GetProgramiv(raw, gl::LINK_STATUS, &mut status);
            gl::DetachShader(raw, vs.raw());
            gl::DetachShader(raw, fs.raw());
        }
        if status == 0 {
            let log = info_log(raw, gl::GetProgramiv, gl::GetProgramInfoLog);
            log::error!("program link error:\n{log}");
            return Err(GlError::Link { log });
        }
        check_gl_errors()?;

        let uniforms = active_values(raw, Introspect::Uniforms);
        let attributes = active_values(raw, Introspect::Attributes);
        log::debug!(
            "program [{:03}] linked: {} uniforms, {} attributes",
            raw,
            uniforms.len(),
            attributes.len()
        );
        Ok(Self {
            handle,
            uniforms,
            attributes,
        })
    }

    /// Reads both shader files (UTF-8) and builds the program.
    pub fn from_files(
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> GlResult<Self> {
        let vertex = read_source(vertex_path.as_ref())?;
        let fragment = read_source(fragment_path.as_ref())?;
        Self::from_sources(&vertex, &fragment)
    }

    /// Makes the program current until the returned guard is dropped.
    pub fn bind(&self) -> ActiveProgram<'_> {
        ActiveProgram {
            program: self,
            _bound: self.handle.bind(),
        }
    }

    #[inline]
    pub fn handle(&self) -> &ProgramHandle {
        &self.handle
    }

    #[inline]
    pub fn uniforms(&self) -> &[ActiveValueInfo] {
        &self.uniforms
    }

    #[inline]
    pub fn attributes(&self) -> &[ActiveValueInfo] {
        &self.attributes
    }

    pub fn uniform_location(&self, name: &str) -> Option<GLint> {
        self.uniforms
            .iter()
            .find(|u| u.answers_to(name))
            .map(|u| u.location)
    }

    pub fn attribute_location(&self, name: &str) -> Option<GLint> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.location)
    }

    pub fn log_active_uniforms(&self) {
        for (i, u) in self.uniforms.iter().enumerate() {
            log::debug!(
                "active uniform [{}] name: {}, size: {}, type: {}",
                i,
                u.name,
                u.size,
                u.type_name()
            );
        }
    }

    pub fn log_active_attributes(&self) {
        for (i, a) in self.attributes.iter().enumerate() {
            log::debug!(
                "active attribute [{}] name: {}, size: {}, type: {}",
                i,
                a.name,
                a.size,
                a.type_name()
            );
        }
    }
}

/// A bound [`DrawProgram`]; uniform uploads go through here.
pub struct ActiveProgram<'a> {
    program: &'a DrawProgram,
    _bound: Bound<'a, ProgramTraits>,
}

impl ActiveProgram<'_> {
    /// Uploads `value` to the active uniform `name`.
    pub fn set_uniform<U: Uniform + ?Sized>(&self, name: &str, value: &U) -> GlResult<()> {
        let location = self
            .program
            .uniform_location(name)
            .ok_or_else(|| GlError::UnknownUniform(name.to_owned()))?;
        value.upload(location);
        check_gl_errors()
    }

    #[inline]
    pub fn program(&self) -> &DrawProgram {
        self.program
    }
}

fn read_source(path: &Path) -> GlResult<String> {
    log::debug!("load shader file: {}", path.display());
    std::fs::read_to_string(path).map_err(|source| GlError::ShaderFile {
        path: path.to_path_buf(),
        source,
    })
}

fn compile(stage: ShaderStage, source: &str) -> GlResult<ShaderHandle> {
    let source = CString::new(source).map_err(|_| GlError::InvalidSource { stage })?;
    let shader = ShaderHandle::create(stage)?;
    let raw = shader.raw();
    let mut status: GLint = 0;
    // SAFETY: one nul-terminated source string; null lengths means nul-terminated.
    unsafe {
        gl::ShaderSource(raw, 1, &source.as_ptr(), ptr::null());
        gl::CompileShader(raw);
        gl::GetShaderiv(raw, gl::COMPILE_STATUS, &mut status);
    }
    if status == 0 {
        let log = info_log(raw, gl::GetShaderiv, gl::GetShaderInfoLog);
        log::error!("{stage} shader compile error:\n{log}");
        return Err(GlError::Compile { stage, log });
    }
    check_gl_errors()?;
    Ok(shader)
}

type GetIv = unsafe fn(GLuint, GLenum, *mut GLint);
type GetInfoLog = unsafe fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar);

fn info_log(raw: GLuint, get_iv: GetIv, get_log: GetInfoLog) -> String {
    let mut len: GLint = 0;
    // SAFETY: `get_iv`/`get_log` match the object kind of `raw`; the buffer
    // is `len` bytes long.
    unsafe { get_iv(raw, gl::INFO_LOG_LENGTH, &mut len) };
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u8; len as usize];
    let mut written: GLsizei = 0;
    unsafe { get_log(raw, len, &mut written, buf.as_mut_ptr().cast()) };
    buf.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buf).trim_end().to_owned()
}

#[derive(Copy, Clone)]
enum Introspect {
    Uniforms,
    Attributes,
}

fn active_values(program: GLuint, kind: Introspect) -> Vec<ActiveValueInfo> {
    let (count_name, max_len_name) = match kind {
        Introspect::Uniforms => (gl::ACTIVE_UNIFORMS, gl::ACTIVE_UNIFORM_MAX_LENGTH),
        Introspect::Attributes => (gl::ACTIVE_ATTRIBUTES, gl::ACTIVE_ATTRIBUTE_MAX_LENGTH),
    };
    let mut count: GLint = 0;
    let mut max_len: GLint = 0;
    // SAFETY: each query writes one integer.
    unsafe {
        gl::GetProgramiv(program, count_name, &mut count);
        gl::GetProgramiv(program, max_len_name, &mut max_len);
    }

    let mut buf = vec![0u8; max_len.max(1) as usize];
    (0..count.max(0) as GLuint)
        .map(|index| {
            let mut len: GLsizei = 0;
            let mut size: GLint = 0;
            let mut gl_type: GLenum = 0;
            let name_ptr: *mut GLchar = buf.as_mut_ptr().cast();
            // SAFETY: `buf` holds `max_len` bytes including the terminator.
            unsafe {
                match kind {
                    Introspect::Uniforms => gl::GetActiveUniform(
                        program,
                        index,
                        buf.len() as GLsizei,
                        &mut len,
                        &mut size,
                        &mut gl_type,
                        name_ptr,
                    ),
                    Introspect::Attributes => gl::GetActiveAttrib(
                        program,
                        index,
                        buf.len() as GLsizei,
                        &mut len,
                        &mut size,
                        &mut gl_type,
                        name_ptr,
                    ),
                }
            }
            let name = String::from_utf8_lossy(&buf[..len.max(0) as usize]).into_owned();
            let location = location_of(program, &name, kind);
            ActiveValueInfo {
                name,
                location,
                size,
                gl_type,
            }
        })
        .collect()
}

fn location_of(program: GLuint, name: &str, kind: Introspect) -> GLint {
    let Ok(c_name) = CString::new(name) else {
        return -1;
    };
    // SAFETY: nul-terminated name of a linked program.
    unsafe {
        match kind {
            Introspect::Uniforms => gl::GetUniformLocation(program, c_name.as_ptr()),
            Introspect::Attributes => gl::GetAttribLocation(program, c_name.as_ptr()),
        }
    }
}
