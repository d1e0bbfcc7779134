use std::mem::size_of;
use std::ptr;

use gl::types::{GLsizei, GLsizeiptr, GLuint};

use crate::error::{check_gl_errors, GlError, GlResult};
use crate::handle::{BufferHandle, VertexArrayHandle};

/// One float vertex attribute of `components` floats.
///
/// Attributes of a layout are assigned consecutive locations starting at 0
/// and packed back to back in each vertex.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    pub components: i32,
}

impl VertexAttribute {
    #[inline]
    pub const fn floats(components: i32) -> Self {
        Self { components }
    }
}

/// Indexed triangle mesh living in a vertex array object.
#[derive(Debug, Default)]
pub struct Mesh {
    vao: VertexArrayHandle,
    vbo: BufferHandle,
    ebo: BufferHandle,
    index_count: i32,
}

impl Mesh {
    /// Uploads interleaved float vertices and 32-bit triangle indices.
    pub fn new(vertices: &[f32], layout: &[VertexAttribute], indices: &[u32]) -> GlResult<Self> {
        let stride: usize = layout.iter().map(|a| a.components.max(0) as usize).sum();
        if stride == 0 || vertices.len() % stride != 0 {
            return Err(GlError::InvalidVertexLayout {
                floats: vertices.len(),
                stride,
            });
        }

        let vao = VertexArrayHandle::generate()?;
        let vbo = BufferHandle::generate()?;
        let ebo = BufferHandle::generate()?;
        {
            let _vao_bound = vao.bind();
            let _vbo_bound = vbo.bind_to(gl::ARRAY_BUFFER);
            let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
            let index_bytes: &[u8] = bytemuck::cast_slice(indices);
            // SAFETY: buffers are bound; byte slices outlive the uploads.
            unsafe {
                gl::BufferData(
                    gl::ARRAY_BUFFER,
                    vertex_bytes.len() as GLsizeiptr,
                    vertex_bytes.as_ptr().cast(),
                    gl::STATIC_DRAW,
                );
                // The element binding is vertex array state; it must stay
                // bound when the vertex array is unbound.
                gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo.raw());
                gl::BufferData(
                    gl::ELEMENT_ARRAY_BUFFER,
                    index_bytes.len() as GLsizeiptr,
                    index_bytes.as_ptr().cast(),
                    gl::STATIC_DRAW,
                );

                let stride_bytes = (stride * size_of::<f32>()) as GLsizei;
                let mut offset = 0usize;
                for (location, attr) in layout.iter().enumerate() {
                    gl::EnableVertexAttribArray(location as GLuint);
                    gl::VertexAttribPointer(
                        location as GLuint,
                        attr.components,
                        gl::FLOAT,
                        gl::FALSE,
                        stride_bytes,
                        (offset * size_of::<f32>()) as *const _,
                    );
                    offset += attr.components.max(0) as usize;
                }
            }
            check_gl_errors()?;
        }

        log::debug!(
            "mesh vao [{:03}]: {} vertices, {} indices",
            vao.raw(),
            vertices.len() / stride,
            indices.len()
        );
        Ok(Self {
            vao,
            vbo,
            ebo,
            index_count: indices.len() as i32,
        })
    }

    /// Bare vertex array for draws whose vertices come from `gl_VertexID`.
    pub fn empty() -> GlResult<Self> {
        Ok(Self {
            vao: VertexArrayHandle::generate()?,
            ..Self::default()
        })
    }

    /// Draws all indexed triangles with the bound program.
    pub fn draw(&self) -> GlResult<()> {
        let _bound = self.vao.bind();
        // SAFETY: the element buffer is part of the bound vertex array.
        unsafe {
            gl::DrawElements(gl::TRIANGLES, self.index_count, gl::UNSIGNED_INT, ptr::null());
        }
        check_gl_errors()
    }

    /// Draws `count` non-indexed vertices as triangles.
    pub fn draw_arrays(&self, count: i32) -> GlResult<()> {
        let _bound = self.vao.bind();
        // SAFETY: draws from the bound vertex array.
        unsafe { gl::DrawArrays(gl::TRIANGLES, 0, count) };
        check_gl_errors()
    }

    #[inline]
    pub fn index_count(&self) -> i32 {
        self.index_count
    }

    #[inline]
    pub fn vertex_array(&self) -> &VertexArrayHandle {
        &self.vao
    }

    #[inline]
    pub fn vertex_buffer(&self) -> &BufferHandle {
        &self.vbo
    }

    #[inline]
    pub fn index_buffer(&self) -> &BufferHandle {
        &self.ebo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_must_divide_vertex_data() {
        let layout = [VertexAttribute::floats(3), VertexAttribute::floats(2)];
        let err = Mesh::new(&[0.0; 7], &layout, &[0, 1, 2]).unwrap_err();
        assert!(matches!(err, GlError::InvalidVertexLayout { floats: 7, stride: 5 }));
    }

    #[test]
    fn empty_layout_is_rejected() {
        let err = Mesh::new(&[], &[], &[]).unwrap_err();
        assert!(matches!(err, GlError::InvalidVertexLayout { stride: 0, .. }));
    }
}
