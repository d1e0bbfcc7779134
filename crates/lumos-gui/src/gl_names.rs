//! Symbolic names for GL enums that show up in errors and debug logs.

use gl::types::GLenum;

/// Name of a `glGetError` code.
pub fn error_name(code: GLenum) -> &'static str {
    match code {
        gl::NO_ERROR => "GL_NO_ERROR",
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        _ => "GL_UNKNOWN_ERROR",
    }
}

/// Name of a `glCheckFramebufferStatus` result.
pub fn framebuffer_status_name(status: GLenum) -> &'static str {
    match status {
        gl::FRAMEBUFFER_COMPLETE => "GL_FRAMEBUFFER_COMPLETE",
        gl::FRAMEBUFFER_UNDEFINED => "GL_FRAMEBUFFER_UNDEFINED",
        gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => "GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT",
        gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => {
            "GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT"
        }
        gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => "GL_FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER",
        gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => "GL_FRAMEBUFFER_INCOMPLETE_READ_BUFFER",
        gl::FRAMEBUFFER_UNSUPPORTED => "GL_FRAMEBUFFER_UNSUPPORTED",
        gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => "GL_FRAMEBUFFER_INCOMPLETE_MULTISAMPLE",
        gl::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => "GL_FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS",
        // glCheckFramebufferStatus itself failed.
        0 => "GL_NONE",
        _ => "GL_UNKNOWN_FRAMEBUFFER_STATUS",
    }
}

/// GLSL name of an active uniform/attribute type tag.
pub fn type_name(ty: GLenum) -> &'static str {
    match ty {
        gl::FLOAT => "float",
        gl::FLOAT_VEC2 => "vec2",
        gl::FLOAT_VEC3 => "vec3",
        gl::FLOAT_VEC4 => "vec4",
        gl::DOUBLE => "double",
        gl::INT => "int",
        gl::INT_VEC2 => "ivec2",
        gl::INT_VEC3 => "ivec3",
        gl::INT_VEC4 => "ivec4",
        gl::UNSIGNED_INT => "uint",
        gl::UNSIGNED_INT_VEC2 => "uvec2",
        gl::UNSIGNED_INT_VEC3 => "uvec3",
        gl::UNSIGNED_INT_VEC4 => "uvec4",
        gl::BOOL => "bool",
        gl::BOOL_VEC2 => "bvec2",
        gl::BOOL_VEC3 => "bvec3",
        gl::BOOL_VEC4 => "bvec4",
        gl::FLOAT_MAT2 => "mat2",
        gl::FLOAT_MAT3 => "mat3",
        gl::FLOAT_MAT4 => "mat4",
        gl::FLOAT_MAT2x3 => "mat2x3",
        gl::FLOAT_MAT2x4 => "mat2x4",
        gl::FLOAT_MAT3x2 => "mat3x2",
        gl::FLOAT_MAT3x4 => "mat3x4",
        gl::FLOAT_MAT4x2 => "mat4x2",
        gl::FLOAT_MAT4x3 => "mat4x3",
        gl::SAMPLER_1D => "sampler1D",
        gl::SAMPLER_2D => "sampler2D",
        gl::SAMPLER_3D => "sampler3D",
        gl::SAMPLER_CUBE => "samplerCube",
        gl::SAMPLER_2D_SHADOW => "sampler2DShadow",
        gl::SAMPLER_2D_MULTISAMPLE => "sampler2DMS",
        gl::SAMPLER_2D_ARRAY => "sampler2DArray",
        gl::INT_SAMPLER_2D => "isampler2D",
        gl::UNSIGNED_INT_SAMPLER_2D => "usampler2D",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_have_names() {
        assert_eq!(error_name(gl::INVALID_VALUE), "GL_INVALID_VALUE");
        assert_eq!(error_name(0x1234), "GL_UNKNOWN_ERROR");
    }

    #[test]
    fn framebuffer_status_names() {
        assert_eq!(
            framebuffer_status_name(gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT),
            "GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT"
        );
        assert_eq!(framebuffer_status_name(0), "GL_NONE");
    }

    #[test]
    fn type_names_use_glsl_spelling() {
        assert_eq!(type_name(gl::FLOAT_MAT4), "mat4");
        assert_eq!(type_name(gl::SAMPLER_2D), "sampler2D");
        assert_eq!(type_name(0), "unknown");
    }
}
