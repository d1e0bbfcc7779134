#[macro_use]
mod common;

use std::fs;

use glam::{Mat4, Vec4};
use lumos_core::data::data_path;
use lumos_core::{Color4f, Color4u8};
use lumos_gui::{
    DepthFormat, DrawProgram, FrameBuffer, GlError, Mesh, ShaderStage, VertexAttribute,
};

const BROKEN_VERTEX: &str = "#version 330 core\nvoid main() { gl_Position = vec4(1.0) }\n";

const VEC3_VARYING_VERTEX: &str = "#version 330 core
out vec3 v_color;
void main() { v_color = vec3(1.0); gl_Position = vec4(0.0); }
";

const VEC4_VARYING_FRAGMENT: &str = "#version 330 core
in vec4 v_color;
out vec4 frag_color;
void main() { frag_color = v_color; }
";

fn solid_color_program() -> DrawProgram {
    DrawProgram::from_files(
        data_path("shaders/fullscreen.vert"),
        data_path("shaders/solid_color.frag"),
    )
    .unwrap()
}

// ── build + introspection ─────────────────────────────────────────────────

#[test]
fn cube_program_reports_active_values() {
    let _gl = gl_or_skip!();
    let program =
        DrawProgram::from_files(data_path("shaders/cube.vert"), data_path("shaders/cube.frag"))
            .unwrap();
    program.log_active_uniforms();
    program.log_active_attributes();

    let mvp = program.uniforms().iter().find(|u| u.name == "u_mvp").unwrap();
    assert_eq!(mvp.type_name(), "mat4");
    assert_eq!(mvp.size, 1);

    assert_eq!(program.attribute_location("a_position"), Some(0));
    assert_eq!(program.attribute_location("a_color"), Some(1));
    assert!(program.uniform_location("u_mvp").is_some());
}

#[test]
fn compile_error_carries_stage_and_log() {
    let _gl = gl_or_skip!();
    let err = DrawProgram::from_sources(BROKEN_VERTEX, "").unwrap_err();
    match err {
        GlError::Compile { stage, log } => {
            assert_eq!(stage, ShaderStage::Vertex);
            assert!(!log.is_empty());
        }
        other => panic!("expected compile error, got {other}"),
    }
}

#[test]
fn mismatched_varying_types_fail_to_link() {
    let _gl = gl_or_skip!();
    let err = DrawProgram::from_sources(VEC3_VARYING_VERTEX, VEC4_VARYING_FRAGMENT).unwrap_err();
    match err {
        GlError::Link { log } => assert!(!log.is_empty()),
        other => panic!("expected link error, got {other}"),
    }
    lumos_gui::check_gl_errors().unwrap();
}

// ── files ─────────────────────────────────────────────────────────────────

#[test]
fn missing_file_error_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.vert");
    let err = DrawProgram::from_files(&missing, data_path("shaders/cube.frag")).unwrap_err();

    assert!(matches!(err, GlError::ShaderFile { .. }));
    assert!(err.to_string().contains("missing.vert"), "{err}");
}

#[test]
fn loads_from_non_ascii_directory() {
    let _gl = gl_or_skip!();
    let dir = tempfile::tempdir().unwrap();
    let shader_dir = dir.path().join("着色器");
    fs::create_dir(&shader_dir).unwrap();
    fs::copy(data_path("shaders/cube.vert"), shader_dir.join("立方体.vert")).unwrap();
    fs::copy(data_path("shaders/cube.frag"), shader_dir.join("立方体.frag")).unwrap();

    let program =
        DrawProgram::from_files(shader_dir.join("立方体.vert"), shader_dir.join("立方体.frag"))
            .unwrap();
    assert!(program.handle().is_valid());
}

// ── uniforms + drawing ────────────────────────────────────────────────────

#[test]
fn unknown_uniform_is_an_error() {
    let _gl = gl_or_skip!();
    let program = solid_color_program();
    let active = program.bind();
    let err = active.set_uniform("u_not_there", &1.0f32).unwrap_err();
    assert!(matches!(err, GlError::UnknownUniform(ref name) if name == "u_not_there"));
}

#[test]
fn full_screen_triangle_fills_with_uniform_color() {
    let _gl = gl_or_skip!();
    let program = solid_color_program();
    let fb = FrameBuffer::new(16, 16, DepthFormat::NONE).unwrap();
    let mesh = Mesh::empty().unwrap();
    {
        let _target = fb.bind();
        let active = program.bind();
        active.set_uniform("u_color", &Color4f::new(1.0, 0.0, 1.0, 1.0)).unwrap();
        mesh.draw_arrays(3).unwrap();
    }

    let back = fb.read_pixels().unwrap();
    assert!(back.pixels().iter().all(|&p| p == Color4u8::new(255, 0, 255, 255)));
}

#[test]
fn indexed_quad_draws_vertex_colors() {
    let _gl = gl_or_skip!();
    let program =
        DrawProgram::from_files(data_path("shaders/cube.vert"), data_path("shaders/cube.frag"))
            .unwrap();
    #[rustfmt::skip]
    let vertices = [
        // position        color
        -1.0, -1.0, 0.0,   0.0, 0.0, 1.0,
         1.0, -1.0, 0.0,   0.0, 0.0, 1.0,
         1.0,  1.0, 0.0,   0.0, 0.0, 1.0,
        -1.0,  1.0, 0.0,   0.0, 0.0, 1.0,
    ];
    let layout = [VertexAttribute::floats(3), VertexAttribute::floats(3)];
    let mesh = Mesh::new(&vertices, &layout, &[0, 1, 2, 2, 3, 0]).unwrap();
    assert_eq!(mesh.index_count(), 6);

    let fb = FrameBuffer::new(8, 8, DepthFormat::COMPONENT24).unwrap();
    {
        let _target = fb.bind();
        unsafe {
            gl::ClearColor(0.0, 0.0, 0.0, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
        let active = program.bind();
        active.set_uniform("u_mvp", &Mat4::IDENTITY).unwrap();
        mesh.draw().unwrap();
    }

    let back = fb.read_pixels().unwrap();
    assert_eq!(back.get(4, 4), Some(Color4u8::new(0, 0, 255, 255)));
    assert_eq!(back.get(0, 7), Some(Color4u8::new(0, 0, 255, 255)));
}

#[test]
fn vec4_and_array_uniforms_upload() {
    let _gl = gl_or_skip!();
    let program = solid_color_program();
    let active = program.bind();
    active.set_uniform("u_color", &Vec4::new(0.0, 1.0, 0.0, 1.0)).unwrap();
    active.set_uniform("u_color", &[0.25f32, 0.5, 0.75, 1.0]).unwrap();
}
