//! Arcball camera orbiting the world origin.
//!
//! Cursor input is expected in normalized device coordinates: the visible
//! area spans `[-1, 1]` on both axes. The view matrix is composed as
//! `translation * rotation`, so the orbit distance and the orientation can be
//! changed independently.

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArcballCamera {
    translation: Mat4,
    rotation: Mat4,
    view: Mat4,
    view_inverse: Mat4,

    /// Distance change per unit of zoom input.
    pub zoom_ratio: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
}

impl Default for ArcballCamera {
    fn default() -> Self {
        Self {
            translation: Mat4::IDENTITY,
            rotation: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            view_inverse: Mat4::IDENTITY,
            zoom_ratio: 1.0,
            zoom_min: 0.01,
            zoom_max: 100.0,
        }
    }
}

impl ArcballCamera {
    /// Camera at `eye` looking at the origin. `up` need not be orthogonal to
    /// the view direction; it is re-orthogonalized.
    pub fn new(eye: Vec3, up: Vec3) -> Self {
        let distance = eye.length();
        let z = eye.normalize_or_zero();
        let x = up.cross(z).normalize_or_zero();
        let y = z.cross(x);

        let mut camera = Self {
            translation: Mat4::from_translation(Vec3::new(0.0, 0.0, -distance)),
            rotation: Mat4::from_cols(x.extend(0.0), y.extend(0.0), z.extend(0.0), Vec4::W)
                .transpose(),
            ..Self::default()
        };
        camera.update_view();
        camera
    }

    /// Rotates from the previous cursor position to the current one.
    pub fn rotate(&mut self, prev_cursor: Vec2, curr_cursor: Vec2) {
        let p1 = ndc_to_unit_sphere(prev_cursor);
        let p2 = ndc_to_unit_sphere(curr_cursor);
        let delta = Mat4::from_quat((p2 * p1).normalize());
        self.rotation = delta * self.rotation;
        self.update_view();
    }

    /// Moves the camera along its view axis. Positive values move away from
    /// the origin.
    pub fn zoom(&mut self, amount: f32) {
        let distance =
            (self.distance() + self.zoom_ratio * amount).clamp(self.zoom_min, self.zoom_max);
        self.translation.w_axis.z = -distance;
        self.update_view();
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        -self.translation.w_axis.z
    }

    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn view_inverse_matrix(&self) -> Mat4 {
        self.view_inverse
    }

    /// Eye position in world space.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.view_inverse.w_axis.truncate()
    }

    #[inline]
    pub fn front(&self) -> Vec3 {
        -self.view_inverse.z_axis.truncate()
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.view_inverse.y_axis.truncate()
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.view_inverse.x_axis.truncate()
    }

    fn update_view(&mut self) {
        self.view = self.translation * self.rotation;
        // rotation is orthonormal, translation is pure
        let inverse_translation = Mat4::from_translation(-self.translation.w_axis.truncate());
        self.view_inverse = self.rotation.transpose() * inverse_translation;
    }
}

/// OpenGL-style perspective projection (`fov_y` in degrees).
pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov_y_degrees.to_radians(), aspect, near, far)
}

/// Projects an NDC point onto the unit sphere as a pure quaternion. Points
/// outside the unit disc are pulled to its rim.
fn ndc_to_unit_sphere(p: Vec2) -> Quat {
    let d = p.length_squared();
    if d <= 1.0 {
        Quat::from_xyzw(p.x, p.y, (1.0 - d).sqrt(), 0.0)
    } else {
        let n = p.normalize();
        Quat::from_xyzw(n.x, n.y, 0.0, 0.0)
    }
}
