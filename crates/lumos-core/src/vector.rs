use core::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

/// Fixed-size vector of `N` scalars.
///
/// Used for pixel offsets and sizes (`Vector2i`), NDC cursor positions
/// (`Vector2f`) and the occasional 3D/4D value. Heavy matrix math lives in
/// `glam`; this type stays a plain array wrapper.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Vector<T, const N: usize>(pub [T; N]);

pub type Vector2i = Vector<i32, 2>;
pub type Vector3i = Vector<i32, 3>;
pub type Vector4i = Vector<i32, 4>;
pub type Vector2u = Vector<u32, 2>;
pub type Vector3u = Vector<u32, 3>;
pub type Vector4u = Vector<u32, 4>;
pub type Vector2f = Vector<f32, 2>;
pub type Vector3f = Vector<f32, 3>;
pub type Vector4f = Vector<f32, 4>;
pub type Vector2d = Vector<f64, 2>;
pub type Vector3d = Vector<f64, 3>;
pub type Vector4d = Vector<f64, 4>;

impl<T: Copy + Default, const N: usize> Default for Vector<T, N> {
    #[inline]
    fn default() -> Self {
        Self([T::default(); N])
    }
}

impl<T: Copy, const N: usize> Vector<T, N> {
    #[inline]
    pub const fn from_array(values: [T; N]) -> Self {
        Self(values)
    }

    #[inline]
    pub const fn to_array(self) -> [T; N] {
        self.0
    }

    #[inline]
    pub fn map<U: Copy>(self, f: impl FnMut(T) -> U) -> Vector<U, N> {
        Vector(self.0.map(f))
    }
}

impl<T: Copy> Vector<T, 2> {
    #[inline]
    pub const fn new(x: T, y: T) -> Self {
        Self([x, y])
    }

    #[inline]
    pub const fn x(self) -> T {
        self.0[0]
    }

    #[inline]
    pub const fn y(self) -> T {
        self.0[1]
    }
}

impl<T: Copy> Vector<T, 3> {
    #[inline]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self([x, y, z])
    }

    #[inline]
    pub const fn x(self) -> T {
        self.0[0]
    }

    #[inline]
    pub const fn y(self) -> T {
        self.0[1]
    }

    #[inline]
    pub const fn z(self) -> T {
        self.0[2]
    }
}

impl<T: Copy> Vector<T, 4> {
    #[inline]
    pub const fn new(x: T, y: T, z: T, w: T) -> Self {
        Self([x, y, z, w])
    }

    #[inline]
    pub const fn x(self) -> T {
        self.0[0]
    }

    #[inline]
    pub const fn y(self) -> T {
        self.0[1]
    }

    #[inline]
    pub const fn z(self) -> T {
        self.0[2]
    }

    #[inline]
    pub const fn w(self) -> T {
        self.0[3]
    }
}

impl<T, const N: usize> Vector<T, N>
where
    T: Copy + Default + Add<Output = T> + Mul<Output = T>,
{
    #[inline]
    pub fn dot(self, rhs: Self) -> T {
        self.0
            .iter()
            .zip(rhs.0.iter())
            .fold(T::default(), |acc, (&a, &b)| acc + a * b)
    }

    #[inline]
    pub fn length_squared(self) -> T {
        self.dot(self)
    }
}

impl<const N: usize> Vector<f32, N> {
    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns the unit vector, or `self` unchanged when the length is zero.
    #[inline]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 { self.map(|v| v / len) } else { self }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl<const N: usize> Vector<f64, N> {
    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T, N> {
    #[inline]
    fn from(values: [T; N]) -> Self {
        Self(values)
    }
}

impl<T, const N: usize> From<Vector<T, N>> for [T; N] {
    #[inline]
    fn from(v: Vector<T, N>) -> Self {
        v.0
    }
}

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;
    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.0[i]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.0[i]
    }
}

impl<T: Copy + Add<Output = T>, const N: usize> Add for Vector<T, N> {
    type Output = Self;
    #[inline]
    fn add(mut self, rhs: Self) -> Self {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a = *a + b;
        }
        self
    }
}

impl<T: Copy + Sub<Output = T>, const N: usize> Sub for Vector<T, N> {
    type Output = Self;
    #[inline]
    fn sub(mut self, rhs: Self) -> Self {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a = *a - b;
        }
        self
    }
}

impl<T: Copy + Mul<Output = T>, const N: usize> Mul<T> for Vector<T, N> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: T) -> Self {
        Vector(self.0.map(|v| v * rhs))
    }
}

impl<T: Copy + Neg<Output = T>, const N: usize> Neg for Vector<T, N> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Vector(self.0.map(|v| -v))
    }
}

impl From<Vector2f> for glam::Vec2 {
    #[inline]
    fn from(v: Vector2f) -> Self {
        glam::Vec2::from_array(v.0)
    }
}

impl From<Vector3f> for glam::Vec3 {
    #[inline]
    fn from(v: Vector3f) -> Self {
        glam::Vec3::from_array(v.0)
    }
}
