//! 2-D affine transform value type.

use super::core_type::CoreType;
use super::vector2::Vector2;
use std::ops::Mul;

/// A 2-D affine transform, twenty-four bytes in the host layout:
/// basis vector `x`, basis vector `y`, then `origin`, each a [`Vector2`].
///
/// The basis is stored by columns: `x` and `y` are the basis vectors of the
/// coordinate system painted on the object, so "on paper" the matrix reads
///
/// ```text
/// M = (x.x  y.x)
///     (x.y  y.y)
/// ```
///
/// which is the transpose of the usual textbook indexing. The host defines
/// this storage order and the left-handed 2-D convention (Y down, clockwise
/// angles); both are preserved bit-for-bit, not normalized to anything nicer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Transform2D {
    pub x: Vector2,
    pub y: Vector2,
    pub origin: Vector2,
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        x: Vector2 { x: 1.0, y: 0.0 },
        y: Vector2 { x: 0.0, y: 1.0 },
        origin: Vector2 { x: 0.0, y: 0.0 },
    };

    /// Build from the six scalar elements in storage order.
    pub fn new(xx: f32, xy: f32, yx: f32, yy: f32, ox: f32, oy: f32) -> Self {
        Transform2D {
            x: Vector2::new(xx, xy),
            y: Vector2::new(yx, yy),
            origin: Vector2::new(ox, oy),
        }
    }

    /// A rotation (clockwise, per the 2-D convention) followed by a
    /// translation to `origin`.
    pub fn from_rotation_origin(rotation: f32, origin: Vector2) -> Self {
        let (sin, cos) = rotation.sin_cos();
        Transform2D {
            x: Vector2::new(cos, sin),
            y: Vector2::new(-sin, cos),
            origin,
        }
    }

    /// Dot of `v` against the first row of the basis.
    pub fn tdotx(&self, v: Vector2) -> f32 {
        self.x.x * v.x + self.y.x * v.y
    }

    /// Dot of `v` against the second row of the basis.
    pub fn tdoty(&self, v: Vector2) -> f32 {
        self.x.y * v.x + self.y.y * v.y
    }

    /// Transform `v` by the basis only, ignoring the origin.
    pub fn basis_xform(&self, v: Vector2) -> Vector2 {
        Vector2::new(self.tdotx(v), self.tdoty(v))
    }

    /// Inverse-transform `v` by the basis only. Assumes an orthonormal basis.
    pub fn basis_xform_inv(&self, v: Vector2) -> Vector2 {
        Vector2::new(self.x.dot(v), self.y.dot(v))
    }

    pub fn xform(&self, v: Vector2) -> Vector2 {
        self.basis_xform(v) + self.origin
    }

    /// Inverse-transform `v`. Assumes an orthonormal basis.
    pub fn xform_inv(&self, v: Vector2) -> Vector2 {
        self.basis_xform_inv(v - self.origin)
    }

    pub fn basis_determinant(&self) -> f32 {
        self.x.x * self.y.y - self.x.y * self.y.x
    }

    pub fn rotation(&self) -> f32 {
        self.x.y.atan2(self.x.x)
    }

    pub fn scaled(&self, scale: Vector2) -> Transform2D {
        Transform2D {
            x: Vector2::new(self.x.x * scale.x, self.x.y * scale.y),
            y: Vector2::new(self.y.x * scale.x, self.y.y * scale.y),
            origin: self.origin * scale,
        }
    }

    pub fn translated(&self, offset: Vector2) -> Transform2D {
        Transform2D {
            origin: self.origin + self.basis_xform(offset),
            ..*self
        }
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Transform2D::IDENTITY
    }
}

impl Mul for Transform2D {
    type Output = Transform2D;
    fn mul(self, other: Transform2D) -> Transform2D {
        Transform2D {
            x: Vector2::new(self.tdotx(other.x), self.tdoty(other.x)),
            y: Vector2::new(self.tdotx(other.y), self.tdoty(other.y)),
            origin: self.xform(other.origin),
        }
    }
}

impl CoreType for Transform2D {
    const BYTE_LEN: usize = Vector2::BYTE_LEN * 3;

    fn write_raw(&self, out: &mut [u8]) {
        assert_eq!(out.len(), Self::BYTE_LEN, "value codec buffer size mismatch");
        self.x.write_raw(&mut out[0..8]);
        self.y.write_raw(&mut out[8..16]);
        self.origin.write_raw(&mut out[16..24]);
    }

    fn read_raw(raw: &[u8]) -> Self {
        assert_eq!(raw.len(), Self::BYTE_LEN, "value codec buffer size mismatch");
        Transform2D {
            x: Vector2::read_raw(&raw[0..8]),
            y: Vector2::read_raw(&raw[8..16]),
            origin: Vector2::read_raw(&raw[16..24]),
        }
    }
}
