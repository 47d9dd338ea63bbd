//! 3-D affine transform value type.

use super::basis::Basis;
use super::core_type::CoreType;
use super::vector3::Vector3;
use std::ops::Mul;

/// A 3-D affine transform, forty-eight bytes in the host layout:
/// a [`Basis`] followed by an origin [`Vector3`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Transform {
    pub basis: Basis,
    pub origin: Vector3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        basis: Basis::IDENTITY,
        origin: Vector3 { x: 0.0, y: 0.0, z: 0.0 },
    };

    pub fn new(basis: Basis, origin: Vector3) -> Self {
        Transform { basis, origin }
    }

    pub fn xform(&self, v: Vector3) -> Vector3 {
        self.basis.xform(v) + self.origin
    }

    /// Inverse-transform `v`. Assumes an orthonormal basis.
    pub fn xform_inv(&self, v: Vector3) -> Vector3 {
        self.basis.xform_inv(v - self.origin)
    }

    pub fn translated(&self, offset: Vector3) -> Transform {
        Transform {
            basis: self.basis,
            origin: self.origin + self.basis.xform(offset),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;
    fn mul(self, other: Transform) -> Transform {
        Transform {
            basis: self.basis * other.basis,
            origin: self.xform(other.origin),
        }
    }
}

impl CoreType for Transform {
    const BYTE_LEN: usize = Basis::BYTE_LEN + Vector3::BYTE_LEN;

    fn write_raw(&self, out: &mut [u8]) {
        assert_eq!(out.len(), Self::BYTE_LEN, "value codec buffer size mismatch");
        self.basis.write_raw(&mut out[0..36]);
        self.origin.write_raw(&mut out[36..48]);
    }

    fn read_raw(raw: &[u8]) -> Self {
        assert_eq!(raw.len(), Self::BYTE_LEN, "value codec buffer size mismatch");
        Transform {
            basis: Basis::read_raw(&raw[0..36]),
            origin: Vector3::read_raw(&raw[36..48]),
        }
    }
}
