//! Rotation quaternion value type.

use super::core_type::{CoreType, read_f32s, write_f32s};
use std::ops::Mul;

/// A rotation quaternion, sixteen bytes in the host layout
/// (`x`, `y`, `z`, `w` - the scalar part last).
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Quat { x, y, z, w }
    }

    pub fn dot(&self, other: Quat) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn length_squared(&self) -> f32 {
        self.dot(*self)
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn normalized(&self) -> Quat {
        let len = self.length();
        if len == 0.0 {
            *self
        } else {
            let inv = 1.0 / len;
            Quat::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
        }
    }

    pub fn inverse(&self) -> Quat {
        Quat::new(-self.x, -self.y, -self.z, self.w)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Quat::IDENTITY
    }
}

impl Mul for Quat {
    type Output = Quat;
    fn mul(self, q: Quat) -> Quat {
        Quat::new(
            self.w * q.x + self.x * q.w + self.y * q.z - self.z * q.y,
            self.w * q.y - self.x * q.z + self.y * q.w + self.z * q.x,
            self.w * q.z + self.x * q.y - self.y * q.x + self.z * q.w,
            self.w * q.w - self.x * q.x - self.y * q.y - self.z * q.z,
        )
    }
}

impl CoreType for Quat {
    const BYTE_LEN: usize = 16;

    fn write_raw(&self, out: &mut [u8]) {
        write_f32s(out, &[self.x, self.y, self.z, self.w]);
    }

    fn read_raw(raw: &[u8]) -> Self {
        let [x, y, z, w] = read_f32s(raw);
        Quat { x, y, z, w }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_round_trip() {
        let q = Quat::new(0.1, 0.2, 0.3, 0.9);
        assert_eq!(Quat::decode(&q.encode()), q);
    }

    #[test]
    fn encoded_layout_puts_scalar_last() {
        let q = Quat::IDENTITY;
        assert_eq!(
            q.encode(),
            vec![
                0x00, 0x00, 0x00, 0x00, // x
                0x00, 0x00, 0x00, 0x00, // y
                0x00, 0x00, 0x00, 0x00, // z
                0x00, 0x00, 0x80, 0x3F, // w = 1.0
            ]
        );
    }

    #[test]
    fn identity_is_multiplicative_unit() {
        let q = Quat::new(0.5, 0.5, 0.5, 0.5);
        assert_eq!(q * Quat::IDENTITY, q);
        assert_eq!(Quat::IDENTITY * q, q);
    }
}
