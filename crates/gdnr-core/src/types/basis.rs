//! 3x3 basis matrix value type.

use super::core_type::CoreType;
use super::vector3::Vector3;
use std::ops::Mul;

/// A 3x3 matrix, thirty-six bytes in the host layout.
///
/// Unlike [`Transform2D`](super::transform2d::Transform2D), the 3-D basis is
/// stored by rows: `elements[i]` is row `i` of the matrix as the host lays it
/// out. The column `i` (the `i`-th basis axis) is spread across the rows.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Basis {
    pub elements: [Vector3; 3],
}

impl Basis {
    pub const IDENTITY: Basis = Basis {
        elements: [
            Vector3 { x: 1.0, y: 0.0, z: 0.0 },
            Vector3 { x: 0.0, y: 1.0, z: 0.0 },
            Vector3 { x: 0.0, y: 0.0, z: 1.0 },
        ],
    };

    pub fn from_rows(r0: Vector3, r1: Vector3, r2: Vector3) -> Self {
        Basis {
            elements: [r0, r1, r2],
        }
    }

    pub fn row(&self, i: usize) -> Vector3 {
        self.elements[i]
    }

    /// The `i`-th basis axis (column `i`).
    pub fn axis(&self, i: usize) -> Vector3 {
        Vector3::new(self.elements[0][i], self.elements[1][i], self.elements[2][i])
    }

    pub fn transposed(&self) -> Basis {
        Basis::from_rows(self.axis(0), self.axis(1), self.axis(2))
    }

    pub fn determinant(&self) -> f32 {
        let [a, b, c] = self.elements;
        a.x * (b.y * c.z - b.z * c.y) - a.y * (b.x * c.z - b.z * c.x)
            + a.z * (b.x * c.y - b.y * c.x)
    }

    pub fn xform(&self, v: Vector3) -> Vector3 {
        Vector3::new(
            self.elements[0].dot(v),
            self.elements[1].dot(v),
            self.elements[2].dot(v),
        )
    }

    /// Inverse-transform `v`. Assumes an orthonormal basis.
    pub fn xform_inv(&self, v: Vector3) -> Vector3 {
        self.transposed().xform(v)
    }
}

impl Default for Basis {
    fn default() -> Self {
        Basis::IDENTITY
    }
}

impl Mul for Basis {
    type Output = Basis;
    fn mul(self, other: Basis) -> Basis {
        let t = other.transposed();
        Basis::from_rows(
            Vector3::new(
                self.elements[0].dot(t.elements[0]),
                self.elements[0].dot(t.elements[1]),
                self.elements[0].dot(t.elements[2]),
            ),
            Vector3::new(
                self.elements[1].dot(t.elements[0]),
                self.elements[1].dot(t.elements[1]),
                self.elements[1].dot(t.elements[2]),
            ),
            Vector3::new(
                self.elements[2].dot(t.elements[0]),
                self.elements[2].dot(t.elements[1]),
                self.elements[2].dot(t.elements[2]),
            ),
        )
    }
}

impl CoreType for Basis {
    const BYTE_LEN: usize = Vector3::BYTE_LEN * 3;

    fn write_raw(&self, out: &mut [u8]) {
        assert_eq!(out.len(), Self::BYTE_LEN, "value codec buffer size mismatch");
        for (i, row) in self.elements.iter().enumerate() {
            row.write_raw(&mut out[i * 12..(i + 1) * 12]);
        }
    }

    fn read_raw(raw: &[u8]) -> Self {
        assert_eq!(raw.len(), Self::BYTE_LEN, "value codec buffer size mismatch");
        Basis {
            elements: [
                Vector3::read_raw(&raw[0..12]),
                Vector3::read_raw(&raw[12..24]),
                Vector3::read_raw(&raw[24..36]),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_round_trip() {
        let b = Basis::from_rows(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
            Vector3::new(7.0, 8.0, 9.0),
        );
        assert_eq!(Basis::decode(&b.encode()), b);
    }

    #[test]
    fn encoded_layout_is_row_major() {
        let b = Basis::from_rows(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(0.0, 0.0, 3.0),
        );
        let bytes = b.encode();
        // Row 0 occupies the first twelve bytes.
        assert_eq!(&bytes[0..4], &[0x00, 0x00, 0x80, 0x3F]);
        assert_eq!(&bytes[16..20], &[0x00, 0x00, 0x00, 0x40]);
        assert_eq!(&bytes[32..36], &[0x00, 0x00, 0x40, 0x40]);
    }

    #[test]
    fn axis_reads_columns() {
        let b = Basis::from_rows(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
            Vector3::new(7.0, 8.0, 9.0),
        );
        assert_eq!(b.axis(0), Vector3::new(1.0, 4.0, 7.0));
    }

    #[test]
    fn identity_xform_is_identity() {
        let v = Vector3::new(1.0, -2.0, 3.0);
        assert_eq!(Basis::IDENTITY.xform(v), v);
    }

    #[test]
    fn identity_determinant_is_one() {
        assert_eq!(Basis::IDENTITY.determinant(), 1.0);
    }
}
