//! Exact-layout codec for host value types.
//!
//! Value types cross the native boundary by copy, never by handle. Their
//! managed-side layout must match the host's native struct layout byte for
//! byte: same field order, no padding, little-endian `f32` components. Every
//! type in this module is `#[repr(C)]` over `f32` fields, so a pointer to the
//! struct already is the host layout; the byte codec exists so layouts can be
//! pinned down in tests and so composite types can recurse over their parts.
//!
//! Codec operations cannot fail. A buffer of the wrong size is a programming
//! error on the caller's side and panics rather than returning a result.

/// A fixed-size value type shared with the host by copy.
///
/// `write_raw` and `read_raw` operate on buffers of exactly [`BYTE_LEN`]
/// bytes and panic otherwise. Composite types recurse through the codec of
/// their parts in field order.
///
/// [`BYTE_LEN`]: CoreType::BYTE_LEN
pub trait CoreType: Copy + PartialEq + Default + std::fmt::Debug {
    /// Size of the host's native layout in bytes.
    const BYTE_LEN: usize;

    /// Encode into a buffer of exactly `BYTE_LEN` bytes.
    fn write_raw(&self, out: &mut [u8]);

    /// Decode from a buffer of exactly `BYTE_LEN` bytes.
    fn read_raw(raw: &[u8]) -> Self;

    /// Encode into a freshly allocated buffer.
    fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::BYTE_LEN];
        self.write_raw(&mut buf);
        buf
    }

    /// Decode from a buffer of exactly `BYTE_LEN` bytes.
    fn decode(raw: &[u8]) -> Self {
        Self::read_raw(raw)
    }
}

/// Write `values` as consecutive little-endian `f32`s filling `out` exactly.
pub(crate) fn write_f32s(out: &mut [u8], values: &[f32]) {
    assert_eq!(
        out.len(),
        values.len() * 4,
        "value codec buffer size mismatch: {} bytes for {} floats",
        out.len(),
        values.len()
    );
    for (chunk, v) in out.chunks_exact_mut(4).zip(values) {
        chunk.copy_from_slice(&v.to_le_bytes());
    }
}

/// Read `N` consecutive little-endian `f32`s consuming `raw` exactly.
pub(crate) fn read_f32s<const N: usize>(raw: &[u8]) -> [f32; N] {
    assert_eq!(
        raw.len(),
        N * 4,
        "value codec buffer size mismatch: {} bytes for {} floats",
        raw.len(),
        N
    );
    let mut out = [0f32; N];
    for (chunk, v) in raw.chunks_exact(4).zip(out.iter_mut()) {
        *v = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_helpers_round_trip() {
        let mut buf = [0u8; 8];
        write_f32s(&mut buf, &[1.5, -2.0]);
        let back: [f32; 2] = read_f32s(&buf);
        assert_eq!(back, [1.5, -2.0]);
    }

    #[test]
    #[should_panic(expected = "buffer size mismatch")]
    fn wrong_size_write_panics() {
        let mut buf = [0u8; 7];
        write_f32s(&mut buf, &[1.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "buffer size mismatch")]
    fn wrong_size_read_panics() {
        let _: [f32; 2] = read_f32s(&[0u8; 9]);
    }
}
