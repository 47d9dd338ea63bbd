//! Axis-aligned 2-D rectangle value type.

use super::core_type::CoreType;
use super::vector2::Vector2;

/// An axis-aligned rectangle, sixteen bytes in the host layout
/// (`position` then `size`, each a [`Vector2`]).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Rect2 {
    pub position: Vector2,
    pub size: Vector2,
}

impl Rect2 {
    pub fn new(position: Vector2, size: Vector2) -> Self {
        Rect2 { position, size }
    }

    pub fn end(&self) -> Vector2 {
        self.position + self.size
    }

    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }

    pub fn has_point(&self, point: Vector2) -> bool {
        point.x >= self.position.x
            && point.y >= self.position.y
            && point.x < self.position.x + self.size.x
            && point.y < self.position.y + self.size.y
    }

    /// Grow the rectangle in place so it contains `point`.
    pub fn expand_to(&mut self, point: Vector2) {
        let mut begin = self.position;
        let mut end = self.end();
        if point.x < begin.x {
            begin.x = point.x;
        }
        if point.y < begin.y {
            begin.y = point.y;
        }
        if point.x > end.x {
            end.x = point.x;
        }
        if point.y > end.y {
            end.y = point.y;
        }
        self.position = begin;
        self.size = end - begin;
    }

    pub fn merge(&self, other: Rect2) -> Rect2 {
        let mut out = *self;
        out.expand_to(other.position);
        out.expand_to(other.end());
        out
    }
}

impl CoreType for Rect2 {
    const BYTE_LEN: usize = Vector2::BYTE_LEN * 2;

    fn write_raw(&self, out: &mut [u8]) {
        assert_eq!(out.len(), Self::BYTE_LEN, "value codec buffer size mismatch");
        self.position.write_raw(&mut out[0..8]);
        self.size.write_raw(&mut out[8..16]);
    }

    fn read_raw(raw: &[u8]) -> Self {
        assert_eq!(raw.len(), Self::BYTE_LEN, "value codec buffer size mismatch");
        Rect2 {
            position: Vector2::read_raw(&raw[0..8]),
            size: Vector2::read_raw(&raw[8..16]),
        }
    }
}

impl std::fmt::Display for Rect2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.position, self.size)
    }
}
