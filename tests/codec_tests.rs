//! Value codec behavior across the crate boundary.

use gdnr::prelude::*;

#[test]
fn vector2_layout_is_two_little_endian_floats() {
    let v = Vector2::new(1.0, 2.0);
    let mut buf = [0u8; Vector2::BYTE_LEN];
    v.write_raw(&mut buf);
    assert_eq!(buf, [0, 0, 0x80, 0x3F, 0, 0, 0, 0x40]);
    assert_eq!(Vector2::read_raw(&buf), v);
}

#[test]
fn color_layout_is_rgba_field_order() {
    let c = Color::rgba(1.0, 0.0, 0.0, 1.0);
    let mut buf = [0u8; Color::BYTE_LEN];
    c.write_raw(&mut buf);
    assert_eq!(
        buf,
        [0, 0, 0x80, 0x3F, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x80, 0x3F]
    );
}

#[test]
fn transform2d_round_trips_through_the_codec() {
    let t = Transform2D::from_rotation_origin(0.5, Vector2::new(3.0, -4.0));
    let encoded = t.encode();
    assert_eq!(encoded.len(), Transform2D::BYTE_LEN);
    assert_eq!(Transform2D::decode(&encoded), t);
}

#[test]
fn composite_types_encode_parts_in_field_order() {
    let t = Transform::default();
    let encoded = t.encode();
    assert_eq!(encoded.len(), Basis::BYTE_LEN + Vector3::BYTE_LEN);
    // Basis comes first, origin last.
    let basis = Basis::read_raw(&encoded[..Basis::BYTE_LEN]);
    assert_eq!(basis, t.basis);
}

#[test]
#[should_panic(expected = "value codec buffer size mismatch")]
fn short_buffer_is_a_caller_bug() {
    let mut buf = [0u8; 4];
    Vector2::new(1.0, 2.0).write_raw(&mut buf);
}
