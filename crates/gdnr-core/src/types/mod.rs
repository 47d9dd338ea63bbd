//! Value types exchanged with the host by copy.
//!
//! Each type mirrors the host's native struct layout exactly; see
//! [`core_type::CoreType`] for the codec contract.

pub mod basis;
pub mod color;
pub mod core_type;
pub mod quat;
pub mod rect2;
pub mod transform;
pub mod transform2d;
pub mod vector2;
pub mod vector3;

pub use basis::Basis;
pub use color::Color;
pub use core_type::CoreType;
pub use quat::Quat;
pub use rect2::Rect2;
pub use transform::Transform;
pub use transform2d::Transform2D;
pub use vector2::Vector2;
pub use vector3::Vector3;
