//! Umbrella crate for plugin authors.
//!
//! Re-exports the runtime interop layer ([`gdnr_core`]) and the build-time
//! binding generator ([`gdnr_bindgen`]). Plugin crates usually depend on
//! this crate alone: generated bindings compile against [`prelude`], and a
//! `build.rs` drives [`gdnr_bindgen`] over the host's introspection JSON.

pub use gdnr_bindgen;
pub use gdnr_core;

pub mod prelude {
    pub use gdnr_core::prelude::*;
}
