//! Runtime interop layer for GDNative plugins.
//!
//! Code compiled into a plugin talks to the host application through four
//! small pieces, leaves first:
//!
//! - [`types`] - exact-layout value types copied across the boundary
//!   (vectors, transforms, colors, rects),
//! - [`handle`] - opaque handles to host-resident objects,
//! - [`symbol_cache`] - lazy, memoized `(class, member) -> call target`
//!   resolution,
//! - [`dispatch`] - typed invocation helpers packing arguments and
//!   unpacking results.
//!
//! [`host`] defines the seam all of them cross: the [`host::HostBackend`]
//! trait expressing the host's fixed ABI, and [`host::HostContext`] bundling
//! a backend with the process-lifetime symbol cache. Generated bindings (see
//! the companion bindgen crate) are thin per-class wrappers over these
//! pieces.
//!
//! The layer does no scheduling of its own: the host calls in on its own
//! threads, every outgoing call blocks until the host answers, and the only
//! shared mutable state is the write-once-per-key symbol cache.

pub mod dispatch;
pub mod error;
pub mod handle;
pub mod host;
pub mod manifest;
pub mod symbol_cache;
pub mod types;

pub mod prelude {
    pub use crate::dispatch::{self, HostEnum};
    pub use crate::error::{Accessor, InteropError, InteropResult};
    pub use crate::handle::{HostString, ObjectHandle, Void};
    pub use crate::host::{HostBackend, HostContext, MethodBind};
    pub use crate::manifest::LibraryManifest;
    pub use crate::symbol_cache::SymbolCache;
    pub use crate::types::*;
}
