//! The seam between the plugin and the host application.
//!
//! The host exposes a small, fixed ABI: resolve a method by two strings,
//! invoke a resolved call target against an instance, construct and free
//! instances, and convert strings in and out of the host's representation.
//! [`HostBackend`] expresses that ABI as a trait so the runtime layer, the
//! generated bindings, and the test harness all talk to the same surface.
//!
//! [`HostContext`] bundles a backend with the process-lifetime
//! [`SymbolCache`]. Generated constructors take the context explicitly; the
//! plugin's entry point may additionally publish one context process-wide
//! once the host has signalled readiness.

use crate::error::{InteropError, InteropResult};
use crate::handle::{HostString, ObjectHandle, Void};
use crate::symbol_cache::SymbolCache;
use std::sync::{Arc, OnceLock};

/// An opaque, host-issued call target for one (class, member) entry point.
///
/// Tokens behave identically for repeated resolutions of the same key within
/// one process, and are never valid across host restarts.
#[derive(Hash, PartialEq, Eq, Copy, Clone, Debug)]
pub struct MethodBind(*const Void);

impl MethodBind {
    /// Wrap a token handed out by the host. Does not validate.
    pub fn from_raw(ptr: *const Void) -> Self {
        MethodBind(ptr)
    }

    pub fn as_ptr(&self) -> *const Void {
        self.0
    }
}

unsafe impl Send for MethodBind {}
unsafe impl Sync for MethodBind {}

/// The host ABI, one method per entry point.
///
/// The argument buffer handed to [`invoke`](HostBackend::invoke) follows the
/// host's per-slot encoding: value types and primitives contribute a pointer
/// to their native-layout storage, object and string arguments contribute
/// the raw object/string pointer itself. The slot shape must match what the
/// call target was resolved against; a mismatch is undefined behavior at the
/// host boundary, not a detectable error.
pub trait HostBackend: Send + Sync {
    /// One-time symbol lookup. `None` when the host knows no such member.
    fn resolve_method(&self, class_name: &str, method_name: &str) -> Option<MethodBind>;

    /// Invoke a resolved call target. Blocks until the host has produced a
    /// result; the host writes the packed result through `ret` (which may be
    /// null for void-returning targets).
    ///
    /// # Safety
    ///
    /// `instance` must be alive, `args` must match the target's declared
    /// shape and `ret` must point to storage of the declared return layout.
    unsafe fn invoke(
        &self,
        bind: MethodBind,
        instance: ObjectHandle,
        args: &[*const Void],
        ret: *mut Void,
    );

    /// Allocate a new host instance of `class_name`. `None` when the class
    /// is unknown or not instantiable.
    fn construct(&self, class_name: &str) -> Option<ObjectHandle>;

    /// Free a host instance previously obtained from
    /// [`construct`](HostBackend::construct). Any handle to it is stale
    /// afterwards.
    fn free_instance(&self, instance: ObjectHandle);

    /// Copy a UTF-8 string into the host's string representation.
    fn string_new(&self, value: &str) -> HostString;

    /// Read a host string back as UTF-8.
    fn string_get(&self, string: HostString) -> String;

    /// Destroy a host string created by [`string_new`](HostBackend::string_new)
    /// or returned from a call.
    fn string_free(&self, string: HostString);
}

struct ContextInner {
    backend: Box<dyn HostBackend>,
    symbols: SymbolCache,
}

/// A cheap-clone handle to the host backend plus the symbol cache.
///
/// Generated object wrappers store a clone and thread it through every call,
/// so tests can stand up isolated contexts against mock backends. A plugin
/// entry point publishes one context via [`HostContext::initialize`] after
/// the host signals readiness; [`HostContext::global`] before that point
/// fails fast rather than handing out tokens that misbehave on use.
#[derive(Clone)]
pub struct HostContext {
    inner: Arc<ContextInner>,
}

static GLOBAL: OnceLock<HostContext> = OnceLock::new();

impl HostContext {
    pub fn new(backend: impl HostBackend + 'static) -> Self {
        HostContext {
            inner: Arc::new(ContextInner {
                backend: Box::new(backend),
                symbols: SymbolCache::new(),
            }),
        }
    }

    /// Publish `ctx` as the process-wide context. Called exactly once from
    /// the plugin's load entry point, after host initialization.
    pub fn initialize(ctx: HostContext) -> InteropResult<()> {
        GLOBAL.set(ctx).map_err(|_| InteropError::AlreadyInitialized)
    }

    /// The process-wide context, or [`InteropError::HostNotReady`] when the
    /// plugin entry point has not published one yet.
    pub fn global() -> InteropResult<HostContext> {
        GLOBAL.get().cloned().ok_or(InteropError::HostNotReady)
    }

    /// Resolve `(declaring class, member)` through the cache; at most one
    /// host lookup per key for the process lifetime.
    pub fn method_bind(&self, class: &str, method: &str) -> InteropResult<MethodBind> {
        self.inner
            .symbols
            .resolve_with(class, method, |c, m| self.inner.backend.resolve_method(c, m))
    }

    /// Allocate a new host instance. The returned handle is owning: the
    /// caller is responsible for eventually releasing it via
    /// [`free`](HostContext::free).
    pub fn construct(&self, class: &str) -> InteropResult<ObjectHandle> {
        match self.inner.backend.construct(class) {
            Some(handle) if !handle.is_null() => Ok(handle),
            _ => Err(InteropError::ConstructFailed {
                class: class.to_string(),
            }),
        }
    }

    /// Release an owning handle. The handle and every copy of it are stale
    /// afterwards.
    pub fn free(&self, instance: ObjectHandle) {
        self.inner.backend.free_instance(instance);
    }

    pub fn backend(&self) -> &dyn HostBackend {
        self.inner.backend.as_ref()
    }

    /// Number of resolved symbols so far.
    pub fn resolved_symbols(&self) -> usize {
        self.inner.symbols.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullBackend;

    impl HostBackend for NullBackend {
        fn resolve_method(&self, _class: &str, method: &str) -> Option<MethodBind> {
            if method == "known" {
                Some(MethodBind::from_raw(0x10 as *const Void))
            } else {
                None
            }
        }

        unsafe fn invoke(
            &self,
            _bind: MethodBind,
            _instance: ObjectHandle,
            _args: &[*const Void],
            _ret: *mut Void,
        ) {
        }

        fn construct(&self, _class: &str) -> Option<ObjectHandle> {
            None
        }

        fn free_instance(&self, _instance: ObjectHandle) {}

        fn string_new(&self, _value: &str) -> HostString {
            HostString::from_mut(std::ptr::null_mut())
        }

        fn string_get(&self, _string: HostString) -> String {
            String::new()
        }

        fn string_free(&self, _string: HostString) {}
    }

    #[test]
    fn method_bind_caches_through_the_backend() {
        let ctx = HostContext::new(NullBackend);
        let a = ctx.method_bind("Object", "known").unwrap();
        let b = ctx.method_bind("Object", "known").unwrap();
        assert_eq!(a, b);
        assert_eq!(ctx.resolved_symbols(), 1);
    }

    #[test]
    fn unknown_member_surfaces_resolution_error() {
        let ctx = HostContext::new(NullBackend);
        let err = ctx.method_bind("Object", "missing").unwrap_err();
        assert!(matches!(err, InteropError::Resolution { .. }));
    }

    #[test]
    fn failed_construction_is_an_error() {
        let ctx = HostContext::new(NullBackend);
        let err = ctx.construct("Widget").unwrap_err();
        assert_eq!(
            err,
            InteropError::ConstructFailed {
                class: "Widget".to_string(),
            }
        );
    }
}
