//! Opaque handles to host-resident objects.
//!
//! The host owns every object instance; the plugin side only ever sees an
//! opaque pointer. `ObjectHandle` wraps that pointer without interpreting it.
//! There is no liveness signal in the host ABI, so a handle is valid exactly
//! as long as the host keeps the underlying object alive. Using a handle
//! after the host has freed the object is undefined behavior at the boundary
//! and is the caller's responsibility to avoid.

use std::ffi::c_void;

pub type Void = c_void;

/// A non-owning view of a host-resident object.
///
/// Equality and hashing are pointer identity: two handles are equal exactly
/// when they refer to the same host object. The wrapper performs no
/// validation and carries no lifetime information.
#[derive(Hash, PartialEq, Eq, Copy, Clone, Debug)]
pub struct ObjectHandle(*mut Void);

impl ObjectHandle {
    /// The null handle. The host returns this for failed constructions and
    /// for object-typed results that carry no object.
    pub fn null() -> Self {
        ObjectHandle(std::ptr::null_mut())
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Wrap a raw pointer handed out by the host. Does not validate.
    pub fn from_mut(ptr: *mut Void) -> Self {
        ObjectHandle(ptr)
    }

    /// Wrap a const pointer handed out by the host. Does not validate.
    pub fn from_const(ptr: *const Void) -> Self {
        ObjectHandle(ptr as *mut Void)
    }

    /// The raw pointer, for passing to host call sites.
    pub fn as_ptr(&self) -> *const Void {
        self.0
    }

    pub fn as_mut_ptr(&mut self) -> *mut Void {
        self.0
    }
}

// The handle itself is just a pointer value; whether the object behind it may
// be touched from several threads is the host's contract, not ours.
unsafe impl Send for ObjectHandle {}
unsafe impl Sync for ObjectHandle {}

/// An opaque host-owned string value.
///
/// The host's string representation is reference counted on the host side and
/// never inspected here. Instances are created and destroyed through
/// [`HostBackend`](crate::host::HostBackend) string calls; holding one past
/// `string_free` is the same contract violation as a stale `ObjectHandle`.
#[derive(Hash, PartialEq, Eq, Copy, Clone, Debug)]
pub struct HostString(*mut Void);

impl HostString {
    pub fn from_mut(ptr: *mut Void) -> Self {
        HostString(ptr)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    pub fn as_ptr(&self) -> *const Void {
        self.0
    }
}

unsafe impl Send for HostString {}
unsafe impl Sync for HostString {}
