//! Typed invocation helpers - the icall layer.
//!
//! Every host call follows the same steps: pack each typed argument into a
//! slot buffer, invoke the resolved [`MethodBind`] against the target
//! instance, and unpack the raw result into the declared return type. The
//! per-slot encoding is fixed by the host ABI: primitives and value types
//! contribute a pointer to their native-layout storage, object and string
//! arguments contribute the raw pointer itself.
//!
//! There is one public function per distinct argument/return shape. The
//! curated set below covers the shapes the runtime layer itself needs; the
//! binding generator emits additional shape functions for whatever the
//! schema requires, all bottoming out in [`raw_call`].
//!
//! Calls are synchronous and blocking, carry no timeout and no cancellation,
//! and may mutate host state arbitrarily. A shape that does not match what
//! the call target was resolved against is undefined behavior at the host
//! boundary, which is why every function here is `unsafe`.

use crate::error::{InteropError, InteropResult};
use crate::handle::{HostString, ObjectHandle, Void};
use crate::host::{HostContext, MethodBind};
use crate::types::CoreType;
use num_enum::TryFromPrimitive;

/// An enum backed by a host integer.
///
/// Blanket-implemented for every `#[repr(i64)]` enum deriving
/// `num_enum::TryFromPrimitive` + `IntoPrimitive`, which is exactly what the
/// binding generator emits. Decoding an integer that indexes no enumerator
/// is fatal: it means the generated bindings and the running host disagree
/// about the enum, which cannot be safely ignored.
pub trait HostEnum: Sized {
    fn from_host(raw: i64) -> InteropResult<Self>;
    fn to_host(self) -> i64;
}

impl<E> HostEnum for E
where
    E: TryFromPrimitive<Primitive = i64> + Into<i64> + Copy,
{
    fn from_host(raw: i64) -> InteropResult<E> {
        E::try_from_primitive(raw).map_err(|_| InteropError::EnumDecode {
            enum_name: std::any::type_name::<E>(),
            value: raw,
        })
    }

    fn to_host(self) -> i64 {
        self.into()
    }
}

/// Invoke a resolved call target with an already packed slot buffer.
///
/// # Safety
///
/// See [`HostBackend::invoke`](crate::host::HostBackend::invoke): the
/// instance must be alive and `args`/`ret` must match the resolved shape.
pub unsafe fn raw_call(
    ctx: &HostContext,
    bind: MethodBind,
    this: ObjectHandle,
    args: &[*const Void],
    ret: *mut Void,
) {
    unsafe { ctx.backend().invoke(bind, this, args, ret) };
}

/// Read a host string out of a return slot and release it.
///
/// # Safety
///
/// `string` must be a live host string freshly written by the host.
pub unsafe fn take_string_ret(ctx: &HostContext, string: HostString) -> String {
    let value = ctx.backend().string_get(string);
    ctx.backend().string_free(string);
    value
}

macro_rules! slot_of {
    ($local:expr) => {
        (&$local) as *const _ as *const Void
    };
}

macro_rules! ret_slot {
    ($local:expr) => {
        (&mut $local) as *mut _ as *mut Void
    };
}

// ---------------------------------------------------------------------------
// No-argument shapes
// ---------------------------------------------------------------------------

/// # Safety
/// The instance must be alive and the target must be `() -> void`.
pub unsafe fn icall_unit(ctx: &HostContext, bind: MethodBind, this: ObjectHandle) {
    unsafe { raw_call(ctx, bind, this, &[], std::ptr::null_mut()) };
}

/// # Safety
/// The instance must be alive and the target must be `() -> int`.
pub unsafe fn icall_i64(ctx: &HostContext, bind: MethodBind, this: ObjectHandle) -> i64 {
    let mut ret: i64 = 0;
    unsafe { raw_call(ctx, bind, this, &[], ret_slot!(ret)) };
    ret
}

/// # Safety
/// The instance must be alive and the target must be `() -> float`.
pub unsafe fn icall_f32(ctx: &HostContext, bind: MethodBind, this: ObjectHandle) -> f32 {
    let mut ret: f32 = 0.0;
    unsafe { raw_call(ctx, bind, this, &[], ret_slot!(ret)) };
    ret
}

/// # Safety
/// The instance must be alive and the target must be `() -> bool`.
pub unsafe fn icall_bool(ctx: &HostContext, bind: MethodBind, this: ObjectHandle) -> bool {
    let mut ret: bool = false;
    unsafe { raw_call(ctx, bind, this, &[], ret_slot!(ret)) };
    ret
}

/// # Safety
/// The instance must be alive and the target must return an object
/// reference. The returned handle may be null.
pub unsafe fn icall_object(ctx: &HostContext, bind: MethodBind, this: ObjectHandle) -> ObjectHandle {
    let mut ret = ObjectHandle::null();
    unsafe { raw_call(ctx, bind, this, &[], ret_slot!(ret)) };
    ret
}

/// # Safety
/// The instance must be alive and the target must return a host string.
pub unsafe fn icall_str(ctx: &HostContext, bind: MethodBind, this: ObjectHandle) -> String {
    let mut ret = HostString::from_mut(std::ptr::null_mut());
    unsafe {
        raw_call(ctx, bind, this, &[], ret_slot!(ret));
        take_string_ret(ctx, ret)
    }
}

/// # Safety
/// The instance must be alive and the target must return the value type `T`.
pub unsafe fn icall_value<T: CoreType>(ctx: &HostContext, bind: MethodBind, this: ObjectHandle) -> T {
    let mut ret = T::default();
    unsafe { raw_call(ctx, bind, this, &[], ret_slot!(ret)) };
    ret
}

/// # Safety
/// The instance must be alive and the target must return an integer-backed
/// enum. An unmapped integer is a fatal [`InteropError::EnumDecode`].
pub unsafe fn icall_enum<E: HostEnum>(
    ctx: &HostContext,
    bind: MethodBind,
    this: ObjectHandle,
) -> InteropResult<E> {
    let raw = unsafe { icall_i64(ctx, bind, this) };
    E::from_host(raw)
}

// ---------------------------------------------------------------------------
// Argument-carrying shapes
// ---------------------------------------------------------------------------

/// # Safety
/// The instance must be alive and the target must be `(int) -> void`.
pub unsafe fn icall_unit_i64(ctx: &HostContext, bind: MethodBind, this: ObjectHandle, arg0: i64) {
    let args = [slot_of!(arg0)];
    unsafe { raw_call(ctx, bind, this, &args, std::ptr::null_mut()) };
}

/// # Safety
/// The instance must be alive and the target must be `(float) -> void`.
pub unsafe fn icall_unit_f32(ctx: &HostContext, bind: MethodBind, this: ObjectHandle, arg0: f32) {
    let args = [slot_of!(arg0)];
    unsafe { raw_call(ctx, bind, this, &args, std::ptr::null_mut()) };
}

/// # Safety
/// The instance must be alive and the target must be `(float, float) -> void`.
pub unsafe fn icall_unit_f32_f32(
    ctx: &HostContext,
    bind: MethodBind,
    this: ObjectHandle,
    arg0: f32,
    arg1: f32,
) {
    let args = [slot_of!(arg0), slot_of!(arg1)];
    unsafe { raw_call(ctx, bind, this, &args, std::ptr::null_mut()) };
}

/// # Safety
/// The instance must be alive and the target must be `(bool) -> void`.
pub unsafe fn icall_unit_bool(ctx: &HostContext, bind: MethodBind, this: ObjectHandle, arg0: bool) {
    let args = [slot_of!(arg0)];
    unsafe { raw_call(ctx, bind, this, &args, std::ptr::null_mut()) };
}

/// # Safety
/// The instance must be alive, the target must be `(String) -> void`.
pub unsafe fn icall_unit_str(ctx: &HostContext, bind: MethodBind, this: ObjectHandle, arg0: &str) {
    let host_str = ctx.backend().string_new(arg0);
    let args = [host_str.as_ptr()];
    unsafe { raw_call(ctx, bind, this, &args, std::ptr::null_mut()) };
    ctx.backend().string_free(host_str);
}

/// # Safety
/// The instance and the argument object must be alive, the target must be
/// `(Object) -> void`.
pub unsafe fn icall_unit_object(
    ctx: &HostContext,
    bind: MethodBind,
    this: ObjectHandle,
    arg0: ObjectHandle,
) {
    let args = [arg0.as_ptr()];
    unsafe { raw_call(ctx, bind, this, &args, std::ptr::null_mut()) };
}

/// # Safety
/// The instance must be alive and the target must take one value-type
/// argument of type `T` and return void.
pub unsafe fn icall_unit_value<T: CoreType>(
    ctx: &HostContext,
    bind: MethodBind,
    this: ObjectHandle,
    arg0: &T,
) {
    let args = [arg0 as *const T as *const Void];
    unsafe { raw_call(ctx, bind, this, &args, std::ptr::null_mut()) };
}

/// # Safety
/// The instance must be alive and the target must be `(int) -> float`.
/// Used by indexed property accessors.
pub unsafe fn icall_f32_i64(
    ctx: &HostContext,
    bind: MethodBind,
    this: ObjectHandle,
    arg0: i64,
) -> f32 {
    let mut ret: f32 = 0.0;
    let args = [slot_of!(arg0)];
    unsafe { raw_call(ctx, bind, this, &args, ret_slot!(ret)) };
    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostBackend;
    use crate::types::Vector2;

    /// A backend with one call target per shape under test.
    struct ShapeBackend;

    impl ShapeBackend {
        fn bind(token: usize) -> MethodBind {
            MethodBind::from_raw(token as *const Void)
        }
    }

    impl HostBackend for ShapeBackend {
        fn resolve_method(&self, _class: &str, _method: &str) -> Option<MethodBind> {
            None
        }

        unsafe fn invoke(
            &self,
            bind: MethodBind,
            _instance: ObjectHandle,
            args: &[*const Void],
            ret: *mut Void,
        ) {
            unsafe {
                match bind.as_ptr() as usize {
                    // (float, float) -> float : add
                    0x10 => {
                        let a = *(args[0] as *const f32);
                        let b = *(args[1] as *const f32);
                        *(ret as *mut f32) = a + b;
                    }
                    // () -> int : constant
                    0x20 => *(ret as *mut i64) = 42,
                    // (Vector2) -> Vector2 : negate through the value codec
                    0x30 => {
                        let v = *(args[0] as *const Vector2);
                        *(ret as *mut Vector2) = -v;
                    }
                    // () -> String
                    0x40 => *(ret as *mut HostString) = self.string_new("from host"),
                    other => panic!("unexpected bind {other:#x}"),
                }
            }
        }

        fn construct(&self, _class: &str) -> Option<ObjectHandle> {
            None
        }

        fn free_instance(&self, _instance: ObjectHandle) {}

        fn string_new(&self, value: &str) -> HostString {
            HostString::from_mut(Box::into_raw(Box::new(value.to_string())) as *mut Void)
        }

        fn string_get(&self, string: HostString) -> String {
            unsafe { (*(string.as_ptr() as *const String)).clone() }
        }

        fn string_free(&self, string: HostString) {
            unsafe { drop(Box::from_raw(string.as_ptr() as *mut String)) };
        }
    }

    #[test]
    fn packed_float_args_reach_the_host() {
        let ctx = HostContext::new(ShapeBackend);
        let this = ObjectHandle::null();
        let mut ret: f32 = 0.0;
        let (a, b) = (2.5f32, 4.0f32);
        let args = [slot_of!(a), slot_of!(b)];
        unsafe { raw_call(&ctx, ShapeBackend::bind(0x10), this, &args, ret_slot!(ret)) };
        assert_eq!(ret, 6.5);
    }

    #[test]
    fn i64_result_unpacks() {
        let ctx = HostContext::new(ShapeBackend);
        let got = unsafe { icall_i64(&ctx, ShapeBackend::bind(0x20), ObjectHandle::null()) };
        assert_eq!(got, 42);
    }

    #[test]
    fn value_type_crosses_both_directions() {
        let ctx = HostContext::new(ShapeBackend);
        let v = Vector2::new(1.0, -2.0);
        let mut ret = Vector2::ZERO;
        let args = [(&v) as *const Vector2 as *const Void];
        unsafe {
            raw_call(
                &ctx,
                ShapeBackend::bind(0x30),
                ObjectHandle::null(),
                &args,
                ret_slot!(ret),
            )
        };
        assert_eq!(ret, Vector2::new(-1.0, 2.0));
    }

    #[test]
    fn string_result_is_read_and_released() {
        let ctx = HostContext::new(ShapeBackend);
        let got = unsafe { icall_str(&ctx, ShapeBackend::bind(0x40), ObjectHandle::null()) };
        assert_eq!(got, "from host");
    }

    #[test]
    fn enum_decode_of_unmapped_value_fails() {
        #[derive(Debug, Clone, Copy, PartialEq, num_enum::TryFromPrimitive, num_enum::IntoPrimitive)]
        #[repr(i64)]
        enum Mode {
            A = 0,
            B = 1,
            C = 2,
        }

        assert_eq!(Mode::from_host(1).unwrap(), Mode::B);
        let err = Mode::from_host(99).unwrap_err();
        match err {
            InteropError::EnumDecode { value, enum_name } => {
                assert_eq!(value, 99);
                assert!(enum_name.ends_with("Mode"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
