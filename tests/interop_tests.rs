//! Runtime interop against an in-process mock host.
//!
//! The wrapper structs here mirror what the binding generator emits, so
//! these tests pin down the runtime contract generated code relies on:
//! one symbol resolution per member, slot-packed dispatch, and typed error
//! surfaces for missing accessors and unmapped enum integers.

mod support;

use gdnr::prelude::*;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::sync::{Arc, Mutex};
use support::MockHost;

struct Widget {
    ctx: HostContext,
    handle: ObjectHandle,
    owned: bool,
}

impl Widget {
    fn new(ctx: &HostContext) -> InteropResult<Widget> {
        let handle = ctx.construct("Widget")?;
        Ok(Widget {
            ctx: ctx.clone(),
            handle,
            owned: true,
        })
    }

    // `size` has no getter in the schema this wrapper was generated from.
    fn size(&self) -> InteropResult<f32> {
        Err(InteropError::AccessorMissing {
            class: "Widget".to_string(),
            property: "size".to_string(),
            accessor: Accessor::Getter,
        })
    }

    fn set_size(&self, width: f32, height: f32) -> InteropResult<()> {
        let bind = self.ctx.method_bind("Widget", "set_size")?;
        unsafe { dispatch::icall_unit_f32_f32(&self.ctx, bind, self.handle, width, height) };
        Ok(())
    }

    fn free(self) {
        if self.owned {
            self.ctx.free(self.handle);
        }
    }
}

#[test]
fn widget_set_size_resolves_once_and_packs_both_floats() {
    let seen = Arc::new(Mutex::new(None::<(f32, f32)>));
    let sink = Arc::clone(&seen);
    let host = MockHost::new().method("Widget", "set_size", move |args, _ret| {
        let w = unsafe { *(args[0] as *const f32) };
        let h = unsafe { *(args[1] as *const f32) };
        *sink.lock().unwrap() = Some((w, h));
    });
    let counters = host.counters();
    let ctx = HostContext::new(host);

    let widget = Widget::new(&ctx).unwrap();
    widget.set_size(10.0, 5.0).unwrap();

    assert_eq!(*seen.lock().unwrap(), Some((10.0, 5.0)));
    assert_eq!(counters.resolutions(), 1);
    assert_eq!(counters.dispatches(), 1);

    // The second call reuses the cached bind.
    widget.set_size(1.0, 2.0).unwrap();
    assert_eq!(counters.resolutions(), 1);
    assert_eq!(counters.dispatches(), 2);
}

#[test]
fn missing_getter_surfaces_as_accessor_missing() {
    let host = MockHost::new();
    let ctx = HostContext::new(host);
    let widget = Widget {
        ctx,
        handle: ObjectHandle::from_mut(0x10 as *mut Void),
        owned: false,
    };

    let err = widget.size().unwrap_err();
    assert_eq!(format!("{err}"), "property 'size' on 'Widget' has no getter");
}

#[test]
fn unresolvable_member_names_class_and_method() {
    let host = MockHost::new();
    let ctx = HostContext::new(host);
    let widget = Widget {
        ctx,
        handle: ObjectHandle::from_mut(0x10 as *mut Void),
        owned: false,
    };

    let err = widget.set_size(1.0, 1.0).unwrap_err();
    assert!(matches!(
        err,
        InteropError::Resolution { ref class, ref method }
            if class == "Widget" && method == "set_size"
    ));
}

#[test]
fn construction_and_free_reach_the_host_once_each() {
    let host = MockHost::new();
    let counters = host.counters();
    let ctx = HostContext::new(host);

    let widget = Widget::new(&ctx).unwrap();
    assert!(!widget.handle.is_null());
    widget.free();

    use std::sync::atomic::Ordering;
    assert_eq!(counters.constructed.load(Ordering::SeqCst), 1);
    assert_eq!(counters.freed.load(Ordering::SeqCst), 1);
}

// Mirrors a three-level generated hierarchy where the middle class declares
// the member: the leaf wrapper keys the lookup by the declaring class.
#[test]
fn inherited_member_is_keyed_by_its_declaring_class() {
    let host = MockHost::new().method("Middle", "describe", |_args, ret| unsafe {
        *(ret as *mut i64) = 7;
    });
    let counters = host.counters();
    let ctx = HostContext::new(host);
    let leaf = ObjectHandle::from_mut(0x20 as *mut Void);

    let call = |ctx: &HostContext| -> InteropResult<i64> {
        let bind = ctx.method_bind("Middle", "describe")?;
        Ok(unsafe { dispatch::icall_i64(ctx, bind, leaf) })
    };

    for _ in 0..10 {
        assert_eq!(call(&ctx).unwrap(), 7);
    }
    assert_eq!(counters.resolutions(), 1);
    assert_eq!(counters.dispatches(), 10);

    // Repeated resolution hands back the same token.
    let a = ctx.method_bind("Middle", "describe").unwrap();
    let b = ctx.method_bind("Middle", "describe").unwrap();
    assert_eq!(a, b);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(i64)]
enum PauseMode {
    Stop = 0,
    Process = 1,
    Inherit = 2,
}

#[test]
fn enum_results_decode_or_fail_fatally() {
    let host = MockHost::new()
        .method("Node", "get_pause_mode", |_args, ret| unsafe {
            *(ret as *mut i64) = 1;
        })
        .method("Node", "get_broken_mode", |_args, ret| unsafe {
            *(ret as *mut i64) = 99;
        });
    let ctx = HostContext::new(host);
    let this = ObjectHandle::from_mut(0x30 as *mut Void);

    let bind = ctx.method_bind("Node", "get_pause_mode").unwrap();
    let mode: PauseMode = unsafe { dispatch::icall_enum(&ctx, bind, this) }.unwrap();
    assert_eq!(mode, PauseMode::Process);

    let bind = ctx.method_bind("Node", "get_broken_mode").unwrap();
    let err = unsafe { dispatch::icall_enum::<PauseMode>(&ctx, bind, this) }.unwrap_err();
    assert!(matches!(err, InteropError::EnumDecode { value: 99, .. }));
}

#[test]
fn string_results_cross_and_release_host_storage() {
    let host = MockHost::new().method("Object", "get_name", |_args, ret| unsafe {
        let name = Box::into_raw(Box::new("root".to_string()));
        *(ret as *mut HostString) = HostString::from_mut(name as *mut Void);
    });
    let ctx = HostContext::new(host);
    let this = ObjectHandle::from_mut(0x40 as *mut Void);

    let bind = ctx.method_bind("Object", "get_name").unwrap();
    let name = unsafe { dispatch::icall_str(&ctx, bind, this) };
    assert_eq!(name, "root");
}

#[test]
fn value_type_arguments_pass_by_native_layout() {
    let host = MockHost::new().method("Node2D", "set_position", |args, _ret| unsafe {
        let v = *(args[0] as *const Vector2);
        assert_eq!(v, Vector2::new(3.0, -4.0));
    });
    let ctx = HostContext::new(host);
    let this = ObjectHandle::from_mut(0x50 as *mut Void);

    let bind = ctx.method_bind("Node2D", "set_position").unwrap();
    let position = Vector2::new(3.0, -4.0);
    unsafe { dispatch::icall_unit_value(&ctx, bind, this, &position) };
}

#[test]
fn resolved_symbol_count_tracks_distinct_members() {
    let host = MockHost::new()
        .method("A", "x", |_args, _ret| {})
        .method("A", "y", |_args, _ret| {});
    let ctx = HostContext::new(host);

    assert_eq!(ctx.resolved_symbols(), 0);
    ctx.method_bind("A", "x").unwrap();
    ctx.method_bind("A", "y").unwrap();
    ctx.method_bind("A", "x").unwrap();
    assert_eq!(ctx.resolved_symbols(), 2);
}
