//! Shared mock host for integration tests.
//!
//! Implements the host ABI in-process: call targets are registered per
//! `(class, method)` as closures over raw slot buffers, and shared counters
//! expose how often the plugin side resolved or dispatched.

use gdnr::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

type CallHandler = Box<dyn Fn(&[*const Void], *mut Void) + Send + Sync>;

#[derive(Default)]
pub struct Counters {
    pub resolutions: AtomicUsize,
    pub dispatches: AtomicUsize,
    pub constructed: AtomicUsize,
    pub freed: AtomicUsize,
}

impl Counters {
    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }

    pub fn dispatches(&self) -> usize {
        self.dispatches.load(Ordering::SeqCst)
    }
}

pub struct MockHost {
    methods: HashMap<(String, String), usize>,
    handlers: Vec<CallHandler>,
    counters: Arc<Counters>,
}

impl MockHost {
    pub fn new() -> MockHost {
        MockHost {
            methods: HashMap::new(),
            handlers: Vec::new(),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Register a call target. The returned builder keeps the counters
    /// shared with every clone handed out via [`MockHost::counters`].
    pub fn method(
        mut self,
        class: &str,
        method: &str,
        handler: impl Fn(&[*const Void], *mut Void) + Send + Sync + 'static,
    ) -> MockHost {
        self.handlers.push(Box::new(handler));
        // Tokens start at 1 so no bind is ever null.
        let token = self.handlers.len();
        self.methods
            .insert((class.to_string(), method.to_string()), token);
        self
    }

    pub fn counters(&self) -> Arc<Counters> {
        Arc::clone(&self.counters)
    }
}

impl HostBackend for MockHost {
    fn resolve_method(&self, class: &str, method: &str) -> Option<MethodBind> {
        self.counters.resolutions.fetch_add(1, Ordering::SeqCst);
        self.methods
            .get(&(class.to_string(), method.to_string()))
            .map(|&token| MethodBind::from_raw(token as *const Void))
    }

    unsafe fn invoke(
        &self,
        bind: MethodBind,
        _instance: ObjectHandle,
        args: &[*const Void],
        ret: *mut Void,
    ) {
        self.counters.dispatches.fetch_add(1, Ordering::SeqCst);
        let token = bind.as_ptr() as usize;
        (self.handlers[token - 1])(args, ret);
    }

    fn construct(&self, _class: &str) -> Option<ObjectHandle> {
        let serial = self.counters.constructed.fetch_add(1, Ordering::SeqCst) + 1;
        Some(ObjectHandle::from_mut((serial << 4) as *mut Void))
    }

    fn free_instance(&self, _instance: ObjectHandle) {
        self.counters.freed.fetch_add(1, Ordering::SeqCst);
    }

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
