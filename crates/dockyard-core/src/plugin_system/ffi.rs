//! C ABI for plugins shipped as shared libraries.
//!
//! A plugin library exports [`PLUGIN_INIT_SYMBOL`], which returns a boxed
//! [`PluginVTable`]. The vtable owns the plugin instance; the host calls
//! `destroy` exactly once, before unloading the library. Config nodes cross
//! the boundary as XML fragment strings.
//!
//! Plugin crates normally do not touch any of this directly and use
//! [`export_plugin!`](crate::export_plugin) instead.
use std::ffi::{CStr, CString, c_void};
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use crate::plugin_system::traits::Plugin;
use crate::storage::config::ConfigNode;

/// Symbol looked up by the loader.
pub const PLUGIN_INIT_SYMBOL: &[u8] = b"_dockyard_plugin_init\0";

/// API version baked into vtables built by this crate. Matches `kernel::constants::API_VERSION`.
pub const API_VERSION_CSTR: &CStr = c"0.1.0";

/// Signature of the exported init function.
pub type PluginInitFn = unsafe extern "C" fn() -> *mut PluginVTable;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiResult {
    Ok = 0,
    Err = 1,
    NullPointer = 2,
    Utf8Error = 3,
    Panic = 4,
}

#[repr(C)]
pub struct PluginVTable {
    pub instance: *mut c_void,
    /// Static, null-terminated semver string
    pub api_version: *const c_char,
    /// Frees the instance and the vtable itself
    pub destroy: extern "C" fn(vtable: *mut PluginVTable),
    /// Returns an owned string, released with `free_string`
    pub title: extern "C" fn(instance: *const c_void) -> *mut c_char,
    pub free_string: extern "C" fn(s: *mut c_char),
    /// `config_xml` may be null
    pub load: extern "C" fn(instance: *mut c_void, config_xml: *const c_char) -> FfiResult,
}

/// Builds a vtable around a fresh `P::default()`.
pub fn build_vtable<P: Plugin + Default + 'static>() -> *mut PluginVTable {
    let result = panic::catch_unwind(|| {
        let instance = Box::new(P::default());
        let vtable = PluginVTable {
            instance: Box::into_raw(instance) as *mut c_void,
            api_version: API_VERSION_CSTR.as_ptr(),
            destroy: ffi_destroy::<P>,
            title: ffi_title::<P>,
            free_string: ffi_free_string,
            load: ffi_load::<P>,
        };
        Box::into_raw(Box::new(vtable))
    });
    result.unwrap_or(ptr::null_mut())
}

extern "C" fn ffi_destroy<P: Plugin>(vtable: *mut PluginVTable) {
    if vtable.is_null() {
        return;
    }
    let vtable = unsafe { Box::from_raw(vtable) };
    if !vtable.instance.is_null() {
        let _ = panic::catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(vtable.instance as *mut P) });
        }));
    }
}

extern "C" fn ffi_title<P: Plugin>(instance: *const c_void) -> *mut c_char {
    if instance.is_null() {
        return ptr::null_mut();
    }
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let plugin = unsafe { &*(instance as *const P) };
        let title = plugin.title().replace('\0', "");
        CString::new(title)
            .map(CString::into_raw)
            .unwrap_or(ptr::null_mut())
    }));
    result.unwrap_or(ptr::null_mut())
}

extern "C" fn ffi_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

extern "C" fn ffi_load<P: Plugin>(instance: *mut c_void, config_xml: *const c_char) -> FfiResult {
    if instance.is_null() {
        return FfiResult::NullPointer;
    }
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let plugin = unsafe { &mut *(instance as *mut P) };
        let node = if config_xml.is_null() {
            None
        } else {
            let Ok(text) = unsafe { CStr::from_ptr(config_xml) }.to_str() else {
                return FfiResult::Utf8Error;
            };
            match ConfigNode::parse_fragment(text) {
                Ok(nodes) => nodes.into_iter().next(),
                Err(_) => return FfiResult::Err,
            }
        };
        match plugin.load(node.as_ref()) {
            Ok(()) => FfiResult::Ok,
            Err(_) => FfiResult::Err,
        }
    }));
    result.unwrap_or(FfiResult::Panic)
}

/// Exports a `Plugin + Default` type through the Dockyard C ABI.
///
/// ```ignore
/// #[derive(Default)]
/// struct Clock;
/// impl dockyard_core::Plugin for Clock { /* ... */ }
/// dockyard_core::export_plugin!(Clock);
/// ```
#[macro_export]
macro_rules! export_plugin {
    ($plugin:ty) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn _dockyard_plugin_init() -> *mut $crate::plugin_system::ffi::PluginVTable {
            $crate::plugin_system::ffi::build_vtable::<$plugin>()
        }
    };
}
