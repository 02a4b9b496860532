#![forbid(unsafe_op_in_unsafe_fn)]

//! Typed wrappers over the resolved exports.
//!
//! Each wrapper calls its export with the literal argument count of the native
//! signature and hands back the converted value next to the raw [`Status`].

mod gdi32;
mod kernel32;
mod user32;

pub use user32::{
    WindowDc, MAPVK_VK_TO_CHAR, MAPVK_VK_TO_VSC, MAPVK_VSC_TO_VK, MAPVK_VSC_TO_VK_EX,
};

use crate::error::{BridgeError, BridgeResult};
use crate::invoke::{invoke, RawReturn};
use crate::status::Status;
use crate::symbols::{FnAddr, Registry, GDI32, KERNEL32, USER32};

/// Converted return value plus the last-error captured after the call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub status: Status,
}

impl<T> Outcome<T> {
    #[inline]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            status: self.status,
        }
    }

    /// The value when the status is zero, [`BridgeError::Native`] otherwise.
    pub fn check(self) -> BridgeResult<T> {
        if self.status.is_success() {
            Ok(self.value)
        } else {
            Err(BridgeError::Native(self.status))
        }
    }
}

/// An export address together with the names it was resolved from.
#[derive(Debug, Copy, Clone)]
struct Bound {
    module: &'static str,
    symbol: &'static str,
    addr: FnAddr,
}

impl Bound {
    fn new(
        lookup: &impl Fn(&'static str, &'static str) -> FnAddr,
        module: &'static str,
        symbol: &'static str,
    ) -> Self {
        Self {
            module,
            symbol,
            addr: lookup(module, symbol),
        }
    }

    /// # Safety
    ///
    /// Same contract as [`invoke`]: `arg_count` is the export's arity and every
    /// pointer in `args` outlives the call.
    unsafe fn call(&self, arg_count: usize, args: &[usize]) -> BridgeResult<RawReturn> {
        if self.addr.is_null() {
            return Err(BridgeError::unresolved(self.module, self.symbol));
        }
        // SAFETY: forwarded from the caller.
        unsafe { invoke(self.addr, arg_count, args) }
    }
}

/// Cached addresses of every wrapped export.
#[derive(Debug, Clone)]
pub struct Win32 {
    get_module_handle: Bound,
    find_window: Bound,
    get_window_dc: Bound,
    release_dc: Bound,
    get_window_rect: Bound,
    send_input: Bound,
    map_virtual_key: Bound,
    vk_key_scan: Bound,
    delete_dc: Bound,
    get_pixel: Bound,
}

impl Win32 {
    pub fn new(reg: &Registry) -> Self {
        Self::bind(|module, symbol| reg.address(module, symbol))
    }

    fn bind(lookup: impl Fn(&'static str, &'static str) -> FnAddr) -> Self {
        let b = |module: &'static str, symbol: &'static str| Bound::new(&lookup, module, symbol);
        Self {
            get_module_handle: b(KERNEL32, "GetModuleHandleW"),
            find_window: b(USER32, "FindWindowW"),
            get_window_dc: b(USER32, "GetWindowDC"),
            release_dc: b(USER32, "ReleaseDC"),
            get_window_rect: b(USER32, "GetWindowRect"),
            send_input: b(USER32, "SendInput"),
            map_virtual_key: b(USER32, "MapVirtualKeyExW"),
            vk_key_scan: b(USER32, "VkKeyScanW"),
            delete_dc: b(GDI32, "DeleteDC"),
            get_pixel: b(GDI32, "GetPixel"),
        }
    }
}

#[inline]
fn bool_word(word: usize) -> bool {
    word as i32 != 0
}
