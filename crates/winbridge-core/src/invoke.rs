#![forbid(unsafe_op_in_unsafe_fn)]

//! Raw calls through resolved addresses.

use std::mem;

use crate::error::{BridgeError, BridgeResult};
use crate::status::Status;
use crate::symbols::FnAddr;

pub const MAX_ARGS: usize = 3;

type Fn0 = unsafe extern "system" fn() -> usize;
type Fn1 = unsafe extern "system" fn(usize) -> usize;
type Fn2 = unsafe extern "system" fn(usize, usize) -> usize;
type Fn3 = unsafe extern "system" fn(usize, usize, usize) -> usize;

/// Result word and last-error of one native call.
///
/// `word` is the full return register. Functions returning narrower types leave
/// the upper bits unspecified; truncate to the native return width.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RawReturn {
    pub word: usize,
    pub status: Status,
}

/// Calls `addr` with the first `arg_count` entries of `args`.
///
/// The thread's last-error is reset before the call and read right after it. The
/// status is passed back untouched.
///
/// A null `addr` is rejected with [`BridgeError::NullAddress`], and an
/// `arg_count` above [`MAX_ARGS`] or above `args.len()` with
/// [`BridgeError::Arity`], both before anything is called.
///
/// # Safety
///
/// `addr` must point to a `system`-ABI function taking exactly `arg_count`
/// word-sized arguments. A mismatched count is undefined behavior. Any pointer
/// passed in `args` must stay valid and unaliased for the whole call.
pub unsafe fn invoke(addr: FnAddr, arg_count: usize, args: &[usize]) -> BridgeResult<RawReturn> {
    if addr.is_null() {
        log::debug!("invoke: refused null address (arity {})", arg_count);
        return Err(BridgeError::NullAddress);
    }

    if arg_count > MAX_ARGS || arg_count > args.len() {
        return Err(BridgeError::Arity {
            count: arg_count,
            supplied: args.len(),
        });
    }

    log::trace!("invoke: {:?} arity={} args={:x?}", addr, arg_count, &args[..arg_count]);

    let raw = addr.raw();

    Status::clear();

    // SAFETY: non-null address of a function with `arg_count` word arguments, per
    // the caller's contract. usize and fn pointers share size and representation.
    let word = unsafe {
        match arg_count {
            0 => mem::transmute::<usize, Fn0>(raw)(),
            1 => mem::transmute::<usize, Fn1>(raw)(args[0]),
            2 => mem::transmute::<usize, Fn2>(raw)(args[0], args[1]),
            _ => mem::transmute::<usize, Fn3>(raw)(args[0], args[1], args[2]),
        }
    };

    let status = Status::capture();

    Ok(RawReturn { word, status })
}
