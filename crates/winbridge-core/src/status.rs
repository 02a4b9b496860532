use std::fmt;

/// Thread last-error value read right after a native call.
///
/// Carried through unmodified. Whether a non-zero value means failure depends on
/// the call: many Win32 functions leave a stale or informational code behind on
/// success, so callers look at the returned word first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Status(pub u32);

impl Status {
    pub const SUCCESS: Status = Status(0);

    #[inline]
    pub fn code(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Resets the calling thread's last-error to zero.
    #[inline]
    pub(crate) fn clear() {
        platform::set_last_error(0);
    }

    /// Reads the calling thread's last-error.
    #[inline]
    pub(crate) fn capture() -> Status {
        Status(platform::last_error())
    }
}

#[cfg(windows)]
pub(crate) mod platform {
    use windows_sys::Win32::Foundation::{GetLastError, SetLastError};

    #[inline]
    pub(crate) fn set_last_error(code: u32) {
        // SAFETY: writes the calling thread's last-error slot only.
        unsafe { SetLastError(code) }
    }

    #[inline]
    pub(crate) fn last_error() -> u32 {
        // SAFETY: reads the calling thread's last-error slot only.
        unsafe { GetLastError() }
    }
}

#[cfg(not(windows))]
pub(crate) mod platform {
    #[inline]
    pub(crate) fn set_last_error(_code: u32) {}

    #[inline]
    pub(crate) fn last_error() -> u32 {
        std::io::Error::last_os_error().raw_os_error().unwrap_or(0) as u32
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let os = std::io::Error::from_raw_os_error(self.0 as i32);
        write!(f, "status {} ({})", self.0, os)
    }
}

impl From<u32> for Status {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
