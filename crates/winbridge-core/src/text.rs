use crate::error::{BridgeError, BridgeResult};

/// NUL-terminated UTF-16 copy of `s` for `W` entry points.
pub fn to_wide(s: &str) -> BridgeResult<Vec<u16>> {
    let mut wide: Vec<u16> = s.encode_utf16().collect();
    if wide.contains(&0) {
        return Err(BridgeError::InteriorNul);
    }
    wide.push(0);
    Ok(wide)
}

/// Like [`to_wide`], but `None` stays `None`.
pub fn to_wide_opt(s: Option<&str>) -> BridgeResult<Option<Vec<u16>>> {
    s.map(to_wide).transpose()
}

/// Pointer to an optional wide string as a call argument; null for `None`.
#[inline]
pub(crate) fn wide_arg(w: &Option<Vec<u16>>) -> usize {
    w.as_ref().map_or(0, |v| v.as_ptr() as usize)
}
