//! Plain values exchanged with the native layer.

use std::fmt;

/// Window handle (`HWND`). Passed through unchanged.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Hwnd(pub usize);

/// Device-context handle (`HDC`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Hdc(pub usize);

/// Module handle (`HMODULE`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct HModule(pub usize);

macro_rules! impl_handle {
    ($($t:ident),*) => {$(
        impl $t {
            pub const NULL: $t = $t(0);

            #[inline]
            pub fn is_null(self) -> bool {
                self.0 == 0
            }
        }
    )*};
}

impl_handle!(Hwnd, Hdc, HModule);

/// `RECT`, filled in place by the native side.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// `COLORREF`: `0x00BBGGRR`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct ColorRef(pub u32);

/// Returned by `GetPixel` when the point is outside the clipping region.
pub const CLR_INVALID: ColorRef = ColorRef(0xFFFF_FFFF);

impl ColorRef {
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(r as u32 | (g as u32) << 8 | (b as u32) << 16)
    }

    #[inline]
    pub const fn red(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn is_invalid(self) -> bool {
        self.0 == CLR_INVALID.0
    }
}

impl fmt::Debug for ColorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            f.write_str("ColorRef(CLR_INVALID)")
        } else {
            write!(f, "ColorRef(#{:02x}{:02x}{:02x})", self.red(), self.green(), self.blue())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_unpack_little_end_first() {
        let c = ColorRef(0x0010_2030);
        assert_eq!(c.red(), 0x30);
        assert_eq!(c.green(), 0x20);
        assert_eq!(c.blue(), 0x10);
        assert_eq!(ColorRef::from_rgb(0x30, 0x20, 0x10), c);
    }

    #[test]
    fn invalid_is_never_a_packed_color() {
        assert!(CLR_INVALID.is_invalid());
        assert!(!ColorRef::from_rgb(0xFF, 0xFF, 0xFF).is_invalid());
        assert_eq!(ColorRef::from_rgb(0xFF, 0xFF, 0xFF).0, 0x00FF_FFFF);
        assert_eq!(format!("{:?}", CLR_INVALID), "ColorRef(CLR_INVALID)");
        assert_eq!(format!("{:?}", ColorRef(0x0010_2030)), "ColorRef(#302010)");
    }

    #[test]
    fn rect_extent() {
        let r = Rect {
            left: 10,
            top: 20,
            right: 110,
            bottom: 70,
        };
        assert_eq!((r.width(), r.height()), (100, 50));
        assert_eq!(std::mem::size_of::<Rect>(), 16);
    }

    #[test]
    fn null_handles() {
        assert!(Hwnd::NULL.is_null());
        assert!(!Hdc(4).is_null());
        assert_eq!(HModule::default(), HModule::NULL);
    }
}
