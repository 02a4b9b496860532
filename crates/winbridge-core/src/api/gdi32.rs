use super::{bool_word, Outcome, Win32};
use crate::error::BridgeResult;
use crate::types::{ColorRef, Hdc};

impl Win32 {
    /// `GetPixel(hdc, x, y)`. [`crate::CLR_INVALID`] when the point is outside the
    /// clipping region.
    pub fn get_pixel(&self, hdc: Hdc, x: i32, y: i32) -> BridgeResult<Outcome<ColorRef>> {
        let args = [hdc.0, x as isize as usize, y as isize as usize];

        // SAFETY: COLORREF GetPixel(HDC, int, int); no pointers.
        let ret = unsafe { self.get_pixel.call(3, &args)? };

        Ok(Outcome {
            value: ColorRef(ret.word as u32),
            status: ret.status,
        })
    }

    /// `DeleteDC(hdc)`. Only for DCs created with `CreateDC`; window DCs go through
    /// [`Win32::release_dc`].
    pub fn delete_dc(&self, hdc: Hdc) -> BridgeResult<Outcome<bool>> {
        // SAFETY: BOOL DeleteDC(HDC); no pointers.
        let ret = unsafe { self.delete_dc.call(1, &[hdc.0])? };

        Ok(Outcome {
            value: bool_word(ret.word),
            status: ret.status,
        })
    }
}
