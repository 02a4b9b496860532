use super::{bool_word, Outcome, Win32};
use crate::error::{BridgeError, BridgeResult};
use crate::layout::{encode, InputRecord, STRIDE};
use crate::status::Status;
use crate::text::{to_wide_opt, wide_arg};
use crate::types::{ColorRef, Hdc, Hwnd, Rect};

pub const MAPVK_VK_TO_VSC: u32 = 0;
pub const MAPVK_VSC_TO_VK: u32 = 1;
pub const MAPVK_VK_TO_CHAR: u32 = 2;
pub const MAPVK_VSC_TO_VK_EX: u32 = 3;

impl Win32 {
    /// `FindWindowW(lpClassName, lpWindowName)`. A null [`Hwnd`] means no match.
    pub fn find_window(
        &self,
        class: Option<&str>,
        title: Option<&str>,
    ) -> BridgeResult<Outcome<Hwnd>> {
        let class = to_wide_opt(class)?;
        let title = to_wide_opt(title)?;

        // SAFETY: HWND FindWindowW(LPCWSTR, LPCWSTR); both buffers outlive the call.
        let ret = unsafe {
            self.find_window
                .call(2, &[wide_arg(&class), wide_arg(&title)])?
        };

        Ok(Outcome {
            value: Hwnd(ret.word),
            status: ret.status,
        })
    }

    /// `GetWindowDC(hWnd)`. The DC must go back through [`Win32::release_dc`];
    /// [`Win32::window_dc`] does that automatically.
    pub fn get_window_dc(&self, hwnd: Hwnd) -> BridgeResult<Outcome<Hdc>> {
        // SAFETY: HDC GetWindowDC(HWND); no pointers.
        let ret = unsafe { self.get_window_dc.call(1, &[hwnd.0])? };

        Ok(Outcome {
            value: Hdc(ret.word),
            status: ret.status,
        })
    }

    /// `ReleaseDC(hWnd, hDC)`.
    pub fn release_dc(&self, hwnd: Hwnd, hdc: Hdc) -> BridgeResult<Outcome<bool>> {
        // SAFETY: int ReleaseDC(HWND, HDC); no pointers.
        let ret = unsafe { self.release_dc.call(2, &[hwnd.0, hdc.0])? };

        Ok(Outcome {
            value: bool_word(ret.word),
            status: ret.status,
        })
    }

    /// Window DC released when the guard drops. Fails with
    /// [`BridgeError::Native`] if `GetWindowDC` returns null.
    pub fn window_dc(&self, hwnd: Hwnd) -> BridgeResult<WindowDc<'_>> {
        let out = self.get_window_dc(hwnd)?;
        if out.value.is_null() {
            return Err(BridgeError::Native(out.status));
        }

        Ok(WindowDc {
            win32: self,
            hwnd,
            hdc: out.value,
        })
    }

    /// `GetWindowRect(hWnd, lpRect)`.
    ///
    /// `rect` is written only when the call reports success; on failure it keeps
    /// its previous contents.
    pub fn get_window_rect(&self, hwnd: Hwnd, rect: &mut Rect) -> BridgeResult<Outcome<bool>> {
        let mut scratch = *rect;

        // SAFETY: BOOL GetWindowRect(HWND, LPRECT); `scratch` is a live repr(C) RECT
        // not aliased for the duration of the call.
        let ret = unsafe {
            self.get_window_rect
                .call(2, &[hwnd.0, &mut scratch as *mut Rect as usize])?
        };

        let ok = bool_word(ret.word);
        if ok {
            *rect = scratch;
        }

        Ok(Outcome {
            value: ok,
            status: ret.status,
        })
    }

    /// `SendInput(cInputs, pInputs, cbSize)`. Returns the number of events inserted.
    ///
    /// An empty batch returns 0 without calling into the system.
    pub fn send_input(&self, records: &[InputRecord]) -> BridgeResult<Outcome<u32>> {
        if records.is_empty() {
            return Ok(Outcome {
                value: 0,
                status: Status::SUCCESS,
            });
        }

        let count = u32::try_from(records.len())
            .map_err(|_| BridgeError::TooManyInputs(records.len()))?;

        let buf = encode(records);
        log::debug!("send_input: {} record(s), stride {}", count, STRIDE);

        // SAFETY: UINT SendInput(UINT, LPINPUT, int); `buf` holds `count` INPUTs of
        // STRIDE bytes each and is only read by the callee.
        let ret = unsafe {
            self.send_input
                .call(3, &[count as usize, buf.as_ptr() as usize, STRIDE])?
        };

        Ok(Outcome {
            value: ret.word as u32,
            status: ret.status,
        })
    }

    /// `MapVirtualKeyExW(uCode, uMapType, NULL)` on the current thread's layout.
    pub fn map_virtual_key(&self, code: u32, map_type: u32) -> BridgeResult<Outcome<u32>> {
        self.map_virtual_key_ex(code, map_type, 0)
    }

    /// `MapVirtualKeyExW(uCode, uMapType, dwhkl)`.
    pub fn map_virtual_key_ex(
        &self,
        code: u32,
        map_type: u32,
        hkl: usize,
    ) -> BridgeResult<Outcome<u32>> {
        // SAFETY: UINT MapVirtualKeyExW(UINT, UINT, HKL); no pointers.
        let ret = unsafe {
            self.map_virtual_key
                .call(3, &[code as usize, map_type as usize, hkl])?
        };

        Ok(Outcome {
            value: ret.word as u32,
            status: ret.status,
        })
    }

    /// `VkKeyScanW(ch)`: virtual key in the low byte, shift state in the high
    /// byte, `-1` when the character has no key.
    pub fn vk_key_scan(&self, ch: u16) -> BridgeResult<Outcome<i16>> {
        // SAFETY: SHORT VkKeyScanW(WCHAR); no pointers.
        let ret = unsafe { self.vk_key_scan.call(1, &[ch as usize])? };

        Ok(Outcome {
            value: ret.word as u16 as i16,
            status: ret.status,
        })
    }
}

/// A window DC that is released on drop.
pub struct WindowDc<'a> {
    win32: &'a Win32,
    hwnd: Hwnd,
    hdc: Hdc,
}

impl WindowDc<'_> {
    #[inline]
    pub fn hdc(&self) -> Hdc {
        self.hdc
    }

    #[inline]
    pub fn hwnd(&self) -> Hwnd {
        self.hwnd
    }

    /// `GetPixel` on this DC.
    pub fn pixel(&self, x: i32, y: i32) -> BridgeResult<Outcome<ColorRef>> {
        self.win32.get_pixel(self.hdc, x, y)
    }
}

impl Drop for WindowDc<'_> {
    fn drop(&mut self) {
        match self.win32.release_dc(self.hwnd, self.hdc) {
            Ok(out) if out.value => {}
            Ok(out) => log::warn!("ReleaseDC({:?}) failed: {}", self.hdc, out.status),
            Err(e) => log::warn!("ReleaseDC({:?}) not called: {}", self.hdc, e),
        }
    }
}

impl std::fmt::Debug for WindowDc<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowDc")
            .field("hwnd", &self.hwnd)
            .field("hdc", &self.hdc)
            .finish()
    }
}
