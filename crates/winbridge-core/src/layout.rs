//! `INPUT` array encoding for `SendInput`.
//!
//! The native `INPUT` is `{ DWORD type; union { MOUSEINPUT; KEYBDINPUT; HARDWAREINPUT } }`.
//! `SendInput` walks the array with a caller-supplied element size, so every
//! element has to occupy exactly `size_of::<INPUT>()` bytes, with the payload at
//! the union's aligned offset. All of that knowledge lives in this file.

use std::mem::{offset_of, size_of};

pub const INPUT_MOUSE: u32 = 0;
pub const INPUT_KEYBOARD: u32 = 1;
pub const INPUT_HARDWARE: u32 = 2;

pub const KEYEVENTF_KEYDOWN: u32 = 0x0000;
pub const KEYEVENTF_EXTENDEDKEY: u32 = 0x0001;
pub const KEYEVENTF_KEYUP: u32 = 0x0002;
pub const KEYEVENTF_UNICODE: u32 = 0x0004;
pub const KEYEVENTF_SCANCODE: u32 = 0x0008;

pub const MOUSEEVENTF_MOVE: u32 = 0x0001;
pub const MOUSEEVENTF_LEFTDOWN: u32 = 0x0002;
pub const MOUSEEVENTF_LEFTUP: u32 = 0x0004;
pub const MOUSEEVENTF_RIGHTDOWN: u32 = 0x0008;
pub const MOUSEEVENTF_RIGHTUP: u32 = 0x0010;
pub const MOUSEEVENTF_WHEEL: u32 = 0x0800;
pub const MOUSEEVENTF_ABSOLUTE: u32 = 0x8000;

/* =============================================================================================
   Payloads
   ============================================================================================= */

/// `MOUSEINPUT`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MouseInput {
    pub dx: i32,
    pub dy: i32,
    pub mouse_data: u32,
    pub flags: u32,
    pub time: u32,
    pub extra_info: usize,
}

/// `KEYBDINPUT`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct KeyboardInput {
    pub vk: u16,
    pub scan: u16,
    pub flags: u32,
    pub time: u32,
    pub extra_info: usize,
}

/// `HARDWAREINPUT`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct HardwareInput {
    pub msg: u32,
    pub param_l: u16,
    pub param_h: u16,
}

/// One element of a `SendInput` batch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputRecord {
    Mouse(MouseInput),
    Keyboard(KeyboardInput),
    Hardware(HardwareInput),
}

impl InputRecord {
    /// The native `type` discriminant.
    #[inline]
    pub fn kind(&self) -> u32 {
        match self {
            InputRecord::Mouse(_) => INPUT_MOUSE,
            InputRecord::Keyboard(_) => INPUT_KEYBOARD,
            InputRecord::Hardware(_) => INPUT_HARDWARE,
        }
    }

    pub fn mouse_move(dx: i32, dy: i32) -> Self {
        InputRecord::Mouse(MouseInput {
            dx,
            dy,
            flags: MOUSEEVENTF_MOVE,
            ..MouseInput::default()
        })
    }

    pub fn mouse_flags(flags: u32) -> Self {
        InputRecord::Mouse(MouseInput {
            flags,
            ..MouseInput::default()
        })
    }

    pub fn key_down(vk: u16) -> Self {
        InputRecord::Keyboard(KeyboardInput {
            vk,
            flags: KEYEVENTF_KEYDOWN,
            ..KeyboardInput::default()
        })
    }

    pub fn key_up(vk: u16) -> Self {
        InputRecord::Keyboard(KeyboardInput {
            vk,
            flags: KEYEVENTF_KEYUP,
            ..KeyboardInput::default()
        })
    }

    /// A UTF-16 code unit typed through `KEYEVENTF_UNICODE` (vk must be 0).
    pub fn unicode(unit: u16, up: bool) -> Self {
        let mut flags = KEYEVENTF_UNICODE;
        if up {
            flags |= KEYEVENTF_KEYUP;
        }
        InputRecord::Keyboard(KeyboardInput {
            scan: unit,
            flags,
            ..KeyboardInput::default()
        })
    }
}

/// Loose form of an `INPUT` that carries a numeric discriminant next to every
/// payload, for callers that build records from raw values.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RawInputRecord {
    pub kind: u32,
    pub mouse: MouseInput,
    pub keyboard: KeyboardInput,
    pub hardware: HardwareInput,
}

impl RawInputRecord {
    /// Picks the payload selected by `kind`.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not `INPUT_MOUSE`, `INPUT_KEYBOARD` or `INPUT_HARDWARE`.
    /// Such a record is a bug in the caller, not a condition to recover from.
    pub fn into_record(self) -> InputRecord {
        match self.kind {
            INPUT_MOUSE => InputRecord::Mouse(self.mouse),
            INPUT_KEYBOARD => InputRecord::Keyboard(self.keyboard),
            INPUT_HARDWARE => InputRecord::Hardware(self.hardware),
            other => panic!("unknown INPUT type discriminant {other}"),
        }
    }
}

/* =============================================================================================
   Native layout
   ============================================================================================= */

#[allow(dead_code)]
#[repr(C)]
union NativePayload {
    mi: MouseInput,
    ki: KeyboardInput,
    hi: HardwareInput,
}

#[allow(dead_code)]
#[repr(C)]
struct NativeInput {
    kind: u32,
    payload: NativePayload,
}

/// Byte size of one `INPUT`; the widest variant (`MOUSEINPUT`) decides it.
pub const STRIDE: usize = size_of::<NativeInput>();

/// Offset of the union inside `INPUT`.
pub const PAYLOAD_OFFSET: usize = offset_of!(NativeInput, payload);

#[cfg(target_pointer_width = "64")]
const _: () = assert!(STRIDE == 40 && PAYLOAD_OFFSET == 8);

#[cfg(target_pointer_width = "32")]
const _: () = assert!(STRIDE == 28 && PAYLOAD_OFFSET == 4);

const _: () = assert!(size_of::<NativePayload>() == size_of::<MouseInput>());

/* =============================================================================================
   Encoding
   ============================================================================================= */

/// Contiguous `INPUT[count]` image ready to hand to `SendInput`.
#[derive(Clone, PartialEq, Eq)]
pub struct InputBuffer {
    bytes: Vec<u8>,
}

impl InputBuffer {
    #[inline]
    pub const fn stride() -> usize {
        STRIDE
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() / STRIDE
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The `index`-th element's bytes.
    pub fn record(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(STRIDE)?;
        let end = start.checked_add(STRIDE)?;
        self.bytes.get(start..end)
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }
}

impl std::fmt::Debug for InputBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputBuffer")
            .field("len", &self.len())
            .field("stride", &STRIDE)
            .finish()
    }
}

/// Encodes `records` as a native `INPUT` array.
pub fn encode(records: &[InputRecord]) -> InputBuffer {
    let mut bytes = vec![0u8; STRIDE * records.len()];

    for (slot, rec) in bytes.chunks_exact_mut(STRIDE).zip(records) {
        write_record(slot, rec);
    }

    InputBuffer { bytes }
}

/// Writes one `INPUT` into a zeroed `STRIDE`-byte slot. Padding is left as is.
fn write_record(slot: &mut [u8], rec: &InputRecord) {
    debug_assert_eq!(slot.len(), STRIDE);

    put(slot, offset_of!(NativeInput, kind), &rec.kind().to_ne_bytes());

    let base = PAYLOAD_OFFSET;
    match rec {
        InputRecord::Mouse(mi) => {
            put(slot, base + offset_of!(MouseInput, dx), &mi.dx.to_ne_bytes());
            put(slot, base + offset_of!(MouseInput, dy), &mi.dy.to_ne_bytes());
            put(slot, base + offset_of!(MouseInput, mouse_data), &mi.mouse_data.to_ne_bytes());
            put(slot, base + offset_of!(MouseInput, flags), &mi.flags.to_ne_bytes());
            put(slot, base + offset_of!(MouseInput, time), &mi.time.to_ne_bytes());
            put(slot, base + offset_of!(MouseInput, extra_info), &mi.extra_info.to_ne_bytes());
        }
        InputRecord::Keyboard(ki) => {
            put(slot, base + offset_of!(KeyboardInput, vk), &ki.vk.to_ne_bytes());
            put(slot, base + offset_of!(KeyboardInput, scan), &ki.scan.to_ne_bytes());
            put(slot, base + offset_of!(KeyboardInput, flags), &ki.flags.to_ne_bytes());
            put(slot, base + offset_of!(KeyboardInput, time), &ki.time.to_ne_bytes());
            put(slot, base + offset_of!(KeyboardInput, extra_info), &ki.extra_info.to_ne_bytes());
        }
        InputRecord::Hardware(hi) => {
            put(slot, base + offset_of!(HardwareInput, msg), &hi.msg.to_ne_bytes());
            put(slot, base + offset_of!(HardwareInput, param_l), &hi.param_l.to_ne_bytes());
            put(slot, base + offset_of!(HardwareInput, param_h), &hi.param_h.to_ne_bytes());
        }
    }
}

#[inline]
fn put(slot: &mut [u8], offset: usize, bytes: &[u8]) {
    slot[offset..offset + bytes.len()].copy_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> [InputRecord; 3] {
        [
            InputRecord::Mouse(MouseInput {
                dx: -5,
                dy: 7,
                mouse_data: 120,
                flags: MOUSEEVENTF_MOVE | MOUSEEVENTF_WHEEL,
                time: 11,
                extra_info: 0xABCD,
            }),
            InputRecord::Keyboard(KeyboardInput {
                vk: 0x41,
                scan: 0x1E,
                flags: KEYEVENTF_SCANCODE,
                time: 22,
                extra_info: 0x1234,
            }),
            InputRecord::Hardware(HardwareInput {
                msg: 0x0100,
                param_l: 0xBEEF,
                param_h: 0xCAFE,
            }),
        ]
    }

    fn u32_at(b: &[u8], off: usize) -> u32 {
        u32::from_ne_bytes(b[off..off + 4].try_into().unwrap())
    }

    fn u16_at(b: &[u8], off: usize) -> u16 {
        u16::from_ne_bytes(b[off..off + 2].try_into().unwrap())
    }

    #[test]
    fn stride_matches_native_input() {
        assert_eq!(InputBuffer::stride(), size_of::<NativeInput>());
        assert_eq!(STRIDE % std::mem::align_of::<usize>(), 0);
    }

    #[test]
    fn stride_is_independent_of_batch_contents() {
        for rec in samples() {
            let buf = encode(&[rec]);
            assert_eq!(buf.as_bytes().len(), STRIDE);
            assert_eq!(buf.len(), 1);
        }

        let buf = encode(&[samples()[2], samples()[2], samples()[1]]);
        assert_eq!(buf.as_bytes().len(), 3 * STRIDE);
    }

    #[test]
    fn batch_equals_concatenated_singles() {
        let recs = samples();
        let batch = encode(&recs);

        let concat: Vec<u8> = recs
            .iter()
            .flat_map(|r| encode(std::slice::from_ref(r)).as_bytes().to_vec())
            .collect();

        assert_eq!(batch.as_bytes(), concat.as_slice());
        for (i, r) in recs.iter().enumerate() {
            assert_eq!(batch.record(i), encode(&[*r]).record(0));
        }
        assert_eq!(batch.record(3), None);
    }

    #[test]
    fn discriminant_sits_at_offset_zero() {
        let buf = encode(&samples());
        assert_eq!(u32_at(buf.record(0).unwrap(), 0), INPUT_MOUSE);
        assert_eq!(u32_at(buf.record(1).unwrap(), 0), INPUT_KEYBOARD);
        assert_eq!(u32_at(buf.record(2).unwrap(), 0), INPUT_HARDWARE);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn mouse_fields_follow_native_offsets() {
        let buf = encode(&samples()[..1]);
        let b = buf.as_bytes();

        assert_eq!(&b[4..8], &[0; 4], "padding before union");
        assert_eq!(u32_at(b, 8) as i32, -5);
        assert_eq!(u32_at(b, 12), 7);
        assert_eq!(u32_at(b, 16), 120);
        assert_eq!(u32_at(b, 20), MOUSEEVENTF_MOVE | MOUSEEVENTF_WHEEL);
        assert_eq!(u32_at(b, 24), 11);
        assert_eq!(&b[28..32], &[0; 4], "padding before dwExtraInfo");
        assert_eq!(usize::from_ne_bytes(b[32..40].try_into().unwrap()), 0xABCD);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn keyboard_fields_follow_native_offsets() {
        let buf = encode(&samples()[1..2]);
        let b = buf.as_bytes();

        assert_eq!(u16_at(b, 8), 0x41);
        assert_eq!(u16_at(b, 10), 0x1E);
        assert_eq!(u32_at(b, 12), KEYEVENTF_SCANCODE);
        assert_eq!(u32_at(b, 16), 22);
        assert_eq!(&b[20..24], &[0; 4]);
        assert_eq!(usize::from_ne_bytes(b[24..32].try_into().unwrap()), 0x1234);
        assert!(b[32..].iter().all(|&x| x == 0), "tail stays zeroed");
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn hardware_payload_uses_union_offset() {
        let buf = encode(&samples()[2..]);
        let b = buf.as_bytes();

        assert_eq!(&b[4..8], &[0; 4]);
        assert_eq!(u32_at(b, 8), 0x0100);
        assert_eq!(u16_at(b, 12), 0xBEEF);
        assert_eq!(u16_at(b, 14), 0xCAFE);
        assert!(b[16..].iter().all(|&x| x == 0));
    }

    #[test]
    fn out_of_range_record_is_none() {
        let buf = encode(&[InputRecord::key_down(0x41)]);
        assert_eq!(buf.record(1), None);
        assert_eq!(buf.record(usize::MAX / STRIDE), None);
        assert_eq!(buf.record(usize::MAX), None);
    }

    #[test]
    fn empty_batch_is_empty_buffer() {
        let buf = encode(&[]);
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.record(0), None);
    }

    #[test]
    fn raw_record_selects_payload_by_kind() {
        let raw = RawInputRecord {
            kind: INPUT_KEYBOARD,
            keyboard: KeyboardInput {
                vk: 0x0D,
                ..KeyboardInput::default()
            },
            ..RawInputRecord::default()
        };
        assert_eq!(raw.into_record(), InputRecord::key_down(0x0D));

        let raw = RawInputRecord::default();
        assert_eq!(raw.into_record(), InputRecord::Mouse(MouseInput::default()));
    }

    #[test]
    #[should_panic(expected = "unknown INPUT type discriminant 7")]
    fn raw_record_with_unknown_kind_panics() {
        let raw = RawInputRecord {
            kind: 7,
            ..RawInputRecord::default()
        };
        let _ = raw.into_record();
    }

    #[test]
    fn unicode_helper_sets_flags() {
        match InputRecord::unicode('é' as u16, true) {
            InputRecord::Keyboard(ki) => {
                assert_eq!(ki.vk, 0);
                assert_eq!(ki.scan, 0xE9);
                assert_eq!(ki.flags, KEYEVENTF_UNICODE | KEYEVENTF_KEYUP);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
