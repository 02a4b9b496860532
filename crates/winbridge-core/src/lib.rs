//! Win32 windowing and input calls bound at run time.
//!
//! `kernel32`, `user32` and `gdi32` are loaded by name and their exports looked up
//! once into a process-wide [`Registry`]. Calls go through [`invoke`] with an
//! explicit argument count, and `SendInput` batches are laid out by [`layout`].

pub mod api;
pub mod config;
pub mod error;
pub mod invoke;
pub mod layout;
pub mod status;
pub mod symbols;
pub mod text;
pub mod types;

pub use crate::api::{Outcome, Win32, WindowDc};
pub use crate::config::{BridgeConfig, ModuleConfig, ProbeConfig};
pub use crate::error::{BridgeError, BridgeResult};
pub use crate::invoke::{invoke, RawReturn};
pub use crate::layout::{
    encode, HardwareInput, InputBuffer, InputRecord, KeyboardInput, MouseInput, RawInputRecord,
};
pub use crate::status::Status;
pub use crate::symbols::{
    default_modules, init, registry, FnAddr, Registry, ResolutionReport,
};
pub use crate::types::{ColorRef, HModule, Hdc, Hwnd, Rect, CLR_INVALID};
