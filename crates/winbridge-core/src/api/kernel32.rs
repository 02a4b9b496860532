use super::{Outcome, Win32};
use crate::error::BridgeResult;
use crate::text::{to_wide_opt, wide_arg};
use crate::types::HModule;

impl Win32 {
    /// `GetModuleHandleW(lpModuleName)`. `None` asks for the executable itself.
    pub fn get_module_handle(&self, name: Option<&str>) -> BridgeResult<Outcome<HModule>> {
        let name = to_wide_opt(name)?;

        // SAFETY: HMODULE GetModuleHandleW(LPCWSTR); `name` lives past the call.
        let ret = unsafe { self.get_module_handle.call(1, &[wide_arg(&name)])? };

        Ok(Outcome {
            value: HModule(ret.word),
            status: ret.status,
        })
    }
}
