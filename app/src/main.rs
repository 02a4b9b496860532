use anyhow::{Context, Result};
use winbridge_core::{
    BridgeConfig, Hwnd, ProbeConfig, Rect, ResolutionReport, Win32, api::MAPVK_VK_TO_VSC,
};

const DEFAULT_CONFIG: &str = "winbridge.toml";

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    let loaded = BridgeConfig::load(&path).with_context(|| format!("loading config '{path}'"))?;
    let from_file = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cfg.log_level))
        .init();

    if from_file {
        log::info!("config: loaded '{path}'");
    } else {
        log::info!("config: '{path}' not readable, using defaults");
    }

    let registry = winbridge_core::init(&cfg.modules).context("initializing symbol registry")?;
    log_report(&registry.report());

    let win32 = Win32::new(registry);
    run_probes(&win32, &cfg.probe);

    Ok(())
}

fn log_report(report: &ResolutionReport) {
    for m in &report.modules {
        match &m.load_error {
            None => log::info!("probe: module '{}' loaded", m.name),
            Some(e) => log::warn!("probe: module '{}' missing: {}", m.name, e),
        }
    }

    for (module, symbol) in report.missing() {
        log::warn!("probe: unresolved {}!{}", module, symbol);
    }

    log::info!(
        "probe: {}/{} symbol(s) resolved",
        report.symbols_resolved(),
        report.symbols_total()
    );
}

fn run_probes(win32: &Win32, probe: &ProbeConfig) {
    match win32.get_module_handle(None) {
        Ok(out) => log::info!("probe: GetModuleHandleW -> {:?} ({})", out.value, out.status),
        Err(e) => log::warn!("probe: GetModuleHandleW: {e}"),
    }

    if let Some(hwnd) = probe_window(win32, probe) {
        probe_rect(win32, hwnd);
        if let Some([x, y]) = probe.pixel {
            probe_pixel(win32, hwnd, x, y);
        }
    }

    for ch in probe.map_chars.encode_utf16() {
        probe_key(win32, ch);
    }
}

fn probe_window(win32: &Win32, probe: &ProbeConfig) -> Option<Hwnd> {
    if probe.window_class.is_none() && probe.window_title.is_none() {
        return None;
    }

    match win32.find_window(probe.window_class.as_deref(), probe.window_title.as_deref()) {
        Ok(out) if !out.value.is_null() => {
            log::info!("probe: FindWindowW -> {:?}", out.value);
            Some(out.value)
        }
        Ok(out) => {
            log::warn!(
                "probe: no window class={:?} title={:?} ({})",
                probe.window_class,
                probe.window_title,
                out.status
            );
            None
        }
        Err(e) => {
            log::warn!("probe: FindWindowW: {e}");
            None
        }
    }
}

fn probe_rect(win32: &Win32, hwnd: Hwnd) {
    let mut rect = Rect::default();
    match win32.get_window_rect(hwnd, &mut rect) {
        Ok(out) if out.value => log::info!(
            "probe: GetWindowRect -> {:?} ({}x{})",
            rect,
            rect.width(),
            rect.height()
        ),
        Ok(out) => log::warn!("probe: GetWindowRect failed: {}", out.status),
        Err(e) => log::warn!("probe: GetWindowRect: {e}"),
    }
}

fn probe_pixel(win32: &Win32, hwnd: Hwnd, x: i32, y: i32) {
    let dc = match win32.window_dc(hwnd) {
        Ok(dc) => dc,
        Err(e) => {
            log::warn!("probe: GetWindowDC: {e}");
            return;
        }
    };

    match dc.pixel(x, y) {
        Ok(out) if out.value.is_invalid() => {
            log::warn!("probe: GetPixel({x}, {y}) outside clip region")
        }
        Ok(out) => log::info!(
            "probe: GetPixel({x}, {y}) -> r={} g={} b={}",
            out.value.red(),
            out.value.green(),
            out.value.blue()
        ),
        Err(e) => log::warn!("probe: GetPixel: {e}"),
    }
}

fn probe_key(win32: &Win32, ch: u16) {
    let scan = match win32.vk_key_scan(ch) {
        Ok(out) => out.value,
        Err(e) => {
            log::warn!("probe: VkKeyScanW: {e}");
            return;
        }
    };

    if scan == -1 {
        log::info!("probe: {:#06x} has no key on this layout", ch);
        return;
    }

    let vk = u32::from((scan as u16) & 0xFF);
    let shift = ((scan as u16) >> 8) as u8;

    match win32.map_virtual_key(vk, MAPVK_VK_TO_VSC) {
        Ok(out) => log::info!(
            "probe: {:#06x} -> vk={:#04x} shift={:#x} scan={:#04x}",
            ch,
            vk,
            shift,
            out.value
        ),
        Err(e) => log::warn!("probe: MapVirtualKeyExW: {e}"),
    }
}
