#![forbid(unsafe_op_in_unsafe_fn)]

//! Run-time symbol registry.
//!
//! Every module in the table is loaded by exact name and every listed export is
//! resolved once. Failures are recorded as null addresses and only become errors
//! when something tries to call through them.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use libloading::Library;

use crate::config::ModuleConfig;
use crate::error::{BridgeError, BridgeResult};

pub const KERNEL32: &str = "kernel32.dll";
pub const USER32: &str = "user32.dll";
pub const GDI32: &str = "gdi32.dll";

pub const KERNEL32_SYMBOLS: &[&str] = &["GetModuleHandleW"];
pub const USER32_SYMBOLS: &[&str] = &[
    "GetWindowDC",
    "ReleaseDC",
    "GetWindowRect",
    "FindWindowW",
    "SendInput",
    "MapVirtualKeyExW",
    "VkKeyScanW",
];
pub const GDI32_SYMBOLS: &[&str] = &["DeleteDC", "GetPixel"];

/// The module/symbol table the typed wrappers depend on.
pub fn default_modules() -> Vec<ModuleConfig> {
    [
        (KERNEL32, KERNEL32_SYMBOLS),
        (USER32, USER32_SYMBOLS),
        (GDI32, GDI32_SYMBOLS),
    ]
    .into_iter()
    .map(|(name, symbols)| ModuleConfig {
        name: name.to_string(),
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
    })
    .collect()
}

/* =============================================================================================
   Function address
   ============================================================================================= */

/// A resolved export address. Zero is the "not resolved" sentinel.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct FnAddr(usize);

impl FnAddr {
    pub const NULL: FnAddr = FnAddr(0);

    #[inline]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> usize {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for FnAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("FnAddr(null)")
        } else {
            write!(f, "FnAddr({:#x})", self.0)
        }
    }
}

/* =============================================================================================
   Registry
   ============================================================================================= */

struct LoadedModule {
    library: Option<Library>,
    load_error: Option<String>,
    symbols: HashMap<String, FnAddr>,
}

/// Loaded modules and their resolved exports. Immutable once built.
pub struct Registry {
    modules: HashMap<String, LoadedModule>,
    order: Vec<(String, Vec<String>)>,
}

impl Registry {
    /// Loads every module in `table` and resolves its symbols. Never fails: a
    /// missing module or export is kept as a null address.
    pub fn load(table: &[ModuleConfig]) -> Self {
        let mut modules: HashMap<String, LoadedModule> = HashMap::new();
        let mut order = Vec::with_capacity(table.len());

        for spec in table {
            let entry = modules.entry(spec.name.clone()).or_insert_with(|| {
                log::debug!("resolver: loading module '{}'", spec.name);
                load_module(&spec.name)
            });

            for sym in &spec.symbols {
                let addr = match &entry.library {
                    Some(lib) => lookup(lib, sym),
                    None => FnAddr::NULL,
                };

                if addr.is_null() && entry.library.is_some() {
                    log::warn!(
                        "resolver: symbol '{}' not found in '{}'",
                        sym,
                        spec.name
                    );
                } else if !addr.is_null() {
                    log::trace!("resolver: {}!{} -> {:?}", spec.name, sym, addr);
                }

                entry.symbols.insert(sym.clone(), addr);
            }

            order.push((spec.name.clone(), spec.symbols.clone()));
        }

        let registry = Self { modules, order };
        let report = registry.report();
        log::info!(
            "resolver: summary modules={}/{} symbols={}/{}",
            report.modules_loaded(),
            report.modules.len(),
            report.symbols_resolved(),
            report.symbols_total()
        );
        registry
    }

    /// Address of `symbol` in `module`, or `None` if it is not available.
    ///
    /// Symbols outside the table are looked up in the already loaded module; the
    /// result is not cached.
    pub fn resolve(&self, module: &str, symbol: &str) -> Option<FnAddr> {
        let m = self.modules.get(module)?;

        let addr = match m.symbols.get(symbol) {
            Some(addr) => *addr,
            None => {
                let lib = m.library.as_ref()?;
                log::debug!("resolver: on-demand lookup {}!{}", module, symbol);
                lookup(lib, symbol)
            }
        };

        (!addr.is_null()).then_some(addr)
    }

    /// Same as [`Registry::resolve`] but yields the null sentinel on failure.
    #[inline]
    pub fn address(&self, module: &str, symbol: &str) -> FnAddr {
        self.resolve(module, symbol).unwrap_or(FnAddr::NULL)
    }

    /// Address of `symbol`, or [`BridgeError::Unresolved`].
    #[inline]
    pub fn require(&self, module: &str, symbol: &str) -> BridgeResult<FnAddr> {
        self.resolve(module, symbol)
            .ok_or_else(|| BridgeError::unresolved(module, symbol))
    }

    #[inline]
    pub fn is_loaded(&self, module: &str) -> bool {
        self.modules
            .get(module)
            .is_some_and(|m| m.library.is_some())
    }

    /// Outcome of the initial resolution pass, in table order.
    pub fn report(&self) -> ResolutionReport {
        let modules = self
            .order
            .iter()
            .filter_map(|(name, symbols)| {
                let m = self.modules.get(name)?;
                Some(ModuleReport {
                    name: name.clone(),
                    load_error: m.load_error.clone(),
                    symbols: symbols
                        .iter()
                        .map(|s| {
                            let addr = m.symbols.get(s).copied().unwrap_or(FnAddr::NULL);
                            (s.clone(), addr)
                        })
                        .collect(),
                })
            })
            .collect();

        ResolutionReport { modules }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("modules", &self.order.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .finish()
    }
}

fn load_module(name: &str) -> LoadedModule {
    // SAFETY: system modules run their own initializers; nothing else runs here.
    match unsafe { Library::new(name) } {
        Ok(library) => LoadedModule {
            library: Some(library),
            load_error: None,
            symbols: HashMap::new(),
        },
        Err(e) => {
            log::warn!("resolver: module '{}' failed to load: {}", name, e);
            LoadedModule {
                library: None,
                load_error: Some(e.to_string()),
                symbols: HashMap::new(),
            }
        }
    }
}

fn lookup(lib: &Library, name: &str) -> FnAddr {
    let mut bytes = Vec::with_capacity(name.len() + 1);
    bytes.extend_from_slice(name.as_bytes());
    bytes.push(0);

    // SAFETY: the symbol is only read as an address here. Calling through it is
    // the invoker's job, under its own contract.
    let sym = match unsafe { lib.get::<unsafe extern "system" fn()>(&bytes) } {
        Ok(sym) => sym,
        Err(_) => return FnAddr::NULL,
    };

    let f: unsafe extern "system" fn() = *sym;
    FnAddr(f as usize)
}

/* =============================================================================================
   Report
   ============================================================================================= */

#[derive(Debug, Clone)]
pub struct ModuleReport {
    pub name: String,
    pub load_error: Option<String>,
    pub symbols: Vec<(String, FnAddr)>,
}

impl ModuleReport {
    #[inline]
    pub fn loaded(&self) -> bool {
        self.load_error.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct ResolutionReport {
    pub modules: Vec<ModuleReport>,
}

impl ResolutionReport {
    pub fn modules_loaded(&self) -> usize {
        self.modules.iter().filter(|m| m.loaded()).count()
    }

    pub fn symbols_total(&self) -> usize {
        self.modules.iter().map(|m| m.symbols.len()).sum()
    }

    pub fn symbols_resolved(&self) -> usize {
        self.modules
            .iter()
            .flat_map(|m| m.symbols.iter())
            .filter(|(_, a)| !a.is_null())
            .count()
    }

    /// `(module, symbol)` pairs that ended up null.
    pub fn missing(&self) -> impl Iterator<Item = (&str, &str)> {
        self.modules.iter().flat_map(|m| {
            m.symbols
                .iter()
                .filter(|(_, a)| a.is_null())
                .map(move |(s, _)| (m.name.as_str(), s.as_str()))
        })
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.symbols_resolved() == self.symbols_total()
    }
}

/* =============================================================================================
   Process-wide registry
   ============================================================================================= */

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Builds the process-wide registry from `table`.
///
/// Call once at startup. A second call returns [`BridgeError::AlreadyInitialized`]
/// and leaves the existing registry untouched.
pub fn init(table: &[ModuleConfig]) -> BridgeResult<&'static Registry> {
    let mut built = false;
    let reg = REGISTRY.get_or_init(|| {
        built = true;
        Registry::load(table)
    });

    if built {
        Ok(reg)
    } else {
        Err(BridgeError::AlreadyInitialized)
    }
}

/// The process-wide registry, built from [`default_modules`] on first use if
/// [`init`] was never called.
#[inline]
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| Registry::load(&default_modules()))
}
