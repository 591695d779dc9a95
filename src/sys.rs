//! Low-level FFI bindings for the CoolProp shared library.
//!
//! This module dynamically loads the CoolProp shared library
//! (`CoolProp.dll` / `libCoolProp.so` / `libCoolProp.dylib`) at runtime
//! via [`libloading`] and pre-resolves the handful of high-level C
//! entry points the state objects need.

use std::os::raw::{c_char, c_double, c_int, c_long};
use std::path::Path;

use libloading::Library;

// ── CoolProp constants ──────────────────────────────────────────────
/// Size of the buffers handed to the string-returning entry points.
pub const COOLPROP_STRLEN: usize = 2000;

// ── Error type ──────────────────────────────────────────────────────
#[derive(Debug)]
pub enum CoolPropSysError {
    /// The shared library could not be found or loaded.
    LibraryLoadFailed(String),
    /// A required symbol was not found in the library.
    SymbolNotFound(String),
}

impl std::fmt::Display for CoolPropSysError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LibraryLoadFailed(msg) => write!(f, "CoolProp library load failed: {msg}"),
            Self::SymbolNotFound(sym) => {
                write!(f, "Symbol not found in CoolProp library: {sym}")
            }
        }
    }
}

impl std::error::Error for CoolPropSysError {}

// ── Function pointer type aliases ───────────────────────────────────
// Signatures follow CoolPropLib.h (cdecl on every 64-bit target).

/// PropsSI(output, name1, prop1, name2, prop2, fluid) -> value
type FnPropsSI = unsafe extern "C" fn(
    *const c_char,
    *const c_char,
    c_double,
    *const c_char,
    c_double,
    *const c_char,
) -> c_double;

/// HAPropsSI(output, name1, prop1, name2, prop2, name3, prop3) -> value
type FnHAPropsSI = unsafe extern "C" fn(
    *const c_char,
    *const c_char,
    c_double,
    *const c_char,
    c_double,
    *const c_char,
    c_double,
) -> c_double;

/// get_global_param_string(param, output, n) -> 1 on success
type FnGlobalParam = unsafe extern "C" fn(*const c_char, *mut c_char, c_int) -> c_long;

/// get_fluid_param_string(fluid, param, output, n) -> 1 on success
type FnFluidParam =
    unsafe extern "C" fn(*const c_char, *const c_char, *mut c_char, c_int) -> c_long;

// ── Dynamic library wrapper ─────────────────────────────────────────

/// Holds a dynamically-loaded CoolProp shared library with
/// **pre-resolved function pointers**.
///
/// All symbols are resolved once at construction time.  If any required
/// symbol is missing the constructor returns an error instead of
/// panicking later.
///
/// All methods are `unsafe` because they forward raw pointers to C code
/// that cannot be verified by the Rust compiler.
pub struct CoolPropSys {
    /// The underlying library handle.  Must stay alive to keep the
    /// function pointers valid.
    _lib: Library,

    fn_props_si: FnPropsSI,
    fn_ha_props_si: FnHAPropsSI,
    fn_global_param: FnGlobalParam,
    fn_fluid_param: FnFluidParam,
}

impl CoolPropSys {
    // ── Symbol resolution ───────────────────────────────────────────

    /// Resolve a single symbol as a typed function pointer.
    fn resolve<T: Copy>(lib: &Library, name: &[u8]) -> Result<T, CoolPropSysError> {
        // SAFETY: the type aliases above match the declarations in
        // CoolPropLib.h for each symbol name passed by resolve_all.
        let sym: libloading::Symbol<T> = unsafe { lib.get(name) }.map_err(|_| {
            let display =
                String::from_utf8_lossy(&name[..name.len().saturating_sub(1)]).to_string();
            CoolPropSysError::SymbolNotFound(display)
        })?;
        Ok(*sym)
    }

    fn resolve_all(lib: Library) -> Result<Self, CoolPropSysError> {
        Ok(Self {
            fn_props_si: Self::resolve(&lib, b"PropsSI\0")?,
            fn_ha_props_si: Self::resolve(&lib, b"HAPropsSI\0")?,
            fn_global_param: Self::resolve(&lib, b"get_global_param_string\0")?,
            fn_fluid_param: Self::resolve(&lib, b"get_fluid_param_string\0")?,
            _lib: lib,
        })
    }

    // ── Constructors ────────────────────────────────────────────────

    /// File names tried, in order, for the current target.
    pub fn candidates() -> &'static [&'static str] {
        if cfg!(target_os = "windows") {
            &["CoolProp.dll", "libCoolProp.dll"]
        } else if cfg!(target_os = "macos") {
            &["libCoolProp.dylib"]
        } else {
            &["libCoolProp.so", "libCoolProp.so.6"]
        }
    }

    /// Load the library from a **directory**, falling back to the
    /// system loader search path (PATH / LD_LIBRARY_PATH /
    /// DYLD_LIBRARY_PATH).
    ///
    /// If a candidate file exists but cannot be loaded (e.g.
    /// architecture mismatch), the next candidate is tried.
    pub fn load_from_dir(dir: &Path) -> Result<Self, CoolPropSysError> {
        let candidates = Self::candidates();
        let mut errors = Vec::new();

        for name in candidates {
            let full = dir.join(name);
            if full.exists() {
                match unsafe { Library::new(&full) } {
                    Ok(lib) => return Self::resolve_all(lib),
                    Err(e) => errors.push(format!("{}: {e}", full.display())),
                }
            }
        }

        Self::load_from_system().map_err(|_| {
            let detail = if errors.is_empty() {
                format!(
                    "No CoolProp library found in {} (tried: {candidates:?})",
                    dir.display()
                )
            } else {
                format!(
                    "CoolProp library found but could not be loaded:\n  - {}",
                    errors.join("\n  - ")
                )
            };
            CoolPropSysError::LibraryLoadFailed(detail)
        })
    }

    /// Load the library by bare file name through the system loader.
    pub fn load_from_system() -> Result<Self, CoolPropSysError> {
        for name in Self::candidates() {
            if let Ok(lib) = unsafe { Library::new(*name) } {
                return Self::resolve_all(lib);
            }
        }
        Err(CoolPropSysError::LibraryLoadFailed(format!(
            "none of {:?} found on the loader search path",
            Self::candidates()
        )))
    }

    /// Load the library from an **exact file path**.
    pub fn load_from_file(path: &Path) -> Result<Self, CoolPropSysError> {
        let lib = unsafe { Library::new(path) }
            .map_err(|e| CoolPropSysError::LibraryLoadFailed(format!("{}: {e}", path.display())))?;
        Self::resolve_all(lib)
    }

    // ── CoolProp function wrappers ──────────────────────────────────

    /// Pure-fluid property from two state inputs.  Returns `+inf` (or
    /// another non-finite value) on failure; the reason is then
    /// available through `get_global_param_string("errstring")`.
    pub unsafe fn props_si(
        &self,
        output: *const c_char,
        name1: *const c_char,
        prop1: c_double,
        name2: *const c_char,
        prop2: c_double,
        fluid: *const c_char,
    ) -> c_double {
        unsafe { (self.fn_props_si)(output, name1, prop1, name2, prop2, fluid) }
    }

    /// Humid-air property from three state inputs.  Same failure
    /// convention as [`props_si`](Self::props_si).
    pub unsafe fn ha_props_si(
        &self,
        output: *const c_char,
        name1: *const c_char,
        prop1: c_double,
        name2: *const c_char,
        prop2: c_double,
        name3: *const c_char,
        prop3: c_double,
    ) -> c_double {
        unsafe { (self.fn_ha_props_si)(output, name1, prop1, name2, prop2, name3, prop3) }
    }

    /// Global string parameter (`"version"`, `"errstring"`,
    /// `"warnstring"`, …).
    pub unsafe fn get_global_param_string(
        &self,
        param: *const c_char,
        output: *mut c_char,
        n: c_int,
    ) -> c_long {
        unsafe { (self.fn_global_param)(param, output, n) }
    }

    /// Per-fluid string parameter (`"name"`, `"aliases"`, …).
    pub unsafe fn get_fluid_param_string(
        &self,
        fluid: *const c_char,
        param: *const c_char,
        output: *mut c_char,
        n: c_int,
    ) -> c_long {
        unsafe { (self.fn_fluid_param)(fluid, param, output, n) }
    }
}

// ── String helpers ──────────────────────────────────────────────────

/// Convert a Rust `&str` into a NUL-terminated `Vec<c_char>`.  Anything
/// after an interior NUL is dropped.
pub fn to_c_string(s: &str) -> Vec<c_char> {
    let mut buffer: Vec<c_char> = s
        .bytes()
        .take_while(|&b| b != 0)
        .map(|b| b as c_char)
        .collect();
    buffer.push(0);
    buffer
}

/// Convert a NUL-terminated (or fully-filled) `c_char` buffer back
/// into a trimmed Rust `String`.
pub fn from_c_string(buffer: &[c_char]) -> String {
    let bytes: Vec<u8> = buffer
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).trim().to_string()
}
