use std::env;
use std::os::raw::c_int;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, Once, OnceLock, PoisonError};

use tracing::{debug, warn};

use crate::error::*;
use crate::oracle::{Input, OracleError, PropertyOracle};
use crate::sys::*;

// ── Global lock (CoolProp error/warning strings are process-wide) ──
// A failing call leaves its message in a global buffer that the next
// call may overwrite, so the call and the message fetch happen under
// one guard.
static COOLPROP_LOCK: Mutex<()> = Mutex::new(());

static SHARED: OnceLock<Arc<CoolPropLibrary>> = OnceLock::new();

/// Environment variable naming the directory that holds the CoolProp
/// shared library.
pub const COOLPROP_PATH_VAR: &str = "COOLPROP_PATH";

// ── Backend ─────────────────────────────────────────────────────────

/// [`PropertyOracle`] backed by the CoolProp shared library.
pub struct CoolPropLibrary {
    sys: CoolPropSys,
    /// Directory the library was loaded from, `None` when it came from
    /// the system loader search path.
    path: Option<PathBuf>,
}

impl CoolPropLibrary {
    // ================================================================
    //  Constructors
    // ================================================================

    /// Locate and load CoolProp.
    ///
    /// Reads `.env` once, then tries `COOLPROP_PATH`, the standard
    /// install locations for the platform, and finally the system
    /// loader search path.
    pub fn load() -> Result<Self> {
        Self::load_dotenv();
        match Self::find_coolprop_path() {
            Ok(dir) => Self::load_from_dir(&dir),
            Err(tried) => {
                let sys = CoolPropSys::load_from_system().map_err(|e| {
                    StateError::LibraryNotFound(format!(
                        "{e}. Tried:\n  - {}\n\
                         Set {COOLPROP_PATH_VAR} to the directory containing the CoolProp shared library.",
                        tried.join("\n  - ")
                    ))
                })?;
                debug!("loaded CoolProp from the system search path");
                Ok(Self { sys, path: None })
            }
        }
    }

    /// Load CoolProp from a specific directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            return Err(StateError::LibraryNotFound(dir.display().to_string()));
        }
        let sys = CoolPropSys::load_from_dir(dir)
            .map_err(|e| StateError::LibraryNotFound(e.to_string()))?;
        debug!(path = %dir.display(), "loaded CoolProp");
        Ok(Self { sys, path: Some(dir.to_path_buf()) })
    }

    /// Process-wide instance, loaded on first use.
    pub fn shared() -> Result<Arc<Self>> {
        if let Some(lib) = SHARED.get() {
            return Ok(Arc::clone(lib));
        }
        let lib = Arc::new(Self::load()?);
        // A concurrent first call may have won the race; either copy is fine.
        Ok(Arc::clone(SHARED.get_or_init(|| lib)))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ── .env loading (once) ──────────────────────────────────────────

    fn load_dotenv() {
        static DOTENV_INIT: Once = Once::new();
        DOTENV_INIT.call_once(|| {
            if dotenvy::dotenv().is_ok() { return; }
            if let Ok(dir) = env::var("CARGO_MANIFEST_DIR") {
                let p = PathBuf::from(dir).join(".env");
                if p.exists() { let _ = dotenvy::from_path(&p); return; }
            }
            if let Ok(exe) = env::current_exe() {
                if let Some(dir) = exe.parent() {
                    let p = dir.join(".env");
                    if p.exists() { let _ = dotenvy::from_path(&p); }
                }
            }
        });
    }

    // ── Path discovery ───────────────────────────────────────────────

    /// First directory that actually contains a CoolProp library, or
    /// the list of places tried.
    fn find_coolprop_path() -> std::result::Result<PathBuf, Vec<String>> {
        let mut tried = Vec::<String>::new();
        let has_library =
            |dir: &Path| CoolPropSys::candidates().iter().any(|name| dir.join(name).exists());

        if let Ok(path) = env::var(COOLPROP_PATH_VAR) {
            let dir = PathBuf::from(&path);
            if has_library(&dir) { return Ok(dir); }
            tried.push(format!("{COOLPROP_PATH_VAR}={path} (no CoolProp library inside)"));
        }

        #[cfg(target_os = "windows")]
        let standard_paths = [r"C:\Program Files\CoolProp", r"C:\CoolProp"];
        #[cfg(target_os = "linux")]
        let standard_paths = ["/usr/local/lib", "/usr/lib", "/opt/coolprop"];
        #[cfg(target_os = "macos")]
        let standard_paths = ["/usr/local/lib", "/opt/homebrew/lib", "/opt/coolprop"];
        #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
        let standard_paths: [&str; 0] = [];

        for path in standard_paths {
            let dir = Path::new(path);
            if has_library(dir) { return Ok(dir.to_path_buf()); }
            tried.push(format!("{path} (not found)"));
        }

        Err(tried)
    }

    // ================================================================
    //  Lock helper
    // ================================================================

    /// Acquire the global CoolProp lock.  The guarded data is `()`, so
    /// a poisoned lock carries no broken invariant and is recovered.
    fn lock_coolprop() -> MutexGuard<'static, ()> {
        COOLPROP_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ================================================================
    //  Inner helpers (caller MUST hold COOLPROP_LOCK)
    // ================================================================

    fn global_param_inner(&self, param: &str) -> Option<String> {
        let param_c = to_c_string(param);
        let mut buf = vec![0 as std::os::raw::c_char; COOLPROP_STRLEN];
        let ok = unsafe {
            self.sys.get_global_param_string(
                param_c.as_ptr(),
                buf.as_mut_ptr(),
                COOLPROP_STRLEN as c_int,
            )
        };
        let text = from_c_string(&buf);
        (ok == 1 && !text.is_empty()).then_some(text)
    }

    fn fluid_exists_inner(&self, component: &str) -> bool {
        let fluid_c = to_c_string(component);
        let param_c = to_c_string("name");
        let mut buf = vec![0 as std::os::raw::c_char; COOLPROP_STRLEN];
        let ok = unsafe {
            self.sys.get_fluid_param_string(
                fluid_c.as_ptr(),
                param_c.as_ptr(),
                buf.as_mut_ptr(),
                COOLPROP_STRLEN as c_int,
            )
        };
        ok == 1
    }

    /// Component names are checked against the HEOS library; names for
    /// other backends pass and are judged by the first engine call.
    fn known_fluid_inner(&self, fluid: &str) -> bool {
        match heos_components(fluid) {
            Some(parts) => {
                !parts.is_empty()
                    && parts.iter().all(|name| !name.is_empty() && self.fluid_exists_inner(name))
            }
            None => true,
        }
    }

    /// Turn a non-finite return value into an [`OracleError`].
    fn failure_inner(&self, fluid: Option<&str>) -> OracleError {
        let message = self
            .global_param_inner("errstring")
            .unwrap_or_else(|| "CoolProp returned a non-finite value".to_string());

        if let Some(fluid) = fluid {
            if !self.known_fluid_inner(fluid) || names_missing_fluid(&message) {
                return OracleError::UnknownFluid(fluid.to_string());
            }
        }
        let lower = message.to_lowercase();
        if lower.contains("out of range") || lower.contains("outside the range") {
            OracleError::OutOfRange(message)
        } else {
            OracleError::Inadmissible(message)
        }
    }

    /// CoolProp warnings do not fail the call; log them instead.
    fn drain_warning_inner(&self) {
        if let Some(w) = self.global_param_inner("warnstring") {
            warn!(warning = %w, "CoolProp warning");
        }
    }

    fn finish_inner(&self, value: f64, fluid: Option<&str>) -> std::result::Result<f64, OracleError> {
        if value.is_finite() {
            self.drain_warning_inner();
            Ok(value)
        } else {
            Err(self.failure_inner(fluid))
        }
    }
}

// ── Fluid names ─────────────────────────────────────────────────────

/// Components of a fluid string that the HEOS library can vouch for.
///
/// Plain names (`"Water"`), `HEOS::` names and `&`-joined mixtures with
/// optional `[fraction]` suffixes yield their component names. Other
/// backends (`INCOMP::`, `REFPROP::`, …) and predefined `.mix` files
/// yield `None`: only the engine call itself can tell whether they load.
fn heos_components(fluid: &str) -> Option<Vec<&str>> {
    let fluid = fluid.trim();
    let body = match fluid.split_once("::") {
        Some((backend, body)) if backend.trim().eq_ignore_ascii_case("HEOS") => body,
        Some(_) => return None,
        None => fluid,
    };
    if body.trim().to_ascii_lowercase().ends_with(".mix") {
        return None;
    }
    if body.trim().is_empty() {
        return Some(Vec::new());
    }
    Some(
        body.split('&')
            .map(|part| part.split('[').next().unwrap_or(part).trim())
            .collect(),
    )
}

/// Whether a CoolProp error message says the fluid could not be found.
fn names_missing_fluid(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["was not found in string_to_index_map", "unable to load", "could not find fluid"]
        .iter()
        .any(|needle| lower.contains(needle))
}

impl PropertyOracle for CoolPropLibrary {
    fn props_si(
        &self,
        output: &str,
        in1: Input<'_>,
        in2: Input<'_>,
        fluid: &str,
    ) -> std::result::Result<f64, OracleError> {
        let out_c = to_c_string(output);
        let n1 = to_c_string(in1.0);
        let n2 = to_c_string(in2.0);
        let fluid_c = to_c_string(fluid);

        let _guard = Self::lock_coolprop();
        let value = unsafe {
            self.sys.props_si(
                out_c.as_ptr(),
                n1.as_ptr(),
                in1.1,
                n2.as_ptr(),
                in2.1,
                fluid_c.as_ptr(),
            )
        };
        debug!(output, ?in1, ?in2, fluid, value, "PropsSI");
        self.finish_inner(value, Some(fluid))
    }

    fn ha_props_si(
        &self,
        output: &str,
        in1: Input<'_>,
        in2: Input<'_>,
        in3: Input<'_>,
    ) -> std::result::Result<f64, OracleError> {
        let out_c = to_c_string(output);
        let n1 = to_c_string(in1.0);
        let n2 = to_c_string(in2.0);
        let n3 = to_c_string(in3.0);

        let _guard = Self::lock_coolprop();
        let value = unsafe {
            self.sys.ha_props_si(
                out_c.as_ptr(),
                n1.as_ptr(),
                in1.1,
                n2.as_ptr(),
                in2.1,
                n3.as_ptr(),
                in3.1,
            )
        };
        debug!(output, ?in1, ?in2, ?in3, value, "HAPropsSI");
        self.finish_inner(value, None)
    }

    fn is_known_fluid(&self, fluid: &str) -> bool {
        let _guard = Self::lock_coolprop();
        self.known_fluid_inner(fluid)
    }

    fn version(&self) -> Option<String> {
        let _guard = Self::lock_coolprop();
        self.global_param_inner("version")
    }
}
