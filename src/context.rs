use crate::cstring_array::CStringArray;
use crate::errno::Errno;
use libc::{c_char, c_int, c_void};
use std::ffi::NulError;
use std::path::{Path, PathBuf};
use std::ptr;

/// Verbosity of the messages PROJ emits through its log callback.
///
/// Messages are forwarded to [`tracing`]: errors at `ERROR`, debug output at `DEBUG`
/// and trace output at `TRACE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogLevel {
    None,
    #[default]
    Error,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_raw(self) -> proj_sys::PJ_LOG_LEVEL {
        match self {
            LogLevel::None => proj_sys::PJ_LOG_LEVEL_PJ_LOG_NONE,
            LogLevel::Error => proj_sys::PJ_LOG_LEVEL_PJ_LOG_ERROR,
            LogLevel::Debug => proj_sys::PJ_LOG_LEVEL_PJ_LOG_DEBUG,
            LogLevel::Trace => proj_sys::PJ_LOG_LEVEL_PJ_LOG_TRACE,
        }
    }
}

/// PROJ thread context
pub struct ThreadContext(ptr::NonNull<proj_sys::PJ_CONTEXT>);

impl ThreadContext {
    /// A context with the default configuration of [`ContextBuilder`].
    pub fn new() -> Self {
        let ctx = ThreadContext::bare();
        ctx.apply_defaults();
        ctx
    }

    fn bare() -> Self {
        // Safety: `proj_context_create` always returns a valid pointer to a thread context.
        unsafe {
            let ctx_ptr = proj_sys::proj_context_create();
            ThreadContext::from_raw(ctx_ptr)
        }
    }

    fn apply_defaults(&self) {
        self.set_proj4_init_rules(true);
        self.set_log_level(LogLevel::default());
    }

    /// # Safety
    ///
    /// Must provide a non-null pointer to a PROJ thread context.
    unsafe fn from_raw(ctx_ptr: *mut proj_sys::PJ_CONTEXT) -> Self {
        debug_assert!(!ctx_ptr.is_null());
        let ctx = ThreadContext(unsafe { ptr::NonNull::new_unchecked(ctx_ptr) });
        unsafe {
            proj_sys::proj_log_func(ctx.as_ptr(), ptr::null_mut(), Some(log_to_tracing));
        }
        ctx
    }

    pub fn as_ptr(&self) -> *mut proj_sys::PJ_CONTEXT {
        self.0.as_ptr()
    }

    /// The error code of the last failed operation run on this context.
    pub(crate) fn errno(&self) -> Errno {
        Errno(unsafe { proj_sys::proj_context_errno(self.as_ptr()) })
    }

    fn set_proj4_init_rules(&self, enable: bool) {
        unsafe { proj_sys::proj_context_use_proj4_init_rules(self.as_ptr(), c_int::from(enable)) };
    }

    fn set_log_level(&self, level: LogLevel) {
        unsafe { proj_sys::proj_log_level(self.as_ptr(), level.as_raw()) };
    }

    fn set_search_paths(&self, paths: &[PathBuf]) -> Result<(), NulError> {
        let mut c_paths = CStringArray::new();
        for path in paths {
            c_paths.push(path.to_string_lossy())?;
        }
        unsafe {
            proj_sys::proj_context_set_search_paths(
                self.as_ptr(),
                c_paths.len() as c_int,
                c_paths.as_ptr(),
            )
        };
        Ok(())
    }
}

impl Clone for ThreadContext {
    fn clone(&self) -> Self {
        // Safety: `proj_context_clone` always returns a valid pointer to a thread context.
        unsafe {
            let ctx_ptr = proj_sys::proj_context_clone(self.0.as_ptr());
            ThreadContext::from_raw(ctx_ptr)
        }
    }
}

impl Default for ThreadContext {
    fn default() -> Self {
        ThreadContext::new()
    }
}

impl Drop for ThreadContext {
    fn drop(&mut self) {
        // Safety: The pointer being provided to `proj_context_destroy` will always be a valid
        // thread context, so long as the same `ThreadContext` doesn't get dropped twice.
        unsafe { proj_sys::proj_context_destroy(self.0.as_ptr()) };
    }
}

/// Configures a [`ThreadContext`] before any object is created on it.
///
/// ```no_run
/// use projwrap::{ContextBuilder, LogLevel, Pj};
/// use std::rc::Rc;
///
/// let ctx = ContextBuilder::new()
///     .search_path("/usr/local/share/proj")
///     .log_level(LogLevel::Debug)
///     .build()
///     .unwrap();
/// let wgs84 = Pj::with_context(Rc::new(ctx), "+proj=longlat +datum=WGS84").unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct ContextBuilder {
    search_paths: Vec<PathBuf>,
    proj4_init_rules: bool,
    log_level: LogLevel,
}

impl ContextBuilder {
    pub fn new() -> Self {
        ContextBuilder {
            search_paths: Vec::new(),
            proj4_init_rules: true,
            log_level: LogLevel::default(),
        }
    }

    /// Adds a directory searched for resource files (`proj.db`, grids, init files).
    ///
    /// Once any path is set, PROJ no longer looks at its default locations.
    pub fn search_path(mut self, path: impl AsRef<Path>) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Whether `+init=epsg:XXXX` style definitions follow proj.4 semantics
    /// (longitude/latitude order, no axis swapping). Enabled by default.
    pub fn proj4_init_rules(mut self, enable: bool) -> Self {
        self.proj4_init_rules = enable;
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn build(self) -> Result<ThreadContext, NulError> {
        let ctx = ThreadContext::bare();
        ctx.set_proj4_init_rules(self.proj4_init_rules);
        ctx.set_log_level(self.log_level);
        if !self.search_paths.is_empty() {
            ctx.set_search_paths(&self.search_paths)?;
        }
        Ok(ctx)
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Log callback handed to PROJ: forwards every message to `tracing`.
unsafe extern "C" fn log_to_tracing(_app_data: *mut c_void, level: c_int, msg: *const c_char) {
    if msg.is_null() {
        return;
    }
    let Ok(msg) = (unsafe { crate::_string(msg) }) else {
        return;
    };
    let msg = msg.trim_end();
    match level as proj_sys::PJ_LOG_LEVEL {
        proj_sys::PJ_LOG_LEVEL_PJ_LOG_ERROR => tracing::error!(target: "proj", "{msg}"),
        proj_sys::PJ_LOG_LEVEL_PJ_LOG_DEBUG => tracing::debug!(target: "proj", "{msg}"),
        _ => tracing::trace!(target: "proj", "{msg}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder() {
        let builder = ContextBuilder::default();
        assert!(builder.proj4_init_rules);
        assert_eq!(builder.log_level, LogLevel::Error);
        assert!(builder.search_paths.is_empty());
    }

    #[test]
    fn test_search_path_with_nul_is_rejected() {
        let result = ContextBuilder::new().search_path("bad\0path").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_configured_context_creates_objects() {
        let ctx = ContextBuilder::new()
            .search_path(std::env::temp_dir())
            .log_level(LogLevel::Debug)
            .proj4_init_rules(false)
            .build()
            .unwrap();
        // a PROJ string with a built-in ellipsoid needs no resource files
        let grs80 = crate::Pj::with_context(std::rc::Rc::new(ctx), "+proj=longlat +ellps=GRS80")
            .unwrap();
        assert_eq!(grs80.crs_type(), crate::CrsType::Geographic);
        assert!((grs80.semi_major_axis().unwrap() - 6378137.0).abs() < 1e-6);
    }

    #[test]
    fn test_fresh_context_has_no_error() {
        let ctx = ThreadContext::new();
        assert_eq!(ctx.errno().0, 0);
        let cloned = ctx.clone();
        assert_eq!(cloned.errno().0, 0);
    }
}
