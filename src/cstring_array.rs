use libc::c_char;
use std::ffi::{CString, NulError};
use std::ptr;

/// Owned list of C strings exposed as the `const char* const*` that PROJ expects
/// for search paths and option lists.
///
/// The pointer table is kept null-terminated at all times, so `as_ptr` can be
/// handed to functions that either take an explicit count or scan for the
/// terminating null.
pub(crate) struct CStringArray {
    strings: Vec<CString>,
    table: Vec<*const c_char>,
}

impl CStringArray {
    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
            table: vec![ptr::null()],
        }
    }

    /// Appends `s`, failing if it contains an interior nul byte.
    pub fn push(&mut self, s: impl Into<String>) -> Result<(), NulError> {
        let cstring = CString::new(s.into())?;
        let terminator = self.table.len() - 1;
        // The heap buffer of a CString does not move when the CString itself is moved.
        self.table.insert(terminator, cstring.as_ptr());
        self.strings.push(cstring);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Null when empty, which PROJ documents as "no entries".
    pub fn as_ptr(&self) -> *const *const c_char {
        debug_assert_eq!(self.table.last(), Some(&ptr::null()));
        debug_assert_eq!(self.table.len(), self.strings.len() + 1);
        if self.strings.is_empty() {
            ptr::null()
        } else {
            self.table.as_ptr()
        }
    }
}

impl Default for CStringArray {
    fn default() -> Self {
        Self::new()
    }
}
