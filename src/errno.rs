use crate::context::ThreadContext;
use std::str;

/// A PROJ error code, zero meaning "no error".
pub(crate) struct Errno(pub libc::c_int);

impl Errno {
    pub fn is_set(&self) -> bool {
        self.0 != 0
    }

    pub fn message(&self, context: &ThreadContext) -> Result<String, str::Utf8Error> {
        let raw = unsafe { proj_sys::proj_context_errno_string(context.as_ptr(), self.0) };
        if raw.is_null() {
            return Ok(format!("PROJ error {}", self.0));
        }
        unsafe { crate::_string(raw) }
    }
}
