#![doc(html_logo_url = "https://raw.githubusercontent.com/georust/meta/master/logo/logo.png")]
//! `projwrap` provides handle-based bindings to [PROJ](https://proj.org)
//!
//! A [`Pj`] owns one PROJ coordinate reference system. Every query (ellipsoid,
//! axes, prime meridian, units, definition) and every coordinate transformation
//! is carried out by the linked PROJ library; this crate marshals arguments and
//! turns null pointers and error codes into `Result`s.
//!
//! # Usage
//!
//! 1. Create the CRSs with [`Pj::new`], from a PROJ string, an `AUTHORITY:CODE`
//!    pair, WKT or PROJJSON. PROJ strings are read as CRS definitions, the way
//!    proj.4 read them.
//! 2. Call [`Pj::transform`] on a flat array of interleaved ordinates, or use the
//!    [`Transform`] trait on `geo-types` geometries.
//!
//! Geographic coordinates are exchanged in degrees, longitude first.
//!
//! If you need to change PROJ's resource search paths or log level, build a
//! [`ThreadContext`] with [`ContextBuilder`] and create objects on it with
//! [`Pj::with_context`]. PROJ's own log output is forwarded to `tracing` under
//! the `proj` target.
//!
//! The [`Proj4`] facade, [`Projection`] implementations and [`ProjectionData`]
//! keep the proj.4-era API alive: geographic coordinates there travel in radians
//! between the preparation steps. Prefer [`Pj`] in new code.
//!
//! # Requirements
//!
//! By default, this requires `libproj` 9.x to be present on your system. The
//! `bundled_proj` feature builds PROJ from source through `proj-sys` instead.
//!
//! # Example
//!
//! ```
//! use approx::assert_relative_eq;
//! use projwrap::Pj;
//!
//! let wgs84 = Pj::new("+proj=longlat +datum=WGS84 +no_defs").unwrap();
//! let mercator = Pj::new("+proj=merc +datum=WGS84").unwrap();
//!
//! // two points, three ordinates each
//! let mut coordinates = [10.0, 0.0, 5.0, -10.0, 0.0, 5.0];
//! wgs84.transform(&mercator, 3, &mut coordinates, 0, 2).unwrap();
//! assert_relative_eq!(coordinates[0], 1113194.9079327357, epsilon = 1e-6);
//! assert_relative_eq!(coordinates[3], -1113194.9079327357, epsilon = 1e-6);
//! assert_relative_eq!(coordinates[5], 5.0, epsilon = 1e-9);
//! ```

use libc::c_char;
use std::ffi::CStr;
use std::str;

mod context;
mod crs;
mod cstring_array;
mod errno;
#[cfg(feature = "geo-types")]
mod geo_types;
mod pj;
mod proj4;
mod projection_data;
mod projections;
mod transform;

pub use crate::context::{ContextBuilder, LogLevel, ThreadContext};
pub use crate::crs::{AxisDirection, CrsType};
pub use crate::pj::{DIMENSION_MAX, Pj, PjCreateError, ProjError};
pub use crate::proj4::{Proj4, Proj4Factory};
pub use crate::projection_data::ProjectionData;
pub use crate::projections::{
    DEGREE_TO_RADIAN, LatLong, LegacyError, Others, ProjInfo, Projection, RADIAN_TO_DEGREE,
    degree_to_radian, ellipsoid_info, parse_proj_parameters, proj_info, radian_to_degree,
    transform_arrays,
};
pub use crate::transform::{Transform, TransformError};

/// Copies a PROJ-owned, nul-terminated string.
///
/// # Safety
///
/// `raw_ptr` must be non-null and point to a valid nul-terminated string.
pub(crate) unsafe fn _string(raw_ptr: *const c_char) -> Result<String, str::Utf8Error> {
    let c_str = unsafe { CStr::from_ptr(raw_ptr) };
    Ok(str::from_utf8(c_str.to_bytes())?.to_string())
}
