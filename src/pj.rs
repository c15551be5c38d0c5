use crate::context::ThreadContext;
use crate::crs::{AxisDirection, CrsType};
use crate::errno::Errno;
use libc::{c_char, c_int};
use std::borrow::Cow;
use std::{ffi, fmt, mem, ptr, rc};
use thiserror::Error;

/// Largest number of ordinates per point accepted by [`Pj::transform`].
pub const DIMENSION_MAX: usize = 100;

/// A coordinate reference system held by PROJ.
///
/// Every query forwards to the native object; the object is destroyed exactly
/// once when the `Pj` is dropped.
///
/// ```
/// use projwrap::{CrsType, Pj};
/// # use approx::assert_relative_eq;
///
/// let wgs84 = Pj::new("+proj=longlat +datum=WGS84 +no_defs").unwrap();
/// assert_eq!(wgs84.crs_type(), CrsType::Geographic);
/// assert_relative_eq!(wgs84.semi_major_axis().unwrap(), 6378137.0);
/// ```
pub struct Pj {
    pj: ptr::NonNull<proj_sys::PJ>,
    ctx: rc::Rc<ThreadContext>,
}

/// One axis of a coordinate system.
struct Axis {
    direction: AxisDirection,
    unit_conv_factor: f64,
}

impl Pj {
    /// Creates a CRS from a PROJ string, an `AUTHORITY:CODE` pair, WKT or PROJJSON,
    /// on a fresh thread context.
    ///
    /// PROJ strings without `+type=crs` are read as CRS definitions, the way
    /// proj.4 read them.
    pub fn new(definition: &str) -> Result<Self, PjCreateError> {
        Pj::with_context(rc::Rc::new(ThreadContext::new()), definition)
    }

    /// Same as [`Pj::new`], on a context shared with other objects.
    pub fn with_context(
        ctx: rc::Rc<ThreadContext>,
        definition: &str,
    ) -> Result<Self, PjCreateError> {
        let c_definition = ffi::CString::new(crs_definition(definition).as_ref())
            .map_err(PjCreateError::ArgumentNulError)?;
        let pj_ptr = unsafe { proj_sys::proj_create(ctx.as_ptr(), c_definition.as_ptr()) };
        let pj = Pj::from_pj_ptr(ctx, pj_ptr)?;
        if !pj.is_crs() {
            return Err(PjCreateError::NotACrs(definition.to_string()));
        }
        tracing::debug!(definition, "allocated PJ");
        Ok(pj)
    }

    /// Derives a new CRS of the given type from this one.
    ///
    /// Only [`CrsType::Geographic`] can be derived: the result is the geographic
    /// CRS this CRS is based on, sharing its context. A geocentric CRS yields
    /// a longitude/latitude CRS on its datum.
    pub fn derive(&self, crs_type: CrsType) -> Result<Pj, PjCreateError> {
        if crs_type != CrsType::Geographic {
            return Err(PjCreateError::CannotDerive(crs_type));
        }
        let base = unsafe { proj_sys::proj_crs_get_geodetic_crs(self.ctx_ptr(), self.as_ptr()) };
        let base = Pj::from_pj_ptr(self.ctx.clone(), base)?;
        let geographic = match base.crs_type() {
            CrsType::Geographic => base,
            CrsType::Geocentric => base.geographic_on_datum()?,
            CrsType::Projected => return Err(PjCreateError::CannotDerive(crs_type)),
        };
        tracing::debug!(source = %self, "derived geographic PJ");
        Ok(geographic)
    }

    /// A longitude/latitude CRS on the datum of this geodetic CRS.
    fn geographic_on_datum(&self) -> Result<Pj, PjCreateError> {
        let mut datum = unsafe { proj_sys::proj_crs_get_datum(self.ctx_ptr(), self.as_ptr()) };
        if datum.is_null() {
            datum = unsafe { proj_sys::proj_crs_get_datum_ensemble(self.ctx_ptr(), self.as_ptr()) };
        }
        let datum = Pj::from_pj_ptr(self.ctx.clone(), datum)?;
        // a null unit name means degrees
        let cs = Pj::from_pj_ptr(self.ctx.clone(), unsafe {
            proj_sys::proj_create_ellipsoidal_2D_cs(
                self.ctx_ptr(),
                proj_sys::PJ_ELLIPSOIDAL_CS_2D_TYPE_PJ_ELLPS2D_LONGITUDE_LATITUDE,
                ptr::null(),
                0.0,
            )
        })?;
        let name = ffi::CString::new(self.description().unwrap_or_default())
            .map_err(PjCreateError::ArgumentNulError)?;
        let crs = unsafe {
            proj_sys::proj_create_geographic_crs_from_datum(
                self.ctx_ptr(),
                name.as_ptr(),
                datum.as_ptr(),
                cs.as_ptr(),
            )
        };
        Pj::from_pj_ptr(self.ctx.clone(), crs)
    }

    /// Shorthand for `derive(CrsType::Geographic)`.
    pub fn geographic(&self) -> Result<Pj, PjCreateError> {
        self.derive(CrsType::Geographic)
    }

    pub(crate) fn from_pj_ptr(
        ctx: rc::Rc<ThreadContext>,
        pj_ptr: *mut proj_sys::PJ,
    ) -> Result<Self, PjCreateError> {
        match ptr::NonNull::new(pj_ptr) {
            Some(pj) => Ok(Pj { pj, ctx }),
            None => Err(match ctx.errno().message(&ctx) {
                Ok(s) => PjCreateError::ProjError(s),
                Err(err) => PjCreateError::ProjErrorMessageUtf8Error(err),
            }),
        }
    }

    /// Wraps an object returned by a query on this one, so it is destroyed on every path.
    fn child(&self, pj_ptr: *mut proj_sys::PJ) -> Result<Pj, ProjError> {
        Ok(Pj::from_pj_ptr(self.ctx.clone(), pj_ptr)?)
    }

    pub fn as_ptr(&self) -> *mut proj_sys::PJ {
        self.pj.as_ptr()
    }

    fn ctx_ptr(&self) -> *mut proj_sys::PJ_CONTEXT {
        self.ctx.as_ptr()
    }

    pub fn context(&self) -> &rc::Rc<ThreadContext> {
        &self.ctx
    }

    /// The PROJ release string, e.g. `Rel. 9.4.0, March 1st, 2024`.
    pub fn version() -> String {
        let info = unsafe { proj_sys::proj_info() };
        if info.release.is_null() {
            return String::new();
        }
        unsafe { crate::_string(info.release) }.unwrap_or_default()
    }

    fn is_crs(&self) -> bool {
        unsafe { proj_sys::proj_is_crs(self.as_ptr()) != 0 }
    }

    fn errno(&self) -> Errno {
        Errno(unsafe { proj_sys::proj_errno(self.as_ptr()) })
    }

    fn errno_reset(&self) {
        unsafe { proj_sys::proj_errno_reset(self.as_ptr()) };
    }

    /// The error recorded on the context by the last failed query.
    fn context_error(&self) -> ProjError {
        match self.ctx.errno().message(&self.ctx) {
            Ok(s) => ProjError::Proj(s),
            Err(err) => ProjError::Utf8(err),
        }
    }

    /// The PROJ.4 string form of this CRS, if PROJ can express it as one.
    pub fn definition(&self) -> Option<String> {
        let raw = unsafe {
            proj_sys::proj_as_proj_string(
                self.ctx_ptr(),
                self.as_ptr(),
                proj_sys::PJ_PROJ_STRING_TYPE_PJ_PROJ_4,
                ptr::null(),
            )
        };
        if raw.is_null() {
            return None;
        }
        unsafe { crate::_string(raw) }.ok()
    }

    /// The name PROJ gives this object.
    pub fn description(&self) -> Option<String> {
        let raw = unsafe { proj_sys::proj_get_name(self.as_ptr()) };
        if raw.is_null() {
            return None;
        }
        unsafe { crate::_string(raw) }.ok()
    }

    /// The CRS carrying the horizontal axes: bound CRSs are unwrapped to their
    /// source, compound CRSs to their first component.
    fn horizontal(&self) -> Result<Option<Pj>, ProjError> {
        let component = match unsafe { proj_sys::proj_get_type(self.as_ptr()) } {
            proj_sys::PJ_TYPE_PJ_TYPE_BOUND_CRS => unsafe {
                proj_sys::proj_get_source_crs(self.ctx_ptr(), self.as_ptr())
            },
            proj_sys::PJ_TYPE_PJ_TYPE_COMPOUND_CRS => unsafe {
                proj_sys::proj_crs_get_sub_crs(self.ctx_ptr(), self.as_ptr(), 0)
            },
            _ => return Ok(None),
        };
        let component = self.child(component)?;
        Ok(Some(component.horizontal()?.unwrap_or(component)))
    }

    pub fn crs_type(&self) -> CrsType {
        let horizontal = self.horizontal().ok().flatten();
        let crs = horizontal.as_ref().unwrap_or(self);
        CrsType::from_raw(unsafe { proj_sys::proj_get_type(crs.as_ptr()) })
    }

    /// Semi-major and semi-minor axis lengths of the ellipsoid, in metres.
    fn ellipsoid_axes(&self) -> Result<(f64, f64), ProjError> {
        let ellipsoid =
            self.child(unsafe { proj_sys::proj_get_ellipsoid(self.ctx_ptr(), self.as_ptr()) })?;
        let mut semi_major = 0.0;
        let mut semi_minor = 0.0;
        let mut is_semi_minor_computed: c_int = 0;
        let mut inverse_flattening = 0.0;
        let ok = unsafe {
            proj_sys::proj_ellipsoid_get_parameters(
                self.ctx_ptr(),
                ellipsoid.as_ptr(),
                &mut semi_major,
                &mut semi_minor,
                &mut is_semi_minor_computed,
                &mut inverse_flattening,
            )
        };
        if ok == 0 {
            return Err(self.context_error());
        }
        Ok((semi_major, semi_minor))
    }

    pub fn semi_major_axis(&self) -> Result<f64, ProjError> {
        Ok(self.ellipsoid_axes()?.0)
    }

    pub fn semi_minor_axis(&self) -> Result<f64, ProjError> {
        Ok(self.ellipsoid_axes()?.1)
    }

    /// `1 - b²/a²`
    pub fn eccentricity_squared(&self) -> Result<f64, ProjError> {
        let (a, b) = self.ellipsoid_axes()?;
        let ratio = b / a;
        Ok(1.0 - ratio * ratio)
    }

    fn axes(&self) -> Result<Vec<Axis>, ProjError> {
        if unsafe { proj_sys::proj_get_type(self.as_ptr()) } == proj_sys::PJ_TYPE_PJ_TYPE_COMPOUND_CRS {
            let mut axes = Vec::new();
            for index in 0..2 {
                let component = unsafe {
                    proj_sys::proj_crs_get_sub_crs(self.ctx_ptr(), self.as_ptr(), index)
                };
                axes.extend(self.child(component)?.axes()?);
            }
            return Ok(axes);
        }
        let horizontal = self.horizontal()?;
        let crs = horizontal.as_ref().unwrap_or(self);
        let cs = self.child(unsafe {
            proj_sys::proj_crs_get_coordinate_system(self.ctx_ptr(), crs.as_ptr())
        })?;
        let count = unsafe { proj_sys::proj_cs_get_axis_count(self.ctx_ptr(), cs.as_ptr()) };
        if count < 0 {
            return Err(self.context_error());
        }
        (0..count)
            .map(|index| {
                let mut direction: *const c_char = ptr::null();
                let mut unit_conv_factor = 0.0;
                let ok = unsafe {
                    proj_sys::proj_cs_get_axis_info(
                        self.ctx_ptr(),
                        cs.as_ptr(),
                        index,
                        ptr::null_mut(),
                        ptr::null_mut(),
                        &mut direction,
                        &mut unit_conv_factor,
                        ptr::null_mut(),
                        ptr::null_mut(),
                        ptr::null_mut(),
                    )
                };
                if ok == 0 || direction.is_null() {
                    return Err(self.context_error());
                }
                let direction = unsafe { crate::_string(direction) }?;
                Ok(Axis {
                    direction: AxisDirection::from_proj_name(&direction),
                    unit_conv_factor,
                })
            })
            .collect()
    }

    /// Direction of every axis, in coordinate order.
    ///
    /// Two-dimensional CRSs get a trailing [`AxisDirection::Up`], as the
    /// proj.4 `+axis` parameter always named three axes.
    pub fn axis_directions(&self) -> Result<Vec<AxisDirection>, ProjError> {
        let mut directions: Vec<_> = self.axes()?.into_iter().map(|axis| axis.direction).collect();
        if directions.len() == 2 {
            directions.push(AxisDirection::Up);
        }
        Ok(directions)
    }

    /// The directions as the proj.4 `+axis` code, e.g. `"enu"`.
    pub fn axis_codes(&self) -> Result<String, ProjError> {
        Ok(self.axis_directions()?.into_iter().map(AxisDirection::code).collect())
    }

    /// Longitude of the prime meridian east of Greenwich, in degrees.
    pub fn greenwich_longitude(&self) -> Result<f64, ProjError> {
        let meridian = self.child(unsafe {
            proj_sys::proj_get_prime_meridian(self.ctx_ptr(), self.as_ptr())
        })?;
        let mut longitude = 0.0;
        let mut unit_conv_factor = 0.0;
        let ok = unsafe {
            proj_sys::proj_prime_meridian_get_parameters(
                self.ctx_ptr(),
                meridian.as_ptr(),
                &mut longitude,
                &mut unit_conv_factor,
                ptr::null_mut(),
            )
        };
        if ok == 0 {
            return Err(self.context_error());
        }
        Ok((longitude * unit_conv_factor).to_degrees())
    }

    /// Factor converting the linear unit of the horizontal axes (or of the
    /// vertical axis when `vertical` is set) to metres.
    ///
    /// Geographic CRSs report 1 for the horizontal axes. A CRS without a
    /// vertical axis reports the horizontal factor for the vertical one.
    pub fn linear_unit_to_metre(&self, vertical: bool) -> Result<f64, ProjError> {
        let axes = self.axes()?;
        let horizontal = if self.crs_type() == CrsType::Geographic {
            1.0
        } else {
            axes.first()
                .map(|axis| axis.unit_conv_factor)
                .ok_or(ProjError::NoAxis)?
        };
        if !vertical {
            return Ok(horizontal);
        }
        Ok(axes
            .iter()
            .find(|axis| axis.direction.is_vertical())
            .map_or(horizontal, |axis| axis.unit_conv_factor))
    }

    /// The coordinate operation from this CRS to `target`, with geographic
    /// coordinates in longitude/latitude order.
    pub(crate) fn operation_to(&self, target: &Pj) -> Result<Pj, ProjError> {
        let operation = self.child(unsafe {
            proj_sys::proj_create_crs_to_crs_from_pj(
                self.ctx_ptr(),
                self.as_ptr(),
                target.as_ptr(),
                ptr::null_mut(),
                ptr::null(),
            )
        })?;
        let normalized = self.child(unsafe {
            proj_sys::proj_normalize_for_visualization(self.ctx_ptr(), operation.as_ptr())
        })?;
        tracing::trace!(source = %self, target = %target, operation = %normalized, "created coordinate operation");
        Ok(normalized)
    }

    /// Transforms in place `num_pts` points of `dimension` ordinates each, stored
    /// contiguously in `coordinates` from `offset`.
    ///
    /// The first two ordinates are horizontal (longitude and latitude in degrees
    /// for geographic CRSs), the third, if any, is the height. Further ordinates
    /// are left untouched. On a PROJ failure the values already computed stay
    /// written and failed points hold `HUGE_VAL`.
    ///
    /// ```
    /// use projwrap::Pj;
    /// # use approx::assert_relative_eq;
    ///
    /// let wgs84 = Pj::new("+proj=longlat +datum=WGS84").unwrap();
    /// let utm32 = Pj::new("+proj=utm +zone=32 +datum=WGS84").unwrap();
    /// let mut coordinates = [9.0, 0.0];
    /// wgs84.transform(&utm32, 2, &mut coordinates, 0, 1).unwrap();
    /// assert_relative_eq!(coordinates[0], 500000.0, epsilon = 1e-6);
    /// assert_relative_eq!(coordinates[1], 0.0, epsilon = 1e-6);
    /// ```
    pub fn transform(
        &self,
        target: &Pj,
        dimension: usize,
        coordinates: &mut [f64],
        offset: usize,
        num_pts: usize,
    ) -> Result<(), ProjError> {
        if !(2..=DIMENSION_MAX).contains(&dimension) {
            return Err(ProjError::IllegalDimension(dimension));
        }
        let len = coordinates.len();
        let end = dimension
            .checked_mul(num_pts)
            .and_then(|n| n.checked_add(offset))
            .filter(|&end| end <= len)
            .ok_or(ProjError::OutOfBounds {
                offset,
                num_pts,
                len,
            })?;
        if num_pts == 0 {
            return Ok(());
        }
        let operation = self.operation_to(target)?;
        let window = &mut coordinates[offset..end];
        let base = window.as_mut_ptr();
        // Safety: `window` holds `num_pts * dimension >= 2` values, so the y and z
        // columns start inside it and every strided access stays in bounds.
        let (y, z) = unsafe {
            let z = if dimension >= 3 { base.add(2) } else { ptr::null_mut() };
            (base.add(1), z)
        };
        tracing::debug!(num_pts, dimension, "transforming interleaved coordinates");
        unsafe { operation.trans_generic(base, y, z, dimension, num_pts) };
        let failed_point = window
            .chunks_exact(dimension)
            .any(|point| point[..2].iter().any(|v| v.is_infinite()));
        operation.check_transform(failed_point)
    }

    /// Transforms in place `point_count` points held in separate `x`, `y` and
    /// optional `z` arrays, `point_offset` values apart, as `pj_transform` did.
    pub fn transform_xyz(
        &self,
        target: &Pj,
        x: &mut [f64],
        y: &mut [f64],
        z: Option<&mut [f64]>,
        point_count: usize,
        point_offset: usize,
    ) -> Result<(), ProjError> {
        if point_offset == 0 {
            return Err(ProjError::IllegalStride(point_offset));
        }
        if point_count == 0 {
            return Ok(());
        }
        let needed = (point_count - 1)
            .checked_mul(point_offset)
            .and_then(|n| n.checked_add(1));
        let fits = |len: usize| needed.is_some_and(|needed| needed <= len);
        let shortest = x
            .len()
            .min(y.len())
            .min(z.as_ref().map_or(usize::MAX, |z| z.len()));
        if !fits(shortest) {
            return Err(ProjError::OutOfBounds {
                offset: 0,
                num_pts: point_count,
                len: shortest,
            });
        }
        let operation = self.operation_to(target)?;
        let z = z.map_or(ptr::null_mut(), |z| z.as_mut_ptr());
        tracing::debug!(point_count, point_offset, "transforming coordinate arrays");
        // Safety: every array was checked to hold `point_count` strided values.
        unsafe {
            operation.trans_generic(x.as_mut_ptr(), y.as_mut_ptr(), z, point_offset, point_count)
        };
        let failed_point = x
            .iter()
            .zip(y.iter())
            .step_by(point_offset)
            .take(point_count)
            .any(|(x, y)| x.is_infinite() || y.is_infinite());
        operation.check_transform(failed_point)
    }

    /// # Safety
    ///
    /// `x`, `y` and (if non-null) `z` must each point to `count` values spaced
    /// `stride` doubles apart.
    unsafe fn trans_generic(
        &self,
        x: *mut f64,
        y: *mut f64,
        z: *mut f64,
        stride: usize,
        count: usize,
    ) {
        let stride_bytes = stride * mem::size_of::<f64>();
        let nz = if z.is_null() { 0 } else { count };
        self.errno_reset();
        unsafe {
            proj_sys::proj_trans_generic(
                self.as_ptr(),
                proj_sys::PJ_DIRECTION_PJ_FWD,
                x,
                stride_bytes,
                count,
                y,
                stride_bytes,
                count,
                z,
                stride_bytes,
                nz,
                ptr::null_mut(),
                0,
                0,
            )
        };
    }

    /// Turns the errno left by a transform, or a point PROJ set to `HUGE_VAL`
    /// without recording an error, into a `Result`.
    fn check_transform(&self, failed_point: bool) -> Result<(), ProjError> {
        let mut errno = self.errno();
        if !errno.is_set() {
            if !failed_point {
                return Ok(());
            }
            unsafe {
                proj_sys::proj_errno_set(self.as_ptr(), proj_sys::PROJ_ERR_COORD_TRANSFM as c_int)
            };
            errno = self.errno();
        }
        let message = errno.message(&self.ctx)?;
        tracing::debug!(%message, "coordinate transformation failed");
        Err(ProjError::Transform(message))
    }

    /// Description of the last error recorded on this object's context, if any.
    pub fn last_error(&self) -> Option<String> {
        let errno = self.ctx.errno();
        if !errno.is_set() {
            return None;
        }
        errno.message(&self.ctx).ok()
    }
}

/// Appends `+type=crs` to bare PROJ strings, so that `+proj=utm ...` denotes the
/// projected CRS rather than the projection alone.
fn crs_definition(definition: &str) -> Cow<'_, str> {
    let trimmed = definition.trim();
    let is_proj_string =
        trimmed.starts_with('+') || trimmed.starts_with("proj=") || trimmed.starts_with("init=");
    if is_proj_string && !trimmed.contains("type=crs") {
        Cow::Owned(format!("{trimmed} +type=crs"))
    } else {
        Cow::Borrowed(definition)
    }
}

impl fmt::Display for Pj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description().as_deref().unwrap_or(""))
    }
}

impl fmt::Debug for Pj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pj")
            .field("name", &self.description())
            .field("definition", &self.definition())
            .finish()
    }
}

impl Drop for Pj {
    fn drop(&mut self) {
        unsafe {
            proj_sys::proj_destroy(self.as_ptr());
        }
    }
}

#[derive(Error, Debug)]
pub enum PjCreateError {
    #[error("A nul byte was found in the CRS definition: {0}")]
    ArgumentNulError(ffi::NulError),
    #[error("The underlying PROJ call failed: {0}")]
    ProjError(String),
    #[error("A UTF8 error occurred when constructing a PROJ error message")]
    ProjErrorMessageUtf8Error(std::str::Utf8Error),
    #[error("The definition does not describe a coordinate reference system: {0}")]
    NotACrs(String),
    #[error("Can not derive the {0} type")]
    CannotDerive(CrsType),
}

#[derive(Error, Debug)]
pub enum ProjError {
    #[error("Illegal number of dimensions: {0}")]
    IllegalDimension(usize),
    #[error("Illegal offset or illegal number of points: offset {offset}, {num_pts} points, {len} values")]
    OutOfBounds {
        offset: usize,
        num_pts: usize,
        len: usize,
    },
    #[error("Illegal distance between points: {0}")]
    IllegalStride(usize),
    #[error("The coordinate transformation failed: {0}")]
    Transform(String),
    #[error("The underlying PROJ call failed: {0}")]
    Proj(String),
    #[error("The coordinate system has no axis")]
    NoAxis,
    #[error("Couldn't convert a coordinate to or from f64")]
    FloatConversion,
    #[error(transparent)]
    Create(#[from] PjCreateError),
    #[error("A UTF8 error occurred when reading a PROJ string")]
    Utf8(#[from] std::str::Utf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

    #[test]
    fn test_version() {
        let version = Pj::version();
        assert!(version.starts_with("Rel. "), "{version}");
    }

    #[test]
    fn test_bare_proj_string_becomes_crs() {
        assert_eq!(
            crs_definition("+proj=merc +ellps=GRS80"),
            "+proj=merc +ellps=GRS80 +type=crs"
        );
        assert_eq!(crs_definition("+proj=merc +type=crs"), "+proj=merc +type=crs");
        assert_eq!(crs_definition("EPSG:4326"), "EPSG:4326");
        assert_eq!(crs_definition("init=epsg:4326"), "init=epsg:4326 +type=crs");
        // WKT may carry a PROJ string in an extension node
        let wkt = r#"GEOGCS["WGS 84",EXTENSION["PROJ4","+proj=longlat +datum=WGS84"]]"#;
        assert_eq!(crs_definition(wkt), wkt);
    }

    #[test]
    fn test_invalid_definition() {
        match Pj::new("+proj=nosuchprojection") {
            Err(PjCreateError::ProjError(message)) => assert!(!message.is_empty()),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            Pj::new("+proj=longlat\0"),
            Err(PjCreateError::ArgumentNulError(_))
        ));
    }

    #[test]
    fn test_geographic_ellipsoid() {
        let wgs84 = Pj::new(WGS84).unwrap();
        assert_eq!(wgs84.crs_type(), CrsType::Geographic);
        assert_relative_eq!(wgs84.semi_major_axis().unwrap(), 6378137.0);
        assert_relative_eq!(
            wgs84.semi_minor_axis().unwrap(),
            6356752.314245179,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            wgs84.eccentricity_squared().unwrap(),
            0.0066943799901413165,
            epsilon = 1e-12
        );
        assert_eq!(wgs84.axis_codes().unwrap(), "enu");
        assert_relative_eq!(wgs84.greenwich_longitude().unwrap(), 0.0);
        assert_relative_eq!(wgs84.linear_unit_to_metre(false).unwrap(), 1.0);
        assert!(wgs84.last_error().is_none());
    }

    #[test]
    fn test_types() {
        let geocentric = Pj::new("+proj=geocent +datum=WGS84").unwrap();
        assert_eq!(geocentric.crs_type(), CrsType::Geocentric);
        let mercator = Pj::new("+proj=merc +datum=WGS84").unwrap();
        assert_eq!(mercator.crs_type(), CrsType::Projected);
        let bound = Pj::new(
            "+proj=tmerc +lat_0=49 +lon_0=-2 +k=0.9996012717 +x_0=400000 +y_0=-100000 \
             +ellps=airy +towgs84=446.448,-125.157,542.06,0.15,0.247,0.842,-20.489 +units=m",
        )
        .unwrap();
        assert_eq!(bound.crs_type(), CrsType::Projected);
        assert_relative_eq!(bound.semi_major_axis().unwrap(), 6377563.396, epsilon = 1e-3);
    }

    #[test]
    fn test_prime_meridian() {
        let paris = Pj::new("+proj=longlat +ellps=clrk80ign +pm=paris").unwrap();
        assert_relative_eq!(
            paris.greenwich_longitude().unwrap(),
            2.337229166666667,
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_linear_units() {
        let feet = Pj::new("+proj=merc +datum=WGS84 +units=ft").unwrap();
        assert_relative_eq!(feet.linear_unit_to_metre(false).unwrap(), 0.3048);
        // no vertical axis: the vertical unit follows the horizontal one
        assert_relative_eq!(feet.linear_unit_to_metre(true).unwrap(), 0.3048);
        assert_eq!(feet.axis_codes().unwrap(), "enu");

        let wgs84 = Pj::new(WGS84).unwrap();
        assert_relative_eq!(wgs84.linear_unit_to_metre(true).unwrap(), 1.0);
    }

    #[test]
    fn test_definition_and_description() {
        let utm = Pj::new("+proj=utm +zone=32 +datum=WGS84").unwrap();
        let definition = utm.definition().unwrap();
        assert!(definition.contains("+proj=utm"), "{definition}");
        assert!(definition.contains("+zone=32"), "{definition}");
        assert!(utm.description().is_some());
        assert_eq!(utm.to_string(), utm.description().unwrap());
    }

    #[test]
    fn test_derive_geographic() {
        let utm = Pj::new("+proj=utm +zone=32 +datum=WGS84").unwrap();
        let geographic = utm.geographic().unwrap();
        assert_eq!(geographic.crs_type(), CrsType::Geographic);
        assert_relative_eq!(geographic.semi_major_axis().unwrap(), 6378137.0);
        assert!(matches!(
            utm.derive(CrsType::Projected),
            Err(PjCreateError::CannotDerive(CrsType::Projected))
        ));

        let geocentric = Pj::new("+proj=geocent +datum=WGS84").unwrap();
        let geographic = geocentric.geographic().unwrap();
        assert_eq!(geographic.crs_type(), CrsType::Geographic);
        assert_relative_eq!(geographic.semi_major_axis().unwrap(), 6378137.0);
        assert_eq!(geographic.axis_codes().unwrap(), "enu");
        let mut coordinates = [6378137.0, 0.0, 0.0];
        geocentric.transform(&geographic, 3, &mut coordinates, 0, 1).unwrap();
        assert_relative_eq!(coordinates[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(coordinates[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_transform_interleaved() {
        let wgs84 = Pj::new(WGS84).unwrap();
        let mercator = Pj::new("+proj=merc +datum=WGS84").unwrap();
        // a leading value before `offset` must not be touched
        let mut coordinates = [42.0, 10.0, 0.0, 0.0, 0.0];
        wgs84.transform(&mercator, 2, &mut coordinates, 1, 2).unwrap();
        assert_relative_eq!(coordinates[0], 42.0);
        assert_relative_eq!(coordinates[1], 1113194.9079327357, epsilon = 1e-6);
        assert_relative_eq!(coordinates[2], 0.0, epsilon = 1e-6);
        assert_relative_eq!(coordinates[3], 0.0, epsilon = 1e-6);
        assert_relative_eq!(coordinates[4], 0.0, epsilon = 1e-6);

        mercator.transform(&wgs84, 2, &mut coordinates, 1, 2).unwrap();
        assert_relative_eq!(coordinates[1], 10.0, epsilon = 1e-9);
        assert_relative_eq!(coordinates[2], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_transform_three_dimensions() {
        let wgs84 = Pj::new(WGS84).unwrap();
        let geocentric = Pj::new("+proj=geocent +datum=WGS84").unwrap();
        let mut coordinates = [0.0, 0.0, 0.0, 7.0];
        wgs84.transform(&geocentric, 4, &mut coordinates, 0, 1).unwrap();
        assert_relative_eq!(coordinates[0], 6378137.0, epsilon = 1e-6);
        assert_relative_eq!(coordinates[1], 0.0, epsilon = 1e-6);
        assert_relative_eq!(coordinates[2], 0.0, epsilon = 1e-6);
        assert_relative_eq!(coordinates[3], 7.0);
    }

    #[test]
    fn test_transform_argument_checks() {
        let wgs84 = Pj::new(WGS84).unwrap();
        let mercator = Pj::new("+proj=merc +datum=WGS84").unwrap();
        let mut coordinates = [0.0; 4];
        assert!(matches!(
            wgs84.transform(&mercator, 1, &mut coordinates, 0, 1),
            Err(ProjError::IllegalDimension(1))
        ));
        assert!(matches!(
            wgs84.transform(&mercator, DIMENSION_MAX + 1, &mut coordinates, 0, 1),
            Err(ProjError::IllegalDimension(_))
        ));
        assert!(matches!(
            wgs84.transform(&mercator, 2, &mut coordinates, 1, 2),
            Err(ProjError::OutOfBounds { offset: 1, num_pts: 2, len: 4 })
        ));
        assert!(wgs84.transform(&mercator, 2, &mut coordinates, 4, 0).is_ok());
    }

    #[test]
    fn test_transform_failure_is_reported() {
        let wgs84 = Pj::new(WGS84).unwrap();
        let mercator = Pj::new("+proj=merc +datum=WGS84").unwrap();
        // Mercator is undefined at the poles
        let mut coordinates = [0.0, 90.0];
        match wgs84.transform(&mercator, 2, &mut coordinates, 0, 1) {
            Err(ProjError::Transform(message)) => assert!(!message.is_empty()),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(wgs84.last_error().is_some());

        let mut x = [0.0];
        let mut y = [90.0];
        assert!(matches!(
            wgs84.transform_xyz(&mercator, &mut x, &mut y, None, 1, 1),
            Err(ProjError::Transform(_))
        ));
    }

    #[test]
    fn test_not_a_crs() {
        let ellipsoid = r#"ELLIPSOID["WGS 84",6378137,298.257223563]"#;
        match Pj::new(ellipsoid) {
            Err(PjCreateError::NotACrs(definition)) => assert_eq!(definition, ellipsoid),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_geocentric_and_compound_axes() {
        let geocentric = Pj::new("+proj=geocent +datum=WGS84").unwrap();
        assert_eq!(geocentric.axis_codes().unwrap(), "enu");

        let compound = Pj::new("EPSG:4326+5773").unwrap();
        assert_eq!(compound.crs_type(), CrsType::Geographic);
        assert_eq!(
            compound.axis_directions().unwrap(),
            vec![AxisDirection::North, AxisDirection::East, AxisDirection::Up]
        );
        assert_relative_eq!(compound.linear_unit_to_metre(true).unwrap(), 1.0);
    }

    #[test]
    fn test_transform_xyz() {
        let wgs84 = Pj::new(WGS84).unwrap();
        let utm = Pj::new("+proj=utm +zone=32 +datum=WGS84").unwrap();
        let mut x = [9.0, -1.0, 9.0];
        let mut y = [0.0, -1.0, 0.0];
        wgs84.transform_xyz(&utm, &mut x, &mut y, None, 2, 2).unwrap();
        assert_relative_eq!(x[0], 500000.0, epsilon = 1e-6);
        assert_relative_eq!(x[1], -1.0);
        assert_relative_eq!(x[2], 500000.0, epsilon = 1e-6);
        assert_relative_eq!(y[2], 0.0, epsilon = 1e-6);

        assert!(matches!(
            wgs84.transform_xyz(&utm, &mut x, &mut y, None, 3, 2),
            Err(ProjError::OutOfBounds { .. })
        ));
        assert!(matches!(
            wgs84.transform_xyz(&utm, &mut x, &mut y, None, 1, 0),
            Err(ProjError::IllegalStride(0))
        ));
    }
}
