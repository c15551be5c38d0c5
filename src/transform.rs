use std::{error::Error, fmt, rc};

use crate::{Pj, PjCreateError, ProjError, ThreadContext};

/// Transform a geometry between two CRSs using PROJ.
pub trait Transform<T> {
    type Output;

    /// Transform a geometry from `source` to `target` by mutating it in place.
    ///
    #[cfg_attr(feature = "geo-types", doc = r##"
# Examples

```
use projwrap::{Pj, Transform};
# use approx::assert_relative_eq;

let wgs84 = Pj::new("+proj=longlat +datum=WGS84").unwrap();
let utm32 = Pj::new("+proj=utm +zone=32 +datum=WGS84").unwrap();

let mut point = geo_types::point!(x: 9.0f64, y: 0.0f64);
point.transform(&wgs84, &utm32).unwrap();

assert_relative_eq!(point, geo_types::point!(x: 500000.0, y: 0.0), epsilon = 1e-6);
```
"##)]
    fn transform(&mut self, source: &Pj, target: &Pj) -> Result<(), ProjError>;

    /// Immutable flavor of [`Transform::transform`], which allocates a new geometry.
    ///
    #[cfg_attr(feature = "geo-types", doc = r##"
# Examples

```
use projwrap::{Pj, Transform};
# use approx::assert_relative_eq;

let wgs84 = Pj::new("+proj=longlat +datum=WGS84").unwrap();
let mercator = Pj::new("+proj=merc +datum=WGS84").unwrap();

let point = geo_types::point!(x: 10.0f64, y: 0.0f64);
assert_relative_eq!(
    point.transformed(&wgs84, &mercator).unwrap(),
    geo_types::point!(x: 1113194.9079327357, y: 0.0),
    epsilon = 1e-6
);

// original `point` is untouched
assert_relative_eq!(point, geo_types::point!(x: 10.0, y: 0.0));
```
"##)]
    fn transformed(&self, source: &Pj, target: &Pj) -> Result<Self::Output, ProjError>;

    /// Transform a geometry between two CRS definitions by modifying it in place.
    ///
    /// Both CRSs are created on one fresh thread context.
    fn transform_crs_to_crs(
        &mut self,
        source_crs: &str,
        target_crs: &str,
    ) -> Result<(), TransformError> {
        let (source, target) = crs_pair(source_crs, target_crs)?;
        Ok(self.transform(&source, &target)?)
    }

    /// Immutable flavor of [`Transform::transform_crs_to_crs`], which allocates a new geometry.
    ///
    #[cfg_attr(feature = "geo-types", doc = r##"
# Examples

```
# use approx::assert_relative_eq;
use projwrap::Transform;
use geo_types::{point, Point};

let point: Point<f64> = point!(x: 9.0, y: 0.0);

assert_relative_eq!(
    point
        .transformed_crs_to_crs("+proj=longlat +datum=WGS84", "+proj=utm +zone=32 +datum=WGS84")
        .unwrap(),
    point!(x: 500000.0, y: 0.0),
    epsilon = 1e-6
);
```
"##)]
    fn transformed_crs_to_crs(
        &self,
        source_crs: &str,
        target_crs: &str,
    ) -> Result<Self::Output, TransformError> {
        let (source, target) = crs_pair(source_crs, target_crs)?;
        Ok(self.transformed(&source, &target)?)
    }
}

fn crs_pair(source_crs: &str, target_crs: &str) -> Result<(Pj, Pj), PjCreateError> {
    let ctx = rc::Rc::new(ThreadContext::new());
    let source = Pj::with_context(ctx.clone(), source_crs)?;
    let target = Pj::with_context(ctx, target_crs)?;
    Ok((source, target))
}

#[derive(Debug)]
pub enum TransformError {
    PjCreateError(PjCreateError),
    ProjError(ProjError),
}

impl From<ProjError> for TransformError {
    fn from(e: ProjError) -> Self {
        TransformError::ProjError(e)
    }
}

impl From<PjCreateError> for TransformError {
    fn from(e: PjCreateError) -> Self {
        TransformError::PjCreateError(e)
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::PjCreateError(err) => err.fmt(f),
            TransformError::ProjError(err) => err.fmt(f),
        }
    }
}

impl Error for TransformError {}
