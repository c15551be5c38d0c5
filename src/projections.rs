//! The proj.4-era convenience layer: a projection is a definition string plus
//! the pre and post processing its coordinates need around a transform.
//!
//! Prefer [`Pj`](crate::Pj) in new code. This layer works in radians for
//! geographic CRSs, the way `pj_transform` did.

use std::f64::consts::PI;
use std::{io, rc};

use thiserror::Error;

use crate::{CrsType, Pj, PjCreateError, ProjError, ProjectionData, ThreadContext};

pub const DEGREE_TO_RADIAN: f64 = PI / 180.0;
pub const RADIAN_TO_DEGREE: f64 = 180.0 / PI;

const RULE: &str = "******************************************************";

#[derive(Error, Debug)]
pub enum LegacyError {
    #[error(transparent)]
    Create(#[from] PjCreateError),
    #[error(transparent)]
    Proj(#[from] ProjError),
    #[error("PROJ can not express {0} as a PROJ.4 string")]
    NoProjString(String),
    #[error("This Proj4 has no {0} projection")]
    MissingProjection(&'static str),
    #[error("{values} values given for {rows} coordinate rows")]
    RowMismatch { rows: usize, values: usize },
    #[error("Failed to write projection info: {0}")]
    Io(#[from] io::Error),
}

/// Projection parameters and ellipsoid properties, in insertion order.
///
/// Inserting an existing key replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjInfo {
    entries: Vec<(String, String)>,
}

impl ProjInfo {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Splits a `+key=value +flag` string into pairs. Bare flags get an empty
/// value, except `no_defs` which reads `defined`.
pub fn parse_proj_parameters(definition: &str) -> ProjInfo {
    let mut info = ProjInfo::default();
    for token in definition.split('+').skip(1) {
        let mut parts = token.split('=');
        let key = parts.next().unwrap_or_default().trim();
        match parts.next() {
            Some(value) => info.insert(key, value.trim()),
            None if key == "no_defs" => info.insert(key, "defined"),
            None => info.insert(key, ""),
        }
    }
    info
}

/// Splits a `key: value;key: value;` string into pairs.
fn parse_ellipsoid_info(ellipsoid: &str, into: &mut ProjInfo) {
    for field in ellipsoid.split(';').filter(|f| !f.trim().is_empty()) {
        let mut parts = field.splitn(2, ':');
        let key = parts.next().unwrap_or_default().trim();
        let value = parts.next().unwrap_or_default().trim();
        into.insert(key, value);
    }
}

/// The PROJ.4 string PROJ exports for `definition`, without the `+type=crs`
/// marker proj.4 never wrote.
pub fn proj_info(definition: &str) -> Result<String, LegacyError> {
    let exported = Pj::new(definition)?
        .definition()
        .ok_or_else(|| LegacyError::NoProjString(definition.to_string()))?;
    Ok(exported
        .split_whitespace()
        .filter(|token| *token != "+type=crs")
        .collect::<Vec<_>>()
        .join(" "))
}

/// The proj.4 `PJ` ellipsoid and projection fields of `definition`, as
/// `name: not available;a: …;e: …;` with six decimals per value.
pub fn ellipsoid_info(definition: &str) -> Result<String, LegacyError> {
    let pj = Pj::new(definition)?;
    let exported = pj
        .definition()
        .ok_or_else(|| LegacyError::NoProjString(definition.to_string()))?;
    let params = parse_proj_parameters(&exported);
    let number = |key: &str| params.get(key).and_then(|v| v.parse::<f64>().ok());

    let a = pj.semi_major_axis()?;
    let es = pj.eccentricity_squared()?;
    let to_meter = pj.linear_unit_to_metre(false)?;
    let one_es = 1.0 - es;

    let mut lam0 = number("lon_0").unwrap_or(0.0);
    let mut k0 = number("k_0").or_else(|| number("k")).unwrap_or(1.0);
    let mut x0 = number("x_0").unwrap_or(0.0);
    let mut y0 = number("y_0").unwrap_or(0.0);
    // UTM derives its parameters from the zone.
    if params.get("proj") == Some("utm") {
        if let Some(zone) = number("zone") {
            lam0 = (zone - 1.0) * 6.0 - 180.0 + 3.0;
        }
        k0 = 0.9996;
        x0 = 500000.0;
        y0 = if params.get("south").is_some() { 10000000.0 } else { 0.0 };
    }
    let phi0 = number("lat_0").unwrap_or(0.0);

    let fields = [
        ("a", a),
        ("e", es.sqrt()),
        ("es", es),
        ("ra", 1.0 / a),
        ("one_es", one_es),
        ("rone_es", 1.0 / one_es),
        ("lam0", lam0 * DEGREE_TO_RADIAN),
        ("phi0", phi0 * DEGREE_TO_RADIAN),
        ("x0", x0),
        ("y0", y0),
        ("k0", k0),
        ("to_meter", to_meter),
        ("fr_meter", 1.0 / to_meter),
    ];
    let mut info = String::from("name: not available;");
    for (name, value) in fields {
        info.push_str(&format!("{name}: {value:.6};"));
    }
    Ok(info)
}

/// Multiplies the horizontal ordinates of the points `transform_arrays` touches.
fn scale_points(data: &mut ProjectionData, point_count: usize, point_offset: usize, factor: f64) {
    for index in (0..point_count).map(|i| i * point_offset) {
        data.x[index] *= factor;
        data.y[index] *= factor;
    }
}

/// Transforms `point_count` rows of `data`, `point_offset` rows apart, from
/// `source` to `target`. Geographic coordinates are read and written in radians.
pub fn transform_arrays(
    source: &str,
    target: &str,
    data: &mut ProjectionData,
    point_count: usize,
    point_offset: usize,
) -> Result<(), LegacyError> {
    if point_offset == 0 {
        return Err(ProjError::IllegalStride(point_offset).into());
    }
    let len = data.x.len().min(data.y.len());
    let len = if data.has_z() { len.min(data.z.len()) } else { len };
    let last = point_count.checked_sub(1).map(|n| n.checked_mul(point_offset));
    if let Some(last) = last {
        if last.is_none_or(|last| last >= len) {
            return Err(ProjError::OutOfBounds {
                offset: 0,
                num_pts: point_count,
                len,
            }
            .into());
        }
    }

    let ctx = rc::Rc::new(ThreadContext::new());
    let source = Pj::with_context(ctx.clone(), source)?;
    let target = Pj::with_context(ctx, target)?;

    if source.crs_type() == CrsType::Geographic {
        scale_points(data, point_count, point_offset, RADIAN_TO_DEGREE);
    }
    let z = if data.has_z() {
        Some(data.z.as_mut_slice())
    } else {
        None
    };
    let result = source.transform_xyz(
        &target,
        &mut data.x,
        &mut data.y,
        z,
        point_count,
        point_offset,
    );
    if target.crs_type() == CrsType::Geographic {
        scale_points(data, point_count, point_offset, DEGREE_TO_RADIAN);
    }
    Ok(result?)
}

/// Converts every `(la, lo)` pair from degrees to radians.
pub fn degree_to_radian(la: &mut [f64], lo: &mut [f64]) {
    for (la, lo) in la.iter_mut().zip(lo.iter_mut()) {
        *la *= DEGREE_TO_RADIAN;
        *lo *= DEGREE_TO_RADIAN;
    }
}

/// Converts every `(la, lo)` pair from radians to degrees.
pub fn radian_to_degree(la: &mut [f64], lo: &mut [f64]) {
    for (la, lo) in la.iter_mut().zip(lo.iter_mut()) {
        *la *= RADIAN_TO_DEGREE;
        *lo *= RADIAN_TO_DEGREE;
    }
}

/// A projection definition together with the coordinate preparation it needs.
pub trait Projection {
    fn definition(&self) -> &str;

    /// Prepares coordinates given in user units before they are transformed.
    fn prepare_data(&self, data: &mut ProjectionData);

    /// Brings transformed coordinates back to user units.
    fn prepare_transformed_data(&self, data: &mut ProjectionData);

    /// Undoes [`Projection::prepare_data`] when the transform did not happen.
    fn restore_data(&self, data: &mut ProjectionData);

    fn proj_info(&self) -> Result<String, LegacyError> {
        proj_info(self.definition())
    }

    fn ellipsoid_info(&self) -> Result<String, LegacyError> {
        ellipsoid_info(self.definition())
    }

    /// Projection parameters followed by the ellipsoid fields.
    fn map_proj_info(&self) -> Result<ProjInfo, LegacyError> {
        let mut info = parse_proj_parameters(&self.proj_info()?);
        parse_ellipsoid_info(&self.ellipsoid_info()?, &mut info);
        Ok(info)
    }

    /// Writes a framed, human-readable report of the projection and ellipsoid.
    fn write_proj_info(&self, out: &mut dyn io::Write) -> Result<(), LegacyError> {
        let proj_info = self.proj_info()?;
        let ellipsoid_info = self.ellipsoid_info()?;
        writeln!(out)?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "* PROJECTION INFO:")?;
        writeln!(out, "*")?;
        for parameter in proj_info.split('+').skip(1) {
            writeln!(out, "*         +{}", parameter.trim())?;
        }
        writeln!(out, "*")?;
        writeln!(out, "* ELLIPSOID INFO:")?;
        writeln!(out, "*")?;
        for field in ellipsoid_info.split(';').filter(|f| !f.is_empty()) {
            writeln!(out, "*         {}", field.trim())?;
        }
        writeln!(out, "{RULE}")?;
        writeln!(out)?;
        Ok(())
    }

    /// Transforms `data` from `source` into this projection.
    fn do_the_transform(
        &self,
        source: &dyn Projection,
        data: &mut ProjectionData,
        point_count: usize,
        point_offset: usize,
    ) -> Result<(), LegacyError> {
        transform_arrays(
            source.definition(),
            self.definition(),
            data,
            point_count,
            point_offset,
        )
    }
}

/// A latitude/longitude projection: coordinates are exchanged in degrees.
#[derive(Clone, Debug)]
pub struct LatLong {
    definition: String,
}

impl LatLong {
    pub fn new(definition: impl Into<String>) -> Self {
        LatLong {
            definition: definition.into(),
        }
    }
}

impl Projection for LatLong {
    fn definition(&self) -> &str {
        &self.definition
    }

    fn prepare_data(&self, data: &mut ProjectionData) {
        degree_to_radian(&mut data.x, &mut data.y);
    }

    fn prepare_transformed_data(&self, data: &mut ProjectionData) {
        radian_to_degree(&mut data.x, &mut data.y);
    }

    fn restore_data(&self, data: &mut ProjectionData) {
        radian_to_degree(&mut data.x, &mut data.y);
    }
}

/// Any other projection: coordinates need no preparation.
#[derive(Clone, Debug)]
pub struct Others {
    definition: String,
}

impl Others {
    pub fn new(definition: impl Into<String>) -> Self {
        Others {
            definition: definition.into(),
        }
    }
}

impl Projection for Others {
    fn definition(&self) -> &str {
        &self.definition
    }

    fn prepare_data(&self, _data: &mut ProjectionData) {}

    fn prepare_transformed_data(&self, _data: &mut ProjectionData) {}

    fn restore_data(&self, _data: &mut ProjectionData) {}
}
