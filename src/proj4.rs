use std::io;

use crate::ProjectionData;
use crate::projections::{LatLong, LegacyError, Others, ProjInfo, Projection};

/// The operations of the proj.4 era factory.
pub trait Proj4Factory {
    /// Transforms `point_count` rows of `data`, `point_offset` rows apart, from
    /// the source projection to the target projection.
    fn transform(
        &self,
        data: &mut ProjectionData,
        point_count: usize,
        point_offset: usize,
    ) -> Result<(), LegacyError>;

    fn proj_info(&self) -> Result<ProjInfo, LegacyError>;

    fn src_proj_info(&self) -> Result<ProjInfo, LegacyError>;

    fn dest_proj_info(&self) -> Result<ProjInfo, LegacyError>;
}

/// Picks [`LatLong`] for latitude/longitude definitions, [`Others`] otherwise.
fn projection_for(definition: &str) -> Box<dyn Projection> {
    if definition.contains("latlong") || definition.contains("longlat") {
        Box::new(LatLong::new(definition))
    } else {
        Box::new(Others::new(definition))
    }
}

/// Legacy facade over one projection, or over a source/target pair.
///
/// ```
/// use projwrap::{Proj4, Proj4Factory, ProjectionData};
/// # use approx::assert_relative_eq;
///
/// let proj4 = Proj4::with_source_and_target(
///     "+proj=latlong +datum=WGS84",
///     "+proj=utm +zone=32 +datum=WGS84",
/// );
/// let mut data = ProjectionData::new(&[[9.0, 0.0]], Vec::new()).unwrap();
/// proj4.transform(&mut data, 1, 1).unwrap();
/// assert_relative_eq!(data.x[0], 500000.0, epsilon = 1e-6);
/// ```
pub struct Proj4 {
    projection: Option<Box<dyn Projection>>,
    source: Option<Box<dyn Projection>>,
    target: Option<Box<dyn Projection>>,
}

impl Proj4 {
    pub fn new(definition: &str) -> Self {
        Proj4 {
            projection: Some(projection_for(definition)),
            source: None,
            target: None,
        }
    }

    pub fn with_source_and_target(source: &str, target: &str) -> Self {
        Proj4 {
            projection: None,
            source: Some(projection_for(source)),
            target: Some(projection_for(target)),
        }
    }

    fn projection(&self) -> Result<&dyn Projection, LegacyError> {
        self.projection
            .as_deref()
            .ok_or(LegacyError::MissingProjection("single"))
    }

    fn source(&self) -> Result<&dyn Projection, LegacyError> {
        self.source
            .as_deref()
            .ok_or(LegacyError::MissingProjection("source"))
    }

    fn target(&self) -> Result<&dyn Projection, LegacyError> {
        self.target
            .as_deref()
            .ok_or(LegacyError::MissingProjection("target"))
    }

    pub fn write_proj_info(&self, out: &mut dyn io::Write) -> Result<(), LegacyError> {
        self.projection()?.write_proj_info(out)
    }

    pub fn write_src_proj_info(&self, out: &mut dyn io::Write) -> Result<(), LegacyError> {
        self.source()?.write_proj_info(out)
    }

    pub fn write_dest_proj_info(&self, out: &mut dyn io::Write) -> Result<(), LegacyError> {
        self.target()?.write_proj_info(out)
    }
}

impl Proj4Factory for Proj4 {
    fn transform(
        &self,
        data: &mut ProjectionData,
        point_count: usize,
        point_offset: usize,
    ) -> Result<(), LegacyError> {
        let source = self.source()?;
        let target = self.target()?;
        source.prepare_data(data);
        if let Err(err) = target.do_the_transform(source, data, point_count, point_offset) {
            source.restore_data(data);
            return Err(err);
        }
        target.prepare_transformed_data(data);
        for (row, (x, y)) in data.x.iter().zip(&data.y).enumerate() {
            tracing::debug!(x, y, z = data.z.get(row).copied(), "transformed row {row}");
        }
        Ok(())
    }

    fn proj_info(&self) -> Result<ProjInfo, LegacyError> {
        self.projection()?.map_proj_info()
    }

    fn src_proj_info(&self) -> Result<ProjInfo, LegacyError> {
        self.source()?.map_proj_info()
    }

    fn dest_proj_info(&self) -> Result<ProjInfo, LegacyError> {
        self.target()?.map_proj_info()
    }
}
