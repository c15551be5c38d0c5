use geo_types::{Coord, CoordFloat, LineString, MultiPoint, Point, Polygon};
use num_traits::{NumCast, ToPrimitive};

use crate::{Pj, ProjError, Transform};

/// Runs every coordinate through one interleaved `Pj::transform` call.
fn transform_coords<'a, T: CoordFloat + 'a>(
    coords: impl Iterator<Item = &'a mut Coord<T>>,
    source: &Pj,
    target: &Pj,
) -> Result<(), ProjError> {
    let coords: Vec<&mut Coord<T>> = coords.collect();
    let mut flat = Vec::with_capacity(coords.len() * 2);
    for coord in &coords {
        flat.push(coord.x.to_f64().ok_or(ProjError::FloatConversion)?);
        flat.push(coord.y.to_f64().ok_or(ProjError::FloatConversion)?);
    }
    source.transform(target, 2, &mut flat, 0, coords.len())?;
    for (coord, xy) in coords.into_iter().zip(flat.chunks_exact(2)) {
        coord.x = <T as NumCast>::from(xy[0]).ok_or(ProjError::FloatConversion)?;
        coord.y = <T as NumCast>::from(xy[1]).ok_or(ProjError::FloatConversion)?;
    }
    Ok(())
}

///```rust
/// # use approx::assert_relative_eq;
/// use projwrap::{Pj, Transform};
/// use geo_types::coord;
///
/// let wgs84 = Pj::new("+proj=longlat +datum=WGS84").unwrap();
/// let utm32 = Pj::new("+proj=utm +zone=32 +datum=WGS84").unwrap();
/// let result = coord! { x: 9.0f64, y: 0.0 }.transformed(&wgs84, &utm32).unwrap();
/// assert_relative_eq!(result.x, 500000.0, epsilon = 1e-6);
/// assert_relative_eq!(result.y, 0.0, epsilon = 1e-6);
/// ```
impl<T: CoordFloat> Transform<T> for Coord<T> {
    type Output = Self;

    fn transform(&mut self, source: &Pj, target: &Pj) -> Result<(), ProjError> {
        transform_coords(std::iter::once(self), source, target)
    }

    fn transformed(&self, source: &Pj, target: &Pj) -> Result<Self::Output, ProjError> {
        let mut output = *self;
        output.transform(source, target)?;
        Ok(output)
    }
}

impl<T: CoordFloat> Transform<T> for Point<T> {
    type Output = Self;

    fn transform(&mut self, source: &Pj, target: &Pj) -> Result<(), ProjError> {
        self.0.transform(source, target)
    }

    fn transformed(&self, source: &Pj, target: &Pj) -> Result<Self::Output, ProjError> {
        Ok(Point(self.0.transformed(source, target)?))
    }
}

impl<T: CoordFloat> Transform<T> for LineString<T> {
    type Output = Self;

    fn transform(&mut self, source: &Pj, target: &Pj) -> Result<(), ProjError> {
        transform_coords(self.0.iter_mut(), source, target)
    }

    fn transformed(&self, source: &Pj, target: &Pj) -> Result<Self::Output, ProjError> {
        let mut output = self.clone();
        output.transform(source, target)?;
        Ok(output)
    }
}

impl<T: CoordFloat> Transform<T> for MultiPoint<T> {
    type Output = Self;

    fn transform(&mut self, source: &Pj, target: &Pj) -> Result<(), ProjError> {
        transform_coords(self.0.iter_mut().map(|point| &mut point.0), source, target)
    }

    fn transformed(&self, source: &Pj, target: &Pj) -> Result<Self::Output, ProjError> {
        let mut output = self.clone();
        output.transform(source, target)?;
        Ok(output)
    }
}

impl<T: CoordFloat> Transform<T> for Polygon<T> {
    type Output = Self;

    fn transform(&mut self, source: &Pj, target: &Pj) -> Result<(), ProjError> {
        let mut result = Ok(());
        self.exterior_mut(|ring| result = ring.transform(source, target));
        if result.is_ok() {
            self.interiors_mut(|rings| {
                result = rings
                    .iter_mut()
                    .try_for_each(|ring| ring.transform(source, target));
            });
        }
        result
    }

    fn transformed(&self, source: &Pj, target: &Pj) -> Result<Self::Output, ProjError> {
        let mut output = self.clone();
        output.transform(source, target)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo_types::{line_string, point, polygon};

    fn wgs84_and_mercator() -> (Pj, Pj) {
        (
            Pj::new("+proj=longlat +datum=WGS84").unwrap(),
            Pj::new("+proj=merc +datum=WGS84").unwrap(),
        )
    }

    #[test]
    fn test_point_f32() {
        let (wgs84, mercator) = wgs84_and_mercator();
        let mut point = point!(x: 10.0f32, y: 0.0f32);
        point.transform(&wgs84, &mercator).unwrap();
        assert_relative_eq!(point.x(), 1113194.9f32, epsilon = 1.0);
        assert_relative_eq!(point.y(), 0.0f32, epsilon = 1e-3);
    }

    #[test]
    fn test_line_string() {
        let (wgs84, mercator) = wgs84_and_mercator();
        let line = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)];
        let projected = line.transformed(&wgs84, &mercator).unwrap();
        assert_relative_eq!(
            projected,
            line_string![(x: 0.0, y: 0.0), (x: 1113194.9079327357, y: 0.0)],
            epsilon = 1e-6
        );
        // original untouched
        assert_relative_eq!(line.0[1].x, 10.0);
    }

    #[test]
    fn test_polygon_round_trip() {
        let (wgs84, mercator) = wgs84_and_mercator();
        let original = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ];
        let mut polygon = original.clone();
        polygon.transform(&wgs84, &mercator).unwrap();
        assert_relative_eq!(polygon.exterior().0[1].x, 1113194.9079327357, epsilon = 1e-6);
        polygon.transform(&mercator, &wgs84).unwrap();
        assert_relative_eq!(polygon, original, epsilon = 1e-9);
    }

    #[test]
    fn test_crs_to_crs() {
        let mut point = point!(x: 9.0f64, y: 0.0f64);
        point
            .transform_crs_to_crs("+proj=longlat +datum=WGS84", "+proj=utm +zone=32 +datum=WGS84")
            .unwrap();
        assert_relative_eq!(point, point!(x: 500000.0, y: 0.0), epsilon = 1e-6);

        let error = point
            .transformed_crs_to_crs("+proj=nosuchprojection", "EPSG:4326")
            .unwrap_err();
        assert!(matches!(error, crate::TransformError::PjCreateError(_)));
    }
}
