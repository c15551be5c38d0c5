use crate::projections::LegacyError;

/// A dataset to reproject, held as parallel coordinate columns.
///
/// `x` and `y` always hold `rows` values. `z` holds either `rows` values or
/// none at all, in which case only the horizontal ordinates are transformed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectionData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub rows: usize,
}

impl ProjectionData {
    /// Splits `(x, y)` pairs into columns and takes `values` as the third one.
    ///
    /// ```
    /// use projwrap::ProjectionData;
    ///
    /// let data = ProjectionData::new(&[[9.0, 45.0], [10.0, 46.0]], vec![100.0, 200.0]).unwrap();
    /// assert_eq!(data.rows, 2);
    /// assert_eq!(data.y, vec![45.0, 46.0]);
    /// ```
    pub fn new(coords: &[[f64; 2]], values: Vec<f64>) -> Result<Self, LegacyError> {
        let rows = coords.len();
        if !values.is_empty() && values.len() != rows {
            return Err(LegacyError::RowMismatch {
                rows,
                values: values.len(),
            });
        }
        let (x, y) = coords.iter().map(|&[x, y]| (x, y)).unzip();
        Ok(ProjectionData {
            x,
            y,
            z: values,
            rows,
        })
    }

    pub fn has_z(&self) -> bool {
        !self.z.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_values() {
        let data = ProjectionData::new(&[[1.0, 2.0]], Vec::new()).unwrap();
        assert_eq!(data.x, vec![1.0]);
        assert_eq!(data.y, vec![2.0]);
        assert!(!data.has_z());
    }

    #[test]
    fn test_value_count_must_match() {
        let result = ProjectionData::new(&[[1.0, 2.0], [3.0, 4.0]], vec![5.0]);
        assert!(matches!(
            result,
            Err(LegacyError::RowMismatch { rows: 2, values: 1 })
        ));
    }
}
