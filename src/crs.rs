use std::fmt;

/// Coarse classification of a CRS, as the proj.4 API reported it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrsType {
    /// Longitude and latitude on an ellipsoid, in degrees.
    Geographic,
    /// Earth-centred cartesian X/Y/Z.
    Geocentric,
    /// Anything else: map projections, engineering and vertical CRSs.
    Projected,
}

impl CrsType {
    pub(crate) fn from_raw(raw: proj_sys::PJ_TYPE) -> Self {
        match raw {
            proj_sys::PJ_TYPE_PJ_TYPE_GEOGRAPHIC_CRS
            | proj_sys::PJ_TYPE_PJ_TYPE_GEOGRAPHIC_2D_CRS
            | proj_sys::PJ_TYPE_PJ_TYPE_GEOGRAPHIC_3D_CRS => CrsType::Geographic,
            proj_sys::PJ_TYPE_PJ_TYPE_GEOCENTRIC_CRS => CrsType::Geocentric,
            _ => CrsType::Projected,
        }
    }
}

impl fmt::Display for CrsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrsType::Geographic => "GEOGRAPHIC",
            CrsType::Geocentric => "GEOCENTRIC",
            CrsType::Projected => "PROJECTED",
        };
        f.write_str(name)
    }
}

/// Direction of one coordinate system axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    East,
    West,
    North,
    South,
    Up,
    Down,
    Other,
}

impl AxisDirection {
    /// Parses the direction names used by PROJ's coordinate system API.
    pub(crate) fn from_proj_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "east" | "geocentricx" => AxisDirection::East,
            "west" => AxisDirection::West,
            "north" | "geocentricy" => AxisDirection::North,
            "south" => AxisDirection::South,
            "up" | "geocentricz" => AxisDirection::Up,
            "down" => AxisDirection::Down,
            _ => AxisDirection::Other,
        }
    }

    /// The one-letter code of the proj.4 `+axis` parameter.
    pub fn code(self) -> char {
        match self {
            AxisDirection::East => 'e',
            AxisDirection::West => 'w',
            AxisDirection::North => 'n',
            AxisDirection::South => 's',
            AxisDirection::Up => 'u',
            AxisDirection::Down => 'd',
            AxisDirection::Other => '?',
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, AxisDirection::Up | AxisDirection::Down)
    }
}

impl fmt::Display for AxisDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_names() {
        assert_eq!(AxisDirection::from_proj_name("East"), AxisDirection::East);
        assert_eq!(AxisDirection::from_proj_name("north"), AxisDirection::North);
        assert_eq!(AxisDirection::from_proj_name("geocentricZ"), AxisDirection::Up);
        assert_eq!(AxisDirection::from_proj_name("futurePast"), AxisDirection::Other);
    }

    #[test]
    fn test_codes() {
        let codes: String = [
            AxisDirection::East,
            AxisDirection::North,
            AxisDirection::Up,
        ]
        .iter()
        .map(|d| d.code())
        .collect();
        assert_eq!(codes, "enu");
        assert!(AxisDirection::Down.is_vertical());
        assert!(!AxisDirection::West.is_vertical());
    }

    #[test]
    fn test_type_display() {
        assert_eq!(CrsType::Geographic.to_string(), "GEOGRAPHIC");
        assert_eq!(CrsType::Projected.to_string(), "PROJECTED");
    }
}
