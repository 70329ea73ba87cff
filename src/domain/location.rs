use super::{DomainError, DomainResult};

/// A point picked on the map: the human-readable address and, when the map
/// resolved one, its coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPick {
    pub address: String,
    coordinates: Option<(f64, f64)>,
}

impl LocationPick {
    pub fn new(address: impl Into<String>, latitude: f64, longitude: f64) -> DomainResult<Self> {
        validate_coordinates(latitude, longitude)?;
        Ok(Self {
            address: validate_address(address.into())?,
            coordinates: Some((latitude, longitude)),
        })
    }

    pub fn address_only(address: impl Into<String>) -> DomainResult<Self> {
        Ok(Self {
            address: validate_address(address.into())?,
            coordinates: None,
        })
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.coordinates
    }
}

fn validate_address(address: String) -> DomainResult<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField("address".to_string()));
    }
    Ok(trimmed.to_string())
}

fn validate_coordinates(latitude: f64, longitude: f64) -> DomainResult<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(DomainError::InvalidCoordinate(format!(
            "latitude {latitude} is outside [-90, 90]"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(DomainError::InvalidCoordinate(format!(
            "longitude {longitude} is outside [-180, 180]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pick() {
        let pick = LocationPick::new("San Francisco, CA", 37.7749, -122.4194).unwrap();
        assert_eq!(pick.coordinates(), Some((37.7749, -122.4194)));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        assert!(matches!(
            LocationPick::new("nowhere", 91.0, 0.0),
            Err(DomainError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            LocationPick::new("nowhere", 0.0, -180.5),
            Err(DomainError::InvalidCoordinate(_))
        ));
        assert!(LocationPick::new("nowhere", f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_address_only_has_no_coordinates() {
        assert_eq!(LocationPick::address_only("Main St").unwrap().coordinates(), None);
    }

    #[test]
    fn test_blank_address_rejected() {
        assert_eq!(
            LocationPick::address_only("   "),
            Err(DomainError::MissingField("address".to_string()))
        );
        assert!(LocationPick::new("", 1.0, 1.0).is_err());
    }
}
