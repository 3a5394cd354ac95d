use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum LocationOperation {
    GetCurrentPosition { high_accuracy: bool },
}

impl Operation for LocationOperation {
    type Output = LocationResult;
}

/// Raw position as reported by the platform. Not validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,

    #[error("unknown location error: {message}")]
    Unknown { message: String },
}

pub type LocationResult = Result<LocationFix, LocationError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Latitude {0} is out of valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is out of valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("Coordinate value is not finite (NaN or Infinity)")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    #[must_use]
    pub const fn lon(self) -> f64 {
        self.lon
    }

    /// Six decimals, the precision responders read back over the phone.
    #[must_use]
    pub fn display_text(self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lon)
    }
}

impl TryFrom<LocationFix> for Coordinates {
    type Error = CoordinateError;

    fn try_from(fix: LocationFix) -> Result<Self, Self::Error> {
        Self::new(fix.latitude, fix.longitude)
    }
}

/// Device geolocation. One request per call; no retries.
pub struct Location<Ev> {
    context: CapabilityContext<LocationOperation, Ev>,
}

impl<Ev> Capability<Ev> for Location<Ev> {
    type Operation = LocationOperation;
    type MappedSelf<MappedEv> = Location<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Location::new(self.context.map_event(f))
    }
}

impl<Ev> Location<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<LocationOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn get_current_position<F>(&self, high_accuracy: bool, make_event: F)
    where
        F: FnOnce(LocationResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(LocationOperation::GetCurrentPosition { high_accuracy })
                .await;
            context.update_app(make_event(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_accept_valid_range() {
        assert!(Coordinates::new(0.0, 0.0).is_ok());
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn coordinates_reject_out_of_range() {
        assert!(matches!(
            Coordinates::new(91.0, 0.0),
            Err(CoordinateError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            Coordinates::new(0.0, -181.0),
            Err(CoordinateError::LongitudeOutOfRange(_))
        ));
    }

    #[test]
    fn coordinates_reject_non_finite() {
        assert_eq!(Coordinates::new(f64::NAN, 0.0), Err(CoordinateError::NonFinite));
        assert_eq!(
            Coordinates::new(0.0, f64::INFINITY),
            Err(CoordinateError::NonFinite)
        );
    }

    #[test]
    fn display_text_uses_six_decimals() {
        let c = Coordinates::new(40.712_776, -74.005_975).unwrap();
        assert_eq!(c.display_text(), "40.712776, -74.005975");

        let c = Coordinates::new(1.5, 2.0).unwrap();
        assert_eq!(c.display_text(), "1.500000, 2.000000");
    }

    #[test]
    fn fix_converts_to_coordinates() {
        let fix = LocationFix {
            latitude: 51.5074,
            longitude: -0.1278,
            accuracy_m: Some(12.0),
        };
        let c = Coordinates::try_from(fix).unwrap();
        assert_eq!(c.lat(), 51.5074);
        assert_eq!(c.lon(), -0.1278);
    }

    #[test]
    fn location_result_serialization() {
        let result: LocationResult = Err(LocationError::Unknown {
            message: "gps off".into(),
        });
        let json = serde_json::to_string(&result).unwrap();
        let back: LocationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
