use serde::{Deserialize, Serialize};
use thiserror::Error;

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    #[error("coordinates must be finite numbers")]
    NonFinite,

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checks that the point is a real position on the globe. `haversine_km`
    /// itself accepts anything, so request boundaries call this first.
    pub fn validate(&self) -> Result<(), CoordinateError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }
}

/// Great-circle distance on a spherical Earth (haversine, atan2 form).
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lng = b.longitude.to_radians() - a.longitude.to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    // Rounding can push this past 1.0 near antipodes.
    let haversine =
        (sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng).clamp(0.0, 1.0);
    let central_angle = 2.0 * haversine.sqrt().atan2((1.0 - haversine).sqrt());

    EARTH_RADIUS_KM * central_angle
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use proptest::prelude::*;

    use super::{CoordinateError, GeoPoint, haversine_km};

    fn point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| GeoPoint::new(lat, lng))
    }

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint::new(53.5511, 9.9937);
        let distance = haversine_km(&p, &p);
        assert!(distance < 1e-9);
    }

    #[test]
    fn origin_to_origin_is_zero() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert_eq!(haversine_km(&origin, &origin), 0.0);
    }

    #[test]
    fn quarter_meridian_along_equator() {
        let distance = haversine_km(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(0.0, 90.0));
        assert!((distance - FRAC_PI_2 * 6_371.0).abs() < 1e-6);
        assert!((distance - 10_007.5).abs() < 0.1);
    }

    #[test]
    fn antipodal_points_are_half_circumference_apart() {
        let distance = haversine_km(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(0.0, 180.0));
        assert!((distance - std::f64::consts::PI * 6_371.0).abs() < 1e-6);
    }

    #[test]
    fn exact_antipodes_stay_finite() {
        let a = GeoPoint::new(-15.046584299999992, 169.40258943839996);
        let b = GeoPoint::new(15.046584299999992, -10.597410561600043);
        let distance = haversine_km(&a, &b);
        assert!(distance.is_finite());
        assert!((distance - std::f64::consts::PI * 6_371.0).abs() < 1e-3);
    }

    #[test]
    fn new_york_to_los_angeles() {
        let new_york = GeoPoint::new(40.7128, -74.0060);
        let los_angeles = GeoPoint::new(34.0522, -118.2437);
        let distance = haversine_km(&new_york, &los_angeles);
        assert!((distance - 3_935.75).abs() < 1.0);
    }

    #[test]
    fn london_to_paris_is_around_343_km() {
        let london = GeoPoint::new(51.5074, -0.1278);
        let paris = GeoPoint::new(48.8566, 2.3522);
        let distance = haversine_km(&london, &paris);
        assert!((distance - 343.0).abs() < 5.0);
    }

    #[test]
    fn validate_rejects_out_of_range_and_non_finite() {
        assert_eq!(
            GeoPoint::new(90.5, 0.0).validate(),
            Err(CoordinateError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            GeoPoint::new(0.0, -180.1).validate(),
            Err(CoordinateError::LongitudeOutOfRange(-180.1))
        );
        assert_eq!(
            GeoPoint::new(f64::NAN, 0.0).validate(),
            Err(CoordinateError::NonFinite)
        );
        assert_eq!(
            GeoPoint::new(0.0, f64::INFINITY).validate(),
            Err(CoordinateError::NonFinite)
        );
        assert!(GeoPoint::new(-90.0, 180.0).validate().is_ok());
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(a in point(), b in point()) {
            let forward = haversine_km(&a, &b);
            let backward = haversine_km(&b, &a);
            prop_assert!((forward - backward).abs() < 1e-6);
        }

        #[test]
        fn distance_to_self_is_zero(p in point()) {
            prop_assert!(haversine_km(&p, &p).abs() < 1e-9);
        }

        #[test]
        fn antipodal_distance_is_half_circumference(p in point()) {
            let lng = if p.longitude > 0.0 { p.longitude - 180.0 } else { p.longitude + 180.0 };
            let antipode = GeoPoint::new(-p.latitude, lng);
            let distance = haversine_km(&p, &antipode);
            prop_assert!(distance.is_finite());
            prop_assert!((distance - std::f64::consts::PI * 6_371.0).abs() < 1e-3);
        }

        #[test]
        fn distance_is_non_negative_and_bounded(a in point(), b in point()) {
            let distance = haversine_km(&a, &b);
            prop_assert!(distance >= 0.0);
            prop_assert!(distance <= std::f64::consts::PI * 6_371.0 + 1e-6);
        }
    }
}
