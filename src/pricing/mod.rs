//! Delivery cost estimation.
//!
//! Everything here is a pure function of its inputs. Coordinate validation
//! is the caller's job; see [`GeoPoint::validate`].

use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, haversine_km};

/// Currency units charged per kilometre before modifiers.
pub const BASE_COST_PER_KM: f64 = 72.0;

const BASELINE_FACTOR: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliverySpeed {
    Standard,
    Express,
}

const SIZE_FACTORS: [(PackageSize, f64); 3] = [
    (PackageSize::Small, 1.0),
    (PackageSize::Medium, 1.5),
    (PackageSize::Large, 2.0),
];

const SPEED_FACTORS: [(DeliverySpeed, f64); 2] = [
    (DeliverySpeed::Standard, 1.0),
    (DeliverySpeed::Express, 1.5),
];

fn lookup<K: PartialEq>(table: &[(K, f64)], key: &K) -> f64 {
    table
        .iter()
        .find(|(candidate, _)| candidate == key)
        .map(|(_, factor)| *factor)
        .unwrap_or(BASELINE_FACTOR)
}

impl PackageSize {
    pub fn factor(self) -> f64 {
        lookup(&SIZE_FACTORS, &self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PackageSize::Small => "small",
            PackageSize::Medium => "medium",
            PackageSize::Large => "large",
        }
    }
}

impl DeliverySpeed {
    pub fn factor(self) -> f64 {
        lookup(&SPEED_FACTORS, &self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeliverySpeed::Standard => "standard",
            DeliverySpeed::Express => "express",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryEstimate {
    pub distance_km: f64,
    pub cost: f64,
}

pub fn delivery_cost(distance_km: f64, size: PackageSize, speed: DeliverySpeed) -> f64 {
    BASE_COST_PER_KM * distance_km * size.factor() * speed.factor()
}

pub fn estimate(
    pickup: &GeoPoint,
    delivery: &GeoPoint,
    size: PackageSize,
    speed: DeliverySpeed,
) -> DeliveryEstimate {
    let distance_km = haversine_km(pickup, delivery);

    DeliveryEstimate {
        distance_km,
        cost: delivery_cost(distance_km, size, speed),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{BASE_COST_PER_KM, DeliverySpeed, PackageSize, delivery_cost, estimate};
    use crate::geo::GeoPoint;

    const SIZES: [PackageSize; 3] = [PackageSize::Small, PackageSize::Medium, PackageSize::Large];
    const SPEEDS: [DeliverySpeed; 2] = [DeliverySpeed::Standard, DeliverySpeed::Express];

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn factor_tables() {
        assert_eq!(PackageSize::Small.factor(), 1.0);
        assert_eq!(PackageSize::Medium.factor(), 1.5);
        assert_eq!(PackageSize::Large.factor(), 2.0);
        assert_eq!(DeliverySpeed::Standard.factor(), 1.0);
        assert_eq!(DeliverySpeed::Express.factor(), 1.5);
    }

    #[test]
    fn zero_distance_costs_nothing() {
        for size in SIZES {
            for speed in SPEEDS {
                assert_eq!(delivery_cost(0.0, size, speed), 0.0);
            }
        }
    }

    #[test]
    fn small_standard_is_base_rate() {
        assert_eq!(
            delivery_cost(10.0, PackageSize::Small, DeliverySpeed::Standard),
            10.0 * BASE_COST_PER_KM
        );
    }

    #[test]
    fn new_york_to_los_angeles_medium_standard() {
        let result = estimate(
            &GeoPoint::new(40.7128, -74.0060),
            &GeoPoint::new(34.0522, -118.2437),
            PackageSize::Medium,
            DeliverySpeed::Standard,
        );

        assert!((result.distance_km - 3_935.75).abs() < 1.0);
        assert!(close(result.cost, 72.0 * result.distance_km * 1.5));
        assert!(result.cost > 424_000.0 && result.cost < 426_000.0);
    }

    #[test]
    fn unknown_size_is_rejected_on_deserialize() {
        let parsed = serde_json::from_str::<PackageSize>("\"huge\"");
        assert!(parsed.is_err());
        let parsed = serde_json::from_str::<DeliverySpeed>("\"overnight\"");
        assert!(parsed.is_err());
        assert_eq!(
            serde_json::from_str::<PackageSize>("\"large\"").ok(),
            Some(PackageSize::Large)
        );
    }

    proptest! {
        #[test]
        fn cost_is_monotonic_in_distance(a in 0.0f64..20_000.0, b in 0.0f64..20_000.0) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            for size in SIZES {
                for speed in SPEEDS {
                    let near_cost = delivery_cost(near, size, speed);
                    let far_cost = delivery_cost(far, size, speed);
                    prop_assert!(near_cost <= far_cost);
                    if near > 0.0 && far - near > 1e-9 * far {
                        prop_assert!(near_cost < far_cost);
                    }
                }
            }
        }

        #[test]
        fn size_ratio_is_two_to_one_and_a_half_to_one(d in 0.0f64..20_000.0) {
            for speed in SPEEDS {
                let small = delivery_cost(d, PackageSize::Small, speed);
                let medium = delivery_cost(d, PackageSize::Medium, speed);
                let large = delivery_cost(d, PackageSize::Large, speed);
                prop_assert!(close(large, 2.0 / 1.5 * medium));
                prop_assert!(close(medium, 1.5 * small));
                prop_assert!(small <= medium && medium <= large);
            }
        }

        #[test]
        fn express_is_one_and_a_half_times_standard(d in 0.0f64..20_000.0) {
            for size in SIZES {
                let standard = delivery_cost(d, size, DeliverySpeed::Standard);
                let express = delivery_cost(d, size, DeliverySpeed::Express);
                prop_assert!(close(express, 1.5 * standard));
            }
        }

        #[test]
        fn positive_distance_has_positive_cost(d in 1e-6f64..20_000.0) {
            for size in SIZES {
                for speed in SPEEDS {
                    prop_assert!(delivery_cost(d, size, speed) > 0.0);
                }
            }
        }
    }
}
