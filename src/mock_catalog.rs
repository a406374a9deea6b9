//! Seeded in-memory catalogs for development and tests.
//!
//! The fleet follows the line's numbering (`TM-101` upwards). Trains 5, 12
//! and 18 sit in maintenance, even-numbered trains are in service and the
//! rest wait in the depot.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::{StaffMember, TrainRecord, TrainStatus};
use crate::traits::{FleetCatalog, StaffCatalog};

/// Average in-service speed used to estimate distance run.
const AVERAGE_SPEED_KMH: f64 = 33.0;

/// Share of depot trains that already ran a morning shift.
const MORNING_SHIFT_SHARE: f64 = 0.70;

const MAINTENANCE_SLOTS: [(usize, &str); 3] = [
    (5, "Aluva Depot"),
    (12, "Muttom Yard"),
    (18, "Pettah Terminal"),
];

#[derive(Debug, Clone)]
pub struct MockFleet {
    trains: Vec<TrainRecord>,
}

impl MockFleet {
    pub fn new(trains: Vec<TrainRecord>) -> Self {
        Self { trains }
    }

    /// Build a fleet of `size` trains.
    ///
    /// `hours_in_service` is the time since service opened; it scales the
    /// distance run by trains currently in service.
    pub fn generate(size: usize, seed: u64, hours_in_service: f64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let trains = (1..=size)
            .map(|number| generate_train(number, hours_in_service, &mut rng))
            .collect();
        Self { trains }
    }
}

fn generate_train(number: usize, hours_in_service: f64, rng: &mut ChaCha8Rng) -> TrainRecord {
    let id = format!("TM-{}", 100 + number);

    if let Some(&(_, depot)) = MAINTENANCE_SLOTS.iter().find(|(slot, _)| *slot == number) {
        return TrainRecord {
            id,
            status: TrainStatus::Maintenance,
            location: Some(depot.to_string()),
            distance_run_today: 0.0,
        };
    }

    if number % 2 == 0 {
        let distance = hours_in_service.max(0.0) * AVERAGE_SPEED_KMH * rng.gen_range(0.85..1.15);
        let station = char::from(b'A' + (number % 5) as u8);
        TrainRecord {
            id,
            status: TrainStatus::InService,
            location: Some(format!("Station {}", station)),
            distance_run_today: round_tenth(distance),
        }
    } else {
        let distance = if rng.gen_bool(MORNING_SHIFT_SHARE) {
            round_tenth(rng.gen_range(100.0..350.0))
        } else {
            0.0
        };
        TrainRecord {
            id,
            status: TrainStatus::Available,
            location: Some("Depot".to_string()),
            distance_run_today: distance,
        }
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl FleetCatalog for MockFleet {
    fn list_trains(&self) -> Vec<TrainRecord> {
        self.trains.clone()
    }
}

#[derive(Debug, Clone)]
pub struct MockStaff {
    pilots: Vec<StaffMember>,
}

impl MockStaff {
    pub fn new(pilots: Vec<StaffMember>) -> Self {
        Self { pilots }
    }

    /// Pilots `S001` to `S<count>`.
    pub fn generate(count: usize) -> Self {
        let pilots = (1..=count)
            .map(|i| StaffMember {
                id: format!("S{:03}", i),
                name: format!("Staff Member {}", i),
            })
            .collect();
        Self { pilots }
    }
}

impl StaffCatalog for MockStaff {
    fn list_pilots(&self) -> Vec<StaffMember> {
        self.pilots.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_layout() {
        let fleet = MockFleet::generate(25, 7, 4.0).list_trains();
        assert_eq!(fleet.len(), 25);
        assert_eq!(fleet[0].id, "TM-101");
        assert_eq!(fleet[24].id, "TM-125");

        let maintenance: Vec<_> = fleet
            .iter()
            .filter(|t| t.status == TrainStatus::Maintenance)
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(maintenance, vec!["TM-105", "TM-112", "TM-118"]);
        assert_eq!(fleet[1].status, TrainStatus::InService);
        assert_eq!(fleet[0].status, TrainStatus::Available);
    }

    #[test]
    fn test_fleet_is_deterministic_per_seed() {
        assert_eq!(
            MockFleet::generate(25, 42, 3.0).list_trains(),
            MockFleet::generate(25, 42, 3.0).list_trains()
        );
    }

    #[test]
    fn test_distances_stay_in_range() {
        for train in MockFleet::generate(25, 3, 2.0).list_trains() {
            match train.status {
                TrainStatus::Maintenance => assert_eq!(train.distance_run_today, 0.0),
                TrainStatus::InService => {
                    assert!(train.distance_run_today >= 2.0 * 33.0 * 0.85 - 0.1);
                    assert!(train.distance_run_today <= 2.0 * 33.0 * 1.15 + 0.1);
                }
                TrainStatus::Available => {
                    let d = train.distance_run_today;
                    assert!(d == 0.0 || (100.0..=350.0).contains(&d), "unexpected distance {}", d);
                }
            }
        }
    }

    #[test]
    fn test_before_service_in_service_trains_have_not_run() {
        let fleet = MockFleet::generate(4, 1, 0.0).list_trains();
        assert_eq!(fleet[1].distance_run_today, 0.0);
    }

    #[test]
    fn test_staff_ids() {
        let staff = MockStaff::generate(12).list_pilots();
        assert_eq!(staff.len(), 12);
        assert_eq!(staff[0].id, "S001");
        assert_eq!(staff[11].name, "Staff Member 12");
    }
}
