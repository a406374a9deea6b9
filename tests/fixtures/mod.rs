//! Test fixtures for metro-ops.
//!
//! Builders for trips plus fixed staff and fleet catalogs.

#![allow(dead_code)]

use metro_ops::mock_catalog::{MockFleet, MockStaff};
use metro_ops::model::{StaffMember, TrainRecord, TrainStatus, Trip, TripStatus};

/// Builder for test trips with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestTrip {
    trip: Trip,
}

impl TestTrip {
    pub fn new(id: &str) -> Self {
        Self {
            trip: Trip {
                id: id.to_string(),
                code: format!("TR-{}", id),
                route: "Aluva -> Petta".to_string(),
                pilot_id: None,
                train_id: None,
                departure_time: "12:00".to_string(),
                arrival_time: "12:45".to_string(),
                frequency: "+15 mins".to_string(),
                status: TripStatus::Scheduled,
                delay_minutes: 0,
                platform: "Platform 1".to_string(),
                cancellation_reason: None,
            },
        }
    }

    pub fn window(mut self, departure: &str, arrival: &str) -> Self {
        self.trip.departure_time = departure.to_string();
        self.trip.arrival_time = arrival.to_string();
        self
    }

    pub fn pilot(mut self, pilot_id: &str) -> Self {
        self.trip.pilot_id = Some(pilot_id.to_string());
        self
    }

    pub fn train(mut self, train_id: &str) -> Self {
        self.trip.train_id = Some(train_id.to_string());
        self
    }

    pub fn status(mut self, status: TripStatus) -> Self {
        self.trip.status = status;
        self
    }

    pub fn build(self) -> Trip {
        self.trip
    }
}

pub fn train(id: &str, status: TrainStatus, distance: f64) -> TrainRecord {
    TrainRecord {
        id: id.to_string(),
        status,
        location: None,
        distance_run_today: distance,
    }
}

pub fn pilots(count: usize) -> Vec<StaffMember> {
    (1..=count)
        .map(|i| StaffMember {
            id: format!("S{:03}", i),
            name: format!("Staff Member {}", i),
        })
        .collect()
}

/// Eight trains: two in maintenance, the rest available with rising mileage.
pub fn depot_fleet() -> Vec<TrainRecord> {
    vec![
        train("TM-101", TrainStatus::Available, 0.0),
        train("TM-102", TrainStatus::Available, 40.0),
        train("TM-103", TrainStatus::InService, 80.0),
        train("TM-104", TrainStatus::Available, 120.0),
        train("TM-105", TrainStatus::Maintenance, 0.0),
        train("TM-106", TrainStatus::Available, 160.0),
        train("TM-107", TrainStatus::InService, 200.0),
        train("TM-108", TrainStatus::Maintenance, 0.0),
    ]
}

pub fn staff_catalog(count: usize) -> MockStaff {
    MockStaff::new(pilots(count))
}

pub fn fleet_catalog() -> MockFleet {
    MockFleet::new(depot_fleet())
}
