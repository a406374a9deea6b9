//! The trip store: single owner of the day's timetable.
//!
//! Every write goes through the overlap checker first and is rejected
//! without touching the store when it would double-book a pilot or train.

use tracing::{info, warn};

use crate::clock;
use crate::error::{Result, ScheduleError};
use crate::generator::{GeneratorOptions, generate_daily_schedule};
use crate::model::{StaffMember, TrainRecord, Trip, TripStatus, TripUpdate};
use crate::overlap::{OverlapQuery, ResourceConflict, check_overlap};

#[derive(Debug, Clone, Default)]
pub struct TripStore {
    trips: Vec<Trip>,
}

impl TripStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trips in departure order.
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Trip> {
        self.trips.iter().find(|trip| trip.id == id)
    }

    pub fn check_overlap(&self, query: OverlapQuery<'_>) -> Option<ResourceConflict> {
        check_overlap(&self.trips, query)
    }

    /// Populate an empty store with a generated day. Returns the number of
    /// trips created, which is zero when the store already holds trips.
    pub fn generate_daily_schedule(
        &mut self,
        pilots: &[StaffMember],
        trains: &[TrainRecord],
        options: &GeneratorOptions,
    ) -> usize {
        if !self.trips.is_empty() {
            return 0;
        }
        self.trips = generate_daily_schedule(pilots, trains, options);
        self.trips.len()
    }

    /// Drop every trip and generate a fresh day.
    pub fn reset(
        &mut self,
        pilots: &[StaffMember],
        trains: &[TrainRecord],
        options: &GeneratorOptions,
    ) -> usize {
        info!(discarded = self.trips.len(), "Resetting schedule");
        self.trips.clear();
        self.generate_daily_schedule(pilots, trains, options)
    }

    /// Insert a caller-built trip, keeping departure order.
    pub fn add_trip(&mut self, trip: Trip) -> Result<&Trip> {
        if self.get(&trip.id).is_some() {
            return Err(ScheduleError::DuplicateTrip(trip.id));
        }

        let query = OverlapQuery {
            trip_id: &trip.id,
            pilot_id: trip.pilot_id.as_deref(),
            train_id: trip.train_id.as_deref(),
            departure: &trip.departure_time,
            arrival: &trip.arrival_time,
        };
        if let Some(conflict) = self.check_overlap(query) {
            warn!(trip = %trip.code, %conflict, "Rejected new trip");
            return Err(conflict.into());
        }

        let id = trip.id.clone();
        self.trips.push(trip);
        self.sort_by_departure();
        self.find(&id)
    }

    /// Apply a partial update to one trip.
    ///
    /// The overlap check runs against the merged pilot, train and departure
    /// before anything is written. The arrival time is kept as stored even
    /// when the departure moves.
    pub fn update_trip(&mut self, id: &str, update: TripUpdate) -> Result<&Trip> {
        let index = self
            .trips
            .iter()
            .position(|trip| trip.id == id)
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))?;

        let current = &self.trips[index];
        let query = OverlapQuery {
            trip_id: &current.id,
            pilot_id: provided(&update.pilot_id).or(current.pilot_id.as_deref()),
            train_id: provided(&update.train_id).or(current.train_id.as_deref()),
            departure: provided(&update.departure_time).unwrap_or(&current.departure_time),
            arrival: &current.arrival_time,
        };
        if let Some(conflict) = check_overlap(&self.trips, query) {
            warn!(trip = %current.code, %conflict, "Rejected trip update");
            return Err(conflict.into());
        }

        let trip = &mut self.trips[index];
        let departure_moved = apply_update(trip, update);
        if departure_moved {
            self.sort_by_departure();
        }
        self.find(id)
    }

    fn find(&self, id: &str) -> Result<&Trip> {
        self.get(id).ok_or_else(|| ScheduleError::NotFound(id.to_string()))
    }

    /// Stable sort on the parsed departure. Unparseable departures go last.
    fn sort_by_departure(&mut self) {
        self.trips.sort_by_key(|trip| {
            let departure = clock::parse(&trip.departure_time);
            (departure.is_none(), departure)
        });
    }
}

fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Write the update into `trip`. Returns whether the departure changed.
fn apply_update(trip: &mut Trip, update: TripUpdate) -> bool {
    let mut departure_moved = false;
    if let Some(departure) = update.departure_time.filter(|value| !value.is_empty()) {
        departure_moved = departure != trip.departure_time;
        trip.departure_time = departure;
    }

    if let Some(delay) = update.delay_minutes {
        trip.delay_minutes = delay;
        if delay > 0 && trip.status == TripStatus::Scheduled {
            trip.status = TripStatus::Delayed;
        } else if delay == 0 && trip.status == TripStatus::Delayed {
            trip.status = TripStatus::Scheduled;
        }
    }

    // An explicit status wins over the delay-driven transition.
    if let Some(status) = update.status.filter(|status| !status.as_str().is_empty()) {
        trip.status = status;
    }
    if let Some(pilot_id) = update.pilot_id.filter(|value| !value.is_empty()) {
        trip.pilot_id = Some(pilot_id);
    }
    if let Some(train_id) = update.train_id.filter(|value| !value.is_empty()) {
        trip.train_id = Some(train_id);
    }
    if let Some(platform) = update.platform.filter(|value| !value.is_empty()) {
        trip.platform = platform;
    }
    if let Some(reason) = update.cancellation_reason.filter(|value| !value.is_empty()) {
        trip.cancellation_reason = Some(reason);
    }

    departure_moved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(id: &str, pilot: &str, train: &str, dep: &str, arr: &str) -> Trip {
        Trip {
            id: id.to_string(),
            code: format!("TR-{}", id),
            route: "Aluva -> Petta".to_string(),
            pilot_id: Some(pilot.to_string()),
            train_id: Some(train.to_string()),
            departure_time: dep.to_string(),
            arrival_time: arr.to_string(),
            frequency: "+10 mins".to_string(),
            status: TripStatus::Scheduled,
            delay_minutes: 0,
            platform: "Platform 1".to_string(),
            cancellation_reason: None,
        }
    }

    fn seeded() -> TripStore {
        let mut store = TripStore::new();
        store.add_trip(trip("a", "S001", "TM-101", "08:00", "08:45")).expect("add a");
        store.add_trip(trip("b", "S002", "TM-102", "09:00", "09:45")).expect("add b");
        store
    }

    #[test]
    fn test_add_keeps_departure_order() {
        let mut store = seeded();
        store.add_trip(trip("c", "S003", "TM-103", "07:00", "07:45")).expect("add c");
        let order: Vec<_> = store.trips().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut store = seeded();
        let err = store.add_trip(trip("a", "S009", "TM-109", "12:00", "12:45")).unwrap_err();
        assert!(matches!(err, ScheduleError::DuplicateTrip(_)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_not_found() {
        let mut store = seeded();
        let err = store.update_trip("missing", TripUpdate::default()).unwrap_err();
        assert!(matches!(err, ScheduleError::NotFound(_)));
    }

    #[test]
    fn test_update_conflict_leaves_trip_untouched() {
        let mut store = seeded();
        let before = store.get("b").cloned();
        let update = TripUpdate {
            pilot_id: Some("S001".to_string()),
            departure_time: Some("08:30".to_string()),
            delay_minutes: Some(5),
            ..TripUpdate::default()
        };
        let err = store.update_trip("b", update).unwrap_err();
        assert!(matches!(err, ScheduleError::Conflict(_)));
        assert_eq!(store.get("b").cloned(), before);
    }

    #[test]
    fn test_update_keeps_arrival_when_departure_moves() {
        let mut store = seeded();
        let update = TripUpdate {
            departure_time: Some("07:30".to_string()),
            ..TripUpdate::default()
        };
        let trip = store.update_trip("b", update).expect("update");
        assert_eq!(trip.departure_time, "07:30");
        assert_eq!(trip.arrival_time, "09:45");
        assert_eq!(store.trips()[0].id, "b");
    }

    #[test]
    fn test_explicit_status_overrides_delay_transition() {
        let mut store = seeded();
        let update = TripUpdate {
            delay_minutes: Some(10),
            status: Some(TripStatus::Cancelled),
            cancellation_reason: Some("Power block".to_string()),
            ..TripUpdate::default()
        };
        let trip = store.update_trip("a", update).expect("update");
        assert_eq!(trip.status, TripStatus::Cancelled);
        assert_eq!(trip.delay_minutes, 10);
        assert_eq!(trip.cancellation_reason.as_deref(), Some("Power block"));
    }

    #[test]
    fn test_delay_does_not_touch_other_statuses() {
        let mut store = seeded();
        let hold = TripUpdate {
            status: Some(TripStatus::from("Held")),
            ..TripUpdate::default()
        };
        store.update_trip("a", hold).expect("hold");
        let delay = TripUpdate {
            delay_minutes: Some(4),
            ..TripUpdate::default()
        };
        let trip = store.update_trip("a", delay).expect("delay");
        assert_eq!(trip.status, TripStatus::Other("Held".to_string()));
    }

    #[test]
    fn test_generate_only_fills_empty_store() {
        let pilots = vec![StaffMember {
            id: "S001".to_string(),
            name: "Staff Member 1".to_string(),
        }];
        let mut store = seeded();
        assert_eq!(store.generate_daily_schedule(&pilots, &[], &GeneratorOptions::default()), 0);
        assert_eq!(store.len(), 2);

        let created = store.reset(&pilots, &[], &GeneratorOptions::default());
        assert_eq!(created, 76);
        assert_eq!(store.len(), 76);
    }

    #[test]
    fn test_order_follows_parsed_departure() {
        let mut store = TripStore::new();
        store.add_trip(trip("a", "S001", "TM-101", "10:00", "10:45")).expect("add a");
        store.add_trip(trip("b", "S002", "TM-102", "9:00", "9:45")).expect("add b");
        store.add_trip(trip("c", "S003", "TM-103", "soon", "later")).expect("add c");
        store.add_trip(trip("d", "S004", "TM-104", "08:15", "09:00")).expect("add d");
        let order: Vec<_> = store.trips().iter().map(|t| t.departure_time.as_str()).collect();
        assert_eq!(order, vec!["08:15", "9:00", "10:00", "soon"]);
    }

    #[test]
    fn test_overlap_past_midnight_is_rejected() {
        let mut store = TripStore::new();
        store.add_trip(trip("a", "S001", "TM-101", "23:30", "00:15")).expect("add a");
        let err = store.add_trip(trip("b", "S001", "TM-102", "23:45", "00:30")).unwrap_err();
        assert!(matches!(err, ScheduleError::Conflict(_)));
        assert_eq!(store.len(), 1);
    }
}
