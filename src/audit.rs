//! Whole-timetable conflict scan and the log of reviewed conflicts.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ScheduleError};
use crate::model::Trip;
use crate::overlap::Resource;

/// Two active trips holding the same resource at overlapping times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleConflict {
    pub resource: Resource,
    pub resource_id: String,
    pub first_trip: String,
    pub second_trip: String,
    pub description: String,
}

/// Every double-booking among non-cancelled trips, ordered by the position
/// of the earlier trip in `trips`. A pair sharing both a pilot and a train
/// is reported once per resource.
pub fn scan_conflicts(trips: &[Trip]) -> Vec<ScheduleConflict> {
    let active: Vec<_> = trips
        .iter()
        .filter(|trip| !trip.is_cancelled())
        .filter_map(|trip| trip.window().map(|window| (trip, window)))
        .collect();

    active
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, &(first, (start, end)))| {
            active[i + 1..]
                .iter()
                .filter(move |(_, (other_start, other_end))| {
                    start < *other_end && end > *other_start
                })
                .flat_map(move |&(second, _)| shared_resources(first, second))
        })
        .collect()
}

/// Resources held by both trips. Empty ids mean unassigned.
fn shared_resources(first: &Trip, second: &Trip) -> Vec<ScheduleConflict> {
    let mut conflicts = Vec::new();
    let pilot = first.pilot_id.as_deref().filter(|id| !id.is_empty());
    if let Some(pilot_id) = pilot.filter(|id| second.uses_pilot(id)) {
        conflicts.push(conflict(Resource::Pilot, pilot_id, first, second));
    }
    let train = first.train_id.as_deref().filter(|id| !id.is_empty());
    if let Some(train_id) = train.filter(|id| second.uses_train(id)) {
        conflicts.push(conflict(Resource::Train, train_id, first, second));
    }
    conflicts
}

fn conflict(
    resource: Resource,
    resource_id: &str,
    first: &Trip,
    second: &Trip,
) -> ScheduleConflict {
    let kind = match resource {
        Resource::Pilot => "Pilot",
        Resource::Train => "Train",
    };
    ScheduleConflict {
        resource,
        resource_id: resource_id.to_string(),
        first_trip: first.id.clone(),
        second_trip: second.id.clone(),
        description: format!(
            "{} {} is double-booked on {} ({}-{}) and {} ({}-{})",
            kind,
            resource_id,
            first.code,
            first.departure_time,
            first.arrival_time,
            second.code,
            second.departure_time,
            second.arrival_time
        ),
    }
}

/// Review state of a logged conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictStatus {
    Active,
    Resolved,
    /// Accepted as-is by a controller, with a comment.
    Overridden,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictRecord {
    pub id: String,
    #[serde(flatten)]
    pub conflict: ScheduleConflict,
    pub status: ConflictStatus,
    pub override_comment: Option<String>,
}

/// Conflicts found by the last check, with their review state.
#[derive(Debug, Clone, Default)]
pub struct ConflictLog {
    records: Vec<ConflictRecord>,
}

impl ConflictLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ConflictRecord] {
        &self.records
    }

    /// Replace the log with a fresh scan of `trips`. Every record starts active.
    pub fn run_check(&mut self, trips: &[Trip]) -> &[ConflictRecord] {
        self.records = scan_conflicts(trips)
            .into_iter()
            .map(|conflict| ConflictRecord {
                id: Uuid::new_v4().to_string(),
                conflict,
                status: ConflictStatus::Active,
                override_comment: None,
            })
            .collect();
        &self.records
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn resolve(&mut self, id: &str) -> Result<&ConflictRecord> {
        let record = self.find_mut(id)?;
        record.status = ConflictStatus::Resolved;
        Ok(&*record)
    }

    pub fn override_conflict(&mut self, id: &str, comment: &str) -> Result<&ConflictRecord> {
        let record = self.find_mut(id)?;
        record.status = ConflictStatus::Overridden;
        record.override_comment = Some(comment.to_string());
        Ok(&*record)
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut ConflictRecord> {
        self.records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| ScheduleError::ConflictNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TripStatus;

    fn trip(id: &str, pilot: Option<&str>, train: Option<&str>, dep: &str, arr: &str) -> Trip {
        Trip {
            id: id.to_string(),
            code: format!("TR-{}", id),
            route: "Aluva -> Petta".to_string(),
            pilot_id: pilot.map(str::to_string),
            train_id: train.map(str::to_string),
            departure_time: dep.to_string(),
            arrival_time: arr.to_string(),
            frequency: "+10 mins".to_string(),
            status: TripStatus::Scheduled,
            delay_minutes: 0,
            platform: "Platform 1".to_string(),
            cancellation_reason: None,
        }
    }

    #[test]
    fn test_clean_schedule_has_no_conflicts() {
        let trips = vec![
            trip("1", Some("S001"), Some("TM-101"), "08:00", "08:45"),
            trip("2", Some("S001"), Some("TM-101"), "08:45", "09:30"),
        ];
        assert!(scan_conflicts(&trips).is_empty());
    }

    #[test]
    fn test_reports_each_shared_resource() {
        let trips = vec![
            trip("1", Some("S001"), Some("TM-101"), "08:00", "08:45"),
            trip("2", Some("S001"), Some("TM-101"), "08:30", "09:15"),
            trip("3", Some("S002"), Some("TM-102"), "08:30", "09:15"),
        ];
        let conflicts = scan_conflicts(&trips);
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].resource, Resource::Pilot);
        assert_eq!(conflicts[1].resource, Resource::Train);
        assert_eq!(conflicts[0].first_trip, "1");
        assert_eq!(conflicts[0].second_trip, "2");
    }

    #[test]
    fn test_cancelled_trips_are_ignored() {
        let mut cancelled = trip("2", Some("S001"), None, "08:30", "09:15");
        cancelled.status = TripStatus::Cancelled;
        let trips = vec![trip("1", Some("S001"), None, "08:00", "08:45"), cancelled];
        assert!(scan_conflicts(&trips).is_empty());
    }

    #[test]
    fn test_empty_ids_are_not_shared() {
        let trips = vec![
            trip("1", Some(""), Some(""), "08:00", "08:45"),
            trip("2", Some(""), Some(""), "08:30", "09:15"),
        ];
        assert!(scan_conflicts(&trips).is_empty());
    }

    #[test]
    fn test_windows_past_midnight_are_scanned() {
        let trips = vec![
            trip("1", Some("S001"), None, "23:20", "00:05"),
            trip("2", Some("S001"), None, "23:40", "00:25"),
        ];
        let conflicts = scan_conflicts(&trips);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].resource_id, "S001");
    }

    #[test]
    fn test_log_lifecycle() {
        let trips = vec![
            trip("1", Some("S001"), Some("TM-101"), "08:00", "08:45"),
            trip("2", Some("S001"), Some("TM-101"), "08:30", "09:15"),
        ];
        let mut log = ConflictLog::new();
        let ids: Vec<String> = log.run_check(&trips).iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids.len(), 2);
        assert!(log.records().iter().all(|r| r.status == ConflictStatus::Active));

        let resolved = log.resolve(&ids[0]).expect("resolve");
        assert_eq!(resolved.status, ConflictStatus::Resolved);

        let overridden = log
            .override_conflict(&ids[1], "Spare driver on standby")
            .expect("override");
        assert_eq!(overridden.status, ConflictStatus::Overridden);
        assert_eq!(overridden.override_comment.as_deref(), Some("Spare driver on standby"));

        let err = log.resolve("missing").unwrap_err();
        assert!(matches!(err, ScheduleError::ConflictNotFound(id) if id == "missing"));

        // A new check starts over.
        log.run_check(&trips[..1]);
        assert!(log.records().is_empty());
    }
}
