//! Resource double-booking checks.
//!
//! Windows are half-open: `[s1, e1)` and `[s2, e2)` overlap iff
//! `s1 < e2 && e1 > s2`. An arrival before its departure runs past
//! midnight. Times that fail to parse never conflict.

use std::fmt;

use serde::Serialize;

use crate::clock;
use crate::model::Trip;

/// Which kind of resource is double-booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Resource {
    Pilot,
    Train,
}

/// An existing trip that already holds the requested resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceConflict {
    pub resource: Resource,
    pub resource_id: String,
    pub trip_id: String,
    pub trip_code: String,
    pub departure_time: String,
    pub arrival_time: String,
}

impl ResourceConflict {
    fn against(resource: Resource, resource_id: &str, trip: &Trip) -> Self {
        Self {
            resource,
            resource_id: resource_id.to_string(),
            trip_id: trip.id.clone(),
            trip_code: trip.code.clone(),
            departure_time: trip.departure_time.clone(),
            arrival_time: trip.arrival_time.clone(),
        }
    }
}

impl fmt::Display for ResourceConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.resource {
            Resource::Pilot => "Pilot",
            Resource::Train => "Train",
        };
        write!(
            f,
            "{} {} is already assigned to {} ({}-{})",
            kind, self.resource_id, self.trip_code, self.departure_time, self.arrival_time
        )
    }
}

impl std::error::Error for ResourceConflict {}

/// A proposed booking to test against the existing trips.
#[derive(Debug, Clone, Copy)]
pub struct OverlapQuery<'a> {
    /// Trip being placed; it never conflicts with itself.
    pub trip_id: &'a str,
    pub pilot_id: Option<&'a str>,
    pub train_id: Option<&'a str>,
    pub departure: &'a str,
    pub arrival: &'a str,
}

/// Find the first active trip that already holds the query's pilot or train
/// during an overlapping window.
///
/// Trips are scanned in slice order and the first hit wins. A pilot clash is
/// reported ahead of a train clash on the same trip.
pub fn check_overlap(trips: &[Trip], query: OverlapQuery<'_>) -> Option<ResourceConflict> {
    let Some((start, end)) = clock::window(query.departure, query.arrival) else {
        return None;
    };

    let pilot_id = query.pilot_id.filter(|id| !id.is_empty());
    let train_id = query.train_id.filter(|id| !id.is_empty());
    if pilot_id.is_none() && train_id.is_none() {
        return None;
    }

    for trip in trips {
        if trip.id == query.trip_id || trip.is_cancelled() {
            continue;
        }
        let Some((trip_start, trip_end)) = trip.window() else {
            continue;
        };
        if !(start < trip_end && end > trip_start) {
            continue;
        }

        if let Some(pilot_id) = pilot_id {
            if trip.uses_pilot(pilot_id) {
                return Some(ResourceConflict::against(Resource::Pilot, pilot_id, trip));
            }
        }
        if let Some(train_id) = train_id {
            if trip.uses_train(train_id) {
                return Some(ResourceConflict::against(Resource::Train, train_id, trip));
            }
        }
    }

    None
}
