//! Greedy train-to-trip matching.
//!
//! Trips are ranked by a small priority score (peak hour, hub origin) and
//! handed the freshest available trains in one pass. There is no
//! backtracking: a high-priority trip that finds no low-mileage train simply
//! takes the next freshest one.

use std::cmp::Reverse;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock;
use crate::model::{TrainRecord, TrainStatus};
use crate::traits::PriorityTrip;

const OPTIMAL_REASON: &str =
    "Optimum Service: Low-mileage rake assigned to ensure reliability during peak load.";
const COVERAGE_REASON: &str =
    "Demand Coverage: Best available rake deployed to meet high passenger demand.";
const ROTATION_REASON: &str =
    "Standard Rotation: Routine rake assignment for balanced fleet utilization.";

#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Inclusive hour ranges that count as peak.
    pub peak_hours: Vec<(u32, u32)>,
    pub hub_stations: Vec<String>,
    /// Trains below this distance count as fresh.
    pub fresh_distance_limit: f64,
    /// Scores at or above this are priority trips.
    pub priority_score: u8,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            peak_hours: vec![(8, 10), (17, 19)],
            hub_stations: ["Aluva", "Pettah", "SN Junction"]
                .into_iter()
                .map(String::from)
                .collect(),
            fresh_distance_limit: 100.0,
            priority_score: 2,
        }
    }
}

impl RankOptions {
    /// +2 for a peak-hour departure, +1 for a hub origin.
    ///
    /// A start time that does not parse earns no peak points.
    pub fn score<T: PriorityTrip>(&self, trip: &T) -> u8 {
        let mut score = 0;
        if let Some(hour) = clock::hour_of(trip.start_time()) {
            if self.peak_hours.iter().any(|&(from, to)| from <= hour && hour <= to) {
                score += 2;
            }
        }
        if self.hub_stations.iter().any(|hub| hub == trip.origin_station()) {
            score += 1;
        }
        score
    }
}

/// A trip offered for train assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    pub id: String,
    pub route_name: String,
    /// `HH:MM`
    pub start_time: String,
    pub origin_station: String,
}

impl PriorityTrip for TripRequest {
    fn id(&self) -> &str {
        &self.id
    }

    fn start_time(&self) -> &str {
        &self.start_time
    }

    fn origin_station(&self) -> &str {
        &self.origin_station
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub trip_id: String,
    pub train_id: String,
    #[serde(rename = "train_km_run")]
    pub distance_run: f64,
    /// A fresh train matched to a priority trip.
    #[serde(rename = "is_peak_match")]
    pub optimal: bool,
    #[serde(rename = "match_reason")]
    pub reason: String,
}

/// Match trips to available trains, highest priority first.
///
/// Each train is used at most once. Once the trains run out the remaining
/// trips get no entry in the result.
pub fn rank_and_assign<T: PriorityTrip>(
    trips: &[T],
    fleet: &[TrainRecord],
    options: &RankOptions,
) -> Vec<AssignmentResult> {
    let mut available: Vec<&TrainRecord> = fleet
        .iter()
        .filter(|train| train.status == TrainStatus::Available)
        .collect();
    available.sort_by(|a, b| a.distance_run_today.total_cmp(&b.distance_run_today));

    let mut ranked: Vec<(u8, &T)> = trips.iter().map(|trip| (options.score(trip), trip)).collect();
    ranked.sort_by_key(|&(score, _)| Reverse(score));

    let mut used: HashSet<&str> = HashSet::new();
    let mut assignments = Vec::with_capacity(ranked.len().min(available.len()));

    for (score, trip) in ranked {
        let mut candidates = available.iter().filter(|train| !used.contains(train.id.as_str()));
        let Some(&freshest) = candidates.clone().next() else {
            debug!(remaining_trip = trip.id(), "No trains left to assign");
            break;
        };

        let (train, optimal, reason) = if score >= options.priority_score {
            match candidates.find(|train| train.distance_run_today < options.fresh_distance_limit) {
                Some(&fresh) => (fresh, true, OPTIMAL_REASON),
                None => (freshest, false, COVERAGE_REASON),
            }
        } else {
            (freshest, false, ROTATION_REASON)
        };

        used.insert(train.id.as_str());
        assignments.push(AssignmentResult {
            trip_id: trip.id().to_string(),
            train_id: train.id.clone(),
            distance_run: train.distance_run_today,
            optimal,
            reason: reason.to_string(),
        });
    }

    assignments
}
