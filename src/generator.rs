//! Daily timetable generation.
//!
//! Walks the service day from opening to closing, one trip per step, with
//! the step length taken from the hour band the step starts in. Pilots and
//! trains are picked first-fit from rotating pools so load spreads evenly.

use std::collections::VecDeque;

use chrono::NaiveTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock;
use crate::error::{Result, ScheduleError};
use crate::model::{Direction, StaffMember, TrainRecord, Trip, TripStatus};
use crate::overlap::{OverlapQuery, check_overlap};

/// A half-open range of hours `[start_hour, end_hour)` with its headway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyBand {
    pub start_hour: u32,
    pub end_hour: u32,
    pub minutes: u32,
}

impl FrequencyBand {
    fn contains(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub service_start: NaiveTime,
    pub service_end: NaiveTime,
    /// Running time of every trip, in minutes.
    pub trip_duration_minutes: u32,
    /// Number given to the first trip of the day (`TR-<n>`).
    pub first_trip_number: u32,
    /// Bands checked in order; the first match sets the headway.
    pub bands: Vec<FrequencyBand>,
    /// Headway outside every band.
    pub default_frequency_minutes: u32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            service_start: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or_default(),
            service_end: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
            trip_duration_minutes: 45,
            first_trip_number: 1001,
            bands: vec![
                // Morning peak
                FrequencyBand {
                    start_hour: 8,
                    end_hour: 11,
                    minutes: 10,
                },
                // Evening peak
                FrequencyBand {
                    start_hour: 16,
                    end_hour: 20,
                    minutes: 10,
                },
                // Night
                FrequencyBand {
                    start_hour: 20,
                    end_hour: 24,
                    minutes: 20,
                },
            ],
            default_frequency_minutes: 15,
        }
    }
}

impl GeneratorOptions {
    /// Default options over a custom `HH:MM` service window.
    pub fn with_service_window(start: &str, end: &str) -> Result<Self> {
        let service_start =
            clock::parse(start).ok_or_else(|| ScheduleError::InvalidTime(start.to_string()))?;
        let service_end =
            clock::parse(end).ok_or_else(|| ScheduleError::InvalidTime(end.to_string()))?;
        Ok(Self {
            service_start,
            service_end,
            ..Self::default()
        })
    }

    pub fn frequency_for_hour(&self, hour: u32) -> u32 {
        self.bands
            .iter()
            .find(|band| band.contains(hour))
            .map(|band| band.minutes)
            .unwrap_or(self.default_frequency_minutes)
    }
}

/// Build a full day of trips.
///
/// Pilots and trains that cannot be placed without a clash leave the trip
/// unstaffed rather than failing. Trains under maintenance never enter the pool.
pub fn generate_daily_schedule(
    pilots: &[StaffMember],
    trains: &[TrainRecord],
    options: &GeneratorOptions,
) -> Vec<Trip> {
    let mut pilot_pool: VecDeque<&StaffMember> = pilots.iter().collect();
    let mut train_pool: VecDeque<&TrainRecord> =
        trains.iter().filter(|train| train.is_assignable()).collect();

    let mut trips: Vec<Trip> = Vec::new();
    let mut minute = clock::minute_of_day(options.service_start);
    let end_minute = clock::minute_of_day(options.service_end);
    let mut trip_number = options.first_trip_number;

    while minute < end_minute {
        let frequency = options.frequency_for_hour(minute / 60).max(1);
        let departure = clock::format_minute_of_day(minute);
        let arrival = clock::format_minute_of_day(minute + options.trip_duration_minutes);
        let id = Uuid::new_v4().to_string();

        let pilot_id = pick_first_free(&mut pilot_pool, |pilot| {
            check_overlap(
                &trips,
                OverlapQuery {
                    trip_id: &id,
                    pilot_id: Some(&pilot.id),
                    train_id: None,
                    departure: &departure,
                    arrival: &arrival,
                },
            )
            .is_none()
        })
        .map(|pilot| pilot.id.clone());

        let train_id = pick_first_free(&mut train_pool, |train| {
            check_overlap(
                &trips,
                OverlapQuery {
                    trip_id: &id,
                    pilot_id: None,
                    train_id: Some(&train.id),
                    departure: &departure,
                    arrival: &arrival,
                },
            )
            .is_none()
        })
        .map(|train| train.id.clone());

        if pilot_id.is_none() || train_id.is_none() {
            debug!(trip = trip_number, departure = %departure, "Trip left understaffed");
        }

        let platform = if trip_number % 2 != 0 { "Platform 1" } else { "Platform 2" };
        trips.push(Trip {
            id,
            code: format!("TR-{}", trip_number),
            route: Direction::for_trip_number(trip_number).label().to_string(),
            pilot_id,
            train_id,
            departure_time: departure,
            arrival_time: arrival,
            frequency: format!("+{} mins", frequency),
            status: TripStatus::Scheduled,
            delay_minutes: 0,
            platform: platform.to_string(),
            cancellation_reason: None,
        });

        minute += frequency;
        trip_number += 1;
    }

    info!(
        trips = trips.len(),
        start = %clock::format(options.service_start),
        end = %clock::format(options.service_end),
        "Generated daily schedule"
    );
    trips
}

/// Take the first pool entry accepted by `is_free` and move it to the back.
fn pick_first_free<'a, T>(
    pool: &mut VecDeque<&'a T>,
    is_free: impl Fn(&T) -> bool,
) -> Option<&'a T> {
    let position = pool.iter().position(|entry| is_free(*entry))?;
    let picked = pool.remove(position)?;
    pool.push_back(picked);
    Some(picked)
}
