//! Domain records shared by the scheduling core and its HTTP surface.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock;
use crate::traits::PriorityTrip;

/// Lifecycle state of a trip.
///
/// Anything other than the three known states is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TripStatus {
    #[default]
    Scheduled,
    Delayed,
    Cancelled,
    Other(String),
}

impl TripStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TripStatus::Scheduled => "Scheduled",
            TripStatus::Delayed => "Delayed",
            TripStatus::Cancelled => "Cancelled",
            TripStatus::Other(value) => value,
        }
    }
}

impl From<String> for TripStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Scheduled" => TripStatus::Scheduled,
            "Delayed" => TripStatus::Delayed,
            "Cancelled" => TripStatus::Cancelled,
            _ => TripStatus::Other(value),
        }
    }
}

impl From<&str> for TripStatus {
    fn from(value: &str) -> Self {
        TripStatus::from(value.to_string())
    }
}

impl From<TripStatus> for String {
    fn from(status: TripStatus) -> Self {
        match status {
            TripStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of travel along the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    AluvaToPetta,
    PettaToAluva,
}

impl Direction {
    /// Odd trip numbers run outbound, even ones inbound.
    pub fn for_trip_number(number: u32) -> Self {
        if number % 2 != 0 {
            Direction::AluvaToPetta
        } else {
            Direction::PettaToAluva
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::AluvaToPetta => "Aluva -> Petta",
            Direction::PettaToAluva => "Petta -> Aluva",
        }
    }
}

fn default_frequency() -> String {
    "+10 mins".to_string()
}

fn default_platform() -> String {
    "Platform 1".to_string()
}

/// One scheduled train run between two times of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    /// Human-readable code such as `TR-1001`.
    #[serde(rename = "trip_id")]
    pub code: String,
    pub route: String,
    #[serde(default)]
    pub pilot_id: Option<String>,
    #[serde(default, rename = "train_set_id")]
    pub train_id: Option<String>,
    pub departure_time: String,
    pub arrival_time: String,
    #[serde(default = "default_frequency")]
    pub frequency: String,
    #[serde(default)]
    pub status: TripStatus,
    #[serde(default)]
    pub delay_minutes: u32,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

impl Trip {
    pub fn is_cancelled(&self) -> bool {
        self.status == TripStatus::Cancelled
    }

    /// `[departure, arrival)` in minutes since midnight, if both ends are
    /// valid times. Arrivals past midnight land after 24:00.
    pub fn window(&self) -> Option<(u32, u32)> {
        clock::window(&self.departure_time, &self.arrival_time)
    }

    pub fn uses_pilot(&self, pilot_id: &str) -> bool {
        self.pilot_id.as_deref() == Some(pilot_id)
    }

    pub fn uses_train(&self, train_id: &str) -> bool {
        self.train_id.as_deref() == Some(train_id)
    }
}

impl PriorityTrip for Trip {
    fn id(&self) -> &str {
        &self.id
    }

    fn start_time(&self) -> &str {
        &self.departure_time
    }

    /// Route labels read `Origin -> Destination`.
    fn origin_station(&self) -> &str {
        self.route
            .split("->")
            .next()
            .map(str::trim)
            .unwrap_or_default()
    }
}

/// Partial update for a stored trip. Absent or empty fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripUpdate {
    pub departure_time: Option<String>,
    pub delay_minutes: Option<u32>,
    pub status: Option<TripStatus>,
    pub pilot_id: Option<String>,
    #[serde(rename = "train_set_id")]
    pub train_id: Option<String>,
    pub platform: Option<String>,
    pub cancellation_reason: Option<String>,
}

/// A staff member as exposed by the staff catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
}

/// Fleet-side state of a train set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainStatus {
    Available,
    #[serde(rename = "In Service")]
    InService,
    Maintenance,
}

/// A train set as exposed by the fleet catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainRecord {
    pub id: String,
    pub status: TrainStatus,
    #[serde(default)]
    pub location: Option<String>,
    /// Kilometres run since the start of service today.
    #[serde(rename = "km_run_today")]
    pub distance_run_today: f64,
}

impl TrainRecord {
    pub fn is_assignable(&self) -> bool {
        self.status != TrainStatus::Maintenance
    }
}

/// Scheduler's read-only view of a pilot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    pub id: String,
    pub name: String,
    pub status: String,
}

impl From<&StaffMember> for Pilot {
    fn from(member: &StaffMember) -> Self {
        Self {
            id: member.id.clone(),
            name: member.name.clone(),
            status: "Available".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainSetStatus {
    Operational,
    Maintenance,
}

/// Scheduler's read-only view of a train set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainSet {
    pub id: String,
    pub name: String,
    pub status: TrainSetStatus,
}

impl From<&TrainRecord> for TrainSet {
    fn from(train: &TrainRecord) -> Self {
        let status = match train.status {
            TrainStatus::Available | TrainStatus::InService => TrainSetStatus::Operational,
            TrainStatus::Maintenance => TrainSetStatus::Maintenance,
        };
        Self {
            id: train.id.clone(),
            name: train.id.clone(),
            status,
        }
    }
}
