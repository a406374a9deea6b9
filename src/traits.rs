//! Collaborator traits for the scheduling core.
//!
//! The core never owns pilot or train data. It reads them through these
//! interfaces so a deployment can back them with mock data, a remote
//! catalog service, or anything else.

use crate::model::{StaffMember, TrainRecord};

/// Source of pilots that may be rostered onto trips.
pub trait StaffCatalog: Send + Sync {
    fn list_pilots(&self) -> Vec<StaffMember>;
}

/// Source of train sets and their current operational state.
pub trait FleetCatalog: Send + Sync {
    fn list_trains(&self) -> Vec<TrainRecord>;
}

/// A trip as seen by the train assignment ranker.
pub trait PriorityTrip {
    fn id(&self) -> &str;

    /// Departure time as `HH:MM`.
    fn start_time(&self) -> &str;

    /// Station the trip departs from.
    fn origin_station(&self) -> &str;
}
