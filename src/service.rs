//! Process-wide scheduling state shared by request handlers.
//!
//! One mutex guards the trip store. Each call takes the lock for its whole
//! read/compute/write cycle, so concurrent writers are serialized. The
//! conflict log has its own lock and is never held together with the store's.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::audit::{ConflictLog, ConflictRecord, ScheduleConflict, scan_conflicts};
use crate::clock;
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::generator::GeneratorOptions;
use crate::http_catalog::{CatalogConfig, HttpFleetCatalog, HttpStaffCatalog};
use crate::mock_catalog::{MockFleet, MockStaff};
use crate::model::{Pilot, StaffMember, TrainRecord, TrainSet, Trip, TripUpdate};
use crate::ranker::{AssignmentResult, RankOptions, rank_and_assign};
use crate::store::TripStore;
use crate::traits::{FleetCatalog, PriorityTrip, StaffCatalog};

/// Acknowledgement returned when the timetable is published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReceipt {
    pub message: String,
    pub active_trips: usize,
}

pub struct ScheduleService {
    store: Mutex<TripStore>,
    conflict_log: Mutex<ConflictLog>,
    staff: Box<dyn StaffCatalog>,
    fleet: Box<dyn FleetCatalog>,
    generator: GeneratorOptions,
    ranking: RankOptions,
}

impl ScheduleService {
    pub fn new(staff: impl StaffCatalog + 'static, fleet: impl FleetCatalog + 'static) -> Self {
        Self {
            store: Mutex::new(TripStore::new()),
            conflict_log: Mutex::new(ConflictLog::new()),
            staff: Box::new(staff),
            fleet: Box::new(fleet),
            generator: GeneratorOptions::default(),
            ranking: RankOptions::default(),
        }
    }

    /// Mock catalogs, or HTTP catalogs when a remote URL is configured.
    pub fn from_config(config: &ServiceConfig) -> std::result::Result<Self, reqwest::Error> {
        match &config.remote_catalog_url {
            Some(base_url) => {
                let catalog = CatalogConfig {
                    base_url: base_url.clone(),
                    timeout_secs: config.remote_timeout_secs,
                };
                info!(%base_url, "Using remote staff and fleet catalogs");
                Ok(Self::new(
                    HttpStaffCatalog::new(catalog.clone())?,
                    HttpFleetCatalog::new(catalog)?,
                ))
            }
            None => {
                let generator = GeneratorOptions::default();
                let opened = clock::hours_since(generator.service_start, Local::now().time());
                info!(
                    fleet = config.fleet_size,
                    pilots = config.pilot_count,
                    seed = config.catalog_seed,
                    "Using mock staff and fleet catalogs"
                );
                Ok(Self::new(
                    MockStaff::generate(config.pilot_count),
                    MockFleet::generate(config.fleet_size, config.catalog_seed, opened),
                ))
            }
        }
    }

    pub fn with_generator_options(mut self, options: GeneratorOptions) -> Self {
        self.generator = options;
        self
    }

    pub fn with_rank_options(mut self, options: RankOptions) -> Self {
        self.ranking = options;
        self
    }

    /// Lock the store, generating the day's timetable on first access.
    fn store(&self) -> MutexGuard<'_, TripStore> {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        if store.is_empty() {
            let pilots = self.staff.list_pilots();
            let trains = self.fleet.list_trains();
            store.generate_daily_schedule(&pilots, &trains, &self.generator);
        }
        store
    }

    pub fn schedule(&self) -> Vec<Trip> {
        self.store().trips().to_vec()
    }

    pub fn add_trip(&self, trip: Trip) -> Result<Trip> {
        self.store().add_trip(trip).cloned()
    }

    pub fn update_trip(&self, id: &str, update: TripUpdate) -> Result<Trip> {
        self.store().update_trip(id, update).cloned()
    }

    /// Regenerate the timetable from scratch. Returns the new trip count.
    ///
    /// The conflict log refers to the discarded trips and is cleared too.
    pub fn reset(&self) -> usize {
        let pilots = self.staff.list_pilots();
        let trains = self.fleet.list_trains();
        let created = {
            let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
            store.reset(&pilots, &trains, &self.generator)
        };
        self.conflict_log().clear();
        created
    }

    pub fn publish(&self) -> PublishReceipt {
        let active_trips = self.store().trips().iter().filter(|trip| !trip.is_cancelled()).count();
        info!(active_trips, "Schedule published");
        PublishReceipt {
            message: "Schedule published to Passenger Information System.".to_string(),
            active_trips,
        }
    }

    fn conflict_log(&self) -> MutexGuard<'_, ConflictLog> {
        self.conflict_log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stateless scan of the current timetable.
    pub fn conflicts(&self) -> Vec<ScheduleConflict> {
        scan_conflicts(self.store().trips())
    }

    /// Rescan the timetable and replace the conflict log with the result.
    pub fn run_conflict_check(&self) -> Vec<ConflictRecord> {
        let trips = self.schedule();
        let records = self.conflict_log().run_check(&trips).to_vec();
        info!(conflicts = records.len(), "Conflict check complete");
        records
    }

    pub fn logged_conflicts(&self) -> Vec<ConflictRecord> {
        self.conflict_log().records().to_vec()
    }

    pub fn resolve_conflict(&self, id: &str) -> Result<ConflictRecord> {
        self.conflict_log().resolve(id).cloned()
    }

    pub fn override_conflict(&self, id: &str, comment: &str) -> Result<ConflictRecord> {
        let record = self.conflict_log().override_conflict(id, comment).cloned()?;
        info!(conflict = %record.id, %comment, "Conflict overridden");
        Ok(record)
    }

    pub fn pilots(&self) -> Vec<Pilot> {
        self.staff.list_pilots().iter().map(Pilot::from).collect()
    }

    pub fn trains(&self) -> Vec<TrainSet> {
        self.fleet.list_trains().iter().map(TrainSet::from).collect()
    }

    pub fn staff(&self) -> Vec<StaffMember> {
        self.staff.list_pilots()
    }

    pub fn fleet(&self) -> Vec<TrainRecord> {
        self.fleet.list_trains()
    }

    /// Rank `trips` against the current fleet snapshot.
    pub fn assign_trains<T: PriorityTrip>(&self, trips: &[T]) -> Vec<AssignmentResult> {
        let fleet = self.fleet.list_trains();
        rank_and_assign(trips, &fleet, &self.ranking)
    }
}
