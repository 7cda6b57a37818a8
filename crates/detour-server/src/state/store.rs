//! In-memory zone registry using DashMap.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use detour_core::{PlanResult, Zone, ZoneField};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::config::Config;

/// A registered zone with its registration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneRecord {
    #[serde(flatten)]
    pub zone: Zone,
    pub created_at: DateTime<Utc>,
}

/// Application state - thread-safe zone registry plus planner defaults.
pub struct AppState {
    zones: DashMap<u32, ZoneRecord>,
    zone_counter: AtomicU32,
    config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            zones: DashMap::new(),
            zone_counter: AtomicU32::new(1),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get next zone ID.
    pub fn next_zone_id(&self) -> u32 {
        self.zone_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Validate and register a zone under a fresh ID.
    ///
    /// Rejected zones do not consume an ID.
    pub fn add_zone(&self, lat: f64, lon: f64, radius_m: f64) -> PlanResult<ZoneRecord> {
        let mut zone = Zone::new(0, lat, lon, radius_m);
        zone.validate()?;
        zone.id = self.next_zone_id();
        let record = ZoneRecord {
            zone,
            created_at: Utc::now(),
        };
        self.zones.insert(record.zone.id, record.clone());
        Ok(record)
    }

    /// All registered zones, ordered by ID.
    pub fn get_zones(&self) -> Vec<ZoneRecord> {
        let mut records: Vec<ZoneRecord> = self.zones.iter().map(|r| r.value().clone()).collect();
        records.sort_by_key(|record| record.zone.id);
        records
    }

    pub fn get_zone(&self, id: u32) -> Option<ZoneRecord> {
        self.zones.get(&id).map(|r| r.value().clone())
    }

    pub fn remove_zone(&self, id: u32) -> bool {
        self.zones.remove(&id).is_some()
    }

    /// Snapshot of the registry as a zone field using the default clearance.
    pub fn zone_field(&self) -> PlanResult<ZoneField> {
        let zones = self.get_zones().into_iter().map(|r| r.zone).collect();
        ZoneField::new(zones, None, self.config.planner.clearance)
    }
}
