use std::sync::Arc;
use std::time::Instant;

use fleet_core::config::PredictionConfig;
use fleet_predict::{PredictionTables, RandomNoise};

use crate::repository::FleetRepository;

/// Shared, read-only after startup.
pub struct AppState {
    pub repo: Arc<dyn FleetRepository>,
    pub tables: PredictionTables,
    /// Seed for per-request noise; `None` draws from entropy.
    pub noise_seed: Option<u64>,
    pub utilization_window_days: u32,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn FleetRepository>,
        tables: PredictionTables,
        prediction: &PredictionConfig,
    ) -> Self {
        Self {
            repo,
            tables,
            noise_seed: prediction.noise_seed,
            utilization_window_days: prediction.utilization_window_days,
            start_time: Instant::now(),
        }
    }

    /// A fresh noise source for one request.
    pub fn noise(&self) -> RandomNoise {
        RandomNoise::from_seed_opt(self.noise_seed)
    }
}
