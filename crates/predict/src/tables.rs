//! Fixed lookup tables for the prediction heuristics.
//!
//! Every table lives in [`PredictionTables`]. The built-in values come from
//! `Default`; a YAML file can override any subset of them.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use fleet_core::FleetError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionTables {
    /// Demand multiplier per equipment type, indexed by calendar month (January first).
    pub seasonal_multipliers: BTreeMap<String, [f64; 12]>,
    /// Base maintenance cost per equipment type.
    pub base_costs: BTreeMap<String, f64>,
    pub default_base_cost: f64,
    /// Maintenance window label per maintenance priority.
    pub maintenance_windows: BTreeMap<i32, String>,
    pub fallback_maintenance_window: String,
    pub utilization_daily_rate: f64,
    /// Utilization percentage treated as full, healthy use.
    pub utilization_target: f64,
    pub demand_factors: Vec<String>,
}

impl Default for PredictionTables {
    fn default() -> Self {
        let seasonal_multipliers = BTreeMap::from([
            ("Excavator".to_string(), [0.7, 0.8, 1.0, 1.2, 1.3, 1.4, 1.4, 1.3, 1.2, 1.0, 0.8, 0.7]),
            ("Bulldozer".to_string(), [0.7, 0.8, 1.1, 1.2, 1.3, 1.3, 1.3, 1.2, 1.1, 1.0, 0.8, 0.7]),
            ("Wheel Loader".to_string(), [0.8, 0.9, 1.0, 1.1, 1.2, 1.2, 1.2, 1.1, 1.1, 1.0, 0.9, 0.8]),
            ("Compactor".to_string(), [0.6, 0.7, 0.9, 1.2, 1.4, 1.5, 1.5, 1.4, 1.2, 0.9, 0.7, 0.6]),
            ("Generator".to_string(), [1.3, 1.2, 1.0, 0.9, 0.9, 1.1, 1.3, 1.3, 1.1, 0.9, 1.0, 1.2]),
        ]);

        let base_costs = BTreeMap::from([
            ("Excavator".to_string(), 5000.0),
            ("Bulldozer".to_string(), 6000.0),
            ("Wheel Loader".to_string(), 4500.0),
            ("Backhoe Loader".to_string(), 3500.0),
            ("Motor Grader".to_string(), 5500.0),
            ("Off-Highway Truck".to_string(), 7000.0),
            ("Compactor".to_string(), 2500.0),
            ("Skid Steer".to_string(), 2000.0),
            ("Compressor".to_string(), 1500.0),
            ("Generator".to_string(), 1800.0),
        ]);

        let maintenance_windows = BTreeMap::from([
            (5, "1-3 days".to_string()),
            (4, "1-2 weeks".to_string()),
            (3, "2-4 weeks".to_string()),
            (2, "1-2 months".to_string()),
            (1, "3+ months".to_string()),
        ]);

        Self {
            seasonal_multipliers,
            base_costs,
            default_base_cost: 3000.0,
            maintenance_windows,
            fallback_maintenance_window: "3+ months".to_string(),
            utilization_daily_rate: 500.0,
            utilization_target: 85.0,
            demand_factors: vec![
                "Historical rental patterns".to_string(),
                "Seasonal demand".to_string(),
                "Weather conditions".to_string(),
                "Regional construction activity".to_string(),
            ],
        }
    }
}

impl PredictionTables {
    /// Load tables from a YAML file. Keys absent from the file keep their built-in values.
    pub fn from_yaml_file(path: &Path) -> Result<Self, FleetError> {
        let text = std::fs::read_to_string(path)?;
        let tables = Self::from_yaml_str(&text)?;
        info!(
            "Loaded prediction tables from {} ({} seasonal types, {} base costs)",
            path.display(),
            tables.seasonal_multipliers.len(),
            tables.base_costs.len()
        );
        Ok(tables)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, FleetError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let tables: Self =
            serde_yaml::from_str(text).map_err(|e| FleetError::Yaml(e.to_string()))?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn to_yaml(&self) -> Result<String, FleetError> {
        serde_yaml::to_string(self).map_err(|e| FleetError::Yaml(e.to_string()))
    }

    fn validate(&self) -> Result<(), FleetError> {
        for (equipment_type, months) in &self.seasonal_multipliers {
            if months.iter().any(|m| !m.is_finite() || *m < 0.0) {
                return Err(FleetError::Config(format!(
                    "seasonal multipliers for '{}' must be non-negative",
                    equipment_type
                )));
            }
        }
        if self.default_base_cost < 0.0 || self.base_costs.values().any(|c| *c < 0.0) {
            return Err(FleetError::Config("base costs must be non-negative".into()));
        }
        if self.utilization_daily_rate < 0.0 {
            return Err(FleetError::Config("utilization_daily_rate must be non-negative".into()));
        }
        Ok(())
    }

    /// Seasonal multiplier for a type in a calendar month (1..=12).
    /// Unlisted types and out-of-range months yield exactly 1.0.
    pub fn seasonal_multiplier(&self, equipment_type: &str, month: u32) -> f64 {
        if !(1..=12).contains(&month) {
            return 1.0;
        }
        self.seasonal_multipliers
            .get(equipment_type)
            .map(|months| months[(month - 1) as usize])
            .unwrap_or(1.0)
    }

    pub fn base_cost(&self, equipment_type: &str) -> f64 {
        self.base_costs
            .get(equipment_type)
            .copied()
            .unwrap_or(self.default_base_cost)
    }

    pub fn maintenance_window(&self, priority: Option<i32>) -> &str {
        priority
            .and_then(|p| self.maintenance_windows.get(&p))
            .map(String::as_str)
            .unwrap_or(&self.fallback_maintenance_window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unlisted_type_has_unit_multiplier() {
        let tables = PredictionTables::default();
        for month in 1..=12 {
            assert_eq!(tables.seasonal_multiplier("Tower Crane", month), 1.0);
        }
        assert_eq!(tables.seasonal_multiplier("Excavator", 0), 1.0);
        assert_eq!(tables.seasonal_multiplier("Excavator", 13), 1.0);
        assert_eq!(tables.seasonal_multiplier("Excavator", 6), 1.4);
    }

    #[test]
    fn maintenance_window_lookup() {
        let tables = PredictionTables::default();
        assert_eq!(tables.maintenance_window(Some(5)), "1-3 days");
        assert_eq!(tables.maintenance_window(Some(1)), "3+ months");
        assert_eq!(tables.maintenance_window(Some(6)), "3+ months");
        assert_eq!(tables.maintenance_window(None), "3+ months");
    }

    #[test]
    fn base_cost_falls_back_to_default() {
        let tables = PredictionTables::default();
        assert_eq!(tables.base_cost("Bulldozer"), 6000.0);
        assert_eq!(tables.base_cost("Scissor Lift"), 3000.0);
    }

    #[test]
    fn yaml_override_keeps_unnamed_defaults() {
        let yaml = "default_base_cost: 4200\nutilization_daily_rate: 650\n";
        let tables = PredictionTables::from_yaml_str(yaml).unwrap();
        assert_eq!(tables.default_base_cost, 4200.0);
        assert_eq!(tables.utilization_daily_rate, 650.0);
        assert_eq!(tables.maintenance_window(Some(4)), "1-2 weeks");
    }

    #[test]
    fn yaml_file_roundtrip_through_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut custom = PredictionTables::default();
        custom
            .seasonal_multipliers
            .insert("Crane".into(), [2.0; 12]);
        file.write_all(custom.to_yaml().unwrap().as_bytes()).unwrap();

        let loaded = PredictionTables::from_yaml_file(file.path()).unwrap();
        assert_eq!(loaded.seasonal_multiplier("Crane", 3), 2.0);
    }

    #[test]
    fn negative_multiplier_rejected() {
        let yaml = "seasonal_multipliers:\n  Crane: [1, 1, 1, 1, 1, -1, 1, 1, 1, 1, 1, 1]\n";
        let err = PredictionTables::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, FleetError::Config(_)));
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(
            PredictionTables::from_yaml_str("  \n").unwrap(),
            PredictionTables::default()
        );
    }
}
