//! Equipment and rental records plus their explicit update requests.
//!
//! Update requests enumerate the mutable fields and reject anything else,
//! so a request body can never reach a column it does not name.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::FleetError;

pub const EQUIPMENT_STATUSES: &[&str] = &["Available", "Rented", "Maintenance", "Retired"];

pub const RENTAL_STATUSES: &[&str] = &["Active", "Completed", "Cancelled"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Equipment {
    pub equipment_id: String,
    pub equipment_type: String,
    pub model: Option<String>,
    pub year_manufactured: Option<i32>,
    pub status: String,
    pub site_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Rental {
    pub rental_id: String,
    pub equipment_id: String,
    pub customer_id: String,
    pub site_id: Option<String>,
    pub rental_start_date: NaiveDate,
    pub rental_end_date_planned: NaiveDate,
    pub rental_end_date_actual: Option<NaiveDate>,
    pub rental_duration_planned: Option<i32>,
    pub rental_duration_actual: Option<i32>,
    pub rental_rate_per_day: Option<f64>,
    pub overdue_days: Option<i32>,
    pub status: String,
}

/// Fields of an equipment record that may be changed through the API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct EquipmentUpdate {
    pub status: Option<String>,
    pub site_id: Option<String>,
    pub model: Option<String>,
}

impl EquipmentUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.site_id.is_none() && self.model.is_none()
    }

    pub fn validate(&self) -> Result<(), FleetError> {
        if self.is_empty() {
            return Err(FleetError::Invalid("update must set at least one field".into()));
        }
        if let Some(status) = &self.status {
            if !EQUIPMENT_STATUSES.contains(&status.as_str()) {
                return Err(FleetError::Invalid(format!(
                    "invalid equipment status '{}': must be one of: {}",
                    status,
                    EQUIPMENT_STATUSES.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Apply the update to an in-memory record.
    pub fn apply(&self, equipment: &mut Equipment) {
        if let Some(status) = &self.status {
            equipment.status = status.clone();
        }
        if let Some(site_id) = &self.site_id {
            equipment.site_id = Some(site_id.clone());
        }
        if let Some(model) = &self.model {
            equipment.model = Some(model.clone());
        }
    }
}

/// Fields of a rental record that may be changed through the API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RentalUpdate {
    pub status: Option<String>,
    pub rental_end_date_planned: Option<NaiveDate>,
    pub rental_end_date_actual: Option<NaiveDate>,
    pub overdue_days: Option<i32>,
}

impl RentalUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.rental_end_date_planned.is_none()
            && self.rental_end_date_actual.is_none()
            && self.overdue_days.is_none()
    }

    pub fn validate(&self) -> Result<(), FleetError> {
        if self.is_empty() {
            return Err(FleetError::Invalid("update must set at least one field".into()));
        }
        if let Some(status) = &self.status {
            if !RENTAL_STATUSES.contains(&status.as_str()) {
                return Err(FleetError::Invalid(format!(
                    "invalid rental status '{}': must be one of: {}",
                    status,
                    RENTAL_STATUSES.join(", ")
                )));
            }
        }
        if let Some(days) = self.overdue_days {
            if days < 0 {
                return Err(FleetError::Invalid("overdue_days must not be negative".into()));
            }
        }
        Ok(())
    }

    pub fn apply(&self, rental: &mut Rental) {
        if let Some(status) = &self.status {
            rental.status = status.clone();
        }
        if let Some(date) = self.rental_end_date_planned {
            rental.rental_end_date_planned = date;
        }
        if let Some(date) = self.rental_end_date_actual {
            rental.rental_end_date_actual = Some(date);
        }
        if let Some(days) = self.overdue_days {
            rental.overdue_days = Some(days);
        }
    }
}

fn default_limit() -> i64 {
    100
}

/// Query-string integer that degrades to `None` instead of failing, so one
/// bad paging value never discards the rest of the filter.
fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.trim().parse().ok()))
}

fn lenient_limit<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(lenient_i64(deserializer)?.unwrap_or_else(default_limit))
}

fn lenient_offset<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(lenient_i64(deserializer)?.unwrap_or(0))
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EquipmentFilter {
    pub equipment_type: Option<String>,
    pub status: Option<String>,
    #[serde(default = "default_limit", deserialize_with = "lenient_limit")]
    pub limit: i64,
    #[serde(default, deserialize_with = "lenient_offset")]
    pub offset: i64,
}

impl Default for EquipmentFilter {
    fn default() -> Self {
        Self {
            equipment_type: None,
            status: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RentalFilter {
    pub status: Option<String>,
    #[serde(default = "default_limit", deserialize_with = "lenient_limit")]
    pub limit: i64,
    #[serde(default, deserialize_with = "lenient_offset")]
    pub offset: i64,
}

impl Default for RentalFilter {
    fn default() -> Self {
        Self {
            status: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equipment_update_rejects_unknown_keys() {
        let err = serde_json::from_str::<EquipmentUpdate>(
            r#"{"status": "Available", "equipment_type": "Crane"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn equipment_update_validation() {
        assert!(EquipmentUpdate::default().validate().is_err());

        let bad = EquipmentUpdate {
            status: Some("Lost".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let ok = EquipmentUpdate {
            status: Some("Maintenance".into()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn rental_update_apply_touches_only_named_fields() {
        let mut rental = Rental {
            rental_id: "R1".into(),
            equipment_id: "E1".into(),
            customer_id: "C1".into(),
            site_id: None,
            rental_start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            rental_end_date_planned: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            rental_end_date_actual: None,
            rental_duration_planned: Some(14),
            rental_duration_actual: None,
            rental_rate_per_day: Some(450.0),
            overdue_days: Some(0),
            status: "Active".into(),
        };
        let update: RentalUpdate =
            serde_json::from_str(r#"{"status": "Completed", "overdue_days": 2}"#).unwrap();
        assert!(update.validate().is_ok());
        update.apply(&mut rental);

        assert_eq!(rental.status, "Completed");
        assert_eq!(rental.overdue_days, Some(2));
        assert_eq!(rental.rental_rate_per_day, Some(450.0));
        assert_eq!(rental.rental_end_date_actual, None);
    }

    #[test]
    fn rental_update_rejects_negative_overdue() {
        let update = RentalUpdate {
            overdue_days: Some(-1),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn rental_update_rejects_unknown_keys() {
        let err = serde_json::from_str::<RentalUpdate>(r#"{"status": "Completed", "customer_id": "C-9"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn malformed_paging_keeps_other_filters() {
        let filter: EquipmentFilter =
            serde_json::from_str(r#"{"status": "Rented", "limit": "lots", "offset": "2"}"#).unwrap();
        assert_eq!(filter.status.as_deref(), Some("Rented"));
        assert_eq!(filter.limit, 100);
        assert_eq!(filter.offset, 2);

        let filter: RentalFilter =
            serde_json::from_str(r#"{"status": "Active", "offset": "-"}"#).unwrap();
        assert_eq!(filter.status.as_deref(), Some("Active"));
        assert_eq!(filter.offset, 0);
    }
}
