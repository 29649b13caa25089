//! Late-return risk for open rentals.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use fleet_core::ActiveRentalRisk;

use crate::noise::NoiseSource;

const LONG_RENTAL_DAYS: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_probability(probability: u32) -> Self {
        if probability > 70 {
            RiskLevel::High
        } else if probability > 40 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReturnDatePrediction {
    pub rental_id: String,
    pub equipment_id: String,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub planned_return_date: NaiveDate,
    pub predicted_return_date: NaiveDate,
    /// 5..=90, includes random noise.
    pub late_return_probability: u32,
    pub predicted_delay_days: u32,
    pub risk_level: RiskLevel,
    pub days_until_due: i32,
}

pub fn late_probability(rental: &ActiveRentalRisk, noise: &mut dyn NoiseSource) -> u32 {
    let credit_risk = (10.0 - crate::or_zero(rental.credit_rating)) / 10.0;
    let duration_risk = if rental.rental_duration_planned.unwrap_or(0) > LONG_RENTAL_DAYS {
        0.2
    } else {
        0.0
    };
    let raw = (credit_risk + duration_risk) * 50.0 + noise.sample(0.0, 20.0);
    raw.clamp(5.0, 90.0).round() as u32
}

pub fn delay_days(probability: u32) -> u32 {
    if probability > 50 {
        (probability as f64 / 10.0).round() as u32
    } else {
        0
    }
}

pub fn predict_rental(
    rental: &ActiveRentalRisk,
    noise: &mut dyn NoiseSource,
) -> ReturnDatePrediction {
    let probability = late_probability(rental, noise);
    let delay = delay_days(probability);
    let predicted_return_date = rental
        .rental_end_date_planned
        .checked_add_days(Days::new(delay as u64))
        .unwrap_or(rental.rental_end_date_planned);

    ReturnDatePrediction {
        rental_id: rental.rental_id.clone(),
        equipment_id: rental.equipment_id.clone(),
        customer_id: rental.customer_id.clone(),
        customer_name: rental.customer_name.clone(),
        planned_return_date: rental.rental_end_date_planned,
        predicted_return_date,
        late_return_probability: probability,
        predicted_delay_days: delay,
        risk_level: RiskLevel::from_probability(probability),
        days_until_due: rental.days_until_due,
    }
}

pub fn predict_return_dates(
    rentals: &[ActiveRentalRisk],
    noise: &mut dyn NoiseSource,
) -> Vec<ReturnDatePrediction> {
    rentals.iter().map(|r| predict_rental(r, noise)).collect()
}
