//! Rule-based recommendations over the insight aggregates.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use fleet_core::{CustomerBehavior, EquipmentPerformance, SeasonalTrend};

const LOW_UTILIZATION_BELOW: f64 = 70.0;
const CRITICAL_PRIORITY_COUNT: i64 = 1;
const CORPORATE_SEGMENT: &str = "Corporate";
const CORPORATE_OVERDUE_ABOVE: f64 = 2.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InsightSets {
    pub equipment_performance: Vec<EquipmentPerformance>,
    pub customer_behavior: Vec<CustomerBehavior>,
    pub seasonal_trends: Vec<SeasonalTrend>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Optimization,
    Maintenance,
    CustomerManagement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub impact: String,
}

/// Emit recommendations in fixed rule order: optimization, maintenance,
/// customer management. Each rule fires at most once.
pub fn generate_recommendations(insights: &InsightSets) -> Vec<Recommendation> {
    let mut out = Vec::new();

    let underused: Vec<&str> = insights
        .equipment_performance
        .iter()
        .filter(|p| p.avg_utilization < LOW_UTILIZATION_BELOW)
        .map(|p| p.equipment_type.as_str())
        .collect();
    if !underused.is_empty() {
        out.push(Recommendation {
            kind: RecommendationKind::Optimization,
            priority: Priority::High,
            title: "Improve utilization of underused equipment".to_string(),
            description: format!(
                "Average utilization is below {}% for: {}. Consider relocating units to busier sites or adjusting rental rates.",
                LOW_UTILIZATION_BELOW,
                underused.join(", ")
            ),
            impact: "revenue".to_string(),
        });
    }

    let critical: Vec<String> = insights
        .equipment_performance
        .iter()
        .filter(|p| p.high_priority_count >= CRITICAL_PRIORITY_COUNT)
        .map(|p| format!("{} ({})", p.equipment_type, p.high_priority_count))
        .collect();
    if !critical.is_empty() {
        out.push(Recommendation {
            kind: RecommendationKind::Maintenance,
            priority: Priority::Critical,
            title: "Schedule urgent maintenance".to_string(),
            description: format!(
                "Equipment with maintenance priority 4 or higher: {}. Service these units before their next rental.",
                critical.join(", ")
            ),
            impact: "reliability".to_string(),
        });
    }

    if let Some(corporate) = insights
        .customer_behavior
        .iter()
        .find(|c| c.customer_segment.eq_ignore_ascii_case(CORPORATE_SEGMENT))
    {
        if corporate.avg_overdue_days > CORPORATE_OVERDUE_ABOVE {
            out.push(Recommendation {
                kind: RecommendationKind::CustomerManagement,
                priority: Priority::Medium,
                title: "Tighten corporate return terms".to_string(),
                description: format!(
                    "Corporate customers average {:.1} overdue days per rental. Review contract terms and send return reminders.",
                    corporate.avg_overdue_days
                ),
                impact: "cash_flow".to_string(),
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perf(equipment_type: &str, utilization: f64, high_priority: i64) -> EquipmentPerformance {
        EquipmentPerformance {
            equipment_type: equipment_type.to_string(),
            equipment_count: 4,
            avg_utilization: utilization,
            avg_health_score: 82.0,
            high_priority_count: high_priority,
        }
    }

    fn segment(name: &str, overdue: f64) -> CustomerBehavior {
        CustomerBehavior {
            customer_segment: name.to_string(),
            customer_count: 10,
            rental_count: 40,
            avg_rental_duration: 12.0,
            avg_overdue_days: overdue,
            total_revenue: 125_000.0,
        }
    }

    #[test]
    fn empty_insights_yield_nothing() {
        assert!(generate_recommendations(&InsightSets::default()).is_empty());
    }

    #[test]
    fn all_rules_fire_in_order() {
        let insights = InsightSets {
            equipment_performance: vec![perf("Excavator", 65.0, 0), perf("Bulldozer", 88.0, 2)],
            customer_behavior: vec![segment("Individual", 5.0), segment("Corporate", 2.5)],
            seasonal_trends: Vec::new(),
        };
        let recs = generate_recommendations(&insights);
        let kinds: Vec<_> = recs.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::Optimization,
                RecommendationKind::Maintenance,
                RecommendationKind::CustomerManagement,
            ]
        );
        assert_eq!(recs[0].priority, Priority::High);
        assert!(recs[0].description.contains("Excavator"));
        assert!(!recs[0].description.contains("Bulldozer"));
        assert_eq!(recs[1].priority, Priority::Critical);
        assert!(recs[1].description.contains("Bulldozer (2)"));
        assert_eq!(recs[2].priority, Priority::Medium);
    }

    #[test]
    fn healthy_fleet_needs_nothing() {
        let insights = InsightSets {
            equipment_performance: vec![perf("Excavator", 70.0, 0)],
            customer_behavior: vec![segment("Corporate", 2.0)],
            seasonal_trends: Vec::new(),
        };
        assert!(generate_recommendations(&insights).is_empty());
    }

    #[test]
    fn only_corporate_overdue_counts() {
        let insights = InsightSets {
            customer_behavior: vec![segment("Government", 9.0), segment("corporate", 3.0)],
            ..Default::default()
        };
        let recs = generate_recommendations(&insights);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::CustomerManagement);
    }

    #[test]
    fn serializes_with_wire_names() {
        let recs = generate_recommendations(&InsightSets {
            equipment_performance: vec![perf("Generator", 10.0, 1)],
            ..Default::default()
        });
        let json = serde_json::to_value(&recs[1]).unwrap();
        assert_eq!(json["type"], "maintenance");
        assert_eq!(json["priority"], "critical");
        assert_eq!(json["impact"], "reliability");
    }
}
