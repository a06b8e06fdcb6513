//! Request and response shapes for the advisor endpoints.
//!
//! The model is asked for JSON, but its output is only mostly reliable:
//! numbers come back as strings, fields go missing, confidences drift out of
//! range. Each response type therefore has a `Raw*` twin that deserializes
//! leniently and a `coerce` step that produces the stable shape clients see.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Client request for a project cost estimate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub project_type: String,
    pub description: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
}

/// One line of an estimate breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub item: String,
    pub cost: Decimal,
}

/// A project cost estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEstimate {
    pub estimated_cost: Decimal,
    pub breakdown: Vec<CostLine>,
    /// Model self-assessed confidence, clamped to `[0, 1]`.
    pub confidence: f64,
    pub timeline: String,
    pub recommendations: Vec<String>,
}

/// Client request for product recommendations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub project_type: String,
    #[serde(default)]
    pub budget: Option<Decimal>,
    #[serde(default)]
    pub preferences: Option<String>,
}

/// A single recommended product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSuggestion {
    pub name: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Product recommendations for a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecommendations {
    pub recommendations: Vec<ProductSuggestion>,
    pub total_estimated_cost: Decimal,
}

/// Client request for a deposit plan.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositCalcRequest {
    #[serde(rename = "type")]
    pub project_type: String,
    pub budget: Decimal,
    #[serde(default)]
    pub complexity: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
}

/// One milestone in a deposit payment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub milestone: String,
    pub amount: Decimal,
}

/// A recommended deposit plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositPlan {
    pub recommended_deposit: Decimal,
    pub percentage: u32,
    pub reasoning: String,
    pub payment_schedule: Vec<ScheduleEntry>,
}

/// One prior exchange in a chat session, used as model context.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub message: String,
    pub response: String,
}

/// A number the model may have rendered as a JSON string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    pub(crate) fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Decimal::try_from(*n).ok(),
            Self::Text(s) => s.trim().trim_start_matches('$').replace(',', "").parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCostLine {
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub cost: Option<LooseNumber>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawProjectEstimate {
    #[serde(default)]
    pub estimated_cost: Option<LooseNumber>,
    #[serde(default)]
    pub breakdown: Vec<RawCostLine>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl RawProjectEstimate {
    pub(crate) fn coerce(self) -> ProjectEstimate {
        ProjectEstimate {
            estimated_cost: self
                .estimated_cost
                .and_then(|n| n.to_decimal())
                .unwrap_or(Decimal::ZERO),
            breakdown: self
                .breakdown
                .into_iter()
                .filter_map(|line| {
                    Some(CostLine {
                        item: line.item?,
                        cost: line.cost.and_then(|n| n.to_decimal())?,
                    })
                })
                .collect(),
            confidence: self.confidence.unwrap_or(0.5).clamp(0.0, 1.0),
            timeline: self.timeline.unwrap_or_else(|| "4-6 weeks".to_owned()),
            recommendations: self.recommendations,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawProductSuggestion {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawProductRecommendations {
    #[serde(default)]
    pub recommendations: Vec<RawProductSuggestion>,
    #[serde(default)]
    pub total_estimated_cost: Option<LooseNumber>,
}

impl RawProductRecommendations {
    pub(crate) fn coerce(self) -> ProductRecommendations {
        ProductRecommendations {
            recommendations: self
                .recommendations
                .into_iter()
                .filter_map(|s| {
                    Some(ProductSuggestion {
                        name: s.name?,
                        reason: s.reason,
                    })
                })
                .collect(),
            total_estimated_cost: self
                .total_estimated_cost
                .and_then(|n| n.to_decimal())
                .unwrap_or(Decimal::ZERO),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawScheduleEntry {
    #[serde(default)]
    pub milestone: Option<String>,
    #[serde(default)]
    pub amount: Option<LooseNumber>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawDepositPlan {
    #[serde(default)]
    pub recommended_deposit: Option<LooseNumber>,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub payment_schedule: Vec<RawScheduleEntry>,
}

impl RawDepositPlan {
    pub(crate) fn coerce(self) -> Option<DepositPlan> {
        // Without a usable deposit figure the whole plan is worthless;
        // callers fall back to the rule-based calculation instead.
        let recommended_deposit = self.recommended_deposit?.to_decimal()?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percentage = self.percentage.unwrap_or(0.0).round().max(0.0) as u32;
        Some(DepositPlan {
            recommended_deposit,
            percentage,
            reasoning: self.reasoning.unwrap_or_default(),
            payment_schedule: self
                .payment_schedule
                .into_iter()
                .filter_map(|e| {
                    Some(ScheduleEntry {
                        milestone: e.milestone?,
                        amount: e.amount.and_then(|n| n.to_decimal())?,
                    })
                })
                .collect(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_coercion_defaults() {
        let raw: RawProjectEstimate = serde_json::from_str("{}").unwrap();
        let estimate = raw.coerce();
        assert_eq!(estimate.estimated_cost, Decimal::ZERO);
        assert!(estimate.breakdown.is_empty());
        assert!((estimate.confidence - 0.5).abs() < f64::EPSILON);
        assert_eq!(estimate.timeline, "4-6 weeks");
    }

    #[test]
    fn test_confidence_clamped() {
        let raw: RawProjectEstimate =
            serde_json::from_str(r#"{"confidence": 1.7}"#).unwrap();
        assert!((raw.coerce().confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stringly_numbers_accepted() {
        let raw: RawProjectEstimate = serde_json::from_str(
            r#"{"estimatedCost": "$45,000", "breakdown": [{"item": "Foundation", "cost": 12000}]}"#,
        )
        .unwrap();
        let estimate = raw.coerce();
        assert_eq!(estimate.estimated_cost, Decimal::from(45_000));
        assert_eq!(estimate.breakdown[0].cost, Decimal::from(12_000));
    }

    #[test]
    fn test_deposit_plan_without_amount_is_rejected() {
        let raw: RawDepositPlan =
            serde_json::from_str(r#"{"percentage": 30, "reasoning": "standard"}"#).unwrap();
        assert!(raw.coerce().is_none());
    }

    #[test]
    fn test_deposit_plan_coercion() {
        let raw: RawDepositPlan = serde_json::from_str(
            r#"{
                "recommendedDeposit": "30000",
                "percentage": 30,
                "reasoning": "Commercial builds carry higher upfront material costs.",
                "paymentSchedule": [{"milestone": "Signing", "amount": 30000}]
            }"#,
        )
        .unwrap();
        let plan = raw.coerce().unwrap();
        assert_eq!(plan.recommended_deposit, Decimal::from(30_000));
        assert_eq!(plan.percentage, 30);
        assert_eq!(plan.payment_schedule.len(), 1);
    }

    #[test]
    fn test_deposit_request_uses_type_key() {
        let req: DepositCalcRequest = serde_json::from_str(
            r#"{"type": "commercial", "budget": 100000}"#,
        )
        .unwrap();
        assert_eq!(req.project_type, "commercial");
        assert_eq!(req.budget, Decimal::from(100_000));
    }
}
