//! Staffing recommendations produced by an external LLM-style generator.
//!
//! This module owns the request shape (prompt plus JSON response contract),
//! strict parsing of the response, and the risk/priority breakdowns.

use super::domain::{wire_enum, InvalidEnumValue};
use super::report::distribution::{aggregate_distribution, DistributionEntry};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

wire_enum! {
    pub enum RiskLevel as "risk_level" {
        Critical => "critical",
        High => "high",
        Moderate => "moderate",
        Low => "low",
    }
}

wire_enum! {
    pub enum Priority as "priority" {
        Immediate => "immediate",
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub operator_name: String,
    pub recommended_role: String,
    pub current_readiness: String,
    pub risk_level: RiskLevel,
    pub action: String,
    pub rationale: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub recommendations: Vec<Recommendation>,
}

/// Response item as sent by the generator, before enum validation.
#[derive(Debug, Deserialize)]
struct RawRecommendation {
    #[serde(default)]
    operator_name: String,
    #[serde(default)]
    recommended_role: String,
    #[serde(default)]
    current_readiness: String,
    risk_level: String,
    #[serde(default)]
    action: String,
    #[serde(default)]
    rationale: String,
    priority: String,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    recommendations: Vec<RawRecommendation>,
}

#[derive(Debug, thiserror::Error)]
pub enum RecommendationParseError {
    #[error("malformed recommendation payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidEnumValue(#[from] InvalidEnumValue),
}

impl RecommendationSet {
    /// Parses a generator response. A missing `recommendations` key yields an empty set.
    pub fn from_json(raw: &str) -> Result<Self, RecommendationParseError> {
        let response: RawResponse = serde_json::from_str(raw)?;
        let recommendations = response
            .recommendations
            .into_iter()
            .map(|item| -> Result<Recommendation, InvalidEnumValue> {
                Ok(Recommendation {
                    risk_level: item.risk_level.parse()?,
                    priority: item.priority.parse()?,
                    operator_name: item.operator_name,
                    recommended_role: item.recommended_role,
                    current_readiness: item.current_readiness,
                    action: item.action,
                    rationale: item.rationale,
                })
            })
            .collect::<Result<Vec<_>, InvalidEnumValue>>()?;

        Ok(Self { recommendations })
    }

    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}

/// JSON response-shape contract attached to every recommendation request.
pub fn response_schema() -> Value {
    let risk_levels: Vec<&str> = RiskLevel::ordered()
        .iter()
        .rev()
        .map(|level| level.as_str())
        .collect();
    let priorities: Vec<&str> = Priority::ordered()
        .iter()
        .map(|priority| priority.as_str())
        .collect();

    json!({
        "type": "object",
        "properties": {
            "recommendations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "operator_name": { "type": "string" },
                        "recommended_role": { "type": "string" },
                        "current_readiness": { "type": "string" },
                        "risk_level": { "type": "string", "enum": risk_levels },
                        "action": { "type": "string" },
                        "rationale": { "type": "string" },
                        "priority": { "type": "string", "enum": priorities }
                    }
                }
            }
        }
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationRequest {
    pub prompt: String,
    pub response_schema: Value,
}

/// External recommendation service (an LLM endpoint in production).
pub trait RecommendationGenerator: Send + Sync {
    fn generate(&self, request: &RecommendationRequest)
        -> Result<RecommendationSet, GeneratorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("recommendation generator unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Malformed(#[from] RecommendationParseError),
}

/// Generator replaying a fixed response body, used offline and in demos.
#[derive(Debug, Clone)]
pub struct CannedRecommendationGenerator {
    body: String,
}

impl CannedRecommendationGenerator {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Replays the reference three-driver response.
    pub fn reference() -> Self {
        Self::new(include_str!("../../fixtures/reference_recommendations.json"))
    }
}

impl RecommendationGenerator for CannedRecommendationGenerator {
    fn generate(
        &self,
        _request: &RecommendationRequest,
    ) -> Result<RecommendationSet, GeneratorError> {
        Ok(RecommendationSet::from_json(&self.body)?)
    }
}

pub fn aggregate_risk_distribution(
    recommendations: &[Recommendation],
) -> Vec<DistributionEntry<RiskLevel>> {
    aggregate_distribution(
        recommendations.iter().map(|rec| rec.risk_level),
        RiskLevel::ordered(),
    )
}

pub fn aggregate_priority_distribution(
    recommendations: &[Recommendation],
) -> Vec<DistributionEntry<Priority>> {
    aggregate_distribution(
        recommendations.iter().map(|rec| rec.priority),
        Priority::ordered(),
    )
}

/// Generator output bundled with its breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationReport {
    pub recommendations: Vec<Recommendation>,
    pub risk_distribution: Vec<DistributionEntry<RiskLevel>>,
    pub priority_distribution: Vec<DistributionEntry<Priority>>,
}

impl From<RecommendationSet> for RecommendationReport {
    fn from(set: RecommendationSet) -> Self {
        let risk_distribution = aggregate_risk_distribution(&set.recommendations);
        let priority_distribution = aggregate_priority_distribution(&set.recommendations);
        Self {
            recommendations: set.recommendations,
            risk_distribution,
            priority_distribution,
        }
    }
}
