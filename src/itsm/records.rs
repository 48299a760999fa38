use serde::{Deserialize, Serialize};

/// Anything stored in a [`super::Collection`]: a record with a unique id and a
/// human-readable name used as its graph label.
pub trait Record {
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn display_name(&self) -> &str;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
    Pending,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
            Self::Pending => "Pending",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub created: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default)]
    pub related_ci_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub root_cause: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default)]
    pub related_risk_ids: Vec<String>,
    #[serde(default)]
    pub related_incidents: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    Standard,
    #[default]
    Normal,
    Emergency,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub change_type: ChangeType,
    #[serde(default)]
    pub implementation_date: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceHealth {
    #[default]
    Healthy,
    Degraded,
    Down,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub health: ServiceHealth,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CiType {
    #[default]
    Server,
    Application,
    Database,
    Network,
    Device,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigItem {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub ci_type: CiType,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub owner: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Epic {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub related_service_ids: Vec<String>,
    #[serde(default)]
    pub related_change_ids: Vec<String>,
    #[serde(default)]
    pub related_problem_ids: Vec<String>,
    #[serde(default)]
    pub related_risk_ids: Vec<String>,
    #[serde(default)]
    pub related_goal_ids: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskRating {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskRating {
    pub fn from_score(score: u8) -> Self {
        if score >= 15 {
            Self::Critical
        } else if score >= 10 {
            Self::High
        } else if score >= 5 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default = "default_likert")]
    pub likelihood: u8,
    #[serde(default = "default_likert")]
    pub impact: u8,
    #[serde(default)]
    pub related_service_ids: Vec<String>,
    #[serde(default)]
    pub related_epic_ids: Vec<String>,
    #[serde(default, rename = "relatedAIServiceIds")]
    pub related_ai_service_ids: Vec<String>,
    #[serde(default)]
    pub related_goal_ids: Vec<String>,
}

fn default_likert() -> u8 {
    1
}

impl Risk {
    /// Likelihood times impact, each clamped to the 1..=5 scale.
    pub fn score(&self) -> u8 {
        self.likelihood.clamp(1, 5) * self.impact.clamp(1, 5)
    }

    pub fn rating(&self) -> RiskRating {
        RiskRating::from_score(self.score())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiService {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default)]
    pub related_risk_ids: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmdbGroup {
    Process,
    Application,
    Server,
    Database,
    Network,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CmdbNode {
    pub id: String,
    pub group: CmdbGroup,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CmdbLink {
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CmdbTopology {
    #[serde(default)]
    pub nodes: Vec<CmdbNode>,
    #[serde(default)]
    pub links: Vec<CmdbLink>,
}

impl CmdbTopology {
    pub fn node(&self, id: &str) -> Option<&CmdbNode> {
        self.nodes.iter().find(|node| node.id.trim() == id.trim())
    }
}

macro_rules! impl_record {
    ($ty:ty, $kind:literal, $name:ident) => {
        impl Record for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn display_name(&self) -> &str {
                &self.$name
            }
        }
    };
}

impl_record!(Incident, "incident", title);
impl_record!(Problem, "problem", title);
impl_record!(ChangeRequest, "change", title);
impl_record!(Service, "service", name);
impl_record!(ConfigItem, "configuration item", name);
impl_record!(Epic, "epic", title);
impl_record!(Risk, "risk", title);
impl_record!(AiService, "AI service", name);
impl_record!(Goal, "goal", name);

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::floor(1, 1, RiskRating::Low)]
    #[case::medium_edge(1, 5, RiskRating::Medium)]
    #[case::high_edge(2, 5, RiskRating::High)]
    #[case::critical_edge(3, 5, RiskRating::Critical)]
    #[case::ceiling(5, 5, RiskRating::Critical)]
    fn risk_rating_thresholds(
        #[case] likelihood: u8,
        #[case] impact: u8,
        #[case] expected: RiskRating,
    ) {
        let risk = Risk {
            likelihood,
            impact,
            ..Risk::default()
        };
        assert_eq!(risk.rating(), expected);
    }

    #[test]
    fn risk_score_clamps_out_of_scale_inputs() {
        let risk = Risk {
            likelihood: 9,
            impact: 0,
            ..Risk::default()
        };
        assert_eq!(risk.score(), 5);
    }

    #[test]
    fn incident_json_uses_camel_case_field_names() {
        let incident: Incident = serde_json::from_str(
            r#"{
                "id": "INC-1",
                "title": "Mail down",
                "status": "In Progress",
                "serviceId": "SVC001",
                "relatedCiIds": ["CI-1"],
                "problemId": ""
            }"#,
        )
        .expect("valid incident JSON");

        assert_eq!(incident.status, Status::InProgress);
        assert_eq!(incident.service_id.as_deref(), Some("SVC001"));
        assert_eq!(incident.related_ci_ids, vec!["CI-1".to_owned()]);
        assert_eq!(incident.problem_id.as_deref(), Some(""));
        assert!(incident.change_id.is_none());
    }

    #[test]
    fn risk_reads_ai_service_relation() {
        let risk: Risk = serde_json::from_str(
            r#"{"id": "RSK-1", "title": "t", "relatedAIServiceIds": ["AI-002"]}"#,
        )
        .expect("valid risk JSON");
        assert_eq!(risk.related_ai_service_ids, vec!["AI-002".to_owned()]);
        assert_eq!(risk.score(), 1);
    }
}
