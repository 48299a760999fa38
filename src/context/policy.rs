use serde::{Deserialize, Serialize};

/// Where an incident's configuration items hang in its context graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CiAttachment {
    /// Under the incident's service when that service resolves, else the incident.
    #[default]
    PreferService,
    /// Always directly under the incident.
    Focal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildPolicy {
    pub incident_ci_attachment: CiAttachment,
    /// Follow Risk -> Problem -> Incident for risk graphs.
    pub expand_risk_incidents: bool,
}

impl Default for BuildPolicy {
    fn default() -> Self {
        Self {
            incident_ci_attachment: CiAttachment::PreferService,
            expand_risk_incidents: true,
        }
    }
}
