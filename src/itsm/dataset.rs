use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::records::{
    AiService, ChangeRequest, CmdbTopology, ConfigItem, Epic, Goal, Incident, Problem, Risk,
    Service,
};
use super::store::ItsmStore;

/// On-disk shape of an ITSM dataset. Every section is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dataset {
    pub incidents: Vec<Incident>,
    pub problems: Vec<Problem>,
    pub changes: Vec<ChangeRequest>,
    pub services: Vec<Service>,
    pub configuration_items: Vec<ConfigItem>,
    pub epics: Vec<Epic>,
    pub risks: Vec<Risk>,
    pub ai_services: Vec<AiService>,
    pub goals: Vec<Goal>,
    pub cmdb: CmdbTopology,
}

pub fn parse_dataset(raw: &str) -> Result<ItsmStore> {
    let dataset: Dataset = serde_json::from_str(raw).context("invalid dataset JSON")?;
    ItsmStore::from_dataset(dataset).context("dataset contains conflicting records")
}

pub fn load_store(path: &Path) -> Result<ItsmStore> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    let store =
        parse_dataset(&raw).with_context(|| format!("failed to load dataset {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        records = store.record_count(),
        cmdb_nodes = store.topology.nodes.len(),
        "loaded dataset"
    );
    Ok(store)
}

pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    let json = serde_json::to_string_pretty(dataset).context("failed to encode dataset")?;
    fs::write(path, json).with_context(|| format!("failed to write dataset {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itsm::{Lookup, sample_dataset};

    #[test]
    fn sparse_dataset_loads_with_defaults() {
        let store = parse_dataset(
            r#"{
                "risks": [{"id": "RSK-1", "title": "Outage"}],
                "problems": [{"id": "PRB-1", "title": "Leak", "relatedRiskIds": ["RSK-1"]}]
            }"#,
        )
        .unwrap();

        assert_eq!(store.risks.len(), 1);
        assert!(store.incidents.is_empty());
        assert!(store.topology.nodes.is_empty());
        assert_eq!(store.problems()[0].related_risk_ids, vec!["RSK-1".to_owned()]);
    }

    #[test]
    fn malformed_json_reports_context() {
        let error = parse_dataset("{ not json").unwrap_err();
        assert!(format!("{error:#}").contains("invalid dataset JSON"));
    }

    #[test]
    fn exported_sample_loads_back_with_same_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.json");
        let dataset = sample_dataset();

        write_dataset(&path, &dataset).unwrap();
        let store = load_store(&path).unwrap();

        let ids = |items: &[Incident]| items.iter().map(|i| i.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(store.incidents()), ids(&dataset.incidents));
        assert_eq!(store.to_dataset(), dataset);
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = load_store(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(error.to_string().contains("/definitely/not/here.json"));
    }
}
