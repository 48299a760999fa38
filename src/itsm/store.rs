use std::collections::HashMap;

use thiserror::Error;

use super::dataset::Dataset;
use super::records::{
    AiService, ChangeRequest, CmdbTopology, ConfigItem, Epic, Goal, Incident, Problem, Record, Risk,
    Service,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} `{id}` already exists")]
    Duplicate { kind: &'static str, id: String },
    #[error("{kind} `{id}` does not exist")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} record has a blank id")]
    BlankId { kind: &'static str },
}

/// Ordered records of one type with an id index kept in sync on every write.
#[derive(Clone, Debug)]
pub struct Collection<T> {
    records: Vec<T>,
    index_by_id: HashMap<String, usize>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index_by_id: HashMap::new(),
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn from_records(records: Vec<T>) -> Result<Self, StoreError> {
        let mut collection = Self::default();
        collection.records.reserve(records.len());
        for record in records {
            collection.create(record)?;
        }
        Ok(collection)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index_by_id
            .get(id)
            .and_then(|&index| self.records.get(index))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn create(&mut self, record: T) -> Result<(), StoreError> {
        let id = record.id();
        if id.trim().is_empty() {
            return Err(StoreError::BlankId { kind: T::KIND });
        }
        if self.index_by_id.contains_key(id) {
            return Err(StoreError::Duplicate {
                kind: T::KIND,
                id: id.to_owned(),
            });
        }

        self.index_by_id.insert(id.to_owned(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Replaces the record with the same id and hands back the previous one.
    pub fn update(&mut self, record: T) -> Result<T, StoreError> {
        let Some(&index) = self.index_by_id.get(record.id()) else {
            return Err(StoreError::NotFound {
                kind: T::KIND,
                id: record.id().to_owned(),
            });
        };
        Ok(std::mem::replace(&mut self.records[index], record))
    }

    /// Nothing in the viewer deletes records, so only tests build this.
    #[cfg(test)]
    pub fn remove(&mut self, id: &str) -> Result<T, StoreError> {
        let Some(index) = self.index_by_id.remove(id) else {
            return Err(StoreError::NotFound {
                kind: T::KIND,
                id: id.to_owned(),
            });
        };

        let removed = self.records.remove(index);
        for (offset, record) in self.records.iter().enumerate().skip(index) {
            if let Some(slot) = self.index_by_id.get_mut(record.id()) {
                *slot = offset;
            }
        }
        Ok(removed)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read-only view of the ITSM records, injected into the graph builder.
pub trait Lookup {
    fn incident(&self, id: &str) -> Option<&Incident>;
    fn problem(&self, id: &str) -> Option<&Problem>;
    fn change(&self, id: &str) -> Option<&ChangeRequest>;
    fn service(&self, id: &str) -> Option<&Service>;
    fn config_item(&self, id: &str) -> Option<&ConfigItem>;
    fn epic(&self, id: &str) -> Option<&Epic>;
    fn risk(&self, id: &str) -> Option<&Risk>;
    fn ai_service(&self, id: &str) -> Option<&AiService>;
    fn goal(&self, id: &str) -> Option<&Goal>;

    /// Every problem, for reverse lookups (problems that reference a risk).
    fn problems(&self) -> &[Problem];
    /// Every incident, for reverse lookups (incidents that reference a CI).
    fn incidents(&self) -> &[Incident];
    fn topology(&self) -> &CmdbTopology;
}

#[derive(Clone, Debug, Default)]
pub struct ItsmStore {
    pub incidents: Collection<Incident>,
    pub problems: Collection<Problem>,
    pub changes: Collection<ChangeRequest>,
    pub services: Collection<Service>,
    pub config_items: Collection<ConfigItem>,
    pub epics: Collection<Epic>,
    pub risks: Collection<Risk>,
    pub ai_services: Collection<AiService>,
    pub goals: Collection<Goal>,
    pub topology: CmdbTopology,
}

impl ItsmStore {
    pub fn from_dataset(dataset: Dataset) -> Result<Self, StoreError> {
        Ok(Self {
            incidents: Collection::from_records(dataset.incidents)?,
            problems: Collection::from_records(dataset.problems)?,
            changes: Collection::from_records(dataset.changes)?,
            services: Collection::from_records(dataset.services)?,
            config_items: Collection::from_records(dataset.configuration_items)?,
            epics: Collection::from_records(dataset.epics)?,
            risks: Collection::from_records(dataset.risks)?,
            ai_services: Collection::from_records(dataset.ai_services)?,
            goals: Collection::from_records(dataset.goals)?,
            topology: dataset.cmdb,
        })
    }

    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            incidents: self.incidents.as_slice().to_vec(),
            problems: self.problems.as_slice().to_vec(),
            changes: self.changes.as_slice().to_vec(),
            services: self.services.as_slice().to_vec(),
            configuration_items: self.config_items.as_slice().to_vec(),
            epics: self.epics.as_slice().to_vec(),
            risks: self.risks.as_slice().to_vec(),
            ai_services: self.ai_services.as_slice().to_vec(),
            goals: self.goals.as_slice().to_vec(),
            cmdb: self.topology.clone(),
        }
    }

    pub fn record_count(&self) -> usize {
        self.incidents.len()
            + self.problems.len()
            + self.changes.len()
            + self.services.len()
            + self.config_items.len()
            + self.epics.len()
            + self.risks.len()
            + self.ai_services.len()
            + self.goals.len()
    }
}

impl Lookup for ItsmStore {
    fn incident(&self, id: &str) -> Option<&Incident> {
        self.incidents.get(id)
    }

    fn problem(&self, id: &str) -> Option<&Problem> {
        self.problems.get(id)
    }

    fn change(&self, id: &str) -> Option<&ChangeRequest> {
        self.changes.get(id)
    }

    fn service(&self, id: &str) -> Option<&Service> {
        self.services.get(id)
    }

    fn config_item(&self, id: &str) -> Option<&ConfigItem> {
        self.config_items.get(id)
    }

    fn epic(&self, id: &str) -> Option<&Epic> {
        self.epics.get(id)
    }

    fn risk(&self, id: &str) -> Option<&Risk> {
        self.risks.get(id)
    }

    fn ai_service(&self, id: &str) -> Option<&AiService> {
        self.ai_services.get(id)
    }

    fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.get(id)
    }

    fn problems(&self) -> &[Problem] {
        self.problems.as_slice()
    }

    fn incidents(&self) -> &[Incident] {
        self.incidents.as_slice()
    }

    fn topology(&self) -> &CmdbTopology {
        &self.topology
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: &str, name: &str) -> Service {
        Service {
            id: id.to_owned(),
            name: name.to_owned(),
            ..Service::default()
        }
    }

    #[test]
    fn create_rejects_duplicate_and_blank_ids() {
        let mut services = Collection::default();
        services.create(service("SVC001", "Email")).unwrap();

        assert_eq!(
            services.create(service("SVC001", "Other")),
            Err(StoreError::Duplicate {
                kind: "service",
                id: "SVC001".to_owned()
            })
        );
        assert_eq!(
            services.create(service("  ", "Blank")),
            Err(StoreError::BlankId { kind: "service" })
        );
        assert_eq!(services.len(), 1);
    }

    #[test]
    fn update_returns_previous_record() {
        let mut services = Collection::from_records(vec![service("SVC001", "Email")]).unwrap();

        let previous = services.update(service("SVC001", "Mail")).unwrap();

        assert_eq!(previous.name, "Email");
        assert_eq!(services.get("SVC001").map(|s| s.name.as_str()), Some("Mail"));
        assert!(matches!(
            services.update(service("SVC404", "Ghost")),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn remove_keeps_remaining_lookups_valid() {
        let mut services = Collection::from_records(vec![
            service("SVC001", "Email"),
            service("SVC002", "CRM"),
            service("SVC003", "VPN"),
        ])
        .unwrap();

        let removed = services.remove("SVC001").unwrap();

        assert_eq!(removed.name, "Email");
        assert!(!services.contains("SVC001"));
        assert_eq!(services.get("SVC002").map(|s| s.name.as_str()), Some("CRM"));
        assert_eq!(services.get("SVC003").map(|s| s.name.as_str()), Some("VPN"));
        assert!(services.remove("SVC001").is_err());
    }

    #[test]
    fn dataset_with_duplicate_ids_is_rejected() {
        let dataset = Dataset {
            services: vec![service("SVC001", "Email"), service("SVC001", "Again")],
            ..Dataset::default()
        };
        assert!(matches!(
            ItsmStore::from_dataset(dataset),
            Err(StoreError::Duplicate { .. })
        ));
    }

    #[test]
    fn store_round_trips_through_dataset() {
        let store = ItsmStore::from_dataset(crate::itsm::sample_dataset()).unwrap();
        let again = ItsmStore::from_dataset(store.to_dataset()).unwrap();

        assert_eq!(store.record_count(), again.record_count());
        assert_eq!(
            store.risks.iter().map(|r| r.id.clone()).collect::<Vec<_>>(),
            again.risks.iter().map(|r| r.id.clone()).collect::<Vec<_>>()
        );
    }
}
