use eframe::egui::{RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::context::Focus;
use crate::itsm::{ItsmStore, Record};

use super::super::{EntityTab, ViewModel};

struct EntityRow {
    focus: Focus,
    title: String,
    detail: Option<String>,
}

fn record_rows<'a, T: Record + 'a>(
    records: impl IntoIterator<Item = &'a T>,
    focus: impl Fn(String) -> Focus,
    detail: impl Fn(&T) -> Option<String>,
) -> Vec<EntityRow> {
    records
        .into_iter()
        .map(|record| EntityRow {
            focus: focus(record.id().to_owned()),
            title: format!("{}  {}", record.id(), record.display_name()),
            detail: detail(record),
        })
        .collect()
}

fn entity_rows(store: &ItsmStore, tab: EntityTab) -> Vec<EntityRow> {
    match tab {
        EntityTab::Incidents => record_rows(store.incidents.iter(), Focus::Incident, |incident| {
            Some(format!("{:?} | {}", incident.priority, incident.status.label()))
        }),
        EntityTab::Problems => record_rows(store.problems.iter(), Focus::Problem, |problem| {
            Some(problem.status.label().to_owned())
        }),
        EntityTab::Risks => record_rows(store.risks.iter(), Focus::Risk, |risk| {
            Some(format!("score {} | {}", risk.score(), risk.rating().label()))
        }),
        EntityTab::Epics => record_rows(store.epics.iter(), Focus::Epic, |epic| {
            (!epic.owner.is_empty()).then(|| epic.owner.clone())
        }),
        EntityTab::AiServices => {
            record_rows(store.ai_services.iter(), Focus::AiService, |_| None)
        }
        EntityTab::ConfigItems => {
            record_rows(store.config_items.iter(), Focus::ConfigItem, |item| {
                Some(format!("{:?}", item.ci_type))
            })
        }
        EntityTab::Cmdb => {
            let mut rows = vec![EntityRow {
                focus: Focus::Topology,
                title: "Full CMDB topology".to_owned(),
                detail: Some(format!(
                    "{} nodes | {} links",
                    store.topology.nodes.len(),
                    store.topology.links.len()
                )),
            }];
            rows.extend(store.topology.nodes.iter().map(|node| {
                let detail = if store.config_items.contains(&node.id) {
                    format!("{:?} | CI record", node.group)
                } else {
                    format!("{:?}", node.group)
                };
                EntityRow {
                    focus: Focus::ConfigItem(node.id.clone()),
                    title: format!("{}  {}", node.id, node.label),
                    detail: Some(detail),
                }
            }));
            rows
        }
    }
}

/// Whether the dataset has nothing to list under `tab`, as opposed to a
/// search that filtered every row out.
fn tab_is_empty(store: &ItsmStore, tab: EntityTab) -> bool {
    match tab {
        EntityTab::Incidents => store.incidents.is_empty(),
        EntityTab::Problems => store.problems.is_empty(),
        EntityTab::Risks => store.risks.is_empty(),
        EntityTab::Epics => store.epics.is_empty(),
        EntityTab::AiServices => store.ai_services.is_empty(),
        EntityTab::ConfigItems => store.config_items.is_empty(),
        EntityTab::Cmdb => false,
    }
}

/// Keeps rows whose title fuzzy-matches `query`, best match first.
fn filter_rows(rows: Vec<EntityRow>, query: &str) -> Vec<EntityRow> {
    let query = query.trim();
    if query.is_empty() {
        return rows;
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut scored = rows
        .into_iter()
        .filter_map(|row| matcher.fuzzy_match(&row.title, query).map(|score| (score, row)))
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, row)| row).collect()
}

impl ViewModel {
    pub(in crate::app) fn draw_entity_list(&mut self, ui: &mut Ui) {
        ui.heading("Entities");
        ui.add_space(4.0);

        ui.horizontal_wrapped(|ui| {
            for tab in EntityTab::ALL {
                ui.selectable_value(&mut self.entity_tab, tab, tab.label());
            }
        });

        ui.add_space(4.0);
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Fuzzy-filter this list and highlight matching graph nodes.");
        ui.add_space(4.0);

        if tab_is_empty(&self.store, self.entity_tab) {
            ui.label(format!("No {} in this dataset.", self.entity_tab.label()));
            return;
        }
        let rows = filter_rows(entity_rows(&self.store, self.entity_tab), &self.search);
        if rows.is_empty() {
            ui.label("No matching entities.");
            return;
        }

        let mut pending_focus = None;
        for row in rows {
            let current = row.focus == self.focus;
            let response = ui.selectable_label(current, RichText::new(&row.title).strong());
            if let Some(detail) = &row.detail {
                ui.small(detail.as_str());
            }
            if response.clicked() && !current {
                pending_focus = Some(row.focus);
            }
            ui.add_space(2.0);
        }

        if let Some(focus) = pending_focus {
            self.set_focus(focus);
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::itsm::sample_dataset;

    fn store() -> ItsmStore {
        ItsmStore::from_dataset(sample_dataset()).unwrap()
    }

    #[rstest]
    #[case::incidents(EntityTab::Incidents)]
    #[case::problems(EntityTab::Problems)]
    #[case::risks(EntityTab::Risks)]
    #[case::epics(EntityTab::Epics)]
    #[case::ai_services(EntityTab::AiServices)]
    #[case::config_items(EntityTab::ConfigItems)]
    fn every_record_tab_lists_records(#[case] tab: EntityTab) {
        assert!(!entity_rows(&store(), tab).is_empty());
    }

    #[test]
    fn cmdb_tab_starts_with_topology() {
        let store = store();
        let rows = entity_rows(&store, EntityTab::Cmdb);

        assert_eq!(rows[0].focus, Focus::Topology);
        assert_eq!(rows.len(), store.topology.nodes.len() + 1);
    }

    #[test]
    fn risk_rows_show_rating() {
        let rows = entity_rows(&store(), EntityTab::Risks);
        assert!(
            rows.iter()
                .all(|row| row.detail.as_deref().is_some_and(|d| d.starts_with("score ")))
        );
    }

    #[test]
    fn filter_keeps_matches_only() {
        let rows = entity_rows(&store(), EntityTab::Risks);
        let filtered = filter_rows(rows, "RSK-003");

        assert!(!filtered.is_empty());
        assert_eq!(filtered[0].focus, Focus::Risk("RSK-003".to_owned()));
    }

    #[test]
    fn empty_query_keeps_order() {
        let rows = entity_rows(&store(), EntityTab::Risks);
        let ids = rows.iter().map(|row| row.focus.clone()).collect::<Vec<_>>();
        let filtered = filter_rows(rows, "  ");

        assert_eq!(
            filtered.iter().map(|row| row.focus.clone()).collect::<Vec<_>>(),
            ids
        );
    }

    #[test]
    fn empty_collections_are_told_apart_from_filtered_lists() {
        let empty = ItsmStore::default();
        let sample = store();

        assert!(tab_is_empty(&empty, EntityTab::Risks));
        assert!(!tab_is_empty(&empty, EntityTab::Cmdb));
        assert!(!tab_is_empty(&sample, EntityTab::Risks));
        assert!(filter_rows(entity_rows(&sample, EntityTab::Risks), "zzzzqqq").is_empty());
    }

    #[test]
    fn cmdb_rows_flag_nodes_with_ci_records() {
        let rows = entity_rows(&store(), EntityTab::Cmdb);
        let detail = |id: &str| {
            rows.iter()
                .find(|row| row.focus == Focus::ConfigItem(id.to_owned()))
                .and_then(|row| row.detail.clone())
                .unwrap()
        };

        assert_eq!(detail("CI-DB-001"), "Database | CI record");
        assert_eq!(detail("BP-001"), "Process");
    }
}
