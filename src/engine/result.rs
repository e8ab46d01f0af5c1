use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::model::*;
use crate::observability;
use crate::records::{AvailabilityRecord, ResourceRecord, ServiceAvailabilityRecord};

use super::conditions::{matches_any, ConditionGroup};
use super::graph::link_hierarchy;
use super::timeline::merge_availability;
use super::{EngineError, Resource};

/// Owns every resource of a request, keyed by id.
///
/// Data arrives in phases: construct → `compute_tree_structure` →
/// `add_availability_slot_data` → `add_service_slot_data` → `filter_on_conditions`.
/// Removal is permanent; a pruned id never comes back.
#[derive(Debug, Clone, Default)]
pub struct ResourceResult {
    resources: BTreeMap<String, Resource>,
    /// Requested availability window; merged timelines are clipped to it.
    window: Option<Span>,
    tree_built: bool,
}

impl ResourceResult {
    pub fn new(records: impl IntoIterator<Item = ResourceRecord>) -> Self {
        let resources = records
            .into_iter()
            .map(|record| {
                let resource = Resource::from_record(record);
                (resource.id.clone(), resource)
            })
            .collect();
        Self {
            resources,
            window: None,
            tree_built: false,
        }
    }

    pub fn with_window(mut self, window: Span) -> Self {
        self.window = Some(window);
        self
    }

    pub fn window(&self) -> Option<Span> {
        self.window
    }

    /// Link parents and children. Only the first call does anything.
    pub fn compute_tree_structure(&mut self) -> &mut Self {
        if self.tree_built {
            warn!("tree structure already computed, ignoring");
            return self;
        }
        let links = link_hierarchy(&mut self.resources);
        self.tree_built = true;
        debug!(resources = self.resources.len(), links, "computed tree structure");
        self
    }

    /// Attach merged timelines and prune resources that end up fully closed.
    ///
    /// Every record is merged before anything is attached, so malformed slot data
    /// leaves the result untouched. Records for unknown ids are ignored.
    pub fn add_availability_slot_data(&mut self, records: &[AvailabilityRecord]) -> Result<(), EngineError> {
        let mut merged = Vec::with_capacity(records.len());
        for record in records {
            if !self.resources.contains_key(&record.dimension_id) {
                continue;
            }
            merged.push((record.dimension_id.as_str(), merge_availability(record, self.window)?));
        }

        let mut pruned = 0u64;
        for (id, timeline) in merged {
            let Some(resource) = self.resources.get_mut(id) else {
                continue; // pruned by an earlier record for the same id
            };
            resource.set_timeline(timeline);
            if resource.is_closed() {
                self.resources.remove(id);
                pruned += 1;
            }
        }

        metrics::counter!(observability::RESOURCES_PRUNED_CLOSED_TOTAL).increment(pruned);
        debug!(records = records.len(), pruned, remaining = self.resources.len(), "attached availability");
        Ok(())
    }

    /// Merge service catalogues into the matching resources.
    pub fn add_service_slot_data(&mut self, records: &[ServiceAvailabilityRecord]) {
        let mut matched = 0usize;
        for record in records {
            let Some(resource) = self.resources.get_mut(&record.dimension_id) else {
                continue;
            };
            resource.add_services(record.services.iter().map(|s| s.to_service()));
            matched += 1;
        }
        debug!(records = records.len(), matched, "attached service availability");
    }

    /// Keep only resources satisfying at least one group. No groups is a no-op.
    pub fn filter_on_conditions(&mut self, groups: &[ConditionGroup]) {
        if groups.is_empty() {
            return;
        }
        let before = self.resources.len();
        self.resources.retain(|_, resource| matches_any(groups, resource));
        let dropped = (before - self.resources.len()) as u64;
        metrics::counter!(observability::RESOURCES_FILTERED_TOTAL).increment(dropped);
        debug!(groups = groups.len(), dropped, remaining = self.resources.len(), "filtered resources");
    }

    // ── Queries ──────────────────────────────────────────────

    pub fn number_of_resources(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn resource_ids(&self) -> Vec<&str> {
        self.resources.keys().map(String::as_str).collect()
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Direct lookup for well-formed record ids, first name match otherwise.
    ///
    /// A name that is itself 15 or 18 alphanumerics (`"ConferenceRoom1"`) is
    /// treated as an id and never matched by name; use `get_resource_by_name`.
    pub fn get_resource(&self, id_or_name: &str) -> Option<&Resource> {
        if is_record_id(id_or_name) {
            self.get_resource_by_id(id_or_name)
        } else {
            self.get_resource_by_name(id_or_name)
        }
    }

    pub fn get_resource_by_id(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    pub fn get_resource_by_name(&self, name: &str) -> Option<&Resource> {
        self.resources.values().find(|r| r.name == name)
    }

    /// Resolved parent, `None` for roots or when the parent has been removed.
    pub fn parent_of(&self, id: &str) -> Option<&Resource> {
        let parent_id = self.resources.get(id)?.parent()?;
        self.resources.get(parent_id)
    }

    /// Children still present in the result.
    pub fn children_of(&self, id: &str) -> Vec<&Resource> {
        self.resources.get(id).map_or_else(Vec::new, |r| {
            r.child_ids()
                .iter()
                .filter_map(|c| self.resources.get(c))
                .collect()
        })
    }

    /// Resources without a resolved parent still present in the result.
    pub fn roots(&self) -> impl Iterator<Item = &Resource> {
        self.resources
            .values()
            .filter(|r| r.parent().is_none_or(|pid| !self.resources.contains_key(pid)))
    }

    pub fn into_resources(self) -> Vec<Resource> {
        self.resources.into_values().collect()
    }
}
