use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::model::*;
use crate::records::ResourceRecord;

/// A resource enriched with its merged timeline and service catalogue.
///
/// Hierarchy links are ids into the owning [`ResourceResult`](super::ResourceResult);
/// resolve them through the result, never through a second ownership graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub resource_type: ResourceType,
    pub parent_id: Option<String>,
    /// Set by the graph builder only when the parent exists in the same result.
    pub(super) parent: Option<String>,
    pub(super) children: Vec<String>,
    services: BTreeMap<String, Service>,
    timeline: Option<Timeline>,
    pub properties: Properties,
}

impl Resource {
    pub fn from_record(record: ResourceRecord) -> Self {
        let ResourceRecord {
            id,
            name,
            resource_type_id,
            resource_type,
            parent_id,
            properties,
        } = record;
        let mut resource_type = resource_type.unwrap_or_default();
        if resource_type.id.is_none() {
            resource_type.id = resource_type_id;
        }
        Self {
            id,
            name: name.unwrap_or_default(),
            resource_type,
            parent_id,
            parent: None,
            children: Vec::new(),
            services: BTreeMap::new(),
            timeline: None,
            properties,
        }
    }

    // ── Timeline ─────────────────────────────────────────────

    /// Replace the merged timeline. Closure is always derived from this value.
    pub fn set_timeline(&mut self, timeline: Timeline) {
        self.timeline = Some(timeline);
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    /// Merged slots, empty while no availability has been attached.
    pub fn time_slots(&self) -> &[TimeSlot] {
        self.timeline.as_ref().map(Timeline::slots).unwrap_or(&[])
    }

    /// True once a timeline is attached and it holds no open slot.
    /// A resource without availability data is never closed.
    pub fn is_closed(&self) -> bool {
        self.timeline.as_ref().is_some_and(|t| !t.has_open_slot())
    }

    // ── Services ─────────────────────────────────────────────

    /// Later entries for the same service id replace earlier ones.
    pub fn add_services(&mut self, services: impl IntoIterator<Item = Service>) {
        for service in services {
            self.services.insert(service.id.clone(), service);
        }
    }

    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    pub fn available_services(&self) -> impl Iterator<Item = &Service> {
        self.services.values().filter(|s| s.is_available())
    }

    pub fn service(&self, service_id: &str) -> Option<&Service> {
        self.services.get(service_id)
    }

    // ── Hierarchy links ──────────────────────────────────────

    /// Id of the resolved parent, `None` for roots and orphans.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Child ids as linked at tree-build time. May name resources removed since.
    pub fn child_ids(&self) -> &[String] {
        &self.children
    }

    // ── Custom properties ────────────────────────────────────

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }
}
