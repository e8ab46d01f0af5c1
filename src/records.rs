//! Record shapes returned by the Booker25 endpoints, already parsed from JSON.
//!
//! The engine consumes these as-is; nothing here performs validation beyond
//! what serde enforces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::*;

/// Flat resource row. Every field not modelled explicitly ends up in `properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "B25__Resource_Type__c", default)]
    pub resource_type_id: Option<String>,
    #[serde(rename = "B25__Resource_Type__r", default)]
    pub resource_type: Option<ResourceType>,
    #[serde(rename = "B25__Parent__c", default)]
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub properties: Properties,
}

impl ResourceRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            resource_type_id: None,
            resource_type: None,
            parent_id: None,
            properties: Properties::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotData {
    pub slot_type: SlotKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimeSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub data_object: SlotData,
}

impl RawTimeSlot {
    pub fn start_ms(&self) -> Ms {
        self.start_time.timestamp_millis()
    }

    pub fn end_ms(&self) -> Ms {
        self.end_time.timestamp_millis()
    }

    pub fn kind(&self) -> SlotKind {
        self.data_object.slot_type
    }
}

/// Availability of one resource ("dimension") over the period the server evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRecord {
    pub dimension_id: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    #[serde(default)]
    pub time_slots: Vec<RawTimeSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRef {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(flatten)]
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub service: ServiceRef,
    #[serde(default)]
    pub time_slots: Vec<RawTimeSlot>,
}

impl ServiceRecord {
    /// Lift into the engine's service type. Slots with an inverted range are dropped.
    pub fn to_service(&self) -> Service {
        let time_slots = self
            .time_slots
            .iter()
            .filter(|s| s.start_ms() < s.end_ms())
            .map(|s| ServiceSlot {
                span: Span::new(s.start_ms(), s.end_ms()),
                kind: s.kind(),
                quantity: s.data_object.quantity.unwrap_or(0.0),
            })
            .collect();
        Service {
            id: self.service.id.clone(),
            properties: self.service.properties.clone(),
            time_slots,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAvailabilityRecord {
    pub dimension_id: String,
    #[serde(default)]
    pub start_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
}
