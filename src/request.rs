use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::api::{Api, AvailabilityRequest};
use crate::engine::{
    Condition, ConditionGroup, EngineError, ResourceResult, FIELD_ID, FIELD_NAME, FIELD_PARENT,
    FIELD_RESOURCE_TYPE,
};
use crate::error::Result;
use crate::model::Span;

pub const DEFAULT_FIELDS: [&str; 4] = [FIELD_ID, FIELD_NAME, FIELD_RESOURCE_TYPE, FIELD_PARENT];

/// Describes which resources to fetch and what to attach to them.
///
/// Builder calls may come in any order; `get_results` always fetches resources,
/// links the hierarchy, attaches availability, then services, and filters last.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
    fields: Vec<String>,
    parent_id: Option<String>,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    services: bool,
    conditions: Vec<ConditionGroup>,
}

impl Default for ResourceRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceRequest {
    pub fn new() -> Self {
        Self {
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            parent_id: None,
            window: None,
            services: false,
            conditions: Vec::new(),
        }
    }

    pub fn with_additional_field(mut self, field: impl Into<String>) -> Self {
        self.add_field(field.into());
        self
    }

    pub fn with_additional_fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        for field in fields {
            self.add_field(field.into());
        }
        self
    }

    /// Restrict to the descendants of `parent_id`.
    pub fn with_children_of(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_available_slots_between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.window = Some((start, end));
        self
    }

    /// Attach service availability. Needs an availability window.
    pub fn with_services(mut self) -> Self {
        self.services = true;
        self
    }

    /// Add `condition` as its own alternative.
    pub fn with_condition(self, condition: Condition) -> Self {
        self.with_condition_group(vec![condition])
    }

    /// Add an alternative that matches only when every condition in `group` does.
    pub fn with_condition_group(mut self, group: ConditionGroup) -> Self {
        for condition in &group {
            self.add_field(condition.field.clone());
        }
        self.conditions.push(group);
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn conditions(&self) -> &[ConditionGroup] {
        &self.conditions
    }

    fn add_field(&mut self, field: String) {
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
    }

    fn window_span(&self) -> std::result::Result<Option<Span>, EngineError> {
        let Some((start, end)) = self.window else {
            return Ok(None);
        };
        let (start, end) = (start.timestamp_millis(), end.timestamp_millis());
        if start >= end {
            return Err(EngineError::InvalidPeriod { start, end });
        }
        Ok(Some(Span::new(start, end)))
    }

    pub async fn get_results(&self, api: &dyn Api) -> Result<ResourceResult> {
        let window = self.window_span()?;

        let records = match &self.parent_id {
            Some(parent_id) => api.get_child_resources(parent_id, &self.fields).await?,
            None => api.get_resources(&self.fields).await?,
        };
        debug!(resources = records.len(), parent = ?self.parent_id, "fetched resources");

        let mut result = ResourceResult::new(records);
        if let Some(window) = window {
            result = result.with_window(window);
        }
        result.compute_tree_structure();

        match self.window {
            Some((start, end)) if !result.is_empty() => {
                let request = AvailabilityRequest {
                    start_date_time: start,
                    end_date_time: end,
                    resource_ids: result.resource_ids().into_iter().map(String::from).collect(),
                };
                if self.services {
                    let (availability, services) = futures::try_join!(
                        api.get_availability(&request),
                        api.get_service_availability(&request)
                    )?;
                    result.add_availability_slot_data(&availability)?;
                    result.add_service_slot_data(&services);
                } else {
                    let availability = api.get_availability(&request).await?;
                    result.add_availability_slot_data(&availability)?;
                }
            }
            Some(_) => {}
            None if self.services => warn!("services requested without an availability window, skipping"),
            None => {}
        }

        result.filter_on_conditions(&self.conditions);
        Ok(result)
    }
}
