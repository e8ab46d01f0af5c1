#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use booker25::api::{Api, ApiError, AvailabilityRequest};
use booker25::records::{AvailabilityRecord, ResourceRecord, ServiceAvailabilityRecord};
use booker25::reservation::{
    PriceCalculationData, PriceCalculationRequest, ReservationSaveRequest, ReservationSaveResponse,
};

pub const H: i64 = 3_600_000;
/// 2022-01-01T00:00:00Z
pub const DAY_ONE: i64 = 1_640_995_200_000;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Resources(Vec<String>),
    Children(String, Vec<String>),
    Availability(AvailabilityRequest),
    ServiceAvailability(AvailabilityRequest),
    Save(ReservationSaveRequest),
    Price(PriceCalculationRequest),
}

/// Canned backend. Every call is recorded in `calls`.
#[derive(Default)]
pub struct MockApi {
    pub resources: Vec<ResourceRecord>,
    pub children: Vec<ResourceRecord>,
    pub availability: Vec<AvailabilityRecord>,
    pub service_availability: Vec<ServiceAvailabilityRecord>,
    pub save_response: Option<ReservationSaveResponse>,
    pub price_data: PriceCalculationData,
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl MockApi {
    pub fn calls(&self) -> Arc<Mutex<Vec<Call>>> {
        self.calls.clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Api for MockApi {
    async fn get_resources(&self, fields: &[String]) -> Result<Vec<ResourceRecord>, ApiError> {
        self.record(Call::Resources(fields.to_vec()));
        Ok(self.resources.clone())
    }

    async fn get_child_resources(
        &self,
        parent_id: &str,
        fields: &[String],
    ) -> Result<Vec<ResourceRecord>, ApiError> {
        self.record(Call::Children(parent_id.to_string(), fields.to_vec()));
        Ok(self.children.clone())
    }

    async fn get_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<Vec<AvailabilityRecord>, ApiError> {
        self.record(Call::Availability(request.clone()));
        Ok(self.availability.clone())
    }

    async fn get_service_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<Vec<ServiceAvailabilityRecord>, ApiError> {
        self.record(Call::ServiceAvailability(request.clone()));
        Ok(self.service_availability.clone())
    }

    async fn save_reservation(
        &self,
        request: &ReservationSaveRequest,
    ) -> Result<ReservationSaveResponse, ApiError> {
        self.record(Call::Save(request.clone()));
        self.save_response.clone().ok_or(ApiError::Status {
            endpoint: "reservations",
            status: 500,
            body: "no canned response".into(),
        })
    }

    async fn calculate_price(
        &self,
        request: &PriceCalculationRequest,
    ) -> Result<PriceCalculationData, ApiError> {
        self.record(Call::Price(request.clone()));
        Ok(self.price_data.clone())
    }
}

// ── JSON fixtures ────────────────────────────────────────────

pub fn rfc3339(ms: i64) -> String {
    booker25::model::ms_to_datetime(ms).to_rfc3339()
}

/// Slot as the availability endpoint sends it, hours relative to DAY_ONE.
pub fn slot_json(start_h: i64, end_h: i64, kind: &str) -> Value {
    json!({
        "dataObject": { "slotType": kind },
        "startTime": rfc3339(DAY_ONE + start_h * H),
        "endTime": rfc3339(DAY_ONE + end_h * H),
    })
}

pub fn availability(id: &str, slots: Vec<Value>) -> AvailabilityRecord {
    serde_json::from_value(json!({
        "startDateTime": rfc3339(DAY_ONE),
        "endDateTime": rfc3339(DAY_ONE + 24 * H),
        "dimensionId": id,
        "timeSlots": slots,
    }))
    .unwrap()
}

pub fn resources(rows: Value) -> Vec<ResourceRecord> {
    serde_json::from_value(rows).unwrap()
}
