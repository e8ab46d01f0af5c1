//! Reservations and the request/response bodies used to save and price them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::model::Properties;

pub const FIELD_RESERVATION_ID: &str = "Id";
pub const FIELD_RESOURCE: &str = "B25__Resource__c";
pub const FIELD_START: &str = "B25__Start__c";
pub const FIELD_END: &str = "B25__End__c";
pub const FIELD_SERVICE: &str = "B25__Service__c";
pub const FIELD_QUANTITY: &str = "B25__Quantity__c";
pub const FIELD_UNIT_PRICE: &str = "B25__Unit_Price__c";

// ── Request / response bodies ────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationSaveRequest {
    pub reservation: Properties,
    pub lead_config: Option<Value>,
    pub contact_config: Option<Value>,
    pub service_reservations: Vec<Properties>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationSaveResponse {
    pub reservation: Properties,
    #[serde(default)]
    pub contact: Option<Properties>,
    #[serde(default)]
    pub lead: Option<Properties>,
    #[serde(default)]
    pub service_reservations: Option<Vec<Properties>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCalculationRequest {
    pub reservation: Properties,
    pub service_reservations: Vec<Properties>,
    pub service_costs: f64,
}

/// Fields the backend filled in during price calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCalculationData {
    #[serde(default)]
    pub reservation: Properties,
    #[serde(default)]
    pub service_reservations: Vec<Properties>,
}

// ── Domain objects ───────────────────────────────────────────────

/// Contact or lead attached to a reservation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub properties: Properties,
}

impl Person {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            properties: Properties::new(),
        }
    }

    /// Record returned by the backend; everything lands in the property bag.
    pub fn from_properties(properties: Properties) -> Self {
        Self {
            properties,
            ..Self::default()
        }
    }

    /// Explicit fields first, custom properties override them.
    pub fn rest_data(&self) -> Properties {
        let mut data = Properties::new();
        for (field, value) in [
            ("FirstName", &self.first_name),
            ("LastName", &self.last_name),
            ("Email", &self.email),
        ] {
            if !value.is_empty() {
                data.insert(field.into(), Value::String(value.clone()));
            }
        }
        data.extend(self.properties.clone());
        data
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceReservation {
    pub service_id: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub properties: Properties,
}

impl ServiceReservation {
    pub fn new(service_id: impl Into<String>, quantity: f64) -> Self {
        Self {
            service_id: service_id.into(),
            quantity,
            unit_price: 0.0,
            properties: Properties::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn subtotal(&self) -> f64 {
        self.quantity * self.unit_price
    }

    pub fn rest_data(&self) -> Properties {
        let mut data = self.properties.clone();
        data.insert(FIELD_SERVICE.into(), json!(self.service_id));
        data.insert(FIELD_QUANTITY.into(), json!(self.quantity));
        data
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reservation {
    pub id: Option<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    resource_id: Option<String>,
    contact: Option<Person>,
    lead: Option<Person>,
    pub service_reservations: Vec<ServiceReservation>,
    pub properties: Properties,
}

impl Reservation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_contact(mut self, contact: Person) -> Self {
        self.contact = Some(contact);
        self
    }

    pub fn with_lead(mut self, lead: Person) -> Self {
        self.lead = Some(lead);
        self
    }

    pub fn with_service_reservation(mut self, service_reservation: ServiceReservation) -> Self {
        self.service_reservations.push(service_reservation);
        self
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn contact(&self) -> Option<&Person> {
        self.contact.as_ref()
    }

    pub fn lead(&self) -> Option<&Person> {
        self.lead.as_ref()
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Custom properties plus resource and start/end, which always win.
    pub fn rest_data(&self) -> Properties {
        let mut data = self.properties.clone();
        if let Some(resource_id) = &self.resource_id {
            data.insert(FIELD_RESOURCE.into(), json!(resource_id));
        }
        if let Some(start) = self.start {
            data.insert(FIELD_START.into(), json!(format_datetime(start)));
        }
        if let Some(end) = self.end {
            data.insert(FIELD_END.into(), json!(format_datetime(end)));
        }
        data
    }

    pub fn save_request(&self) -> ReservationSaveRequest {
        ReservationSaveRequest {
            reservation: self.rest_data(),
            lead_config: self.lead.as_ref().map(|l| json!({ "lead": l.rest_data() })),
            contact_config: self.contact.as_ref().map(|c| json!({ "contact": c.rest_data() })),
            service_reservations: self.service_reservations.iter().map(|s| s.rest_data()).collect(),
        }
    }

    pub fn price_calculation_request(&self) -> PriceCalculationRequest {
        PriceCalculationRequest {
            reservation: self.rest_data(),
            service_reservations: self.service_reservations.iter().map(|s| s.rest_data()).collect(),
            service_costs: self.service_reservations.iter().map(|s| s.subtotal()).sum(),
        }
    }

    /// Rebuild a reservation from what the backend stored.
    ///
    /// Resource link comes from `original`. Returned service reservations are
    /// kept only when they reference a service present on `original`.
    pub fn from_save_response(original: &Reservation, response: ReservationSaveResponse) -> Reservation {
        let ReservationSaveResponse {
            reservation,
            contact,
            lead,
            service_reservations,
        } = response;

        let service_reservations = service_reservations
            .unwrap_or_default()
            .into_iter()
            .filter_map(|data| {
                let service_id = data.get(FIELD_SERVICE)?.as_str()?;
                let matching = original
                    .service_reservations
                    .iter()
                    .find(|s| s.service_id == service_id)?;
                let quantity = data.get(FIELD_QUANTITY).and_then(Value::as_f64).unwrap_or(0.0);
                let mut saved = ServiceReservation::new(matching.service_id.clone(), quantity);
                saved.unit_price = matching.unit_price;
                saved.properties = data;
                Some(saved)
            })
            .collect();

        Reservation {
            id: reservation
                .get(FIELD_RESERVATION_ID)
                .and_then(Value::as_str)
                .map(String::from),
            start: parse_datetime_field(&reservation, FIELD_START),
            end: parse_datetime_field(&reservation, FIELD_END),
            resource_id: original.resource_id.clone(),
            contact: contact.map(Person::from_properties),
            lead: lead.map(Person::from_properties),
            service_reservations,
            properties: reservation,
        }
    }
}

fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_datetime_field(data: &Properties, field: &str) -> Option<DateTime<Utc>> {
    data.get(field)?.as_str()?.parse().ok()
}
