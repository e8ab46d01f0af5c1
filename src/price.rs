//! Folding a price calculation back into a reservation.

use serde_json::Value;

use crate::model::Properties;
use crate::reservation::{
    PriceCalculationData, Reservation, ServiceReservation, FIELD_QUANTITY, FIELD_UNIT_PRICE,
};

pub const FIELD_VAT_RATE: &str = "B25LP__VAT_Rate__c";
pub const FIELD_PRICE: &str = "B25__Price__c";
pub const FIELD_SUBTOTAL: &str = "B25__Subtotal__c";
pub const FIELD_SUBTOTAL_INCL: &str = "B25LP__Subtotal_Incl__c";
pub const FIELD_SERVICE_COSTS: &str = "B25__Service_Costs__c";
pub const FIELD_SERVICE_COSTS_INCL: &str = "B25LP__Service_Costs_Incl__c";
pub const FIELD_TOTAL_INCL: &str = "B25LP__Total_Incl__c";
pub const FIELD_TOTAL_PRICE: &str = "B25__Total_Price__c";

/// Copy calculated fields onto `reservation`, then recompute subtotals and totals.
///
/// Service reservation data is matched by position; entries beyond the
/// reservation's own list are ignored.
pub fn apply_price_calculation(reservation: &mut Reservation, data: &PriceCalculationData) {
    reservation.properties.extend(data.reservation.clone());
    for (service_reservation, fields) in reservation
        .service_reservations
        .iter_mut()
        .zip(&data.service_reservations)
    {
        service_reservation.properties.extend(fields.clone());
    }

    let mut service_costs = 0.0;
    let mut service_costs_incl = 0.0;
    for service_reservation in &mut reservation.service_reservations {
        let (subtotal, subtotal_incl) = price_service_reservation(service_reservation);
        service_costs += subtotal;
        service_costs_incl += subtotal_incl;
    }

    let props = &mut reservation.properties;
    let price = number(props, FIELD_PRICE);
    let subtotal = number(props, FIELD_SUBTOTAL).unwrap_or(0.0);
    let subtotal_incl = including_vat(subtotal, number(props, FIELD_VAT_RATE).unwrap_or(0.0));

    set_number(props, FIELD_SERVICE_COSTS, service_costs);
    set_number(props, FIELD_SERVICE_COSTS_INCL, service_costs_incl);
    set_number(props, FIELD_SUBTOTAL_INCL, subtotal_incl);
    set_number(props, FIELD_TOTAL_INCL, service_costs_incl + subtotal_incl);
    set_number(props, FIELD_TOTAL_PRICE, price.unwrap_or(subtotal + service_costs));
}

/// Returns (subtotal, subtotal including VAT).
fn price_service_reservation(service_reservation: &mut ServiceReservation) -> (f64, f64) {
    let props = &service_reservation.properties;
    let quantity = number(props, FIELD_QUANTITY).unwrap_or(service_reservation.quantity);
    let unit_price = number(props, FIELD_UNIT_PRICE).unwrap_or(service_reservation.unit_price);
    let vat_rate = number(props, FIELD_VAT_RATE).unwrap_or(0.0);

    service_reservation.quantity = quantity;
    service_reservation.unit_price = unit_price;
    let subtotal = service_reservation.subtotal();
    let subtotal_incl = including_vat(subtotal, vat_rate);

    let props = &mut service_reservation.properties;
    set_number(props, FIELD_SUBTOTAL, subtotal);
    set_number(props, FIELD_SUBTOTAL_INCL, subtotal_incl);
    (subtotal, subtotal_incl)
}

fn including_vat(amount: f64, vat_rate: f64) -> f64 {
    amount + amount * vat_rate
}

fn number(props: &Properties, field: &str) -> Option<f64> {
    props.get(field).and_then(Value::as_f64)
}

fn set_number(props: &mut Properties, field: &str, value: f64) {
    props.insert(field.into(), Value::from(value));
}
