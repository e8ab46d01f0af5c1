use serde_json::{json, Value};

use super::*;
use crate::model::*;
use crate::records::*;

const H: Ms = 3_600_000;
/// 2022-01-01T00:00:00Z
const DAY_ONE: Ms = 1_640_995_200_000;

/// Slot JSON as the availability endpoint sends it, hours relative to DAY_ONE.
fn slot_json(start_h: i64, end_h: i64, kind: &str) -> Value {
    json!({
        "dataObject": { "slotType": kind },
        "startTime": ms_to_datetime(DAY_ONE + start_h * H).to_rfc3339(),
        "endTime": ms_to_datetime(DAY_ONE + end_h * H).to_rfc3339(),
    })
}

fn availability_json(id: &str, slots: Vec<Value>) -> AvailabilityRecord {
    serde_json::from_value(json!({
        "startDateTime": "2022-01-01T00:00:00.000Z",
        "endDateTime": "2022-01-10T00:00:00.000Z",
        "dimensionId": id,
        "timeSlots": slots,
    }))
    .unwrap()
}

fn resources_json(rows: Value) -> Vec<ResourceRecord> {
    serde_json::from_value(rows).unwrap()
}

fn day_one_window() -> Span {
    Span::new(DAY_ONE, DAY_ONE + 24 * H)
}

// ── Full pipeline ────────────────────────────────────────

#[test]
fn timelines_are_merged_and_closed_resources_dropped() {
    let mut result = ResourceResult::new(resources_json(json!([
        { "Id": "Id 1", "Name": "Name 1" },
        { "Id": "Id 2", "Name": "Name 2" },
    ])))
    .with_window(day_one_window());

    result
        .add_availability_slot_data(&[
            availability_json(
                "Id 1",
                vec![
                    slot_json(0, 8, "Closed"),
                    slot_json(8, 16, "Open"),
                    slot_json(16, 24, "Closed"),
                    slot_json(6, 12, "Reservation"),
                ],
            ),
            availability_json("Id 2", vec![slot_json(0, 24, "Closed")]),
        ])
        .unwrap();

    assert_eq!(result.number_of_resources(), 1);
    let one = result.get_resource_by_id("Id 1").unwrap();
    let slots = one.time_slots();
    assert_eq!(slots.len(), 4);
    let expect = [
        (0, 8, SlotKind::Closed),
        (8, 12, SlotKind::Reservation),
        (12, 16, SlotKind::Open),
        (16, 24, SlotKind::Closed),
    ];
    for (slot, (s, e, kind)) in slots.iter().zip(expect) {
        assert_eq!(slot.kind, kind);
        assert_eq!(slot.span.start, DAY_ONE + s * H);
        assert_eq!(slot.span.end, DAY_ONE + e * H);
    }
    assert_eq!(
        slots[0].span.start_datetime().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "2022-01-01T00:00:00.000Z"
    );
    assert_eq!(
        slots[3].span.end_datetime().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "2022-01-02T00:00:00.000Z"
    );

    // Fully closed so should be filtered out
    assert!(result.get_resource_by_id("Id 2").is_none());
}

#[test]
fn without_window_the_record_period_bounds_the_timeline() {
    let mut result = ResourceResult::new(resources_json(json!([{ "Id": "Id 1", "Name": "Name 1" }])));
    result
        .add_availability_slot_data(&[availability_json("Id 1", vec![slot_json(8, 16, "Open")])])
        .unwrap();
    let tl = result.get_resource_by_id("Id 1").unwrap().timeline().unwrap();
    assert_eq!(tl.period(), Some(Span::new(DAY_ONE, DAY_ONE + 9 * 24 * H)));
    assert_eq!(tl.len(), 3);
}

#[test]
fn inverted_record_period_is_rejected() {
    let mut result = ResourceResult::new(resources_json(json!([{ "Id": "Id 1", "Name": "Name 1" }])));
    let record: AvailabilityRecord = serde_json::from_value(json!({
        "startDateTime": "2022-01-10T00:00:00.000Z",
        "endDateTime": "2022-01-01T00:00:00.000Z",
        "dimensionId": "Id 1",
        "timeSlots": [slot_json(8, 16, "Open")],
    }))
    .unwrap();

    let err = result.add_availability_slot_data(&[record]).unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidPeriod {
            start: DAY_ONE + 9 * 24 * H,
            end: DAY_ONE,
        }
    );
    assert!(result.get_resource_by_id("Id 1").unwrap().timeline().is_none());
}

#[test]
fn window_outside_record_period_prunes() {
    let mut result = ResourceResult::new(resources_json(json!([{ "Id": "Id 1", "Name": "Name 1" }])))
        .with_window(Span::new(DAY_ONE + 20 * 24 * H, DAY_ONE + 21 * 24 * H));
    result
        .add_availability_slot_data(&[availability_json("Id 1", vec![slot_json(0, 24, "Open")])])
        .unwrap();
    assert!(result.is_empty());
}

#[test]
fn hierarchy_survives_pruning_as_stale_ids() {
    let mut result = ResourceResult::new(resources_json(json!([
        { "Id": "A", "Name": "Building", "B25__Parent__c": null },
        { "Id": "B", "Name": "Floor", "B25__Parent__c": "A" },
        { "Id": "C", "Name": "Annex", "B25__Parent__c": "missing" },
    ])));
    result.compute_tree_structure();

    assert_eq!(result.children_of("A").iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["B"]);
    assert_eq!(result.parent_of("B").map(|r| r.id.as_str()), Some("A"));
    assert!(result.parent_of("C").is_none());
    let roots: Vec<&str> = result.roots().map(|r| r.id.as_str()).collect();
    assert_eq!(roots, vec!["A", "C"]);

    result
        .add_availability_slot_data(&[availability_json("B", vec![slot_json(0, 24, "Closed")])])
        .unwrap();

    // Raw links are not repaired; resolved accessors skip the removed child.
    assert_eq!(result.get_resource_by_id("A").unwrap().child_ids(), ["B".to_string()]);
    assert!(result.children_of("A").is_empty());
}

#[test]
fn removing_a_parent_turns_children_into_roots() {
    let mut result = ResourceResult::new(resources_json(json!([
        { "Id": "A", "Name": "Building" },
        { "Id": "B", "Name": "Floor", "B25__Parent__c": "A" },
    ])));
    result.compute_tree_structure();
    result
        .add_availability_slot_data(&[availability_json("A", vec![slot_json(0, 24, "Closed")])])
        .unwrap();
    assert_eq!(result.get_resource_by_id("B").unwrap().parent(), Some("A"));
    assert!(result.parent_of("B").is_none());
    assert_eq!(result.roots().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["B"]);
}

#[test]
fn dnf_filter_over_record_fields() {
    let mut result = ResourceResult::new(resources_json(json!([
        { "Id": "1", "Name": "X", "B25__Resource_Type__c": "Z", "B25__Active__c": false },
        { "Id": "2", "Name": "W", "B25__Resource_Type__c": "Y", "B25__Active__c": true },
        { "Id": "3", "Name": "V", "B25__Resource_Type__c": "Y", "B25__Active__c": false },
    ])));
    result.filter_on_conditions(&[
        vec![Condition::equals(FIELD_NAME, "X")],
        vec![
            Condition::equals(FIELD_RESOURCE_TYPE, "Y"),
            Condition::equals("B25__Active__c", true),
        ],
    ]);
    assert_eq!(result.resource_ids(), vec!["1", "2"]);
}

#[test]
fn services_attach_after_availability() {
    let mut result = ResourceResult::new(resources_json(json!([
        { "Id": "Id 1", "Name": "Name 1" },
        { "Id": "Id 2", "Name": "Name 2" },
    ])))
    .with_window(day_one_window());
    result
        .add_availability_slot_data(&[
            availability_json("Id 1", vec![slot_json(0, 24, "Open")]),
            availability_json("Id 2", vec![slot_json(0, 24, "Closed")]),
        ])
        .unwrap();

    let services: Vec<ServiceAvailabilityRecord> = serde_json::from_value(json!([
        {
            "dimensionId": "Id 1",
            "services": [
                { "service": { "Id": "coffee" }, "timeSlots": [
                    { "dataObject": { "slotType": "Open", "quantity": 10 },
                      "startTime": "2022-01-01T00:00:00.000Z", "endTime": "2022-01-02T00:00:00.000Z" }
                ]},
                { "service": { "Id": "beamer" }, "timeSlots": [
                    { "dataObject": { "slotType": "Open", "quantity": 0 },
                      "startTime": "2022-01-01T00:00:00.000Z", "endTime": "2022-01-02T00:00:00.000Z" }
                ]}
            ]
        },
        { "dimensionId": "Id 2", "services": [{ "service": { "Id": "coffee" }, "timeSlots": [] }] }
    ]))
    .unwrap();
    result.add_service_slot_data(&services);

    let one = result.get_resource_by_id("Id 1").unwrap();
    assert_eq!(one.services().count(), 2);
    let available: Vec<&str> = one.available_services().map(|s| s.id.as_str()).collect();
    assert_eq!(available, vec!["coffee"]);
    assert!(result.get_resource_by_id("Id 2").is_none());
}

#[test]
fn filter_order_does_not_matter() {
    let records = resources_json(json!([
        { "Id": "1", "Name": "A", "B25__Floor__c": 1 },
        { "Id": "2", "Name": "B", "B25__Floor__c": 2 },
        { "Id": "3", "Name": "C", "B25__Floor__c": 3 },
    ]));
    let first = vec![Condition::greater_than("B25__Floor__c", 1)];
    let second = vec![Condition::not_equals(FIELD_NAME, "C")];

    let mut a = ResourceResult::new(records.clone());
    a.filter_on_conditions(&[first.clone()]);
    a.filter_on_conditions(&[second.clone()]);

    let mut b = ResourceResult::new(records);
    b.filter_on_conditions(&[second]);
    b.filter_on_conditions(&[first]);

    assert_eq!(a.resource_ids(), b.resource_ids());
    assert_eq!(a.resource_ids(), vec!["2"]);
}
