use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unix milliseconds. The only time type inside the engine.
pub type Ms = i64;

/// Open-ended field bag for everything a record carries beyond its typed fields.
pub type Properties = serde_json::Map<String, Value>;

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Ms,
    pub end: Ms,
}

impl Span {
    pub fn new(start: Ms, end: Ms) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn from_datetimes(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(start.timestamp_millis(), end.timestamp_millis())
    }

    pub fn duration_ms(&self) -> Ms {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: Ms) -> bool {
        self.start <= t && t < self.end
    }

    /// Intersection of two spans, `None` when they do not overlap.
    pub fn intersect(&self, other: &Span) -> Option<Span> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(Span { start, end })
    }

    pub fn start_datetime(&self) -> DateTime<Utc> {
        ms_to_datetime(self.start)
    }

    pub fn end_datetime(&self) -> DateTime<Utc> {
        ms_to_datetime(self.end)
    }
}

pub fn ms_to_datetime(ms: Ms) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Classification of a time slot as reported by the availability endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    /// Bookable, nothing competes for this time.
    Open,
    /// Occupied by an existing reservation.
    Reservation,
    /// Outside opening hours or otherwise blocked.
    Closed,
}

impl SlotKind {
    pub const ALL: [SlotKind; 3] = [SlotKind::Open, SlotKind::Reservation, SlotKind::Closed];

    /// Higher priority wins where slots overlap.
    pub fn priority(self) -> u8 {
        match self {
            SlotKind::Open => 0,
            SlotKind::Reservation => 1,
            SlotKind::Closed => 2,
        }
    }
}

/// A single classified slot on a resource's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub span: Span,
    pub kind: SlotKind,
}

impl TimeSlot {
    pub fn new(start: Ms, end: Ms, kind: SlotKind) -> Self {
        Self {
            span: Span::new(start, end),
            kind,
        }
    }

    pub fn priority(&self) -> u8 {
        self.kind.priority()
    }

    pub fn is_open(&self) -> bool {
        self.kind == SlotKind::Open
    }
}

/// Resolved, gap-free and coalesced slot sequence for one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timeline {
    slots: Vec<TimeSlot>,
}

impl Timeline {
    /// Callers guarantee the slots are sorted, contiguous and coalesced;
    /// the timeline merger is the only producer.
    pub(crate) fn from_resolved(slots: Vec<TimeSlot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn has_open_slot(&self) -> bool {
        self.slots.iter().any(TimeSlot::is_open)
    }

    /// Overall covered period, `None` for an empty timeline.
    pub fn period(&self) -> Option<Span> {
        match (self.slots.first(), self.slots.last()) {
            (Some(first), Some(last)) => Some(Span::new(first.span.start, last.span.end)),
            _ => None,
        }
    }

    /// Kind in effect at instant `t`, if `t` lies within the timeline.
    pub fn kind_at(&self, t: Ms) -> Option<SlotKind> {
        let idx = self.slots.partition_point(|s| s.span.end <= t);
        self.slots
            .get(idx)
            .filter(|s| s.span.contains_instant(t))
            .map(|s| s.kind)
    }

    pub fn open_spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.slots.iter().filter(|s| s.is_open()).map(|s| s.span)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
}

/// A service slot carries the remaining bookable quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ServiceSlot {
    pub span: Span,
    pub kind: SlotKind,
    pub quantity: f64,
}

/// Bookable extra (catering, equipment) offered on a resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    pub id: String,
    pub properties: Properties,
    pub time_slots: Vec<ServiceSlot>,
}

impl Service {
    pub fn is_available(&self) -> bool {
        self.time_slots
            .iter()
            .any(|s| s.kind != SlotKind::Closed && s.quantity > 0.0)
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// Record ids are 15 (case-sensitive) or 18 (case-insensitive) ASCII alphanumerics.
pub fn is_record_id(candidate: &str) -> bool {
    matches!(candidate.len(), 15 | 18) && candidate.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let s = Span::new(100, 200);
        assert_eq!(s.duration_ms(), 100);
        assert!(s.contains_instant(100));
        assert!(s.contains_instant(199));
        assert!(!s.contains_instant(200)); // half-open
    }

    #[test]
    fn span_overlap() {
        let a = Span::new(100, 200);
        let b = Span::new(150, 250);
        let c = Span::new(200, 300);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // adjacent, not overlapping
    }

    #[test]
    fn span_intersect() {
        let a = Span::new(100, 200);
        assert_eq!(a.intersect(&Span::new(150, 250)), Some(Span::new(150, 200)));
        assert_eq!(a.intersect(&Span::new(200, 300)), None);
        assert_eq!(a.intersect(&Span::new(0, 1000)), Some(a));
    }

    #[test]
    fn span_datetime_conversion() {
        let start: DateTime<Utc> = "2022-01-01T08:00:00Z".parse().unwrap();
        let end: DateTime<Utc> = "2022-01-01T12:00:00Z".parse().unwrap();
        let s = Span::from_datetimes(start, end);
        assert_eq!(s.duration_ms(), 4 * 3_600_000);
        assert_eq!(s.start_datetime(), start);
        assert_eq!(s.end_datetime(), end);
    }

    #[test]
    fn kind_priorities_are_ordered() {
        assert!(SlotKind::Closed.priority() > SlotKind::Reservation.priority());
        assert!(SlotKind::Reservation.priority() > SlotKind::Open.priority());
    }

    #[test]
    fn timeline_kind_at() {
        let tl = Timeline::from_resolved(vec![
            TimeSlot::new(0, 10, SlotKind::Closed),
            TimeSlot::new(10, 20, SlotKind::Open),
        ]);
        assert_eq!(tl.kind_at(0), Some(SlotKind::Closed));
        assert_eq!(tl.kind_at(10), Some(SlotKind::Open));
        assert_eq!(tl.kind_at(19), Some(SlotKind::Open));
        assert_eq!(tl.kind_at(20), None);
        assert_eq!(tl.period(), Some(Span::new(0, 20)));
        assert_eq!(tl.open_spans().collect::<Vec<_>>(), vec![Span::new(10, 20)]);
    }

    #[test]
    fn service_availability_needs_quantity() {
        let mut service = Service {
            id: "svc".into(),
            properties: Properties::new(),
            time_slots: vec![ServiceSlot {
                span: Span::new(0, 10),
                kind: SlotKind::Open,
                quantity: 0.0,
            }],
        };
        assert!(!service.is_available());
        service.time_slots[0].quantity = 3.0;
        assert!(service.is_available());
        service.time_slots[0].kind = SlotKind::Closed;
        assert!(!service.is_available());
    }

    #[test]
    fn record_id_recognition() {
        assert!(is_record_id("a0i1j000006uxAmAAI"));
        assert!(is_record_id("a0i1j000006uxAm"));
        assert!(!is_record_id("Meeting Room 1"));
        assert!(!is_record_id("a0i1j000006uxA"));
        assert!(!is_record_id("a0i1j000006ux-mAAI"));
    }
}
