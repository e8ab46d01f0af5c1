use crate::model::*;
use crate::records::AvailabilityRecord;

use super::EngineError;

// ── Timeline Merge Algorithm ──────────────────────────────────────

/// Merge raw classified slots into one timeline over `[period_start, period_end)`.
///
/// Every slot is clipped to the period first. Where slots overlap, the kind with
/// the highest priority wins (Closed > Reservation > Open); an override never
/// shrinks a region held by a higher-priority kind. Parts of the period covered
/// by no slot resolve to `Closed`. Adjacent runs of the same kind are coalesced.
///
/// No slots inside the period yields an empty timeline.
pub fn merge_timeline<I>(period_start: Ms, period_end: Ms, raw: I) -> Result<Timeline, EngineError>
where
    I: IntoIterator<Item = (Ms, Ms, SlotKind)>,
{
    if period_start >= period_end {
        return Err(EngineError::InvalidPeriod {
            start: period_start,
            end: period_end,
        });
    }
    let period = Span::new(period_start, period_end);

    // Sweep-line events: +1 at start, -1 at end, per kind
    let mut events: Vec<(Ms, SlotKind, i32)> = Vec::new();
    for (start, end, kind) in raw {
        if start >= end {
            return Err(EngineError::InvalidInterval { start, end });
        }
        let Some(clipped) = Span::new(start, end).intersect(&period) else {
            continue;
        };
        events.push((clipped.start, kind, 1));
        events.push((clipped.end, kind, -1));
    }
    if events.is_empty() {
        return Ok(Timeline::default());
    }
    events.sort_by_key(|e| e.0);

    let mut coverage = [0i32; 3];
    let mut slots: Vec<TimeSlot> = Vec::new();
    let mut cursor = period.start;
    let mut i = 0;

    while i < events.len() {
        let time = events[i].0;
        if time > cursor {
            push_coalesced(&mut slots, Span::new(cursor, time), resolve(&coverage));
            cursor = time;
        }
        // All events at the same instant apply together, so their order is irrelevant.
        while i < events.len() && events[i].0 == time {
            let (_, kind, delta) = events[i];
            coverage[kind.priority() as usize] += delta;
            i += 1;
        }
    }

    if cursor < period.end {
        push_coalesced(&mut slots, Span::new(cursor, period.end), resolve(&coverage));
    }

    Ok(Timeline::from_resolved(slots))
}

/// Merge one availability record, clipped to the record's own period and, when
/// given, to the window the caller asked for.
pub fn merge_availability(
    record: &AvailabilityRecord,
    window: Option<Span>,
) -> Result<Timeline, EngineError> {
    let start = record.start_date_time.timestamp_millis();
    let end = record.end_date_time.timestamp_millis();
    if start >= end {
        return Err(EngineError::InvalidPeriod { start, end });
    }
    let mut period = Span::new(start, end);
    if let Some(window) = window {
        if window.start >= window.end {
            return Err(EngineError::InvalidPeriod {
                start: window.start,
                end: window.end,
            });
        }
        match period.intersect(&window) {
            Some(clipped) => period = clipped,
            None => return Ok(Timeline::default()),
        }
    }
    merge_timeline(
        period.start,
        period.end,
        record
            .time_slots
            .iter()
            .map(|s| (s.start_ms(), s.end_ms(), s.kind())),
    )
}

/// Highest-priority kind with live coverage. Equal priority means equal kind, so
/// supply order never changes the outcome.
fn resolve(coverage: &[i32; 3]) -> SlotKind {
    SlotKind::ALL
        .iter()
        .rev()
        .copied()
        .find(|k| coverage[k.priority() as usize] > 0)
        .unwrap_or(SlotKind::Closed)
}

fn push_coalesced(slots: &mut Vec<TimeSlot>, span: Span, kind: SlotKind) {
    if let Some(last) = slots.last_mut()
        && last.kind == kind
        && last.span.end == span.start
    {
        last.span.end = span.end;
        return;
    }
    slots.push(TimeSlot { span, kind });
}
