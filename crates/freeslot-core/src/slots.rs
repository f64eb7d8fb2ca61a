//! Interval algebra for free-slot computation.
//!
//! Pure functions over time intervals: clipping to a window, merging
//! overlapping busy time, walking the free gaps and slicing them into
//! fixed-length slots. No I/O, no state; every call recomputes from its
//! inputs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::time::TimeWindow;

/// A time range during which the calendar owner is unavailable.
///
/// Invariant: `start < end`. Intervals are always clipped to the enclosing
/// [`TimeWindow`] before being stored; zero-length or fully-outside
/// intervals are discarded at the clipping step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    /// Start of the busy range (inclusive).
    pub start: DateTime<Utc>,
    /// End of the busy range (exclusive).
    pub end: DateTime<Utc>,
}

/// A fixed-length open slot, fully contained in a gap between busy
/// intervals (or the window edges) and within the query window.
///
/// Serializes as `{start, end}` RFC3339 strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    /// Start of the slot (inclusive).
    pub start: DateTime<Utc>,
    /// End of the slot (exclusive); `end - start` equals the slot length.
    pub end: DateTime<Utc>,
}

/// Intersects an interval with a window.
///
/// Returns `None` when the interval does not overlap the window or the
/// intersection is zero-length; otherwise the interval clipped to
/// `max(starts) .. min(ends)`.
pub fn clip_to_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    window: &TimeWindow,
) -> Option<BusyInterval> {
    if !window.overlaps(start, end) {
        return None;
    }
    let clipped_start = start.max(window.start);
    let clipped_end = end.min(window.end);
    if clipped_start >= clipped_end {
        return None;
    }
    Some(BusyInterval {
        start: clipped_start,
        end: clipped_end,
    })
}

/// Merges overlapping and touching busy intervals into minimal
/// non-overlapping runs, sorted by start.
///
/// Touching intervals (`next.start <= current.end`) merge. The sort is
/// stable; equal-start intervals merge in encounter order. Calling `merge`
/// on its own output is a no-op.
pub fn merge(mut intervals: Vec<BusyInterval>) -> Vec<BusyInterval> {
    intervals.sort_by_key(|interval| interval.start);

    let mut merged: Vec<BusyInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Walks the window from start to end, emitting the free space before each
/// merged busy interval and after the last one.
///
/// Returns the full window as a single gap when there is no busy time, and
/// nothing for an empty window. `merged_busy` must be sorted and
/// non-overlapping (the output of [`merge`]) and clipped to the window.
pub fn free_gaps(
    window: &TimeWindow,
    merged_busy: &[BusyInterval],
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    if window.is_empty() {
        return Vec::new();
    }

    let mut gaps = Vec::new();
    let mut cursor = window.start;
    for busy in merged_busy {
        if busy.start > cursor {
            gaps.push((cursor, busy.start));
        }
        cursor = cursor.max(busy.end);
    }
    if cursor < window.end {
        gaps.push((cursor, window.end));
    }
    gaps
}

/// Slices a gap into consecutive, non-overlapping slots of `slot_length`,
/// starting at the gap's start.
///
/// Stops as soon as a full slot no longer fits; a partial remainder shorter
/// than `slot_length` is dropped, never padded or rounded.
pub fn slice_into_slots(
    gap_start: DateTime<Utc>,
    gap_end: DateTime<Utc>,
    slot_length: Duration,
) -> Vec<FreeSlot> {
    let mut slots = Vec::new();
    if slot_length <= Duration::zero() {
        return slots;
    }
    let mut slot_start = gap_start;
    while slot_start + slot_length <= gap_end {
        let slot_end = slot_start + slot_length;
        slots.push(FreeSlot {
            start: slot_start,
            end: slot_end,
        });
        slot_start = slot_end;
    }
    slots
}

/// Computes the open slots in a window given the busy time.
///
/// Clips each busy interval to the window, merges the overlaps, walks the
/// free gaps and slices each into `slot_minutes`-length slots. The result
/// is chronological. An empty or inverted window yields zero slots.
pub fn compute_free_slots(
    window: &TimeWindow,
    busy: &[BusyInterval],
    slot_minutes: i64,
) -> Vec<FreeSlot> {
    if window.is_empty() {
        return Vec::new();
    }

    let clipped: Vec<BusyInterval> = busy
        .iter()
        .filter_map(|interval| clip_to_window(interval.start, interval.end, window))
        .collect();
    let merged = merge(clipped);

    let slot_length = Duration::minutes(slot_minutes);
    free_gaps(window, &merged)
        .into_iter()
        .flat_map(|(gap_start, gap_end)| slice_into_slots(gap_start, gap_end, slot_length))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, min, 0).unwrap()
    }

    fn busy(start: DateTime<Utc>, end: DateTime<Utc>) -> BusyInterval {
        BusyInterval { start, end }
    }

    fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeWindow {
        TimeWindow::new(start, end)
    }

    #[test]
    fn clip_inside_window_unchanged() {
        let w = window(utc(9, 0), utc(17, 0));
        let clipped = clip_to_window(utc(10, 0), utc(11, 0), &w).unwrap();
        assert_eq!(clipped, busy(utc(10, 0), utc(11, 0)));
    }

    #[test]
    fn clip_straddling_intervals() {
        let w = window(utc(9, 0), utc(17, 0));
        assert_eq!(
            clip_to_window(utc(8, 0), utc(10, 0), &w).unwrap(),
            busy(utc(9, 0), utc(10, 0))
        );
        assert_eq!(
            clip_to_window(utc(16, 0), utc(18, 0), &w).unwrap(),
            busy(utc(16, 0), utc(17, 0))
        );
        assert_eq!(
            clip_to_window(utc(8, 0), utc(18, 0), &w).unwrap(),
            busy(utc(9, 0), utc(17, 0))
        );
    }

    #[test]
    fn clip_outside_or_zero_length_is_none() {
        let w = window(utc(9, 0), utc(17, 0));
        assert!(clip_to_window(utc(7, 0), utc(8, 0), &w).is_none());
        assert!(clip_to_window(utc(18, 0), utc(19, 0), &w).is_none());
        // Touching the window edge only
        assert!(clip_to_window(utc(8, 0), utc(9, 0), &w).is_none());
        // Zero-length
        assert!(clip_to_window(utc(10, 0), utc(10, 0), &w).is_none());
    }

    #[test]
    fn merge_overlapping_and_touching() {
        let merged = merge(vec![
            busy(utc(9, 0), utc(9, 45)),
            busy(utc(9, 30), utc(10, 15)),
            // Touching the previous run
            busy(utc(10, 15), utc(10, 30)),
            busy(utc(12, 0), utc(13, 0)),
        ]);
        assert_eq!(
            merged,
            vec![busy(utc(9, 0), utc(10, 30)), busy(utc(12, 0), utc(13, 0))]
        );
    }

    #[test]
    fn merge_unsorted_input() {
        let merged = merge(vec![
            busy(utc(12, 0), utc(13, 0)),
            busy(utc(9, 0), utc(10, 0)),
        ]);
        assert_eq!(
            merged,
            vec![busy(utc(9, 0), utc(10, 0)), busy(utc(12, 0), utc(13, 0))]
        );
    }

    #[test]
    fn merge_is_idempotent() {
        let once = merge(vec![
            busy(utc(9, 0), utc(9, 45)),
            busy(utc(9, 30), utc(10, 15)),
            busy(utc(14, 0), utc(15, 0)),
        ]);
        let twice = merge(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn gaps_with_no_busy_time_is_whole_window() {
        let w = window(utc(9, 0), utc(11, 0));
        assert_eq!(free_gaps(&w, &[]), vec![(utc(9, 0), utc(11, 0))]);
    }

    #[test]
    fn gaps_around_busy_intervals() {
        let w = window(utc(9, 0), utc(12, 0));
        let merged = vec![busy(utc(9, 30), utc(10, 0)), busy(utc(11, 0), utc(11, 30))];
        assert_eq!(
            free_gaps(&w, &merged),
            vec![
                (utc(9, 0), utc(9, 30)),
                (utc(10, 0), utc(11, 0)),
                (utc(11, 30), utc(12, 0)),
            ]
        );
    }

    #[test]
    fn gaps_and_busy_reconstruct_window() {
        let w = window(utc(9, 0), utc(18, 0));
        let raw = vec![
            busy(utc(8, 0), utc(9, 30)),
            busy(utc(9, 15), utc(10, 0)),
            busy(utc(10, 0), utc(10, 45)),
            busy(utc(13, 0), utc(14, 0)),
            busy(utc(17, 30), utc(19, 0)),
        ];
        let clipped: Vec<_> = raw
            .iter()
            .filter_map(|b| clip_to_window(b.start, b.end, &w))
            .collect();
        let merged = merge(clipped);
        let gaps = free_gaps(&w, &merged);

        // Interleave busy runs and gaps back into one ordered list of
        // segments and check they tile [start, end) exactly.
        let mut segments: Vec<(DateTime<Utc>, DateTime<Utc>)> = merged
            .iter()
            .map(|b| (b.start, b.end))
            .chain(gaps.iter().copied())
            .collect();
        segments.sort_by_key(|&(s, _)| s);

        let mut cursor = w.start;
        for (seg_start, seg_end) in segments {
            assert_eq!(seg_start, cursor, "no overlap and no hole");
            assert!(seg_end > seg_start);
            cursor = seg_end;
        }
        assert_eq!(cursor, w.end);
    }

    #[test]
    fn slice_drops_short_remainder() {
        let slots = slice_into_slots(utc(10, 15), utc(11, 0), Duration::minutes(30));
        assert_eq!(
            slots,
            vec![FreeSlot {
                start: utc(10, 15),
                end: utc(10, 45),
            }]
        );
    }

    #[test]
    fn slice_gap_shorter_than_slot_is_empty() {
        assert!(slice_into_slots(utc(10, 0), utc(10, 20), Duration::minutes(30)).is_empty());
    }

    #[test]
    fn slice_exact_fit() {
        let slots = slice_into_slots(utc(9, 0), utc(10, 0), Duration::minutes(30));
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start, utc(9, 0));
        assert_eq!(slots[0].end, utc(9, 30));
        assert_eq!(slots[1].start, utc(9, 30));
        assert_eq!(slots[1].end, utc(10, 0));
    }

    #[test]
    fn compute_slots_around_single_busy_interval() {
        // Window 09:00-11:00, busy 09:30-10:00, 30-minute slots.
        let w = window(utc(9, 0), utc(11, 0));
        let slots = compute_free_slots(&w, &[busy(utc(9, 30), utc(10, 0))], 30);
        assert_eq!(
            slots,
            vec![
                FreeSlot {
                    start: utc(9, 0),
                    end: utc(9, 30),
                },
                FreeSlot {
                    start: utc(10, 0),
                    end: utc(10, 30),
                },
                FreeSlot {
                    start: utc(10, 30),
                    end: utc(11, 0),
                },
            ]
        );
    }

    #[test]
    fn compute_slots_merges_overlapping_busy_intervals() {
        // Busy 09:00-09:45 and 09:30-10:15 merge to 09:00-10:15; only
        // 10:15-10:45 fits, the 10:45-11:00 remainder is dropped.
        let w = window(utc(9, 0), utc(11, 0));
        let slots = compute_free_slots(
            &w,
            &[busy(utc(9, 0), utc(9, 45)), busy(utc(9, 30), utc(10, 15))],
            30,
        );
        assert_eq!(
            slots,
            vec![FreeSlot {
                start: utc(10, 15),
                end: utc(10, 45),
            }]
        );
    }

    #[test]
    fn compute_slots_empty_window_yields_nothing() {
        let inverted = window(utc(11, 0), utc(9, 0));
        assert!(compute_free_slots(&inverted, &[], 30).is_empty());

        let zero = window(utc(9, 0), utc(9, 0));
        assert!(compute_free_slots(&zero, &[], 30).is_empty());
    }

    #[test]
    fn compute_slots_fully_busy_window_yields_nothing() {
        let w = window(utc(9, 0), utc(11, 0));
        assert!(compute_free_slots(&w, &[busy(utc(8, 0), utc(12, 0))], 30).is_empty());
    }

    #[test]
    fn slots_never_cross_busy_boundaries() {
        let w = window(utc(9, 0), utc(18, 0));
        let intervals = vec![
            busy(utc(9, 40), utc(10, 10)),
            busy(utc(12, 0), utc(12, 5)),
            busy(utc(15, 55), utc(16, 25)),
        ];
        let slots = compute_free_slots(&w, &intervals, 45);
        let merged = merge(intervals);
        for slot in &slots {
            assert!(slot.start >= w.start && slot.end <= w.end);
            assert_eq!(slot.end - slot.start, Duration::minutes(45));
            for b in &merged {
                assert!(
                    slot.end <= b.start || slot.start >= b.end,
                    "slot {slot:?} crosses busy {b:?}"
                );
            }
        }
    }

    #[test]
    fn slots_serialize_as_rfc3339_pairs() {
        let slot = FreeSlot {
            start: utc(9, 0),
            end: utc(9, 30),
        };
        let json = serde_json::to_value(slot).unwrap();
        assert_eq!(json["start"], "2024-01-01T09:00:00Z");
        assert_eq!(json["end"], "2024-01-01T09:30:00Z");
    }
}
