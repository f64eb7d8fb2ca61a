//! Core types: time windows, interval algebra, slot slicing, tracing

pub mod slots;
pub mod time;
pub mod tracing;

pub use slots::{
    BusyInterval, FreeSlot, clip_to_window, compute_free_slots, free_gaps, merge, slice_into_slots,
};
pub use time::{TimeError, TimeWindow, format_instant, parse_instant};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
