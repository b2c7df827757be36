//! Metrics collection.
//!
//! # Metrics
//! - `webstub_registrations_total` (counter): stubs registered
//! - `webstub_registered_stubs` (gauge): stubs currently held
//! - `webstub_resolutions_total` (counter): lookups by `outcome` (hit, miss, ambiguous)
//! - `webstub_intercepts_total` (counter): client calls by `decision` (stubbed, passthrough, denied, raised)

use metrics::{counter, gauge};

pub fn record_registration(added: usize, total: usize) {
    counter!("webstub_registrations_total").increment(added as u64);
    gauge!("webstub_registered_stubs").set(total as f64);
}

pub fn record_resolution(outcome: &'static str) {
    counter!("webstub_resolutions_total", "outcome" => outcome).increment(1);
}

pub fn record_intercept(decision: &'static str) {
    counter!("webstub_intercepts_total", "decision" => decision).increment(1);
}
