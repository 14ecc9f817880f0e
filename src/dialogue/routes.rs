//! Route proposal generation
//!
//! Candidate trips are fixed templates, not real network data: the three
//! options span a fast/cheap/eco trade-off and must come back identical
//! for a given invocation time so replies stay reproducible.

use super::session::{RouteProposal, Transport};
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

/// Wall-clock anchor for arrival times: 8:00 PM on the invocation date.
const ANCHOR_HOUR: u32 = 20;

/// (id, distance km, duration min, arrival offset min, cost, co2 kg)
const TEMPLATES: [(u8, f64, u32, i64, &str, f64); 3] = [
    (1, 5.8, 24, 38, "$1.50", 1.2),
    (2, 6.2, 22, 36, "$1.20", 1.0),
    (3, 5.5, 26, 40, "$1.80", 1.3),
];

/// Generate the three candidate proposals for a chosen transport.
///
/// Always exactly 3, in stable id order 1, 2, 3. The transport category
/// labels the reply; the templates themselves are category-independent.
pub fn proposals(_transport: Transport, now: NaiveDateTime) -> [RouteProposal; 3] {
    let anchor = now.date().and_time(
        NaiveTime::from_hms_opt(ANCHOR_HOUR, 0, 0).unwrap_or_default(),
    );

    TEMPLATES.map(|(id, distance_km, duration_minutes, offset, cost, co2_saved_kg)| {
        let arrival = anchor + TimeDelta::minutes(offset);
        RouteProposal {
            id,
            distance_km,
            duration_minutes,
            arrival_time: arrival.format("%I:%M %p").to_string(),
            cost: cost.to_string(),
            co2_saved_kg,
        }
    })
}

/// Look up one generated proposal by id.
pub fn proposal_by_id(transport: Transport, now: NaiveDateTime, id: u8) -> Option<RouteProposal> {
    proposals(transport, now).into_iter().find(|p| p.id == id)
}
