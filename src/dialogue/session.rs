//! Session and stage types

use serde::{Deserialize, Serialize};

/// Where a conversation currently sits in the planning flow.
///
/// A session only ever moves along the edges implemented in
/// [`crate::dialogue::turn::take_turn`]; every unmatched utterance keeps
/// the stage in place and re-prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Fresh conversation, waiting for an origin/destination pair
    #[default]
    Intro,
    /// Trip captured, waiting for a transport choice
    AwaitingTransport,
    /// Transport chosen, waiting for route preferences
    AwaitingPreferences,
    /// Route selected, waiting for departure confirmation
    ReadyToStart,
    /// Walking to the boarding stop
    JourneyActive,
    /// Waiting at the boarding stop
    AtStop,
    /// Riding the vehicle
    OnVehicle,
    /// Final walking leg
    WalkingToDestination,
    /// Journey finished; the next utterance starts over
    Completed,
}

/// Transport category a rider can choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    Bus,
    Train,
    RailTransit,
}

impl Transport {
    /// User-facing label, matching how the assistant offers the choice.
    pub fn label(self) -> &'static str {
        match self {
            Transport::Bus => "Bus",
            Transport::Train => "Train",
            Transport::RailTransit => "MRT/LRT",
        }
    }
}

/// Route preference classified from free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    Eco,
    Economical,
    Balanced,
}

impl Preference {
    /// The proposal id this preference selects.
    ///
    /// Proposal 1 is the balanced option, 2 the cheapest, 3 the greenest.
    pub fn route_id(self) -> u8 {
        match self {
            Preference::Eco => 3,
            Preference::Economical => 2,
            Preference::Balanced => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preference::Eco => "Most Eco-friendly",
            Preference::Economical => "Most Economical",
            Preference::Balanced => "Balanced",
        }
    }
}

/// One candidate trip option surfaced at the transport-selection stage.
///
/// Generated fresh each time transport is chosen and never persisted
/// beyond the session; the session keeps only the selected id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteProposal {
    pub id: u8,
    pub distance_km: f64,
    pub duration_minutes: u32,
    /// Wall-clock arrival, e.g. "08:38 PM"
    pub arrival_time: String,
    pub cost: String,
    pub co2_saved_kg: f64,
}

/// The mutable record of one in-progress conversation.
///
/// The turn function never mutates a session in place; it returns a new
/// value, so a turn that fails mid-way leaves the stored session intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Session {
    pub stage: Stage,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub transport: Option<Transport>,
    /// Back-reference to a proposal id (1..=3), never an owned proposal
    pub selected_route: Option<u8>,
}

impl Session {
    /// A fresh session at the greeting stage with all fields cleared.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_cleared_intro() {
        let s = Session::new();
        assert_eq!(s.stage, Stage::Intro);
        assert!(s.origin.is_none());
        assert!(s.destination.is_none());
        assert!(s.transport.is_none());
        assert!(s.selected_route.is_none());
    }

    #[test]
    fn preference_maps_to_distinct_routes() {
        assert_eq!(Preference::Eco.route_id(), 3);
        assert_eq!(Preference::Economical.route_id(), 2);
        assert_eq!(Preference::Balanced.route_id(), 1);
    }

    #[test]
    fn stage_serializes_snake_case() {
        let json = serde_json::to_string(&Stage::AwaitingTransport).unwrap();
        assert_eq!(json, "\"awaiting_transport\"");
        let json = serde_json::to_string(&Stage::WalkingToDestination).unwrap();
        assert_eq!(json, "\"walking_to_destination\"");
    }
}
