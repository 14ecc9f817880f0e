//! Response composition
//!
//! Renders a stage handler's reply value into the literal user-facing
//! message plus the structured `data` payload. Pure formatting: nothing
//! here reads or mutates session state.

use super::session::{Preference, RouteProposal, Stage, Transport};
use serde::Serialize;
use std::fmt::Write as _;

/// Boarding stop used by the scripted journey narrative.
pub const BOARDING_STOP: &str = "Shloka Market";

/// Ambient conditions surfaced in the greeting. Sample data; a live
/// deployment would source this from a weather/air-quality feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentSummary {
    pub location: &'static str,
    pub temperature: &'static str,
    pub air_quality: &'static str,
    pub humidity: &'static str,
    pub co2_saved_week: &'static str,
}

pub fn environment_summary() -> EnvironmentSummary {
    EnvironmentSummary {
        location: "Toronto",
        temperature: "20°C",
        air_quality: "78 (Good)",
        humidity: "90%",
        co2_saved_week: "47.3 kg",
    }
}

/// What a turn decided to say, tagged per stage outcome.
///
/// Exactly one variant exists per edge of the transition table (matched
/// and re-prompt alike), so the composer knows statically which fields
/// each stage emits.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Greeting { environment: EnvironmentSummary },
    ClarifyDestination,
    RouteCaptured { origin: String, destination: String },
    ClarifyTransport,
    TransportChosen { transport: Transport, proposals: [RouteProposal; 3] },
    RouteSelected { transport: Transport, preference: Preference, proposal: RouteProposal },
    AwaitDeparture,
    JourneyStarted { proposal: RouteProposal },
    KeepWalking,
    ArrivedAtStop,
    StillWaiting,
    Boarded,
    PrepareToExit,
    FinalLeg,
    AlmostThere,
    JourneySummary { proposal: RouteProposal },
}

/// Structured payload returned alongside the reply text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TurnData {
    Intro {
        #[serde(skip_serializing_if = "Option::is_none")]
        environment: Option<EnvironmentSummary>,
    },
    AwaitingTransport {
        #[serde(skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        destination: Option<String>,
    },
    AwaitingPreferences {
        #[serde(skip_serializing_if = "Option::is_none")]
        routes: Option<Vec<RouteProposal>>,
    },
    ReadyToStart {
        #[serde(skip_serializing_if = "Option::is_none")]
        preference: Option<Preference>,
        #[serde(skip_serializing_if = "Option::is_none")]
        selected_route: Option<String>,
    },
    JourneyActive {
        #[serde(skip_serializing_if = "Option::is_none")]
        step: Option<&'static str>,
    },
    AtStop,
    OnVehicle {
        #[serde(skip_serializing_if = "Option::is_none")]
        stops_remaining: Option<u8>,
        #[serde(skip_serializing_if = "Option::is_none")]
        next_action: Option<&'static str>,
    },
    WalkingToDestination {
        #[serde(skip_serializing_if = "Option::is_none")]
        near_destination: Option<bool>,
    },
    Completed {
        journey_ended: bool,
    },
}

impl TurnData {
    /// Stage this payload reports, mirroring its serde tag.
    pub fn stage(&self) -> Stage {
        match self {
            TurnData::Intro { .. } => Stage::Intro,
            TurnData::AwaitingTransport { .. } => Stage::AwaitingTransport,
            TurnData::AwaitingPreferences { .. } => Stage::AwaitingPreferences,
            TurnData::ReadyToStart { .. } => Stage::ReadyToStart,
            TurnData::JourneyActive { .. } => Stage::JourneyActive,
            TurnData::AtStop => Stage::AtStop,
            TurnData::OnVehicle { .. } => Stage::OnVehicle,
            TurnData::WalkingToDestination { .. } => Stage::WalkingToDestination,
            TurnData::Completed { .. } => Stage::Completed,
        }
    }
}

/// Rendered turn result handed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutput {
    pub response: String,
    pub data: TurnData,
}

/// Render a reply into its message text and data payload.
pub fn compose(reply: &Reply) -> TurnOutput {
    match reply {
        Reply::Greeting { environment } => TurnOutput {
            response: format!(
                "Hi, this is Sara, your transit companion.\n\n\
                 You are in {}.\n\n\
                 The temperature is {}. Air quality index is {}. Humidity is {}.\n\n\
                 You've saved {} of CO2 this week.\n\n\
                 Where do you want to go?",
                environment.location,
                environment.temperature,
                environment.air_quality,
                environment.humidity,
                environment.co2_saved_week,
            ),
            data: TurnData::Intro {
                environment: Some(environment.clone()),
            },
        },

        Reply::ClarifyDestination => TurnOutput {
            response: "I didn't catch that. Please tell me where you want to go from and to. \
                       For example: 'I want to go from Union Station to CN Tower'"
                .to_string(),
            data: TurnData::Intro { environment: None },
        },

        Reply::RouteCaptured { origin, destination } => TurnOutput {
            response: format!(
                "Okay! You want to go from {origin} to {destination}. \
                 Which type of transport would you like to take?\n\n\
                 You can choose Bus, Train, or MRT/LRT."
            ),
            data: TurnData::AwaitingTransport {
                origin: Some(origin.clone()),
                destination: Some(destination.clone()),
            },
        },

        Reply::ClarifyTransport => TurnOutput {
            response: "Please choose a transport type: Bus, Train, or MRT/LRT.".to_string(),
            data: TurnData::AwaitingTransport {
                origin: None,
                destination: None,
            },
        },

        Reply::TransportChosen { transport, proposals } => {
            let mut response = format!(
                "Here are the suggested routes for {} transport...\n",
                transport.label()
            );
            for p in proposals {
                let _ = write!(
                    response,
                    "\nRoute {}: {:.1} kilometers, estimated travel time {} minutes. \
                     You will arrive at {}. Cost is {}. CO2 saved compared to driving: {:.1} kg.\n",
                    p.id, p.distance_km, p.duration_minutes, p.arrival_time, p.cost, p.co2_saved_kg,
                );
            }
            response.push_str(
                "\nDo you want me to recommend routes that save more CO2, or cheaper routes, \
                 or do you have any preferences like departure time?",
            );
            TurnOutput {
                response,
                data: TurnData::AwaitingPreferences {
                    routes: Some(proposals.to_vec()),
                },
            }
        }

        Reply::RouteSelected { transport, preference, proposal } => TurnOutput {
            response: format!(
                "Got it! For {} transport, the best match for your preference is \
                 Route {} ({}).\n\n\
                 Distance: {:.1} kilometers\n\
                 Estimated travel time: {} minutes\n\
                 Arrival time: {}\n\
                 Cost: {}\n\
                 CO2 saved: {:.1} kg\n\
                 Walking distance: 300 meters from your current location to the boarding stop, \
                 100 meters from the stop to your destination.\n\n\
                 Would you like me to start navigation now?",
                transport.label(),
                proposal.id,
                preference.label(),
                proposal.distance_km,
                proposal.duration_minutes,
                proposal.arrival_time,
                proposal.cost,
                proposal.co2_saved_kg,
            ),
            data: TurnData::ReadyToStart {
                preference: Some(*preference),
                selected_route: Some(format!("Route {} ({})", proposal.id, preference.label())),
            },
        },

        Reply::AwaitDeparture => TurnOutput {
            response: "Let me know when you're ready to start the journey. \
                       Just say 'start journey' or 'okay'."
                .to_string(),
            data: TurnData::ReadyToStart {
                preference: None,
                selected_route: None,
            },
        },

        Reply::JourneyStarted { proposal } => TurnOutput {
            response: format!(
                "Final confirmation before starting the journey...\n\n\
                 You will be walking to {BOARDING_STOP} from 8:00 PM to 8:08 PM, \
                 approximately 300 meters.\n\n\
                 At 8:10 PM, your ride will arrive. You will take it to the 3rd stop, \
                 then continue directly to your destination.\n\n\
                 Estimated ride time: 18 minutes. You will arrive at your destination at {}.\n\n\
                 Total distance: {:.1} kilometers. Cost: {}. Walking distance: 400 meters total.\n\n\
                 This route produces 38% less emissions and avoids poor air quality. \
                 You save {:.1} kg of CO2 using this route.\n\n\
                 Starting journey...\n\n\
                 The journey has been started. Start by walking to {BOARDING_STOP} at 8:00 PM. \
                 It should take about 8 minutes to walk there.",
                proposal.arrival_time, proposal.distance_km, proposal.cost, proposal.co2_saved_kg,
            ),
            data: TurnData::JourneyActive {
                step: Some("walking_to_boarding_stop"),
            },
        },

        Reply::KeepWalking => TurnOutput {
            response: format!(
                "Keep walking towards {BOARDING_STOP}. You're making good progress!"
            ),
            data: TurnData::JourneyActive { step: None },
        },

        Reply::ArrivedAtStop => TurnOutput {
            response: format!(
                "Perfect! You're at {BOARDING_STOP}.\n\n\
                 Please wait... Your ride will arrive at 8:10 PM. \
                 It is about 100 meters away from your current location."
            ),
            data: TurnData::AtStop,
        },

        Reply::StillWaiting => TurnOutput {
            response: "Your ride should be arriving any moment now at 8:10 PM. \
                       Please wait at the stop."
                .to_string(),
            data: TurnData::AtStop,
        },

        Reply::Boarded => TurnOutput {
            response: "Great! Now board and have a seat. Wait for 3 stops to reach your \
                       destination area.\n\n\
                       We are tracking your stops now..."
                .to_string(),
            data: TurnData::OnVehicle {
                stops_remaining: Some(3),
                next_action: None,
            },
        },

        Reply::PrepareToExit => TurnOutput {
            response: "The next stop is your destination stop. Please ring the bell now \
                       and get ready to exit."
                .to_string(),
            data: TurnData::OnVehicle {
                stops_remaining: None,
                next_action: Some("prepare_to_exit"),
            },
        },

        Reply::FinalLeg => TurnOutput {
            response: "Excellent! Tracking your current location...\n\n\
                       Now walk 100 meters towards the left and your destination will be \
                       on your right.\n\n\
                       We are tracking your steps while you're walking..."
                .to_string(),
            data: TurnData::WalkingToDestination {
                near_destination: None,
            },
        },

        Reply::AlmostThere => TurnOutput {
            response: "Keep walking... you're almost there!\n\n\
                       You are now at your destination. It should be on your right. \
                       You've successfully completed your journey!"
                .to_string(),
            data: TurnData::WalkingToDestination {
                near_destination: Some(true),
            },
        },

        Reply::JourneySummary { proposal } => TurnOutput {
            response: format!(
                "You're very welcome! We are ending the journey now.\n\n\
                 Journey summary:\n\
                 - Total travel time: {} minutes\n\
                 - CO2 saved: {:.1} kg\n\
                 - Total cost: {}\n\
                 - You arrived safely at your destination!\n\n\
                 Have a wonderful day! Feel free to ask me for navigation help anytime.",
                proposal.duration_minutes, proposal.co2_saved_kg, proposal.cost,
            ),
            data: TurnData::Completed { journey_ended: true },
        },
    }
}
