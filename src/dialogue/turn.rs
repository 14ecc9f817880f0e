//! Pure turn transition function
//!
//! Given the current session and a new utterance, selects the stage
//! handler, runs the relevant extractors or the proposal generator, and
//! returns the next session value plus a reply. No I/O, no mutation:
//! the same `(session, utterance, now)` always yields the same result.
//!
//! Every unmatched utterance is a re-prompt that keeps the stage in
//! place; a session in an unusable state (journey stages with missing
//! fields, or a finished conversation) resets to the greeting. The
//! assistant never dead-ends a conversation.

use super::intent::{classify_preference, extract_locations, extract_transport};
use super::reply::{environment_summary, Reply, BOARDING_STOP};
use super::routes::{proposal_by_id, proposals};
use super::session::{Session, Stage, Transport};
use chrono::NaiveDateTime;

/// Utterances that restart the conversation from any stage.
///
/// Matched against the whole trimmed lower-cased utterance, so a bare
/// "start" resets while "start journey" confirms departure.
const RESET_KEYWORDS: [&str; 3] = ["initialize", "init", "start"];

/// Result of one turn: the session to store and the reply to render.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResult {
    pub session: Session,
    pub reply: Reply,
}

impl TurnResult {
    fn new(session: Session, reply: Reply) -> Self {
        Self { session, reply }
    }

    /// Re-prompt: keep the session as-is.
    fn reprompt(session: &Session, reply: Reply) -> Self {
        Self {
            session: session.clone(),
            reply,
        }
    }

    /// Defensive full reset back to the greeting.
    fn reset() -> Self {
        Self {
            session: Session::new(),
            reply: Reply::Greeting {
                environment: environment_summary(),
            },
        }
    }
}

/// Process one utterance against a session.
///
/// `now` anchors the proposal arrival times; passing it in keeps the
/// function deterministic under test.
pub fn take_turn(session: &Session, utterance: &str, now: NaiveDateTime) -> TurnResult {
    let text = utterance.trim().to_lowercase();

    if RESET_KEYWORDS.contains(&text.as_str()) {
        return TurnResult::reset();
    }

    match session.stage {
        Stage::Intro => handle_destination(session, utterance),
        Stage::AwaitingTransport => handle_transport(session, utterance, now),
        Stage::AwaitingPreferences => handle_preferences(session, utterance, now),
        Stage::ReadyToStart => handle_departure(session, &text, now),
        Stage::JourneyActive => handle_walk_to_stop(session, &text),
        Stage::AtStop => handle_vehicle_arrival(session, &text),
        Stage::OnVehicle => handle_ride(session, &text),
        Stage::WalkingToDestination => handle_final_walk(session, &text, now),
        // A finished conversation starts over on the next utterance.
        Stage::Completed => TurnResult::reset(),
    }
}

fn handle_destination(session: &Session, utterance: &str) -> TurnResult {
    let (origin, destination) = extract_locations(utterance);
    let (Some(origin), Some(destination)) = (origin, destination) else {
        return TurnResult::reprompt(session, Reply::ClarifyDestination);
    };

    let next = Session {
        stage: Stage::AwaitingTransport,
        origin: Some(origin.clone()),
        destination: Some(destination.clone()),
        ..session.clone()
    };
    TurnResult::new(next, Reply::RouteCaptured { origin, destination })
}

fn handle_transport(session: &Session, utterance: &str, now: NaiveDateTime) -> TurnResult {
    let Some(transport) = extract_transport(utterance) else {
        return TurnResult::reprompt(session, Reply::ClarifyTransport);
    };

    let options = proposals(transport, now);
    let next = Session {
        stage: Stage::AwaitingPreferences,
        transport: Some(transport),
        ..session.clone()
    };
    TurnResult::new(
        next,
        Reply::TransportChosen {
            transport,
            proposals: options,
        },
    )
}

fn handle_preferences(session: &Session, utterance: &str, now: NaiveDateTime) -> TurnResult {
    let Some(transport) = session.transport else {
        return TurnResult::reset();
    };

    let preference = classify_preference(utterance);
    let id = preference.route_id();
    let Some(proposal) = proposal_by_id(transport, now, id) else {
        return TurnResult::reset();
    };

    let next = Session {
        stage: Stage::ReadyToStart,
        selected_route: Some(id),
        ..session.clone()
    };
    TurnResult::new(
        next,
        Reply::RouteSelected {
            transport,
            preference,
            proposal,
        },
    )
}

fn handle_departure(session: &Session, text: &str, now: NaiveDateTime) -> TurnResult {
    let confirmed = ["start", "okay", "yes"].iter().any(|kw| text.contains(kw));
    if !confirmed {
        return TurnResult::reprompt(session, Reply::AwaitDeparture);
    }

    let Some(proposal) = selected_proposal(session, now) else {
        return TurnResult::reset();
    };

    let next = Session {
        stage: Stage::JourneyActive,
        ..session.clone()
    };
    TurnResult::new(next, Reply::JourneyStarted { proposal })
}

fn handle_walk_to_stop(session: &Session, text: &str) -> TurnResult {
    let at_stop = text.contains(&BOARDING_STOP.to_lowercase()) || text.contains("bus stop");
    if at_stop {
        let next = Session {
            stage: Stage::AtStop,
            ..session.clone()
        };
        TurnResult::new(next, Reply::ArrivedAtStop)
    } else {
        TurnResult::reprompt(session, Reply::KeepWalking)
    }
}

fn handle_vehicle_arrival(session: &Session, text: &str) -> TurnResult {
    let vehicle_here = text.contains("here") || text.contains("arrived");
    if vehicle_here {
        let next = Session {
            stage: Stage::OnVehicle,
            ..session.clone()
        };
        TurnResult::new(next, Reply::Boarded)
    } else {
        TurnResult::reprompt(session, Reply::StillWaiting)
    }
}

fn handle_ride(session: &Session, text: &str) -> TurnResult {
    let alighted = ["got down", "off the bus", "exited", "got off"]
        .iter()
        .any(|kw| text.contains(kw));
    if alighted {
        let next = Session {
            stage: Stage::WalkingToDestination,
            ..session.clone()
        };
        TurnResult::new(next, Reply::FinalLeg)
    } else {
        TurnResult::reprompt(session, Reply::PrepareToExit)
    }
}

fn handle_final_walk(session: &Session, text: &str, now: NaiveDateTime) -> TurnResult {
    let done = ["thank you", "thanks", "end journey", "arrived"]
        .iter()
        .any(|kw| text.contains(kw));
    if !done {
        return TurnResult::reprompt(session, Reply::AlmostThere);
    }

    let Some(proposal) = selected_proposal(session, now) else {
        return TurnResult::reset();
    };

    // The journey is over: clear everything except the terminal stage,
    // so the next utterance starts a fresh conversation.
    let next = Session {
        stage: Stage::Completed,
        ..Session::new()
    };
    TurnResult::new(next, Reply::JourneySummary { proposal })
}

fn selected_proposal(
    session: &Session,
    now: NaiveDateTime,
) -> Option<super::session::RouteProposal> {
    let transport: Transport = session.transport?;
    let id = session.selected_route?;
    proposal_by_id(transport, now, id)
}
