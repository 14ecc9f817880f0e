//! Property-based tests for the dialogue core

use super::intent::{classify_preference, extract_locations};
use super::reply::compose;
use super::routes::proposals;
use super::session::{Preference, Session, Stage, Transport};
use super::turn::take_turn;
use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

fn arb_stage() -> impl Strategy<Value = Stage> {
    prop_oneof![
        Just(Stage::Intro),
        Just(Stage::AwaitingTransport),
        Just(Stage::AwaitingPreferences),
        Just(Stage::ReadyToStart),
        Just(Stage::JourneyActive),
        Just(Stage::AtStop),
        Just(Stage::OnVehicle),
        Just(Stage::WalkingToDestination),
        Just(Stage::Completed),
    ]
}

fn arb_transport() -> impl Strategy<Value = Transport> {
    prop_oneof![
        Just(Transport::Bus),
        Just(Transport::Train),
        Just(Transport::RailTransit),
    ]
}

/// Sessions with any stage and any field population, including
/// combinations a well-behaved flow would never produce.
fn arb_session() -> impl Strategy<Value = Session> {
    (
        arb_stage(),
        proptest::option::of("[a-z ]{1,20}"),
        proptest::option::of("[a-z ]{1,20}"),
        proptest::option::of(arb_transport()),
        proptest::option::of(1u8..=3),
    )
        .prop_map(|(stage, origin, destination, transport, selected_route)| Session {
            stage,
            origin,
            destination,
            transport,
            selected_route,
        })
}

fn arb_time() -> impl Strategy<Value = NaiveDateTime> {
    (0u32..24, 0u32..60).prop_map(|(h, m)| {
        NaiveDate::from_ymd_opt(2026, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    })
}

/// The only stage a given stage may move to besides itself or a reset
/// back to Intro.
fn forward_edge(stage: Stage) -> Option<Stage> {
    match stage {
        Stage::Intro => Some(Stage::AwaitingTransport),
        Stage::AwaitingTransport => Some(Stage::AwaitingPreferences),
        Stage::AwaitingPreferences => Some(Stage::ReadyToStart),
        Stage::ReadyToStart => Some(Stage::JourneyActive),
        Stage::JourneyActive => Some(Stage::AtStop),
        Stage::AtStop => Some(Stage::OnVehicle),
        Stage::OnVehicle => Some(Stage::WalkingToDestination),
        Stage::WalkingToDestination => Some(Stage::Completed),
        Stage::Completed => None,
    }
}

proptest! {
    /// The machine never leaves the enumerated edges: stay in place,
    /// advance along the single forward edge, or reset to Intro.
    #[test]
    fn transitions_stay_inside_the_table(
        session in arb_session(),
        utterance in ".{0,60}",
        now in arb_time(),
    ) {
        let result = take_turn(&session, &utterance, now);
        let next = result.session.stage;
        let allowed = next == session.stage
            || next == Stage::Intro
            || forward_edge(session.stage) == Some(next);
        prop_assert!(allowed, "{:?} -> {:?} is not an edge", session.stage, next);
    }

    /// Resetting from any stage, any number of times, lands on an
    /// identical cleared-Intro result.
    #[test]
    fn reset_is_idempotent(session in arb_session(), now in arb_time()) {
        let first = take_turn(&session, "init", now);
        prop_assert_eq!(&first.session, &Session::new());

        let again = take_turn(&first.session, "initialize", now);
        prop_assert_eq!(&again.session, &Session::new());
        prop_assert_eq!(&again.reply, &first.reply);

        let first_out = serde_json::to_value(compose(&first.reply).data).unwrap();
        let again_out = serde_json::to_value(compose(&again.reply).data).unwrap();
        prop_assert_eq!(first_out, again_out);
    }

    /// "from X to Y" always yields both spans trimmed, lower-cased, and
    /// free of trailing punctuation.
    #[test]
    fn from_to_extraction_normalizes(
        origin in "[a-np-z][a-np-z ]{0,14}[a-np-z]",
        destination in "[a-np-z][a-np-z ]{0,14}[a-np-z]",
        punct in prop_oneof![Just(""), Just("."), Just("?"), Just("!")],
    ) {
        // Place names without "to" as a word, so the spans are unambiguous.
        prop_assume!(!format!(" {origin} ").contains(" to "));
        prop_assume!(!format!(" {destination} ").contains(" to "));

        let text = format!("from {origin} to {destination}{punct}");
        let (o, d) = extract_locations(&text);
        let origin_norm = origin.trim().to_lowercase();
        let destination_norm = destination.trim().to_lowercase();
        prop_assert_eq!(o.as_deref(), Some(origin_norm.as_str()));
        prop_assert_eq!(d.as_deref(), Some(destination_norm.as_str()));
    }

    /// Unrecognized Intro input never mutates the session.
    #[test]
    fn unmatched_intro_input_is_a_noop(
        utterance in "[b-df-hj-np-tv-xz ]{0,30}",
        now in arb_time(),
    ) {
        prop_assume!(extract_locations(&utterance) == (None, None));
        prop_assume!(!["initialize", "init", "start"]
            .contains(&utterance.trim().to_lowercase().as_str()));

        let before = Session::new();
        let result = take_turn(&before, &utterance, now);
        prop_assert_eq!(result.session, before);
    }

    /// Exactly three proposals in stable id order for any transport and
    /// invocation time.
    #[test]
    fn proposals_are_three_and_ordered(transport in arb_transport(), now in arb_time()) {
        let routes = proposals(transport, now);
        prop_assert_eq!(routes.len(), 3);
        prop_assert_eq!(routes.map(|r| r.id), [1, 2, 3]);
    }

    /// Eco keywords always win over cost keywords regardless of the
    /// surrounding text.
    #[test]
    fn eco_beats_cost(filler in "[a-z ]{0,20}") {
        let text = format!("{filler} eco but cheap");
        prop_assert_eq!(classify_preference(&text), Preference::Eco);
    }
}
