//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_label() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,20}".prop_map(|s| s.trim().to_string())
}

fn arb_data() -> impl Strategy<Value = std::collections::BTreeMap<String, String>> {
    proptest::collection::btree_map(arb_label(), "[a-zA-Z0-9 ]{0,20}", 0..4)
}

fn arb_consistent_state() -> impl Strategy<Value = SessionState> {
    (
        prop_oneof![
            Just(Stage::Choosing),
            Just(Stage::TypingChoice),
            Just(Stage::TypingReply),
        ],
        arb_label(),
        arb_data(),
    )
        .prop_map(|(stage, label, data)| SessionState {
            stage,
            pending_key: if stage == Stage::TypingReply {
                label
            } else {
                String::new()
            },
            data,
        })
}

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Start),
        Just(Command::Cancel),
        Just(Command::ShowData),
        Just(Command::ShowAllData),
        "[a-z_]{1,10}".prop_map(|name| Command::parse(&name)),
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(KEYBOARD_OPTIONS.to_vec()).prop_map(String::from),
        "[ ]{0,3}".prop_map(String::from),
        "[a-zA-Z0-9 .]{0,30}".prop_map(String::from),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_command().prop_map(Event::Command),
        arb_text().prop_map(Event::Text),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Pending key is set exactly while waiting for a value
    #[test]
    fn prop_transitions_keep_pending_key_consistent(
        events in proptest::collection::vec(arb_event(), 0..30)
    ) {
        let mut state = SessionState::default();
        for event in events {
            state = transition(&state, event).new_state;
            prop_assert!(state.is_consistent(), "Inconsistent state: {:?}", state);
        }
    }

    // Any change to the session is accompanied by a persist
    #[test]
    fn prop_state_changes_persist(state in arb_consistent_state(), event in arb_event()) {
        let result = transition(&state, event);
        if result.new_state != state {
            prop_assert!(
                result.persists(),
                "State changed but no PersistState effect: {:?} -> {:?}",
                state,
                result.new_state
            );
        }
    }

    // Choosing a fixed category then typing a value stores the trimmed value
    #[test]
    fn prop_category_then_value_is_stored(
        category in proptest::sample::select(FIXED_CATEGORIES.to_vec()),
        value in "[ ]{0,2}[a-zA-Z0-9][a-zA-Z0-9 ]{0,20}",
        data in arb_data(),
    ) {
        let state = SessionState { data, ..SessionState::default() };

        let chosen = transition(&state, Event::Text(category.to_string()));
        prop_assert_eq!(chosen.new_state.stage, Stage::TypingReply);

        let saved = transition(&chosen.new_state, Event::Text(value.clone()));
        prop_assert_eq!(saved.new_state.data.get(category), Some(&value.trim().to_string()));
        prop_assert!(saved.reply.show_keyboard());
    }

    // show_data never changes anything
    #[test]
    fn prop_show_data_is_idempotent(state in arb_consistent_state()) {
        let once = transition(&state, Event::Command(Command::ShowData));
        let twice = transition(&once.new_state, Event::Command(Command::ShowData));
        prop_assert_eq!(&twice.new_state, &state);
        prop_assert_eq!(once.reply, twice.reply);
    }

    // Ending a conversation removes the keyboard and lists every fact
    #[test]
    fn prop_finish_lists_every_fact(
        state in arb_consistent_state(),
        via_done in any::<bool>(),
    ) {
        let event = if via_done && state.stage == Stage::Choosing {
            Event::Text(DONE.to_string())
        } else {
            Event::Command(Command::Cancel)
        };

        let result = transition(&state, event);
        prop_assert!(result.reply.remove_keyboard());
        prop_assert_eq!(result.new_state.stage, Stage::Choosing);
        prop_assert_eq!(&result.new_state.data, &state.data);
        for (label, value) in &state.data {
            let line = format!("{label} - {value}");
            prop_assert!(result.reply.text.contains(&line));
        }
    }

    // Commands behave the same regardless of stage
    #[test]
    fn prop_start_always_returns_to_choosing(state in arb_consistent_state()) {
        let result = transition(&state, Event::Command(Command::Start));
        prop_assert_eq!(result.new_state.stage, Stage::Choosing);
        prop_assert!(result.new_state.pending_key.is_empty());
        prop_assert!(result.reply.show_keyboard());
    }
}
