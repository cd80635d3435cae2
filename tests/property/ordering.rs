//! Property-based tests for dispatch ordering

use proptest::prelude::*;
use when_engine::binder::applicable_policies;
use when_engine::types::{ActionType, Policy};

fn arb_policy() -> impl Strategy<Value = Policy> {
    (
        prop::sample::select(vec!["click", "input", "right_click", "load"]),
        prop::sample::select(vec!["update", "context", "call", "callback", "show_context_menu"]),
        "[a-z]{1,4}",
    )
        .prop_map(|(action, interaction, body)| Policy::new(action, interaction, body))
}

/// Output holds exactly the matching policies, sorted descending, ties in input order
#[test]
fn test_applicable_policies_is_a_stable_descending_filter() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(arb_policy(), 0..12), |policies| {
            let action = ActionType::Click;
            let ordered = applicable_policies(&policies, &action);

            let matching: Vec<&Policy> =
                policies.iter().filter(|p| p.action_type == action).collect();
            assert_eq!(ordered.len(), matching.len());

            for pair in ordered.windows(2) {
                let (a, b) = (pair[0].interaction_type.label(), pair[1].interaction_type.label());
                assert!(a >= b);
            }

            for label in ["update", "show_context_menu", "context", "callback", "call"] {
                let expected: Vec<&str> = matching
                    .iter()
                    .filter(|p| p.interaction_type.label() == label)
                    .map(|p| p.policy.as_str())
                    .collect();
                let actual: Vec<&str> = ordered
                    .iter()
                    .filter(|p| p.interaction_type.label() == label)
                    .map(|p| p.policy.as_str())
                    .collect();
                assert_eq!(actual, expected);
            }
            Ok(())
        })
        .unwrap();
}
