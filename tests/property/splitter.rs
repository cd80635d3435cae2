//! Property-based tests for the argument splitter

use proptest::prelude::*;
use when_engine::splitter::{split_arguments, strip_outer_parens, try_split_arguments};

/// Without brackets the splitter is a plain comma split
#[test]
fn test_flat_input_splits_on_every_comma() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&"[a-z0-9 ,]{0,40}", |input| {
            let tokens = split_arguments(&input);
            assert_eq!(tokens.len(), input.matches(',').count() + 1);
            assert_eq!(tokens.join(","), input);
            Ok(())
        })
        .unwrap();
}

/// Joining balanced tokens with commas and splitting again gives the tokens back
#[test]
fn test_nested_commas_stay_inside_their_token() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let token = "[a-z]{0,3}(\\([a-z,]{0,4}\\))?";

    runner
        .run(&prop::collection::vec(token, 1..6), |tokens| {
            let joined = tokens.join(",");
            let split = try_split_arguments(&joined).unwrap();
            assert_eq!(split, tokens);
            Ok(())
        })
        .unwrap();
}

/// The splitter never returns an empty token list and never panics
#[test]
fn test_always_at_least_one_token() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&any::<String>(), |input| {
            assert!(!split_arguments(&input).is_empty());
            Ok(())
        })
        .unwrap();
}

/// A stray `)` yields exactly the tokens completed before it
#[test]
fn test_unbalanced_bracket_keeps_prefix() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&("[a-z,]{0,10}", "[a-z,()]{0,10}"), |(prefix, rest)| {
            let input = format!("{}){}", prefix, rest);
            let tokens = split_arguments(&input);
            let expected: Vec<String> = prefix.split(',').map(str::to_string).collect();
            assert_eq!(tokens, expected);
            Ok(())
        })
        .unwrap();
}

/// Stripping only removes a matched outer pair
#[test]
fn test_strip_outer_parens_only_removes_a_pair() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&"[a-z,]{0,12}", |inner| {
            let wrapped = format!("({})", inner);
            assert_eq!(strip_outer_parens(&wrapped), inner);
            assert_eq!(strip_outer_parens(&inner), inner);
            let open_only = format!("({}", inner);
            assert_eq!(strip_outer_parens(&open_only), open_only);
            Ok(())
        })
        .unwrap();
}
