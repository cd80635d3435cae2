//! End-to-end dispatch through a bound page: ordering, context flow, load-time
//! evaluation and the log-and-continue boundary.

use when_engine::context::{ContextStore, ResolverSettings};
use when_engine::registry::ElementNode;
use when_engine::session::Session;

use crate::integration::{click, input, session_for};

const FORM: &str = r#"{"id":"root","type":"root","children":[
    {"id":"name","type":"textfield","parent":"root",
     "do":[{"actionType":"input","interactionType":"context","policy":"(name,_value)"}]},
    {"id":"label","type":"label","parent":"root",
     "attributes":[{"id":"label","key":"text","value":"idle"}]},
    {"id":"go","type":"button","parent":"root",
     "do":[
        {"actionType":"click","interactionType":"call","policy":"audit()"},
        {"actionType":"click","interactionType":"callback","policy":"greet(_context_value(name),_context_value(count))"},
        {"actionType":"click","interactionType":"context","policy":"(count,3)"},
        {"actionType":"click","interactionType":"update","policy":"(label,text,sent)"}
     ]}
]}"#;

fn label_text(session: &Session) -> String {
    session
        .elements()
        .attributes("label")
        .unwrap()
        .into_iter()
        .find(|a| a.key == "text")
        .map(|a| a.value)
        .unwrap()
}

#[test]
fn test_click_runs_policies_in_descending_label_order() {
    let session = session_for(FORM);
    session.replay(&[input("name", "Ada"), click("go")]);

    let snapshot = session.snapshot();
    assert_eq!(label_text(&session), "sent");
    // context ran before callback, so count is already visible to the resolver
    let functions: Vec<&str> = snapshot
        .submissions
        .iter()
        .map(|s| s.function.as_str())
        .collect();
    assert_eq!(functions, vec!["greet(\"Ada\",3)", "audit()"]);
}

#[test]
fn test_submission_carries_context_snapshot() {
    let session = session_for(FORM);
    session.replay(&[input("name", "Ada"), click("go")]);

    let snapshot = session.snapshot();
    let keys: Vec<&str> = snapshot.submissions[0]
        .context
        .iter()
        .map(|e| e.key.as_str())
        .collect();
    assert_eq!(keys, vec!["count", "name"]);
}

#[test]
fn test_bound_callback_resolves_fresh_on_every_click() {
    let session = session_for(FORM);
    session.replay(&[
        input("name", "Ada"),
        click("go"),
        input("name", "Bob"),
        click("go"),
    ]);

    let functions: Vec<String> = session
        .snapshot()
        .submissions
        .into_iter()
        .map(|s| s.function)
        .filter(|f| f.starts_with("greet"))
        .collect();
    assert_eq!(functions, vec!["greet(\"Ada\",3)", "greet(\"Bob\",3)"]);
}

#[test]
fn test_empty_input_keeps_previous_context() {
    let session = session_for(FORM);
    session.replay(&[input("name", "Ada"), input("name", "")]);
    assert_eq!(
        session.context().retrieve_context_value("name").as_deref(),
        Some("Ada")
    );
}

#[test]
fn test_click_listener_sets_pointer_cursor() {
    let session = session_for(FORM);
    assert_eq!(
        session.page().target("go").unwrap().cursor.as_deref(),
        Some("pointer")
    );
    assert_eq!(session.page().target("name").unwrap().cursor, None);
}

#[test]
fn test_failed_policy_does_not_stop_the_rest() {
    let session = session_for(
        r#"{"id":"root","type":"root","children":[
            {"id":"go","type":"button","parent":"root","do":[
                {"actionType":"click","interactionType":"update","policy":"(ghost,text,x)"},
                {"actionType":"click","interactionType":"context","policy":"(tooshort)"},
                {"actionType":"click","interactionType":"call","policy":"still_runs()"}
            ]}
        ]}"#,
    );
    session.replay(&[click("go")]);

    let snapshot = session.snapshot();
    assert!(snapshot.context.is_empty());
    assert_eq!(snapshot.submissions.len(), 1);
    assert_eq!(snapshot.submissions[0].function, "still_runs()");
}

#[test]
fn test_load_policies_run_at_bind_time_context_only() {
    let session = session_for(
        r#"{"id":"root","type":"root","do":[
            {"actionType":"load","interactionType":"context","policy":"(mode,Edit)"},
            {"actionType":"load","interactionType":"callback","policy":"never()"},
            {"actionType":"load","interactionType":"update","policy":"(root,title,never)"}
        ]}"#,
    );

    let snapshot = session.snapshot();
    assert_eq!(
        session.context().retrieve_context_value("mode").as_deref(),
        Some("Edit")
    );
    assert!(snapshot.submissions.is_empty());
    assert!(session.elements().attributes("root").unwrap().is_empty());
}

#[test]
fn test_self_referencing_context_hits_the_pass_limit() {
    let root = ElementNode::from_json(
        r#"{"id":"root","type":"root","do":[
            {"actionType":"load","interactionType":"context","policy":"(loop,_context_value(loop))"}
        ],"children":[
            {"id":"go","type":"button","parent":"root","do":[
                {"actionType":"click","interactionType":"callback","policy":"f(_context_value(loop))"}
            ]}
        ]}"#,
    )
    .unwrap();
    let session = Session::from_tree(&root, ResolverSettings { max_passes: 4 });
    session.replay(&[click("go")]);

    assert!(session.snapshot().submissions.is_empty());
}

#[test]
fn test_events_for_unbound_kinds_are_ignored() {
    let session = session_for(FORM);
    session.replay(&[click("name"), input("go", "x")]);
    let snapshot = session.snapshot();
    assert!(snapshot.context.is_empty());
    assert!(snapshot.submissions.is_empty());
}
