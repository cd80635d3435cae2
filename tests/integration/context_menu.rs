//! Context-menu coordination on a bound page: toggling, single-open and the
//! document-level close handlers.

use when_engine::dom::DomEvent;
use when_engine::session::Session;

use crate::integration::{click, right_click, session_for};

const PAGE: &str = r#"{"id":"root","type":"root","children":[
    {"id":"card","type":"panel","parent":"root",
     "do":[{"actionType":"right_click","interactionType":"show_context_menu","policy":"card_menu"}]},
    {"id":"list","type":"panel","parent":"root",
     "do":[{"actionType":"right_click","interactionType":"show_context_menu","policy":"list_menu"}]},
    {"id":"ghost","type":"panel","parent":"root",
     "do":[{"actionType":"right_click","interactionType":"show_context_menu","policy":"missing_menu"}]},
    {"id":"plain","type":"label","parent":"root"},
    {"id":"card_menu","type":"context_menu","parent":"root"},
    {"id":"list_menu","type":"contextmenu","parent":"root"}
]}"#;

fn open_menus(session: &Session) -> Vec<String> {
    session.menus().open_menus()
}

#[test]
fn test_menu_nodes_are_registered_hidden() {
    let session = session_for(PAGE);
    let keys: Vec<String> = session.menus().menus().into_iter().map(|m| m.key).collect();
    assert_eq!(keys, vec!["card_menu", "list_menu"]);
    assert!(open_menus(&session).is_empty());
}

#[test]
fn test_right_click_shows_menu_at_pointer() {
    let session = session_for(PAGE);
    let event: DomEvent = session.fire(&right_click("card", 40.0, 80.0));

    assert!(event.default_prevented);
    assert!(event.propagation_stopped);
    let state = session.menus().menu("card_menu").unwrap();
    assert!(state.is_open());
    assert_eq!((state.left, state.top), (Some(40.0), Some(80.0)));
}

#[test]
fn test_second_right_click_toggles_closed() {
    let session = session_for(PAGE);
    session.replay(&[right_click("card", 1.0, 1.0), right_click("card", 2.0, 2.0)]);
    assert!(open_menus(&session).is_empty());
}

#[test]
fn test_only_one_menu_open_at_a_time() {
    let session = session_for(PAGE);
    session.replay(&[right_click("card", 1.0, 1.0), right_click("list", 5.0, 6.0)]);
    assert_eq!(open_menus(&session), vec!["list_menu"]);
}

#[test]
fn test_click_anywhere_closes_and_consumes() {
    let session = session_for(PAGE);
    session.fire(&right_click("card", 1.0, 1.0));

    let event = session.fire(&click("plain"));
    assert!(event.default_prevented);
    assert!(open_menus(&session).is_empty());

    // nothing left to close, so the next click passes through untouched
    let event = session.fire(&click("plain"));
    assert!(!event.default_prevented);
}

#[test]
fn test_right_click_on_bare_document_closes() {
    let session = session_for(PAGE);
    session.fire(&right_click("card", 1.0, 1.0));

    let event = session.fire(&right_click("nowhere", 9.0, 9.0));
    assert!(event.default_prevented);
    assert!(open_menus(&session).is_empty());
}

#[test]
fn test_unknown_menu_key_closes_others_and_opens_nothing() {
    let session = session_for(PAGE);
    session.replay(&[right_click("card", 1.0, 1.0), right_click("ghost", 3.0, 3.0)]);
    assert!(open_menus(&session).is_empty());
}
