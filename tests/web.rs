// Browser tests. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn start_game_builds_the_surface() {
    reflex_cat::start_game().unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    assert!(doc.get_element_by_id("rc-root").is_some());
    assert!(doc.get_element_by_id("rc-normal").is_some());
    assert!(doc.get_element_by_id("rc-result").unwrap().has_attribute("hidden"));
    let message = doc.get_element_by_id("rc-message").unwrap();
    assert_eq!(message.text_content().as_deref(), Some("モードを選んでね"));
}

#[wasm_bindgen_test]
fn restarting_reuses_elements() {
    reflex_cat::start_game().unwrap();
    reflex_cat::start_game().unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    let root = doc.get_element_by_id("rc-root").unwrap();
    // menu, play area and result panel; nothing duplicated
    assert_eq!(root.child_element_count(), 3);
}

#[wasm_bindgen_test]
fn bad_config_is_rejected() {
    assert!(reflex_cat::start_game_with_config(r#"{"fake_probability": 2.0}"#).is_err());
    assert!(reflex_cat::start_game_with_config(r#"{"share_url": "https://example.org"}"#).is_ok());
}
