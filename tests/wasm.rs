//! Browser smoke test, run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn start_card_builds_the_chrome() {
    dental_valentine::start_card().unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    assert!(doc.get_element_by_id("sc-root").is_some());
    assert!(doc.get_element_by_id("sc-jaw-top").is_some());
    assert!(doc.get_element_by_id("sc-jaw-bottom").is_some());
    assert!(doc.get_element_by_id("sc-audio").is_some());
    // The hero section renders first.
    assert!(doc.get_element_by_id("sc-start").is_some());
}
