use super::test_harness::{offline_interview, setup_wizard_harness};

#[tokio::test(flavor = "current_thread")]
async fn wizard_smoke_renders_setup_defaults() {
    let mut harness = setup_wizard_harness(offline_interview());
    harness.rebuild();
    let html = harness.render();

    for expected in [
        "Set up your interview",
        "Software Engineer",
        "Offline practice",
        "Total cost: $0.0000",
        "Start interview",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert!(!html.contains("Start over"), "setup screen offers start over: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn wizard_smoke_lists_difficulties() {
    let mut harness = setup_wizard_harness(offline_interview());
    harness.rebuild();
    let html = harness.render();

    for level in ["Easy", "Medium", "Hard"] {
        assert!(html.contains(level), "missing {level} in {html}");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn wizard_smoke_offers_priced_models() {
    let mut harness = setup_wizard_harness(offline_interview());
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("id=\"setup-model\""), "missing model picker in {html}");
    for model in ["value=\"gpt-4o\"", "value=\"gpt-4o-mini\""] {
        assert!(html.contains(model), "missing {model} in {html}");
    }
}
