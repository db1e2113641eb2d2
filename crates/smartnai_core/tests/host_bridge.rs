use smartnai_core::{FieldUpdate, HostBridge, HostError, HostPage, HostSelectors, PageField, PageHostBridge};

fn page_with_fields() -> (HostPage, usize, usize) {
    let mut page = HostPage::new();
    page.add_field(PageField::new("textarea").with_label("Prompt"));
    let positive = page.add_field(PageField::new("textarea").with_id("prompt-input-0"));
    page.add_field(PageField::new("input").with_label("Undesired Content"));
    let undesired = page.add_field(PageField::new("textarea").with_label("  undesired   content "));
    page.add_field(PageField::new("textarea").with_label("Undesired Content"));
    (page, positive, undesired)
}

#[test]
fn positive_field_is_set_and_notified() {
    let (mut page, positive, _) = page_with_fields();
    {
        let mut bridge = PageHostBridge::new(&mut page, HostSelectors::default());
        bridge.set_positive_prompt_field("{{cat}}").unwrap();
    }

    assert_eq!(page.field(positive).unwrap().value, "{{cat}}");
    assert_eq!(page.events().len(), 1);
    assert_eq!(page.events()[0].field_index, positive);
    assert_eq!(page.events()[0].kind, "input");
    assert!(page.events()[0].bubbles);
}

#[test]
fn undesired_field_is_first_labelled_candidate() {
    let (mut page, _, undesired) = page_with_fields();
    let update = {
        let mut bridge = PageHostBridge::new(&mut page, HostSelectors::default());
        bridge.set_undesired_prompt_field("(blurry)").unwrap()
    };

    assert_eq!(update, FieldUpdate::Applied);
    assert_eq!(page.field(undesired).unwrap().value, "(blurry)");
    assert!(page.field(undesired + 1).unwrap().value.is_empty());
    assert_eq!(page.events().len(), 1);
}

#[test]
fn missing_undesired_field_is_skipped_silently() {
    let mut page = HostPage::new();
    page.add_field(PageField::new("textarea").with_id("prompt-input-0"));
    page.add_field(PageField::new("textarea").with_label("Negative"));

    let mut bridge = PageHostBridge::new(&mut page, HostSelectors::default());
    let update = bridge.set_undesired_prompt_field("(blurry)").unwrap();
    drop(bridge);

    assert_eq!(update, FieldUpdate::Skipped);
    assert!(page.events().is_empty());
}

#[test]
fn missing_positive_field_is_an_error() {
    let mut page = HostPage::new();
    let mut bridge = PageHostBridge::new(&mut page, HostSelectors::default());

    match bridge.set_positive_prompt_field("cat") {
        Err(HostError::FieldNotFound(selector)) => assert_eq!(selector, "#prompt-input-0"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn custom_selectors_are_honoured() {
    let mut page = HostPage::new();
    let positive = page.add_field(PageField::new("input").with_id("main"));
    let negative = page.add_field(PageField::new("input").with_label("Negative prompt"));
    let selectors = HostSelectors {
        positive_field_id: "main".to_string(),
        undesired_candidate_tag: "input".to_string(),
        undesired_label: "Negative Prompt".to_string(),
    };

    let mut bridge = PageHostBridge::new(&mut page, selectors);
    bridge.set_positive_prompt_field("cat").unwrap();
    bridge.set_undesired_prompt_field("dog").unwrap();
    drop(bridge);

    assert_eq!(page.field(positive).unwrap().value, "cat");
    assert_eq!(page.field(negative).unwrap().value, "dog");
}
