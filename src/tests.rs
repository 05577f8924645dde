use super::*;

mod animate;
mod mobile_menu;
mod toast;

#[test]
fn page_without_enhanced_elements_loads_quietly() -> Result<()> {
    let mut page = Page::from_html("<p id='plain'>Nothing to enhance</p>")?;
    page.load()?;
    page.flush()?;
    page.scroll_to(400)?;
    assert!(!page.key_down(KeyInput::escape())?.default_prevented);
    assert!(!page.show_toast("hello", ToastKind::Info)?);
    page.assert_text("#plain", "Nothing to enhance")?;
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn load_is_idempotent() -> Result<()> {
    let html = r#"<div class="stat-card"></div><div class="alert"></div>"#;
    let mut page = Page::from_html(html)?;
    page.load()?;
    let scheduled = page.pending_timers().len();
    page.load()?;
    assert!(page.is_loaded());
    assert_eq!(page.pending_timers().len(), scheduled);
    assert_eq!(scheduled, 2);
    Ok(())
}

#[test]
fn select_one_reports_missing_selector() -> Result<()> {
    let page = Page::from_html("<div></div>")?;
    match page.assert_exists("#missing") {
        Err(Error::SelectorNotFound(selector)) => assert_eq!(selector, "#missing"),
        other => panic!("unexpected result: {other:?}"),
    }
    page.assert_not_exists("#missing")?;
    Ok(())
}

#[test]
fn assertion_failure_carries_a_dom_snippet() -> Result<()> {
    let page = Page::from_html("<p id='msg'>hello</p>")?;
    match page.assert_text("#msg", "bye") {
        Err(Error::AssertionFailed {
            expected,
            actual,
            dom_snippet,
            ..
        }) => {
            assert_eq!(expected, "bye");
            assert_eq!(actual, "hello");
            assert_eq!(dom_snippet, r#"<p id="msg">hello</p>"#);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[test]
fn type_text_rejects_non_controls() -> Result<()> {
    let mut page = Page::from_html("<div id='box'></div><input id='name' readonly value='x'>")?;
    assert!(matches!(
        page.type_text("#box", "x"),
        Err(Error::TypeMismatch { .. })
    ));
    page.type_text("#name", "changed")?;
    page.assert_value("#name", "x")?;
    Ok(())
}
