use super::*;

#[test]
fn toast_is_inserted_as_first_child_of_main() -> Result<()> {
    let mut page = Page::from_html(r#"<main><h1 id="title">Students</h1></main>"#)?;
    assert!(page.show_toast("Student saved", ToastKind::Success)?);

    page.assert_class("main > div", "container", true)?;
    page.assert_class("main > div", "mt-3", true)?;
    page.assert_attr(
        "main > div > .alert",
        "class",
        Some("alert alert-success alert-dismissible fade show shadow-sm border-0"),
    )?;
    page.assert_attr("main .alert", "role", Some("alert"))?;
    page.assert_attr("main .alert i", "class", Some("bi bi-check-circle me-2"))?;
    page.assert_text("main .alert", "Student saved")?;
    page.assert_attr("main .alert .btn-close", "data-bs-dismiss", Some("alert"))?;
    page.assert_exists("main > h1#title")?;
    Ok(())
}

#[test]
fn non_success_kinds_use_the_exclamation_icon() -> Result<()> {
    let mut page = Page::from_html("<main></main>")?;
    page.show_toast("Could not save", ToastKind::Danger)?;
    page.show_toast("Check the form", "warning".parse()?)?;

    page.assert_attr(".alert-danger i", "class", Some("bi bi-exclamation-circle me-2"))?;
    page.assert_attr(".alert-warning i", "class", Some("bi bi-exclamation-circle me-2"))?;
    // newest first
    page.assert_class("main > div:first-child > .alert", "alert-warning", true)?;
    Ok(())
}

#[test]
fn message_markup_is_not_interpreted() -> Result<()> {
    let mut page = Page::from_html("<main></main>")?;
    page.show_toast("<script>alert(1)</script>", ToastKind::Info)?;
    page.assert_not_exists("main script")?;
    page.assert_text(".alert-info", "<script>alert(1)</script>")?;
    Ok(())
}

#[test]
fn toast_can_be_dismissed_with_its_close_button() -> Result<()> {
    let mut page = Page::from_html("<main></main>")?;
    page.show_toast("Saved", ToastKind::Success)?;
    page.click(".alert-success .btn-close")?;
    page.assert_class(".alert-success", "show", false)?;
    page.advance_time(150)?;
    page.assert_not_exists(".alert-success")?;
    page.assert_exists("main > .container")?;
    Ok(())
}

#[test]
fn without_main_nothing_is_inserted() -> Result<()> {
    let html = r#"<div id="app"><p>No main here</p></div>"#;
    let mut page = Page::from_html(html)?;
    let before = page.dump_dom("#app")?;
    assert!(!page.show_toast("lost", ToastKind::Info)?);
    assert_eq!(page.dump_dom("#app")?, before);
    page.assert_not_exists(".alert")?;
    Ok(())
}
