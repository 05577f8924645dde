use super::*;

const DASHBOARD: &str = r#"
<main>
  <div class="stat-card" id="students">120</div>
  <div class="stat-card" id="courses">8</div>
  <div class="stat-card" id="enrollments">310</div>
  <table>
    <thead><tr id="head"><th>Name</th></tr></thead>
    <tbody>
      <tr id="row-1"><td>Ada</td></tr>
      <tr id="row-2"><td>Grace</td></tr>
    </tbody>
  </table>
</main>
"#;

#[test]
fn stat_cards_start_hidden_and_reveal_in_steps_of_100ms() -> Result<()> {
    let mut page = Page::from_html(DASHBOARD)?;
    page.assert_style("#students", "opacity", "")?;

    page.load()?;
    for card in ["#students", "#courses", "#enrollments"] {
        page.assert_style(card, "opacity", "0")?;
        page.assert_style(card, "transform", "translateY(20px)")?;
    }

    page.advance_time(0)?;
    page.assert_style("#students", "opacity", "1")?;
    page.assert_style("#students", "transform", "translateY(0)")?;
    page.assert_style("#students", "transition", "all 0.6s ease")?;
    page.assert_style("#courses", "opacity", "0")?;

    page.advance_time(99)?;
    page.assert_style("#courses", "opacity", "0")?;
    page.advance_time(1)?;
    page.assert_style("#courses", "opacity", "1")?;
    page.assert_style("#enrollments", "opacity", "0")?;

    page.advance_time_to(200)?;
    page.assert_style("#enrollments", "opacity", "1")?;
    Ok(())
}

#[test]
fn body_rows_fade_in_every_50ms_and_header_rows_are_left_alone() -> Result<()> {
    let mut page = Page::from_html(DASHBOARD)?;
    page.load()?;
    page.assert_style("#head", "opacity", "")?;
    page.assert_style("#row-1", "opacity", "0")?;
    page.assert_style("#row-2", "opacity", "0")?;

    page.advance_time(0)?;
    page.assert_style("#row-1", "opacity", "1")?;
    page.assert_style("#row-1", "transition", "opacity 0.3s ease")?;
    page.assert_style("#row-2", "opacity", "0")?;

    page.advance_time(50)?;
    page.assert_style("#row-2", "opacity", "1")?;
    page.assert_style("#head", "opacity", "")?;
    Ok(())
}

#[test]
fn reveal_of_a_removed_card_is_a_no_op() -> Result<()> {
    let mut page = Page::from_html(DASHBOARD)?;
    page.load()?;
    let card = page.dom().by_id("courses").expect("card exists");
    page.dom_mut().remove_node(card)?;

    page.flush()?;
    page.assert_not_exists("#courses")?;
    page.assert_style("#enrollments", "opacity", "1")?;
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn existing_inline_styles_are_kept() -> Result<()> {
    let mut page =
        Page::from_html(r#"<div class="stat-card" id="c" style="color: red">1</div>"#)?;
    page.load()?;
    page.flush()?;
    page.assert_attr(
        "#c",
        "style",
        Some("color: red; opacity: 1; transform: translateY(0); transition: all 0.6s ease;"),
    )?;
    Ok(())
}
