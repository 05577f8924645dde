use super::*;

const RESPONSIVE_NAV: &str = r##"
<nav class="navbar navbar-expand-lg">
  <button id="toggler" class="navbar-toggler" type="button" data-bs-toggle="collapse"
          data-bs-target="#nav-menu" aria-expanded="false"></button>
  <div id="nav-menu" class="collapse navbar-collapse">
    <a id="students" class="nav-link" href="/students">Students</a>
    <a id="courses" class="nav-link" href="/courses">Courses</a>
  </div>
</nav>
"##;

#[test]
fn toggler_opens_and_closes_the_menu() -> Result<()> {
    let mut page = Page::from_html(RESPONSIVE_NAV)?;
    page.click("#toggler")?;
    page.assert_class("#nav-menu", "show", true)?;
    page.assert_class("#toggler", "collapsed", false)?;
    page.assert_attr("#toggler", "aria-expanded", Some("true"))?;

    page.click("#toggler")?;
    page.assert_class("#nav-menu", "show", false)?;
    page.assert_class("#toggler", "collapsed", true)?;
    page.assert_attr("#toggler", "aria-expanded", Some("false"))?;
    Ok(())
}

#[test]
fn following_a_link_closes_the_open_menu() -> Result<()> {
    let mut page = Page::from_html(RESPONSIVE_NAV)?;
    page.click("#toggler")?;
    page.assert_class("#nav-menu", "show", true)?;

    page.click("#students")?;
    page.assert_class("#nav-menu", "show", false)?;
    page.assert_class("#toggler", "collapsed", true)?;
    Ok(())
}

#[test]
fn collapsed_toggler_is_not_clicked_again() -> Result<()> {
    let mut page = Page::from_html(RESPONSIVE_NAV)?;
    page.click("#toggler")?;
    page.click("#toggler")?;
    page.assert_class("#toggler", "collapsed", true)?;

    page.click("#courses")?;
    page.assert_class("#nav-menu", "show", false)?;
    page.assert_class("#toggler", "collapsed", true)?;
    Ok(())
}

#[test]
fn links_without_a_toggler_do_nothing() -> Result<()> {
    let html = r#"<div class="navbar-collapse"><a id="l" class="nav-link" href="/x">x</a></div>"#;
    let mut page = Page::from_html(html)?;
    page.click("#l")?;
    page.assert_class("#l", "active", false)?;
    Ok(())
}

#[test]
fn toggler_inside_the_collapse_does_not_click_itself_again() -> Result<()> {
    let html = r##"
<nav class="navbar">
  <div id="menu" class="collapse navbar-collapse">
    <a id="t" class="nav-link navbar-toggler" href="#" data-bs-toggle="collapse"
       data-bs-target="#menu" aria-expanded="false">Menu</a>
  </div>
</nav>
"##;
    let mut page = Page::from_html(html)?;
    page.click("#t")?;
    page.assert_class("#menu", "show", true)?;
    page.assert_attr("#t", "aria-expanded", Some("true"))?;

    page.click("#t")?;
    page.assert_class("#menu", "show", false)?;
    page.assert_class("#t", "collapsed", true)?;
    Ok(())
}
