use std::collections::BTreeSet;

use page_enhancer::{KeyInput, LayoutBox, Page, PageOptions, ToastKind};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseError, TestCaseResult};
use tracing_subscriber::EnvFilter;

const PAGE_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/page_property_fuzz_test.txt";
const DEFAULT_PAGE_PROPTEST_CASES: u32 = 96;

const IMAGE_COUNT: usize = 4;

const DASHBOARD_HTML: &str = r##"
<nav class="navbar">
  <button class="navbar-toggler" id="toggler" data-bs-toggle="collapse" data-bs-target="#menu"></button>
  <div class="collapse navbar-collapse" id="menu">
    <a class="nav-link" id="link" href="/students">Students</a>
    <input id="search" placeholder="Search students">
  </div>
</nav>
<main>
  <form id="f">
    <input id="name" name="name" required>
    <input id="agree" name="agree" type="checkbox">
    <button type="submit" id="save">Save</button>
  </form>
  <img id="img-0" data-src="/media/0.png">
  <img id="img-1" data-src="/media/1.png">
  <img id="img-2" data-src="/media/2.png">
  <img id="img-3" data-src="/media/3.png">
  <button id="scrollToTop" style="display: none;">Top</button>
</main>
"##;

#[derive(Clone, Debug)]
enum PageAction {
    TypeName(String),
    ToggleAgree(bool),
    FocusName,
    SearchShortcut,
    Escape,
    ScrollTo(i64),
    ClickToggler,
    ClickNavLink,
    Submit,
    AdvanceTime(i64),
    ShowToast(String),
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn env_proptest_cases(var_name: &str, default_cases: u32) -> u32 {
    std::env::var(var_name)
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default_cases)
}

fn page_proptest_cases() -> u32 {
    env_proptest_cases("PAGE_ENHANCER_PROPTEST_CASES", DEFAULT_PAGE_PROPTEST_CASES)
}

fn fail(err: page_enhancer::Error) -> TestCaseError {
    TestCaseError::fail(format!("{err:?}"))
}

fn text_input_strategy() -> BoxedStrategy<String> {
    vec(
        prop_oneof![
            Just('a'),
            Just('d'),
            Just('z'),
            Just('0'),
            Just(' '),
            Just('<'),
            Just('&'),
            Just('é'),
        ],
        0..=8,
    )
    .prop_map(|chars| chars.into_iter().collect())
    .boxed()
}

fn body_text_strategy() -> BoxedStrategy<String> {
    vec(
        prop_oneof![Just('p'), Just('q'), Just(' '), Just('&'), Just('\n')],
        0..=12,
    )
    .prop_map(|chars| chars.into_iter().collect())
    .boxed()
}

fn toast_kind_strategy() -> BoxedStrategy<ToastKind> {
    prop_oneof![
        Just(ToastKind::Info),
        Just(ToastKind::Success),
        Just(ToastKind::Warning),
        Just(ToastKind::Danger),
        Just(ToastKind::Dark),
    ]
    .boxed()
}

fn page_action_strategy() -> BoxedStrategy<PageAction> {
    prop_oneof![
        3 => text_input_strategy().prop_map(PageAction::TypeName),
        2 => any::<bool>().prop_map(PageAction::ToggleAgree),
        2 => Just(PageAction::FocusName),
        2 => Just(PageAction::SearchShortcut),
        3 => Just(PageAction::Escape),
        4 => (0i64..3200).prop_map(PageAction::ScrollTo),
        1 => Just(PageAction::ClickToggler),
        1 => Just(PageAction::ClickNavLink),
        2 => Just(PageAction::Submit),
        2 => (0i64..6000).prop_map(PageAction::AdvanceTime),
        1 => text_input_strategy().prop_map(PageAction::ShowToast),
    ]
    .boxed()
}

fn page_action_sequence_strategy() -> BoxedStrategy<Vec<PageAction>> {
    vec(page_action_strategy(), 1..=24).boxed()
}

fn run_action(page: &mut Page, action: &PageAction) -> page_enhancer::Result<()> {
    match action {
        PageAction::TypeName(value) => page.type_text("#name", value),
        PageAction::ToggleAgree(value) => page.set_checked("#agree", *value),
        PageAction::FocusName => page.focus("#name"),
        PageAction::SearchShortcut => page.key_down(KeyInput::ctrl("k")).map(|_| ()),
        PageAction::Escape => page.key_down(KeyInput::escape()).map(|_| ()),
        PageAction::ScrollTo(offset) => page.scroll_to(*offset),
        PageAction::ClickToggler => page.click("#toggler"),
        PageAction::ClickNavLink => page.click("#link"),
        PageAction::Submit => page.submit("#f").map(|_| ()),
        PageAction::AdvanceTime(delta_ms) => page.advance_time(*delta_ms),
        PageAction::ShowToast(message) => page.show_toast(message, ToastKind::Info).map(|_| ()),
    }
}

fn dashboard() -> page_enhancer::Result<Page> {
    let options = PageOptions::default().with_viewport_height(800);
    let mut page = Page::with_options(DASHBOARD_HTML, options)?;
    for index in 0..IMAGE_COUNT {
        let top = i64::try_from(index).unwrap_or(0) * 900;
        page.set_layout(&format!("#img-{index}"), LayoutBox::new(top, 100))?;
    }
    page.load()?;
    Ok(page)
}

/// Stale `data-src` values on loaded images must never reach `src` again.
fn check_images_load_once(page: &mut Page, step: usize) -> TestCaseResult {
    let mut loaded = 0;
    for index in 0..IMAGE_COUNT {
        let image = page
            .dom()
            .by_id(&format!("img-{index}"))
            .ok_or_else(|| TestCaseError::fail(format!("img-{index} missing")))?;
        let Some(src) = page.dom().attr(image, "src") else {
            continue;
        };
        prop_assert_eq!(
            src,
            format!("/media/{index}.png"),
            "img-{} reloaded by step {}",
            index,
            step
        );
        prop_assert!(page.dom().class_contains(image, "loaded"));
        page.dom_mut()
            .set_attr(image, "data-src", "/media/stale.png")
            .map_err(fail)?;
        loaded += 1;
    }
    prop_assert_eq!(loaded + page.observed_images(), IMAGE_COUNT);
    Ok(())
}

fn assert_page_sequence_is_stable(actions: &[PageAction]) -> TestCaseResult {
    init_tracing();
    let mut page = dashboard().map_err(fail)?;
    let expected_keys = vec!["agree".to_string(), "name".to_string()];
    check_images_load_once(&mut page, 0)?;

    for (step, action) in actions.iter().enumerate() {
        if let Err(error) = run_action(&mut page, action) {
            prop_assert!(
                false,
                "action returned error at step {step}: {action:?}, error={error:?}, actions={actions:?}"
            );
        }

        if matches!(action, PageAction::Escape) {
            prop_assert_eq!(page.active_element(), None, "focus kept after Escape");
        }
        let keys: Vec<String> = page
            .initial_values("#f")
            .map_err(fail)?
            .into_keys()
            .collect();
        prop_assert_eq!(&keys, &expected_keys);
        check_images_load_once(&mut page, step + 1)?;
    }

    Ok(())
}

#[derive(Clone, Debug)]
enum ControlKind {
    Text,
    Email,
    Checkbox,
    Radio,
    Select,
    Textarea,
    Button,
}

fn control_strategy() -> BoxedStrategy<(ControlKind, Option<&'static str>)> {
    let kind = prop_oneof![
        Just(ControlKind::Text),
        Just(ControlKind::Email),
        Just(ControlKind::Checkbox),
        Just(ControlKind::Radio),
        Just(ControlKind::Select),
        Just(ControlKind::Textarea),
        Just(ControlKind::Button),
    ];
    let name = prop_oneof![
        Just(None),
        Just(Some("first_name")),
        Just(Some("email")),
        Just(Some("year")),
        Just(Some("notes")),
        Just(Some("agree")),
    ];
    (kind, name).boxed()
}

fn render_control(kind: &ControlKind, name: Option<&str>) -> String {
    let name_attr = name.map(|name| format!(r#" name="{name}""#)).unwrap_or_default();
    match kind {
        ControlKind::Text => format!(r#"<input{name_attr} value="x">"#),
        ControlKind::Email => format!(r#"<input type="email"{name_attr}>"#),
        ControlKind::Checkbox => format!(r#"<input type="checkbox"{name_attr} checked>"#),
        ControlKind::Radio => format!(r#"<input type="radio"{name_attr} value="r">"#),
        ControlKind::Select => {
            format!(r#"<select{name_attr}><option value="1">One</option></select>"#)
        }
        ControlKind::Textarea => format!("<textarea{name_attr}>notes</textarea>"),
        ControlKind::Button => format!(r#"<button type="button"{name_attr}>Go</button>"#),
    }
}

fn assert_initial_values_cover_every_control(
    controls: &[(ControlKind, Option<&'static str>)],
) -> TestCaseResult {
    let body: String = controls
        .iter()
        .map(|(kind, name)| render_control(kind, *name))
        .collect();
    let html = format!(r#"<form id="generated">{body}</form>"#);
    let page = Page::from_html(&html).map_err(fail)?;

    let expected: BTreeSet<&str> = controls
        .iter()
        .filter(|(kind, _)| !matches!(kind, ControlKind::Button))
        .map(|(_, name)| name.unwrap_or(""))
        .collect();
    let initial = page.initial_values("#generated").map_err(fail)?;
    let actual: BTreeSet<&str> = initial.keys().map(String::as_str).collect();
    prop_assert_eq!(actual, expected, "html={}", html);
    Ok(())
}

fn assert_toast_without_main_is_a_no_op(
    body: &str,
    message: &str,
    kind: ToastKind,
) -> TestCaseResult {
    let html = format!(r#"<div class="container">{body}</div>"#);
    let mut page = Page::from_html(&html).map_err(fail)?;
    let before = page.dom().dump_node(page.dom().root());
    let inserted = page.show_toast(message, kind).map_err(fail)?;
    prop_assert!(!inserted);
    prop_assert_eq!(page.dom().dump_node(page.dom().root()), before);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: page_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(PAGE_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn page_action_sequences_keep_enhancement_invariants(
        actions in page_action_sequence_strategy()
    ) {
        assert_page_sequence_is_stable(&actions)?;
    }

    #[test]
    fn initial_values_keys_match_control_names(controls in vec(control_strategy(), 0..=8)) {
        assert_initial_values_cover_every_control(&controls)?;
    }

    #[test]
    fn toast_without_main_changes_nothing(
        body in body_text_strategy(),
        message in text_input_strategy(),
        kind in toast_kind_strategy(),
    ) {
        assert_toast_without_main_is_a_no_op(&body, &message, kind)?;
    }
}
