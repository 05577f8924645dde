use std::collections::{BTreeMap, HashSet};

use crate::dom::{Dom, NodeId, input_type, is_submit_control};
use crate::enhance::forms::{self, FormController, SubmitOutcome};
use crate::enhance::lazy_images::LazyImages;
use crate::enhance::toast::{self, ToastKind};
use crate::enhance::{PageRefs, alerts, animate, nav, scroll_top, shortcuts};
use crate::events::{
    Behavior, EventState, EventType, KeyInput, KeyOutcome, Listener, ListenerStore,
};
use crate::html::parse_document;
use crate::options::PageOptions;
use crate::timers::{PendingTimer, ScheduledTask, TimerQueue, TimerTask};
use crate::toolkit::{Bootstrap, Toolkit};
use crate::trace::{TraceKind, Tracer};
use crate::viewport::{LayoutBox, Viewport};
use crate::{Error, Result};

/// A server-rendered page with its enhancements attached.
///
/// Construction parses the HTML and attaches everything the page script
/// attaches at evaluation time (form listeners, shortcuts, the scroll
/// handler, the image observer). [`Page::load`] then fires
/// `DOMContentLoaded`, which starts the entrance animations, highlights the
/// active nav link and schedules alert dismissal.
#[derive(Debug)]
pub struct Page {
    dom: Dom,
    options: PageOptions,
    toolkit: Box<dyn Toolkit>,
    refs: PageRefs,
    listeners: ListenerStore,
    forms: Vec<FormController>,
    lazy_images: LazyImages,
    viewport: Viewport,
    timers: TimerQueue,
    tracer: Tracer,
    active_element: Option<NodeId>,
    clicks_in_progress: HashSet<NodeId>,
    loaded: bool,
    submission: SubmitOutcome,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::with_options(html, PageOptions::default())
    }

    pub fn with_options(html: &str, options: PageOptions) -> Result<Self> {
        Self::with_toolkit(html, options, Bootstrap)
    }

    pub fn with_toolkit(
        html: &str,
        options: PageOptions,
        toolkit: impl Toolkit + 'static,
    ) -> Result<Self> {
        let dom = parse_document(html)?;
        let refs = PageRefs::resolve(&dom)?;
        let viewport = Viewport::new(options.viewport_height);
        let mut page = Self {
            dom,
            options,
            toolkit: Box::new(toolkit),
            refs,
            listeners: ListenerStore::default(),
            forms: Vec::new(),
            lazy_images: LazyImages::default(),
            viewport,
            timers: TimerQueue::default(),
            tracer: Tracer::default(),
            active_element: None,
            clicks_in_progress: HashSet::new(),
            loaded: false,
            submission: SubmitOutcome::default(),
        };
        page.attach()?;
        Ok(page)
    }

    fn attach(&mut self) -> Result<()> {
        let root = self.dom.root();
        let forms = self.refs.forms.clone();

        self.listen(root, EventType::Click, Behavior::ToolkitDataApi);
        self.listen(root, EventType::DomContentLoaded, Behavior::EnhanceOnLoad);
        for form in &forms {
            self.listen(*form, EventType::Submit, Behavior::ValidateForm);
        }
        self.listen(root, EventType::KeyDown, Behavior::FocusSearchShortcut);
        self.lazy_images = LazyImages::observe(
            &self.refs.lazy_images,
            self.options.intersection_observer,
            self.options.intersection_root_margin,
        );
        for form in &forms {
            self.forms.push(FormController::capture(&self.dom, *form)?);
            self.listen(*form, EventType::Submit, Behavior::TrackFormChanges);
        }
        for link in self.refs.mobile_nav_links.clone() {
            self.listen(link, EventType::Click, Behavior::CloseMobileMenu);
        }
        self.listen(root, EventType::Scroll, Behavior::ToggleScrollTop);
        for form in &forms {
            self.listen(*form, EventType::Submit, Behavior::SubmitLoadingState);
        }
        self.listen(root, EventType::KeyDown, Behavior::BlurOnEscape);
        if let Some(button) = self.refs.scroll_top_button {
            self.listen(button, EventType::Click, Behavior::ScrollToTop);
        }

        self.trace_enhance(format!(
            "[enhance] attach forms={} lazy_images={} mobile_links={}",
            forms.len(),
            self.lazy_images.observed_count(),
            self.refs.mobile_nav_links.len()
        ));
        Ok(())
    }

    fn listen(&mut self, node: NodeId, event: EventType, behavior: Behavior) {
        self.listeners.add(
            node,
            event,
            Listener {
                capture: false,
                behavior,
            },
        );
    }

    /// Fires `DOMContentLoaded` and delivers the first intersection check.
    /// Calling it again does nothing.
    pub fn load(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }
        self.loaded = true;
        self.dispatch_event(self.dom.root(), EventType::DomContentLoaded)?;
        self.refresh_lazy_images()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn options(&self) -> &PageOptions {
        &self.options
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Direct document access, for changes a server push or another script
    /// would make.
    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.tracer.set_enabled(enabled);
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.tracer.take()
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.tracer.set_events(enabled);
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.tracer.set_timers(enabled);
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        self.tracer.set_limit(max_entries)
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        self.timers.set_step_limit(max_steps)
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) || self.dom.readonly(target) {
            return Ok(());
        }

        let tag = self
            .dom
            .tag_name(target)
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input, textarea or select".into(),
                actual: "non-element".into(),
            })?
            .to_ascii_lowercase();

        if !matches!(tag.as_str(), "input" | "textarea" | "select") {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input, textarea or select".into(),
                actual: tag,
            });
        }

        self.dom.set_value(target, text)
    }

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let kind = input_type(&self.dom, target);
        match kind.as_deref() {
            Some("checkbox") => self.dom.set_checked(target, checked),
            Some("radio") => {
                if checked {
                    self.uncheck_other_radios_in_group(target)?;
                }
                self.dom.set_checked(target, checked)
            }
            _ => Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "checkbox or radio input".into(),
                actual: kind.unwrap_or_else(|| {
                    self.dom.tag_name(target).unwrap_or("non-element").to_string()
                }),
            }),
        }
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.click_node(target)
    }

    /// A click on an element whose own click is still being dispatched does
    /// nothing.
    fn click_node(&mut self, target: NodeId) -> Result<()> {
        if self.dom.disabled(target) || !self.clicks_in_progress.insert(target) {
            return Ok(());
        }
        let result = self.run_click(target);
        self.clicks_in_progress.remove(&target);
        result
    }

    fn run_click(&mut self, target: NodeId) -> Result<()> {
        let click_outcome = self.dispatch_event(target, EventType::Click)?;
        if click_outcome.default_prevented {
            return Ok(());
        }

        match input_type(&self.dom, target).as_deref() {
            Some("checkbox") => {
                let current = self.dom.checked(target)?;
                self.dom.set_checked(target, !current)?;
            }
            Some("radio") => {
                if !self.dom.checked(target)? {
                    self.uncheck_other_radios_in_group(target)?;
                    self.dom.set_checked(target, true)?;
                }
            }
            _ => {}
        }

        if is_submit_control(&self.dom, target) {
            if let Some(form) = self.resolve_form_for_submit(target) {
                self.submit_form(form)?;
            }
        }

        Ok(())
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.focus_node(target)
    }

    pub fn blur(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.blur_node(target)
    }

    /// The focused element, if it is still in the document.
    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element.filter(|node| self.dom.is_connected(*node))
    }

    /// Submits the form `selector` names, or the form owning that element.
    pub fn submit(&mut self, selector: &str) -> Result<SubmitOutcome> {
        let target = self.select_one(selector)?;
        match self.resolve_form_for_submit(target) {
            Some(form) => self.submit_form(form),
            None => Ok(SubmitOutcome::default()),
        }
    }

    fn submit_form(&mut self, form: NodeId) -> Result<SubmitOutcome> {
        self.submission = SubmitOutcome {
            dispatched: true,
            ..SubmitOutcome::default()
        };
        let event = self.dispatch_event(form, EventType::Submit)?;
        Ok(SubmitOutcome {
            default_prevented: event.default_prevented,
            ..self.submission
        })
    }

    /// Presses a key on the focused element, or on the document when nothing
    /// has focus.
    pub fn key_down(&mut self, key: KeyInput) -> Result<KeyOutcome> {
        let target = self.active_element().unwrap_or_else(|| self.dom.root());
        let event = EventState::new(EventType::KeyDown, target).with_key(key);
        let event = self.dispatch(event)?;
        Ok(KeyOutcome {
            default_prevented: event.default_prevented,
        })
    }

    /// Scrolls the window to `offset` and fires `scroll`.
    pub fn scroll_to(&mut self, offset: i64) -> Result<()> {
        self.viewport.set_scroll_y(offset);
        self.dispatch_event(self.dom.root(), EventType::Scroll)?;
        self.refresh_lazy_images()
    }

    pub fn scroll_y(&self) -> i64 {
        self.viewport.scroll_y()
    }

    /// Reports where the element `selector` names sits in the document.
    pub fn set_layout(&mut self, selector: &str, layout: LayoutBox) -> Result<()> {
        let target = self.select_one(selector)?;
        self.viewport.set_layout(target, layout);
        self.refresh_lazy_images()
    }

    pub fn set_viewport_height(&mut self, height: i64) -> Result<()> {
        self.viewport.set_height(height);
        self.refresh_lazy_images()
    }

    /// Number of images still waiting to scroll into view.
    pub fn observed_images(&self) -> usize {
        self.lazy_images.observed_count()
    }

    /// Shows a dismissible alert at the top of `main`. Returns false when the
    /// page has no `main`.
    ///
    /// `message` is inserted as a text node, so markup in it shows up
    /// literally instead of being parsed as it would be through `innerHTML`.
    pub fn show_toast(&mut self, message: &str, kind: ToastKind) -> Result<bool> {
        let alert = toast::show(&mut self.dom, self.refs.main, message, kind)?;
        self.trace_enhance(format!(
            "[enhance] toast kind={kind} inserted={}",
            alert.is_some()
        ));
        Ok(alert.is_some())
    }

    /// Control values the form `selector` names had when the page initialized.
    /// Keyed by control `name`, `""` for unnamed controls.
    pub fn initial_values(&self, selector: &str) -> Result<BTreeMap<String, String>> {
        let form = self.select_form(selector)?;
        self.forms
            .iter()
            .find(|controller| controller.form() == form)
            .map(|controller| controller.initial_values().clone())
            .ok_or_else(|| {
                Error::Runtime(format!("form {selector} was not present at initialization"))
            })
    }

    /// Constraint validity of a form or of a single control.
    pub fn check_validity(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        if self.dom.has_tag(target, "form") {
            return forms::check_validity(&self.dom, target);
        }
        Ok(forms::control_issues(&self.dom, target)?.is_empty())
    }

    pub fn now_ms(&self) -> i64 {
        self.timers.now_ms()
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.timers.pending()
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.timers.now_ms();
        self.timers.set_now(from.saturating_add(delta_ms));
        let ran = self.run_timer_queue(Some(self.timers.now_ms()), false)?;
        self.trace_timer(format!(
            "[timer] advance delta_ms={delta_ms} from={from} to={} ran_due={ran}",
            self.timers.now_ms()
        ));
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        let from = self.timers.now_ms();
        if target_ms < from {
            return Err(Error::Runtime(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={from})"
            )));
        }
        self.timers.set_now(target_ms);
        let ran = self.run_timer_queue(Some(target_ms), false)?;
        self.trace_timer(format!(
            "[timer] advance_to from={from} to={target_ms} ran_due={ran}"
        ));
        Ok(())
    }

    /// Runs every pending timer, moving the clock forward as needed.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.timers.now_ms();
        let ran = self.run_timer_queue(None, true)?;
        self.trace_timer(format!(
            "[timer] flush from={from} to={} ran={ran}",
            self.timers.now_ms()
        ));
        Ok(())
    }

    pub fn run_next_timer(&mut self) -> Result<bool> {
        let Some(task) = self.timers.pop_next(None) else {
            self.trace_timer("[timer] run_next none".into());
            return Ok(false);
        };
        if task.due_at > self.timers.now_ms() {
            self.timers.set_now(task.due_at);
        }
        self.execute_timer_task(task)?;
        Ok(true)
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>, advance_clock: bool) -> Result<usize> {
        let mut steps = 0usize;
        while self.timers.has_next(due_limit) {
            if steps >= self.timers.step_limit() {
                return Err(self.timers.step_limit_error(steps + 1, due_limit));
            }
            let Some(task) = self.timers.pop_next(due_limit) else {
                break;
            };
            steps += 1;
            if advance_clock && task.due_at > self.timers.now_ms() {
                self.timers.set_now(task.due_at);
            }
            self.execute_timer_task(task)?;
        }
        Ok(steps)
    }

    fn schedule(&mut self, task: TimerTask, delay_ms: i64) {
        let scheduled = self.timers.schedule(task, delay_ms);
        self.trace_timer(format!(
            "[timer] schedule id={} due_at={} task={}",
            scheduled.id,
            scheduled.due_at,
            scheduled.task.label()
        ));
    }

    fn execute_timer_task(&mut self, task: ScheduledTask) -> Result<()> {
        self.trace_timer(format!(
            "[timer] run id={} due_at={} task={} now_ms={}",
            task.id,
            task.due_at,
            task.task.label(),
            self.timers.now_ms()
        ));
        match task.task {
            TimerTask::RevealStatCard(card) => animate::reveal_stat_card(&mut self.dom, card),
            TimerTask::RevealTableRow(row) => animate::reveal_table_row(&mut self.dom, row),
            TimerTask::DismissAlert(alert) => self.close_alert(alert),
            TimerTask::RemoveClosedAlert(alert) => alerts::remove_closed(&mut self.dom, alert),
        }
    }

    fn close_alert(&mut self, alert: NodeId) -> Result<()> {
        let fade_ms = self.options.alert_fade_ms;
        let removal = alerts::close(self.toolkit.as_ref(), &mut self.dom, alert, fade_ms)?;
        let label = self.trace_node_label(alert);
        self.trace_enhance(format!("[enhance] alert close {label} fade={removal:?}"));
        if let Some(delay_ms) = removal {
            self.schedule(TimerTask::RemoveClosedAlert(alert), delay_ms);
        }
        Ok(())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        self.expect_eq(selector, target, expected, actual)
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        self.expect_eq(selector, target, expected, actual)
    }

    pub fn assert_checked(&self, selector: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.checked(target)?;
        self.expect_eq(selector, target, &expected.to_string(), actual.to_string())
    }

    pub fn assert_disabled(&self, selector: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.disabled(target);
        self.expect_eq(selector, target, &expected.to_string(), actual.to_string())
    }

    /// Checks whether the element has `class_name` in its class list.
    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.class_contains(target, class_name);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("class {class_name} present={expected}"),
                actual: format!("class {class_name} present={actual}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    /// Compares one inline style property. An unset property reads as "".
    pub fn assert_style(&self, selector: &str, property: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.style_get(target, property)?;
        self.expect_eq(selector, target, expected, actual)
    }

    pub fn assert_attr(&self, selector: &str, name: &str, expected: Option<&str>) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.attr(target, name);
        if actual.as_deref() != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{name}={expected:?}"),
                actual: format!("{name}={actual:?}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_focused(&self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.active_element();
        if actual != Some(target) {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: "focused".into(),
                actual: match actual {
                    Some(node) => format!("focus on {}", self.trace_node_label(node)),
                    None => "no focused element".into(),
                },
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_not_exists(&self, selector: &str) -> Result<()> {
        if let Some(node) = self.dom.query_selector(selector)? {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: "no match".into(),
                actual: "element present".into(),
                dom_snippet: self.node_snippet(node),
            });
        }
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    fn expect_eq(
        &self,
        selector: &str,
        target: NodeId,
        expected: &str,
        actual: String,
    ) -> Result<()> {
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn select_form(&self, selector: &str) -> Result<NodeId> {
        let target = self.select_one(selector)?;
        if !self.dom.has_tag(target, "form") {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form".into(),
                actual: self.dom.tag_name(target).unwrap_or("non-element").to_string(),
            });
        }
        Ok(target)
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    fn resolve_form_for_submit(&self, target: NodeId) -> Option<NodeId> {
        if self.dom.has_tag(target, "form") {
            return Some(target);
        }
        self.dom.find_ancestor_by_tag(target, "form")
    }

    fn uncheck_other_radios_in_group(&mut self, target: NodeId) -> Result<()> {
        let target_name = self.dom.attr(target, "name").unwrap_or_default();
        if target_name.is_empty() {
            return Ok(());
        }
        let target_form = self.dom.find_ancestor_by_tag(target, "form");

        for node in self.dom.all_element_nodes() {
            if node == target || input_type(&self.dom, node).as_deref() != Some("radio") {
                continue;
            }
            if self.dom.attr(node, "name").unwrap_or_default() != target_name {
                continue;
            }
            if self.dom.find_ancestor_by_tag(node, "form") != target_form {
                continue;
            }
            if self.dom.checked(node)? {
                self.dom.set_checked(node, false)?;
            }
        }
        Ok(())
    }

    fn focus_node(&mut self, node: NodeId) -> Result<()> {
        if self.dom.disabled(node) || self.active_element == Some(node) {
            return Ok(());
        }
        if let Some(current) = self.active_element {
            self.blur_node(current)?;
        }

        self.active_element = Some(node);
        self.dispatch_event(node, EventType::FocusIn)?;
        self.dispatch_event(node, EventType::Focus)?;
        Ok(())
    }

    fn blur_node(&mut self, node: NodeId) -> Result<()> {
        if self.active_element != Some(node) {
            return Ok(());
        }

        self.dispatch_event(node, EventType::FocusOut)?;
        self.dispatch_event(node, EventType::Blur)?;
        self.active_element = None;
        Ok(())
    }

    fn refresh_lazy_images(&mut self) -> Result<()> {
        if !self.loaded {
            return Ok(());
        }
        let loaded = self.lazy_images.load_visible(&mut self.dom, &self.viewport)?;
        for image in loaded {
            let label = self.trace_node_label(image);
            self.trace_enhance(format!("[enhance] lazy image loaded {label}"));
        }
        Ok(())
    }

    fn dispatch_event(&mut self, target: NodeId, event_type: EventType) -> Result<EventState> {
        self.dispatch(EventState::new(event_type, target))
    }

    fn dispatch(&mut self, mut event: EventState) -> Result<EventState> {
        let target = event.target;

        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }
        path.reverse();

        // Capture phase.
        for node in &path[..path.len() - 1] {
            event.current_target = *node;
            self.invoke_listeners(*node, &mut event, true)?;
            if event.propagation_stopped {
                self.trace_event_done(&event, "propagation_stopped");
                return Ok(event);
            }
        }

        // Target phase: capture listeners first.
        event.current_target = target;
        self.invoke_listeners(target, &mut event, true)?;
        if event.propagation_stopped {
            self.trace_event_done(&event, "propagation_stopped");
            return Ok(event);
        }

        // Target phase: bubble listeners.
        self.invoke_listeners(target, &mut event, false)?;
        if event.propagation_stopped {
            self.trace_event_done(&event, "propagation_stopped");
            return Ok(event);
        }

        // Bubble phase.
        for node in path[..path.len() - 1].iter().rev() {
            event.current_target = *node;
            self.invoke_listeners(*node, &mut event, false)?;
            if event.propagation_stopped {
                self.trace_event_done(&event, "propagation_stopped");
                return Ok(event);
            }
        }

        self.trace_event_done(&event, "completed");
        Ok(event)
    }

    fn invoke_listeners(
        &mut self,
        node_id: NodeId,
        event: &mut EventState,
        capture: bool,
    ) -> Result<()> {
        let listeners = self.listeners.get(node_id, event.event_type, capture);
        for listener in listeners {
            if self.tracer.wants(TraceKind::Event) {
                let phase = if capture { "capture" } else { "bubble" };
                let target_label = self.trace_node_label(event.target);
                let current_label = self.trace_node_label(event.current_target);
                self.tracer.record(
                    TraceKind::Event,
                    format!(
                        "[event] {} target={target_label} current={current_label} phase={phase} default_prevented={}",
                        event.event_type, event.default_prevented
                    ),
                );
            }
            self.run_behavior(listener.behavior, event)?;
            if event.immediate_propagation_stopped {
                break;
            }
        }
        Ok(())
    }

    fn run_behavior(&mut self, behavior: Behavior, event: &mut EventState) -> Result<()> {
        match behavior {
            Behavior::EnhanceOnLoad => self.enhance_on_load(),
            Behavior::ValidateForm => {
                let form = event.current_target;
                let valid = forms::check_validity(&self.dom, form)?;
                if !valid {
                    event.prevent_default();
                    event.stop_propagation();
                }
                self.dom.class_add(form, "was-validated")?;
                self.submission.valid = valid;
                let label = self.trace_node_label(form);
                self.trace_enhance(format!("[enhance] validate {label} valid={valid}"));
                Ok(())
            }
            Behavior::TrackFormChanges => {
                let form = event.current_target;
                let Some(controller) = self.forms.iter().find(|c| c.form() == form) else {
                    return Ok(());
                };
                if controller.flags_unchanged(&self.dom)? {
                    self.submission.unchanged = true;
                    if self.options.block_unchanged_submit {
                        event.prevent_default();
                    }
                    let label = self.trace_node_label(form);
                    self.trace_enhance(format!("[enhance] unchanged submit {label}"));
                }
                Ok(())
            }
            Behavior::SubmitLoadingState => {
                let form = event.current_target;
                if let Some(button) = forms::apply_loading_state(&mut self.dom, form)? {
                    let label = self.trace_node_label(button);
                    self.trace_enhance(format!("[enhance] loading state {label}"));
                }
                Ok(())
            }
            Behavior::CloseMobileMenu => {
                match nav::toggler_to_close(&self.dom, self.refs.navbar_toggler) {
                    Some(toggler) => self.click_node(toggler),
                    None => Ok(()),
                }
            }
            Behavior::FocusSearchShortcut => {
                let Some(key) = event.key.as_ref() else {
                    return Ok(());
                };
                if !shortcuts::is_search_shortcut(key) {
                    return Ok(());
                }
                event.prevent_default();
                match self.refs.search_input.filter(|input| self.dom.is_connected(*input)) {
                    Some(input) => self.focus_node(input),
                    None => Ok(()),
                }
            }
            Behavior::BlurOnEscape => {
                if !event.key.as_ref().is_some_and(shortcuts::is_escape) {
                    return Ok(());
                }
                match self.active_element {
                    Some(active) => self.blur_node(active),
                    None => Ok(()),
                }
            }
            Behavior::ToggleScrollTop => scroll_top::sync_visibility(
                &mut self.dom,
                self.refs.scroll_top_button,
                self.viewport.scroll_y(),
                self.options.scroll_top_threshold,
            ),
            Behavior::ScrollToTop => self.scroll_to(0),
            Behavior::ToolkitDataApi => self.toolkit_data_api(event),
        }
    }

    fn enhance_on_load(&mut self) -> Result<()> {
        let reveals = animate::prepare_entrance(
            &mut self.dom,
            self.options.stat_card_stagger_ms,
            self.options.table_row_stagger_ms,
        )?;
        let reveal_count = reveals.len();
        for (task, delay_ms) in reveals {
            self.schedule(task, delay_ms);
        }

        let current_path = self.options.current_path.clone();
        let active = nav::mark_active_links(&mut self.dom, &current_path)?;

        let alerts = alerts::auto_dismiss_targets(&self.dom)?;
        for alert in &alerts {
            self.schedule(TimerTask::DismissAlert(*alert), self.options.alert_dismiss_ms);
        }

        self.trace_enhance(format!(
            "[enhance] load reveals={reveal_count} active_links={} alerts={}",
            active.len(),
            alerts.len()
        ));
        Ok(())
    }

    /// Delegated click handling of `data-bs-dismiss` and `data-bs-toggle`.
    fn toolkit_data_api(&mut self, event: &mut EventState) -> Result<()> {
        if event.event_type != EventType::Click {
            return Ok(());
        }
        if let Some(alert) = alerts::dismissed_by_click(&self.dom, event.target)? {
            return self.close_alert(alert);
        }
        let Some(toggler) = self
            .dom
            .closest(event.target, r#"[data-bs-toggle="collapse"]"#)?
        else {
            return Ok(());
        };
        if self.dom.has_tag(toggler, "a") {
            event.prevent_default();
        }
        self.toolkit.toggle_collapse(&mut self.dom, toggler)?;
        let label = self.trace_node_label(toggler);
        self.trace_enhance(format!("[enhance] collapse toggle {label}"));
        Ok(())
    }

    fn trace_event_done(&mut self, event: &EventState, outcome: &str) {
        if !self.tracer.wants(TraceKind::Event) {
            return;
        }
        let target_label = self.trace_node_label(event.target);
        let current_label = self.trace_node_label(event.current_target);
        self.tracer.record(
            TraceKind::Event,
            format!(
                "[event] done {} target={target_label} current={current_label} outcome={outcome} default_prevented={} propagation_stopped={} immediate_stopped={}",
                event.event_type,
                event.default_prevented,
                event.propagation_stopped,
                event.immediate_propagation_stopped
            ),
        );
    }

    fn trace_timer(&mut self, line: String) {
        self.tracer.record(TraceKind::Timer, line);
    }

    fn trace_enhance(&mut self, line: String) {
        self.tracer.record(TraceKind::Enhance, line);
    }

    fn trace_node_label(&self, node: NodeId) -> String {
        if let Some(id) = self.dom.attr(node, "id") {
            if !id.is_empty() {
                return format!("#{id}");
            }
        }
        if node == self.dom.root() {
            return "document".into();
        }
        self.dom
            .tag_name(node)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("node-{}", node.0))
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}
