/// Knobs for a [`Page`](crate::Page). The defaults reproduce the stock page
/// script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    /// `window.location.pathname` used for nav highlighting.
    pub current_path: String,
    /// Delay between consecutive `.stat-card` reveals.
    pub stat_card_stagger_ms: i64,
    /// Delay between consecutive `tbody tr` reveals.
    pub table_row_stagger_ms: i64,
    /// How long an alert present at load stays before it is closed.
    pub alert_dismiss_ms: i64,
    /// Fade transition of a closing `.alert.fade`.
    pub alert_fade_ms: i64,
    /// Vertical offset past which the scroll-to-top button shows.
    pub scroll_top_threshold: i64,
    pub viewport_height: i64,
    /// Lazy images are left alone when false.
    pub intersection_observer: bool,
    pub intersection_root_margin: i64,
    /// Make a submit flagged as unchanged call `preventDefault`.
    pub block_unchanged_submit: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            current_path: "/".into(),
            stat_card_stagger_ms: 100,
            table_row_stagger_ms: 50,
            alert_dismiss_ms: 5000,
            alert_fade_ms: 150,
            scroll_top_threshold: 100,
            viewport_height: 800,
            intersection_observer: true,
            intersection_root_margin: 0,
            block_unchanged_submit: false,
        }
    }
}

impl PageOptions {
    pub fn with_current_path(mut self, path: &str) -> Self {
        self.current_path = path.to_string();
        self
    }

    pub fn with_alert_dismiss_ms(mut self, delay_ms: i64) -> Self {
        self.alert_dismiss_ms = delay_ms;
        self
    }

    pub fn with_alert_fade_ms(mut self, delay_ms: i64) -> Self {
        self.alert_fade_ms = delay_ms;
        self
    }

    pub fn with_scroll_top_threshold(mut self, offset: i64) -> Self {
        self.scroll_top_threshold = offset;
        self
    }

    pub fn with_viewport_height(mut self, height: i64) -> Self {
        self.viewport_height = height;
        self
    }

    pub fn with_intersection_observer(mut self, supported: bool) -> Self {
        self.intersection_observer = supported;
        self
    }

    pub fn with_intersection_root_margin(mut self, margin: i64) -> Self {
        self.intersection_root_margin = margin;
        self
    }

    pub fn with_block_unchanged_submit(mut self, block: bool) -> Self {
        self.block_unchanged_submit = block;
        self
    }
}
