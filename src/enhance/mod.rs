//! The page behaviors. Each submodule works on the [`Dom`] directly and
//! leaves event routing and timers to [`Page`](crate::Page).

pub(crate) mod alerts;
pub(crate) mod animate;
pub(crate) mod forms;
pub(crate) mod lazy_images;
pub(crate) mod nav;
pub(crate) mod scroll_top;
pub(crate) mod shortcuts;
pub(crate) mod toast;

use crate::Result;
use crate::dom::{Dom, NodeId};

/// Well-known elements, looked up once when the page initializes.
#[derive(Debug, Clone, Default)]
pub(crate) struct PageRefs {
    /// First `main`; toasts are inserted here.
    pub(crate) main: Option<NodeId>,
    /// First `input[placeholder*="Search"]`.
    pub(crate) search_input: Option<NodeId>,
    /// `#scrollToTop`.
    pub(crate) scroll_top_button: Option<NodeId>,
    /// First `.navbar-toggler`.
    pub(crate) navbar_toggler: Option<NodeId>,
    /// `.navbar-collapse .nav-link`.
    pub(crate) mobile_nav_links: Vec<NodeId>,
    pub(crate) forms: Vec<NodeId>,
    /// `img[data-src]`.
    pub(crate) lazy_images: Vec<NodeId>,
}

impl PageRefs {
    pub(crate) fn resolve(dom: &Dom) -> Result<Self> {
        Ok(Self {
            main: dom.query_selector("main")?,
            search_input: dom.query_selector(r#"input[placeholder*="Search"]"#)?,
            scroll_top_button: dom.by_id("scrollToTop"),
            navbar_toggler: dom.query_selector(".navbar-toggler")?,
            mobile_nav_links: dom.query_selector_all(".navbar-collapse .nav-link")?,
            forms: dom.query_selector_all("form")?,
            lazy_images: dom.query_selector_all("img[data-src]")?,
        })
    }
}
