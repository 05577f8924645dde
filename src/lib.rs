//! Progressive enhancement for server-rendered pages.
//!
//! A [`Page`] parses the HTML a server produced, resolves the handful of
//! elements the enhancements care about, and then reacts to browser-level
//! inputs (load, submit, click, keydown, scroll, time passing, layout) by
//! mutating its document the way the page script would in a browser.
//!
//! ```
//! use page_enhancer::{Page, PageOptions};
//!
//! let html = r#"
//!   <main>
//!     <div class="stat-card" id="students">12</div>
//!     <div class="stat-card" id="courses">4</div>
//!   </main>
//! "#;
//!
//! let mut page = Page::with_options(html, PageOptions::default())?;
//! page.load()?;
//! page.assert_style("#courses", "opacity", "0")?;
//! page.advance_time(100)?;
//! page.assert_style("#courses", "opacity", "1")?;
//! # Ok::<(), page_enhancer::Error>(())
//! ```

mod dom;
mod enhance;
mod events;
mod html;
mod options;
mod page;
mod selector;
mod timers;
mod toolkit;
mod trace;
mod viewport;

pub use dom::{Dom, NodeId};
pub use enhance::forms::SubmitOutcome;
pub use enhance::toast::ToastKind;
pub use events::{KeyInput, KeyOutcome};
pub use options::PageOptions;
pub use page::Page;
pub use timers::PendingTimer;
pub use toolkit::{AlertClose, Bootstrap, Toolkit};
pub use viewport::LayoutBox;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("runtime error: {0}")]
    Runtime(String),
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("type mismatch for {selector}: expected {expected}, actual {actual}")]
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    #[error(
        "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
    )]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    #[error("invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

#[cfg(test)]
mod tests;
