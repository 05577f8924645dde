use std::fmt;

use crate::dom::{Dom, NodeId};
use crate::Result;

/// What closing an alert did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertClose {
    /// The alert left the document right away.
    Removed,
    /// The alert is fading out and must be removed after the delay.
    RemoveAfter(i64),
    /// The alert was not in the document.
    Ignored,
}

/// The UI toolkit the server-rendered markup is written against.
pub trait Toolkit: fmt::Debug {
    fn close_alert(&self, dom: &mut Dom, alert: NodeId, fade_ms: i64) -> Result<AlertClose>;

    /// Runs the collapse plugin for a click on `toggler`.
    fn toggle_collapse(&self, dom: &mut Dom, toggler: NodeId) -> Result<()>;
}

/// Bootstrap 5 alert and collapse semantics.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bootstrap;

impl Toolkit for Bootstrap {
    fn close_alert(&self, dom: &mut Dom, alert: NodeId, fade_ms: i64) -> Result<AlertClose> {
        if !dom.is_connected(alert) || !dom.is_element(alert) {
            return Ok(AlertClose::Ignored);
        }
        dom.class_remove(alert, "show")?;
        if dom.class_contains(alert, "fade") {
            return Ok(AlertClose::RemoveAfter(fade_ms.max(0)));
        }
        dom.remove_node(alert)?;
        Ok(AlertClose::Removed)
    }

    fn toggle_collapse(&self, dom: &mut Dom, toggler: NodeId) -> Result<()> {
        let Some(target_selector) = dom
            .attr(toggler, "data-bs-target")
            .or_else(|| dom.attr(toggler, "href"))
            .filter(|selector| !selector.trim().is_empty() && selector.trim() != "#")
        else {
            return Ok(());
        };
        let Ok(targets) = dom.query_selector_all(&target_selector) else {
            return Ok(());
        };
        if targets.is_empty() {
            return Ok(());
        }

        let mut shown = false;
        for target in targets {
            shown |= dom.class_toggle(target, "show")?;
        }

        if shown {
            dom.class_remove(toggler, "collapsed")?;
            dom.set_attr(toggler, "aria-expanded", "true")?;
        } else {
            dom.class_add(toggler, "collapsed")?;
            dom.set_attr(toggler, "aria-expanded", "false")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_document;

    #[test]
    fn closing_a_faded_alert_defers_removal() -> Result<()> {
        let mut dom = parse_document("<div id='a' class='alert fade show'>hi</div>")?;
        let alert = dom.by_id("a").expect("alert exists");
        let outcome = Bootstrap.close_alert(&mut dom, alert, 150)?;
        assert_eq!(outcome, AlertClose::RemoveAfter(150));
        assert_eq!(dom.attr(alert, "class").as_deref(), Some("alert fade"));
        assert!(dom.is_connected(alert));
        Ok(())
    }

    #[test]
    fn closing_a_plain_alert_removes_it() -> Result<()> {
        let mut dom = parse_document("<div id='a' class='alert show'>hi</div>")?;
        let alert = dom.by_id("a").expect("alert exists");
        assert_eq!(Bootstrap.close_alert(&mut dom, alert, 150)?, AlertClose::Removed);
        assert!(!dom.is_connected(alert));
        assert_eq!(Bootstrap.close_alert(&mut dom, alert, 150)?, AlertClose::Ignored);
        Ok(())
    }

    #[test]
    fn collapse_toggle_syncs_toggler_state() -> Result<()> {
        let mut dom = parse_document(
            r##"
            <button id="t" class="navbar-toggler" data-bs-toggle="collapse" data-bs-target="#menu" aria-expanded="true"></button>
            <div id="menu" class="collapse navbar-collapse show"></div>
            "##,
        )?;
        let toggler = dom.by_id("t").expect("toggler exists");
        let menu = dom.by_id("menu").expect("menu exists");

        Bootstrap.toggle_collapse(&mut dom, toggler)?;
        assert!(!dom.class_contains(menu, "show"));
        assert!(dom.class_contains(toggler, "collapsed"));
        assert_eq!(dom.attr(toggler, "aria-expanded").as_deref(), Some("false"));

        Bootstrap.toggle_collapse(&mut dom, toggler)?;
        assert!(dom.class_contains(menu, "show"));
        assert!(!dom.class_contains(toggler, "collapsed"));
        Ok(())
    }

    #[test]
    fn collapse_without_target_is_a_no_op() -> Result<()> {
        let mut dom = parse_document("<button id='t' data-bs-toggle='collapse'></button>")?;
        let toggler = dom.by_id("t").expect("toggler exists");
        Bootstrap.toggle_collapse(&mut dom, toggler)?;
        assert_eq!(dom.attr(toggler, "class"), None);
        Ok(())
    }
}
