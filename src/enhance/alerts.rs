use crate::Result;
use crate::dom::{Dom, NodeId};
use crate::toolkit::{AlertClose, Toolkit};

/// Alerts present at load; each one gets a dismiss timer.
pub(crate) fn auto_dismiss_targets(dom: &Dom) -> Result<Vec<NodeId>> {
    dom.query_selector_all(".alert")
}

/// Closes `alert` through the toolkit and returns the delay after which the
/// faded element must be removed, if any.
pub(crate) fn close(
    toolkit: &dyn Toolkit,
    dom: &mut Dom,
    alert: NodeId,
    fade_ms: i64,
) -> Result<Option<i64>> {
    match toolkit.close_alert(dom, alert, fade_ms)? {
        AlertClose::RemoveAfter(delay_ms) => Ok(Some(delay_ms)),
        AlertClose::Removed | AlertClose::Ignored => Ok(None),
    }
}

pub(crate) fn remove_closed(dom: &mut Dom, alert: NodeId) -> Result<()> {
    dom.remove_node(alert)
}

/// The alert a click on `target` dismisses through `data-bs-dismiss`.
pub(crate) fn dismissed_by_click(dom: &Dom, target: NodeId) -> Result<Option<NodeId>> {
    let Some(trigger) = dom.closest(target, r#"[data-bs-dismiss="alert"]"#)? else {
        return Ok(None);
    };
    dom.closest(trigger, ".alert")
}
