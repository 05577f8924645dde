use crate::Result;
use crate::dom::{Dom, NodeId};

/// Shows the button once the window is scrolled past `threshold`.
pub(crate) fn sync_visibility(
    dom: &mut Dom,
    button: Option<NodeId>,
    scroll_y: i64,
    threshold: i64,
) -> Result<()> {
    let Some(button) = button.filter(|button| dom.is_element(*button)) else {
        return Ok(());
    };
    let display = if scroll_y > threshold { "block" } else { "none" };
    dom.style_set(button, "display", display)
}
