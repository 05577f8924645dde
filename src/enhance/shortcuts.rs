use crate::events::KeyInput;

/// Ctrl+K or Cmd+K. The key must be exactly `k`, so Shift+K does not count.
pub(crate) fn is_search_shortcut(key: &KeyInput) -> bool {
    (key.ctrl || key.meta) && key.key == "k"
}

pub(crate) fn is_escape(key: &KeyInput) -> bool {
    key.key == "Escape"
}
