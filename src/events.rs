use std::collections::HashMap;
use std::fmt;

use crate::dom::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EventType {
    DomContentLoaded,
    Submit,
    Click,
    KeyDown,
    Scroll,
    Focus,
    FocusIn,
    Blur,
    FocusOut,
}

impl EventType {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::Submit => "submit",
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::Scroll => "scroll",
            Self::Focus => "focus",
            Self::FocusIn => "focusin",
            Self::Blur => "blur",
            Self::FocusOut => "focusout",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key press as the page sees it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyInput {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    pub fn escape() -> Self {
        Self::new("Escape")
    }

    pub fn ctrl(key: &str) -> Self {
        Self {
            ctrl: true,
            ..Self::new(key)
        }
    }

    pub fn meta(key: &str) -> Self {
        Self {
            meta: true,
            ..Self::new(key)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    pub default_prevented: bool,
}

/// The behaviors a listener can run. Listeners are data so the page owns
/// every piece of state they touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Behavior {
    EnhanceOnLoad,
    ValidateForm,
    TrackFormChanges,
    SubmitLoadingState,
    CloseMobileMenu,
    FocusSearchShortcut,
    BlurOnEscape,
    ToggleScrollTop,
    ScrollToTop,
    ToolkitDataApi,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Listener {
    pub(crate) capture: bool,
    pub(crate) behavior: Behavior,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<EventType, Vec<Listener>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: EventType, listener: Listener) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event)
            .or_default()
            .push(listener);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: EventType, capture: bool) -> Vec<Listener> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(&event))
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|listener| listener.capture == capture)
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: EventType,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) key: Option<KeyInput>,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) immediate_propagation_stopped: bool,
}

impl EventState {
    pub(crate) fn new(event_type: EventType, target: NodeId) -> Self {
        Self {
            event_type,
            target,
            current_target: target,
            key: None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    pub(crate) fn with_key(mut self, key: KeyInput) -> Self {
        self.key = Some(key);
        self
    }

    pub(crate) fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub(crate) fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_store_filters_by_phase() {
        let mut store = ListenerStore::default();
        let node = NodeId(3);
        store.add(
            node,
            EventType::Click,
            Listener {
                capture: false,
                behavior: Behavior::CloseMobileMenu,
            },
        );
        store.add(
            node,
            EventType::Click,
            Listener {
                capture: true,
                behavior: Behavior::ToolkitDataApi,
            },
        );
        assert_eq!(store.get(node, EventType::Click, false).len(), 1);
        assert_eq!(
            store.get(node, EventType::Click, true)[0].behavior,
            Behavior::ToolkitDataApi
        );
        assert!(store.get(node, EventType::Submit, false).is_empty());
    }

    #[test]
    fn key_input_constructors_set_modifiers() {
        assert!(KeyInput::ctrl("k").ctrl);
        assert!(KeyInput::meta("k").meta);
        assert_eq!(KeyInput::escape().key, "Escape");
        assert!(!KeyInput::escape().ctrl);
    }
}
