use std::fmt;
use std::str::FromStr;

use crate::dom::{Dom, NodeId};
use crate::{Error, Result};

/// Contextual color of a toast, named after the toolkit's alert variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
    Primary,
    Secondary,
    Light,
    Dark,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            _ => "exclamation-circle",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToastKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "danger" => Ok(Self::Danger),
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(Error::Runtime(format!("unknown toast kind: {other}"))),
        }
    }
}

/// Inserts a dismissible alert wrapper as the first child of `container`.
/// Returns the alert element, or `None` when there is no container.
pub(crate) fn show(
    dom: &mut Dom,
    container: Option<NodeId>,
    message: &str,
    kind: ToastKind,
) -> Result<Option<NodeId>> {
    let Some(container) = container.filter(|node| dom.is_connected(*node)) else {
        return Ok(None);
    };

    let wrapper = dom.create_detached_element("div");
    dom.set_attr(wrapper, "class", "container mt-3")?;
    dom.set_inner_html(
        wrapper,
        &format!(
            r#"<div class="alert alert-{kind} alert-dismissible fade show shadow-sm border-0" role="alert"><i class="bi bi-{icon} me-2"></i><button type="button" class="btn-close" data-bs-dismiss="alert"></button></div>"#,
            icon = kind.icon(),
        ),
    )?;

    let alert = dom
        .first_child(wrapper)
        .ok_or_else(|| Error::Runtime("toast markup produced no alert".into()))?;
    let close_button = dom
        .query_selector_from(alert, ".btn-close")?
        .ok_or_else(|| Error::Runtime("toast markup produced no close button".into()))?;
    let text = dom.create_detached_text(message);
    dom.insert_before(alert, text, close_button)?;

    dom.prepend_child(container, wrapper)?;
    Ok(Some(alert))
}
