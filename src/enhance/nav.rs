use crate::Result;
use crate::dom::{Dom, NodeId};

/// Adds `active` to every `.navbar .nav-link` whose `href` is the current
/// path or a prefix of it. Returns the links that were marked.
pub(crate) fn mark_active_links(dom: &mut Dom, current_path: &str) -> Result<Vec<NodeId>> {
    let mut marked = Vec::new();
    for link in dom.query_selector_all(".navbar .nav-link")? {
        let Some(href) = dom.attr(link, "href") else {
            continue;
        };
        if href_matches_path(&href, current_path) {
            dom.class_add(link, "active")?;
            marked.push(link);
        }
    }
    Ok(marked)
}

pub(crate) fn href_matches_path(href: &str, current_path: &str) -> bool {
    href == current_path || current_path.starts_with(href)
}

/// The toggler to click after a mobile nav link was followed, if the menu
/// is currently open.
pub(crate) fn toggler_to_close(dom: &Dom, toggler: Option<NodeId>) -> Option<NodeId> {
    toggler.filter(|toggler| {
        dom.is_connected(*toggler) && !dom.class_contains(*toggler, "collapsed")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_and_exact_matches_are_active() {
        assert!(href_matches_path("/students", "/students"));
        assert!(href_matches_path("/students", "/students/4/edit"));
        assert!(href_matches_path("/", "/courses"));
        assert!(!href_matches_path("/courses", "/students"));
        assert!(!href_matches_path("/students/4", "/students"));
    }
}
