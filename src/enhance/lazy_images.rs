use crate::Result;
use crate::dom::{Dom, NodeId};
use crate::viewport::{IntersectionObserver, Viewport};

/// Swaps `data-src` into `src` once an image scrolls into view. `None`
/// observer means the environment has no intersection observation.
#[derive(Debug, Clone, Default)]
pub(crate) struct LazyImages {
    observer: Option<IntersectionObserver>,
}

impl LazyImages {
    pub(crate) fn observe(images: &[NodeId], supported: bool, root_margin: i64) -> Self {
        if !supported {
            return Self { observer: None };
        }
        let mut observer = IntersectionObserver::new(root_margin);
        for image in images {
            observer.observe(*image);
        }
        Self {
            observer: Some(observer),
        }
    }

    pub(crate) fn observed_count(&self) -> usize {
        self.observer
            .as_ref()
            .map(|observer| observer.observed().len())
            .unwrap_or(0)
    }

    /// Loads every observed image that intersects the viewport and stops
    /// observing it. Returns the images that were loaded.
    pub(crate) fn load_visible(
        &mut self,
        dom: &mut Dom,
        viewport: &Viewport,
    ) -> Result<Vec<NodeId>> {
        let Some(observer) = self.observer.as_mut() else {
            return Ok(Vec::new());
        };

        let mut loaded = Vec::new();
        for image in observer.intersecting(viewport) {
            if !dom.is_connected(image) {
                continue;
            }
            if let Some(src) = dom.attr(image, "data-src") {
                dom.set_attr(image, "src", &src)?;
            }
            dom.class_add(image, "loaded")?;
            observer.unobserve(image);
            loaded.push(image);
        }
        Ok(loaded)
    }
}
