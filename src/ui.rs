//! Minimal view of the page's element tree and focus, as far as the capture layer needs it.

use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const BARCODE_INPUT: &str = "barcode";
pub const SCAN_RESULT: &str = "scan-result";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<body>` or `<html>`: focus that belongs to no control.
    pub fn is_document_root(&self) -> bool {
        matches!(self.0.as_str(), "body" | "html")
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// An element with its attributes and ancestry.
#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    attributes: BTreeMap<String, String>,
    parent: Option<Arc<Element>>,
}

impl Element {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
            parent: None,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_parent(mut self, parent: Arc<Element>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn parent(&self) -> Option<&Element> {
        self.parent.as_deref()
    }

    /// Nearest element, starting with `self`, that satisfies `predicate`.
    pub fn closest<F>(&self, predicate: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        let mut current = Some(self);
        while let Some(element) = current {
            if predicate(element) {
                return Some(element);
            }
            current = element.parent();
        }
        None
    }
}

/// The document's focus, implemented by the host.
pub trait FocusHost: Send + Sync {
    fn active_element(&self) -> Option<ElementId>;

    /// Move focus without scrolling. May fail if the element left the page.
    fn focus(&self, element: &ElementId) -> Result<()>;
}

/// Put focus on the barcode field, unless another control holds it.
///
/// Returns whether focus was moved. Focus failures are ignored.
pub fn focus_barcode_if_idle(host: &dyn FocusHost) -> bool {
    let barcode = ElementId::new(BARCODE_INPUT);
    let idle = match host.active_element() {
        None => true,
        Some(active) => active.is_document_root() || active == barcode,
    };
    if !idle {
        return false;
    }
    if let Err(err) = host.focus(&barcode) {
        log::debug!("could not focus barcode field: {err:#}");
        return false;
    }
    true
}

/// In-memory focus tracker for hosts that mirror focus into the capture layer.
#[derive(Debug, Clone, Default)]
pub struct TrackedFocus {
    active: Arc<Mutex<Option<ElementId>>>,
}

impl TrackedFocus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blur(&self) {
        *self.active.lock().unwrap_or_else(|p| p.into_inner()) = None;
    }
}

impl FocusHost for TrackedFocus {
    fn active_element(&self) -> Option<ElementId> {
        self.active.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn focus(&self, element: &ElementId) -> Result<()> {
        *self.active.lock().unwrap_or_else(|p| p.into_inner()) = Some(element.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_walks_up_the_ancestry() {
        let row = Arc::new(Element::new("row-7").with_attr("data-confirm-modal", "1"));
        let icon = Element::new("icon").with_parent(row);

        let found = icon
            .closest(|el| el.attr("data-confirm-modal") == Some("1"))
            .unwrap();
        assert_eq!(found.id.as_str(), "row-7");
        assert!(icon.closest(|el| el.attr("hx-delete").is_some()).is_none());
    }

    #[test]
    fn tracked_focus_follows_focus_calls() {
        let focus = TrackedFocus::new();
        assert_eq!(focus.active_element(), None);
        focus.focus(&ElementId::new(BARCODE_INPUT)).unwrap();
        assert_eq!(focus.active_element(), Some(ElementId::new(BARCODE_INPUT)));
        focus.blur();
        assert_eq!(focus.active_element(), None);
    }

    #[test]
    fn barcode_focus_never_steals_from_other_controls() {
        let focus = TrackedFocus::new();
        focus.focus(&ElementId::new("body")).unwrap();
        assert!(focus_barcode_if_idle(&focus));
        assert_eq!(focus.active_element(), Some(ElementId::new(BARCODE_INPUT)));

        focus.focus(&ElementId::new("title")).unwrap();
        assert!(!focus_barcode_if_idle(&focus));
        assert_eq!(focus.active_element(), Some(ElementId::new("title")));
    }
}
