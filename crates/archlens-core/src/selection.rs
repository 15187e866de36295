use crate::crossref::CrossReference;

/// Region the embedding view should scroll into view after a selection.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ScrollTarget {
    /// The finding-list region (selected a service; show its findings).
    FindingList,
    /// The graph region (selected a finding; show its services).
    Graph,
}

/// Mutually exclusive selection over the two views.
///
/// At most one of `selected_service` / `selected_finding` is set at any
/// time: each setter clears the other, and re-selecting the current value
/// toggles the selection off. Render surfaces read the derived highlight
/// predicates only.
#[derive(Debug, Default, Clone)]
pub struct SelectionState {
    selected_service: Option<String>,
    selected_finding: Option<String>,
}

impl SelectionState {
    pub fn selected_service(&self) -> Option<&str> {
        self.selected_service.as_deref()
    }

    pub fn selected_finding(&self) -> Option<&str> {
        self.selected_finding.as_deref()
    }

    /// Select (or toggle off) a service. Returns the scroll side effect,
    /// None when the call cleared the selection.
    pub fn select_service(&mut self, name: &str) -> Option<ScrollTarget> {
        if self.selected_service.as_deref() == Some(name) {
            self.selected_service = None;
            self.selected_finding = None;
            return None;
        }
        self.selected_service = Some(name.to_string());
        self.selected_finding = None;
        Some(ScrollTarget::FindingList)
    }

    /// Select (or toggle off) a finding. Symmetric with `select_service`.
    pub fn select_finding(&mut self, id: &str) -> Option<ScrollTarget> {
        if self.selected_finding.as_deref() == Some(id) {
            self.selected_service = None;
            self.selected_finding = None;
            return None;
        }
        self.selected_finding = Some(id.to_string());
        self.selected_service = None;
        Some(ScrollTarget::Graph)
    }

    pub fn clear(&mut self) {
        self.selected_service = None;
        self.selected_finding = None;
    }

    /// A service is highlighted when selected directly, or when the selected
    /// finding affects it. Unknown or stale names are simply not highlighted.
    pub fn is_service_highlighted(&self, name: &str, xref: &CrossReference) -> bool {
        if self.selected_service.as_deref() == Some(name) {
            return true;
        }
        match self.selected_finding.as_deref() {
            Some(finding) => xref.affects(finding, name),
            None => false,
        }
    }

    /// A finding is highlighted when selected directly, or when the selected
    /// service is among the services it affects.
    pub fn is_finding_highlighted(&self, id: &str, xref: &CrossReference) -> bool {
        if self.selected_finding.as_deref() == Some(id) {
            return true;
        }
        match self.selected_service.as_deref() {
            Some(service) => xref.affects(id, service),
            None => false,
        }
    }
}
