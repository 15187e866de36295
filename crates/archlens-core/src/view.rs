use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::crossref::CrossReference;
use crate::layout::{self, Position};
use crate::model::{ArchitecturePattern, Finding, Graph, Severity, Topology};
use crate::pattern;
use crate::scene::{self, Scene};
use crate::selection::{ScrollTarget, SelectionState};

/// The two data shapes the engine can render. The fallback from topology to
/// generic graph is decided by the data loader; here it is an exhaustive
/// dispatch, not an optional-field probe.
#[derive(Debug, Clone)]
pub enum GraphView {
    Architecture(Topology),
    Generic(Graph),
}

/// Per-severity finding counts for the list header.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl Summary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Summary { total: findings.len(), ..Summary::default() };
        for finding in findings {
            match finding.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    seq: u64,
    view: GraphView,
    findings: Vec<Finding>,
    pattern: Option<ArchitecturePattern>,
    positions: HashMap<String, Position>,
    xref: CrossReference,
}

/// The visualization engine: one in-memory data snapshot plus the shared
/// selection state, with every derived projection (pattern, layout,
/// cross-reference, scene) recomputed on data change.
///
/// The engine is a pure function of its inputs; callers pass data in
/// explicitly rather than the engine reading ambient session state.
#[derive(Debug, Default)]
pub struct ViewEngine {
    snapshot: Option<Snapshot>,
    selection: SelectionState,
}

impl ViewEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new data snapshot.
    ///
    /// `seq` orders concurrent fetches: the latest successful response wins
    /// by overwrite, and a slow stale response arriving late is discarded
    /// (returns false, state unchanged). Selection survives a refresh;
    /// stale ids simply stop matching the highlight predicates.
    pub fn apply(&mut self, seq: u64, findings: Vec<Finding>, view: GraphView) -> bool {
        if let Some(current) = &self.snapshot {
            if seq <= current.seq {
                debug!(seq, current = current.seq, "discarding stale snapshot");
                return false;
            }
        }

        let (pattern, positions, xref) = match &view {
            GraphView::Architecture(topology) => {
                let pattern = topology
                    .pattern
                    .unwrap_or_else(|| pattern::detect_pattern(&topology.services, &topology.connections));
                let positions =
                    layout::layout_topology(&topology.services, &topology.connections, pattern);
                let xref = CrossReference::build(&topology.services, &findings);
                (Some(pattern), positions, xref)
            }
            GraphView::Generic(graph) => {
                (None, layout::layout_graph(&graph.nodes), CrossReference::default())
            }
        };

        debug!(seq, nodes = positions.len(), "applied snapshot");
        self.snapshot = Some(Snapshot { seq, view, findings, pattern, positions, xref });
        true
    }

    pub fn seq(&self) -> Option<u64> {
        self.snapshot.as_ref().map(|s| s.seq)
    }

    /// Resolved pattern of the current architecture view (None for the
    /// generic view or before any data arrives).
    pub fn pattern(&self) -> Option<ArchitecturePattern> {
        self.snapshot.as_ref().and_then(|s| s.pattern)
    }

    /// Build the current scene. Without data this is the explicit
    /// "no data yet" empty state.
    pub fn scene(&self) -> Scene {
        match &self.snapshot {
            None => Scene::empty_state("No data loaded yet."),
            Some(snapshot) => match &snapshot.view {
                GraphView::Architecture(topology) => scene::architecture_scene(
                    topology,
                    &snapshot.positions,
                    &self.selection,
                    &snapshot.xref,
                ),
                GraphView::Generic(graph) => scene::graph_scene(graph, &snapshot.positions),
            },
        }
    }

    pub fn select_service(&mut self, name: &str) -> Option<ScrollTarget> {
        self.selection.select_service(name)
    }

    pub fn select_finding(&mut self, id: &str) -> Option<ScrollTarget> {
        self.selection.select_finding(id)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn is_service_highlighted(&self, name: &str) -> bool {
        match &self.snapshot {
            Some(snapshot) => self.selection.is_service_highlighted(name, &snapshot.xref),
            None => false,
        }
    }

    pub fn is_finding_highlighted(&self, id: &str) -> bool {
        match &self.snapshot {
            Some(snapshot) => self.selection.is_finding_highlighted(id, &snapshot.xref),
            None => false,
        }
    }

    /// Service names the given finding affects, per the cross-reference.
    pub fn affected_services(&self, finding_id: &str) -> &[String] {
        match &self.snapshot {
            Some(snapshot) => snapshot.xref.services_for(finding_id),
            None => &[],
        }
    }

    /// Findings ordered by severity, highest first; ties keep input order.
    pub fn findings_sorted(&self) -> Vec<&Finding> {
        let mut findings: Vec<&Finding> = self
            .snapshot
            .as_ref()
            .map(|s| s.findings.iter().collect())
            .unwrap_or_default();
        findings.sort_by(|a, b| b.severity.cmp(&a.severity));
        findings
    }

    pub fn summary(&self) -> Summary {
        self.snapshot
            .as_ref()
            .map(|s| Summary::from_findings(&s.findings))
            .unwrap_or_default()
    }
}
