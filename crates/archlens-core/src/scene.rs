use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::crossref::CrossReference;
use crate::layout::Position;
use crate::model::{Graph, NodeKind, Severity, SeverityBreakdown, Topology};
use crate::selection::SelectionState;

/// Solid fill color, renderer-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

pub const CRITICAL_COLOUR: Rgb = Rgb::new(220, 38, 38); // #DC2626
pub const HIGH_COLOUR: Rgb = Rgb::new(234, 88, 12); // #EA580C
pub const MEDIUM_COLOUR: Rgb = Rgb::new(202, 138, 4); // #CA8A04
pub const LOW_COLOUR: Rgb = Rgb::new(22, 163, 74); // #16A34A
pub const SERVICE_COLOUR: Rgb = Rgb::new(124, 58, 237); // #7C3AED
pub const ANALYSIS_COLOUR: Rgb = Rgb::new(29, 78, 216); // #1D4ED8
pub const REMEDIATION_COLOUR: Rgb = Rgb::new(75, 85, 99); // #4B5563
pub const NEUTRAL_COLOUR: Rgb = Rgb::new(107, 114, 128); // #6B7280

pub fn severity_colour(severity: Severity) -> Rgb {
    match severity {
        Severity::Critical => CRITICAL_COLOUR,
        Severity::High => HIGH_COLOUR,
        Severity::Medium => MEDIUM_COLOUR,
        Severity::Low => LOW_COLOUR,
    }
}

/// Node box size by entity kind.
fn node_dimensions(kind: NodeKind) -> (f64, f64) {
    match kind {
        NodeKind::Analysis => (220.0, 60.0),
        NodeKind::Finding => (240.0, 120.0),
        NodeKind::AwsService => (160.0, 50.0),
        NodeKind::Remediation => (180.0, 60.0),
    }
}

/// Hover detail panel content. Pure presentation data; reading it never
/// touches selection state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NodeDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub finding_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity_breakdown: Option<SeverityBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Finding-count badge drawn on a node's corner.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Badge {
    pub count: u32,
    pub colour: Rgb,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneNode {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub colour: Rgb,
    pub highlighted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    pub detail: NodeDetail,
}

/// Directed, labelled edge between two positioned nodes.
#[derive(Debug, Clone, Serialize)]
pub struct SceneEdge {
    pub source: String,
    pub target: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub colour: Rgb,
}

/// Renderer-agnostic view model: everything a drawing surface needs, and
/// nothing it is allowed to decide for itself.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
    pub legend: Vec<LegendEntry>,
    /// Data-integrity problems encountered while building (skipped edges).
    pub diagnostics: Vec<String>,
    /// Set when there is nothing to draw; the renderer shows this instead
    /// of a blank canvas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

impl Scene {
    pub(crate) fn empty_state(message: &str) -> Self {
        Scene { empty_message: Some(message.to_string()), ..Scene::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn legend_entry(label: &str, colour: Rgb) -> LegendEntry {
    LegendEntry { label: label.to_string(), colour }
}

fn severity_legend() -> Vec<LegendEntry> {
    vec![
        legend_entry("Finding (CRITICAL)", CRITICAL_COLOUR),
        legend_entry("Finding (HIGH)", HIGH_COLOUR),
        legend_entry("Finding (MEDIUM)", MEDIUM_COLOUR),
        legend_entry("Finding (LOW)", LOW_COLOUR),
    ]
}

/// Build the scene for an architecture topology.
///
/// Nodes take the severity colour of their worst finding, falling back to
/// the service default. Connections referencing unknown services are
/// skipped and reported in `diagnostics` — never rendered, never repaired
/// by inventing a node.
pub fn architecture_scene(
    topology: &Topology,
    positions: &HashMap<String, Position>,
    selection: &SelectionState,
    xref: &CrossReference,
) -> Scene {
    if topology.is_empty() {
        return Scene::empty_state(
            "No architecture data yet. Run an analysis to build the topology.",
        );
    }

    let (width, height) = node_dimensions(NodeKind::AwsService);
    let mut nodes = Vec::with_capacity(topology.services.len());
    for service in &topology.services {
        let position =
            positions.get(&service.name).copied().unwrap_or(Position { x: 0.0, y: 0.0 });
        let colour = service
            .max_severity
            .or_else(|| service.severity_breakdown.max_severity())
            .map(severity_colour)
            .unwrap_or(SERVICE_COLOUR);
        let badge = (service.finding_count > 0).then(|| Badge {
            count: service.finding_count,
            colour: if service.max_severity == Some(Severity::Critical) {
                CRITICAL_COLOUR
            } else {
                HIGH_COLOUR
            },
        });
        nodes.push(SceneNode {
            id: service.name.clone(),
            label: service.name.clone(),
            x: position.x,
            y: position.y,
            width,
            height,
            colour,
            highlighted: selection.is_service_highlighted(&service.name, xref),
            badge,
            detail: NodeDetail {
                category: Some(service.category.clone()),
                finding_count: service.finding_count,
                severity_breakdown: Some(service.severity_breakdown),
                severity: service.max_severity,
                description: None,
                score: None,
            },
        });
    }

    let names = topology.service_names();
    let mut edges = Vec::with_capacity(topology.connections.len());
    let mut diagnostics = Vec::new();
    for connection in &topology.connections {
        if !names.contains(connection.source_service.as_str())
            || !names.contains(connection.target_service.as_str())
        {
            let message = format!(
                "skipping connection {} -> {}: unknown service",
                connection.source_service, connection.target_service
            );
            warn!(
                source = %connection.source_service,
                target = %connection.target_service,
                "dangling connection in topology"
            );
            diagnostics.push(message);
            continue;
        }
        edges.push(SceneEdge {
            source: connection.source_service.clone(),
            target: connection.target_service.clone(),
            label: connection.relationship_type.replace('_', " "),
        });
    }

    let mut legend = vec![legend_entry("AWS Service", SERVICE_COLOUR)];
    legend.extend(severity_legend());

    Scene { nodes, edges, legend, diagnostics, empty_message: None }
}

/// Build the scene for the generic knowledge graph (fixed-column layout).
///
/// The generic view has no selection synchronisation; nothing is
/// highlighted.
pub fn graph_scene(graph: &Graph, positions: &HashMap<String, Position>) -> Scene {
    let has_analysis_data =
        graph.nodes.iter().any(|n| matches!(n.kind, NodeKind::Analysis | NodeKind::Finding));
    if graph.nodes.is_empty() || !has_analysis_data {
        return Scene::empty_state(
            "Your knowledge graph awaits. Run an analysis to add findings and services.",
        );
    }

    let mut nodes = Vec::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        let (width, height) = node_dimensions(node.kind);
        let position = positions.get(&node.id).copied().unwrap_or(Position { x: 0.0, y: 0.0 });
        let colour = match node.kind {
            NodeKind::Analysis => ANALYSIS_COLOUR,
            NodeKind::AwsService => SERVICE_COLOUR,
            NodeKind::Remediation => REMEDIATION_COLOUR,
            NodeKind::Finding => {
                node.properties.severity.map(severity_colour).unwrap_or(NEUTRAL_COLOUR)
            }
        };
        nodes.push(SceneNode {
            id: node.id.clone(),
            label: node.label.clone(),
            x: position.x,
            y: position.y,
            width,
            height,
            colour,
            highlighted: false,
            badge: None,
            detail: NodeDetail {
                category: node.properties.category.clone(),
                finding_count: 0,
                severity_breakdown: None,
                severity: node.properties.severity,
                description: node.properties.description.clone(),
                score: node.properties.score,
            },
        });
    }

    let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut edges = Vec::with_capacity(graph.edges.len());
    let mut diagnostics = Vec::new();
    for edge in &graph.edges {
        if !ids.contains(edge.source.as_str()) || !ids.contains(edge.target.as_str()) {
            diagnostics
                .push(format!("skipping edge {} -> {}: unknown node", edge.source, edge.target));
            warn!(source = %edge.source, target = %edge.target, "dangling edge in graph");
            continue;
        }
        edges.push(SceneEdge {
            source: edge.source.clone(),
            target: edge.target.clone(),
            label: edge.kind.replace('_', " "),
        });
    }

    let mut legend = vec![legend_entry("Analysis", ANALYSIS_COLOUR)];
    legend.extend(severity_legend());
    legend.push(legend_entry("AWS Service", SERVICE_COLOUR));
    legend.push(legend_entry("Remediation", REMEDIATION_COLOUR));

    Scene { nodes, edges, legend, diagnostics, empty_message: None }
}
