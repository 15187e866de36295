use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::layers::{assign_layers, Layer};
use crate::model::{ArchitecturePattern, Connection, GraphNode, NodeKind, Service};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

// Layered layout geometry.
const START_X: f64 = 100.0;
const START_Y: f64 = 50.0;
const HORIZONTAL_SPACING: f64 = 200.0;
const VERTICAL_SPACING: f64 = 200.0;
const CROSS_CUTTING_GAP: f64 = 100.0;
const CROSS_CUTTING_STEP: f64 = VERTICAL_SPACING * 0.8;

// Fixed-column layout geometry for the generic knowledge graph.
const ANALYSIS_X: f64 = 500.0;
const ANALYSIS_START_Y: f64 = 50.0;
const FINDING_X: f64 = 300.0;
const SERVICE_X: f64 = 900.0;
const REMEDIATION_X: f64 = 1300.0;
const COLUMN_START_Y: f64 = 200.0;
const FINDING_SPACING_Y: f64 = 150.0;
const SERVICE_SPACING_Y: f64 = 80.0;

/// Deterministic coordinates for every service in a topology.
///
/// Same inputs always produce identical coordinates: no randomness, no
/// force simulation. The positioned key set equals the input service-name
/// set exactly.
pub fn layout_topology(
    services: &[Service],
    _connections: &[Connection],
    pattern: ArchitecturePattern,
) -> HashMap<String, Position> {
    // Every pattern currently routes to the layered strategy; the match is
    // the seam for pattern-specific placement variants.
    match pattern {
        ArchitecturePattern::ThreeTier
        | ArchitecturePattern::Serverless
        | ArchitecturePattern::Microservices
        | ArchitecturePattern::EventDriven
        | ArchitecturePattern::Monolith
        | ArchitecturePattern::Custom => layered(services),
    }
}

/// Edge at the top, compute in the middle, data at the bottom, each laid
/// out left-to-right in priority order. Cross-cutting services sit in a
/// single column to the right of the widest band.
fn layered(services: &[Service]) -> HashMap<String, Position> {
    let assignments = assign_layers(services);

    let mut bands: HashMap<Layer, Vec<(&str, u32)>> = HashMap::new();
    for service in services {
        let assignment = assignments[&service.name];
        bands
            .entry(assignment.layer)
            .or_default()
            .push((service.name.as_str(), assignment.priority));
    }
    // Stable sort: ties keep input order.
    for band in bands.values_mut() {
        band.sort_by_key(|(_, priority)| *priority);
    }

    let empty = Vec::new();
    let band = |layer: Layer| bands.get(&layer).unwrap_or(&empty);

    let mut positions = HashMap::with_capacity(services.len());
    for (row, layer) in [Layer::Edge, Layer::Compute, Layer::Data].into_iter().enumerate() {
        let y = START_Y + row as f64 * VERTICAL_SPACING;
        for (index, (name, _)) in band(layer).iter().enumerate() {
            positions.insert(
                (*name).to_string(),
                Position { x: START_X + index as f64 * HORIZONTAL_SPACING, y },
            );
        }
    }

    let widest = band(Layer::Edge)
        .len()
        .max(band(Layer::Compute).len())
        .max(band(Layer::Data).len());
    let right_x = START_X + widest as f64 * HORIZONTAL_SPACING + CROSS_CUTTING_GAP;
    for (index, (name, _)) in band(Layer::CrossCutting).iter().enumerate() {
        positions.insert(
            (*name).to_string(),
            Position { x: right_x, y: START_Y + index as f64 * CROSS_CUTTING_STEP },
        );
    }

    positions
}

/// Fixed-column layout for the generic knowledge graph: one vertical
/// column per node kind, y incrementing by a per-kind row height.
pub fn layout_graph(nodes: &[GraphNode]) -> HashMap<String, Position> {
    let mut positions = HashMap::with_capacity(nodes.len());
    let mut rows: HashMap<NodeKind, usize> = HashMap::new();

    for node in nodes {
        let row = rows.entry(node.kind).or_insert(0);
        let (x, start_y, spacing) = match node.kind {
            NodeKind::Analysis => (ANALYSIS_X, ANALYSIS_START_Y, FINDING_SPACING_Y),
            NodeKind::Finding => (FINDING_X, COLUMN_START_Y, FINDING_SPACING_Y),
            NodeKind::AwsService => (SERVICE_X, COLUMN_START_Y, SERVICE_SPACING_Y),
            NodeKind::Remediation => (REMEDIATION_X, COLUMN_START_Y, FINDING_SPACING_Y),
        };
        positions
            .insert(node.id.clone(), Position { x, y: start_y + *row as f64 * spacing });
        *row += 1;
    }

    positions
}
