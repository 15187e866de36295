use std::collections::HashMap;

use crate::model::Service;

/// Placement band for a service in the layered layout.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Layer {
    Edge,
    Compute,
    Data,
    CrossCutting,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Edge => "edge",
            Layer::Compute => "compute",
            Layer::Data => "data",
            Layer::CrossCutting => "cross-cutting",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct LayerAssignment {
    pub layer: Layer,
    /// Ordering key within the layer; lower sorts first.
    pub priority: u32,
}

/// Priority for services assigned by category fallback: sorts after every
/// table entry.
pub const FALLBACK_PRIORITY: u32 = 99;

/// Well-known service placements. Services not listed here fall back to a
/// keyword match on their category.
const SERVICE_LAYERS: &[(&str, Layer, u32)] = &[
    // Edge (top)
    ("CloudFront", Layer::Edge, 1),
    ("Route 53", Layer::Edge, 2),
    ("ALB", Layer::Edge, 3),
    ("NLB", Layer::Edge, 4),
    ("API Gateway", Layer::Edge, 5),
    ("Application Load Balancer", Layer::Edge, 3),
    ("Network Load Balancer", Layer::Edge, 4),
    // Compute (middle)
    ("EC2", Layer::Compute, 1),
    ("Lambda", Layer::Compute, 2),
    ("ECS", Layer::Compute, 3),
    ("Fargate", Layer::Compute, 4),
    ("Elastic Beanstalk", Layer::Compute, 5),
    ("App Runner", Layer::Compute, 6),
    // Data (bottom)
    ("RDS", Layer::Data, 1),
    ("DynamoDB", Layer::Data, 2),
    ("Aurora", Layer::Data, 3),
    ("S3", Layer::Data, 4),
    ("ElastiCache", Layer::Data, 5),
    ("Redshift", Layer::Data, 6),
    ("DocumentDB", Layer::Data, 7),
    ("Neptune", Layer::Data, 8),
    ("EFS", Layer::Data, 9),
    // Cross-cutting (right side)
    ("CloudWatch", Layer::CrossCutting, 1),
    ("IAM", Layer::CrossCutting, 2),
    ("KMS", Layer::CrossCutting, 3),
    ("Secrets Manager", Layer::CrossCutting, 4),
    ("SNS", Layer::CrossCutting, 5),
    ("SQS", Layer::CrossCutting, 6),
    ("Backup", Layer::CrossCutting, 7),
    ("Systems Manager", Layer::CrossCutting, 8),
];

fn lookup(name: &str) -> Option<LayerAssignment> {
    SERVICE_LAYERS
        .iter()
        .find(|(table_name, _, _)| *table_name == name)
        .map(|(_, layer, priority)| LayerAssignment { layer: *layer, priority: *priority })
}

/// Keyword fallback over the free-text category for services absent from
/// the lookup table.
fn from_category(category: &str) -> LayerAssignment {
    let category = category.to_lowercase();
    let layer = if category.contains("compute") {
        Layer::Compute
    } else if category.contains("database") || category.contains("storage") {
        Layer::Data
    } else if category.contains("network") {
        Layer::Edge
    } else {
        Layer::CrossCutting
    };
    LayerAssignment { layer, priority: FALLBACK_PRIORITY }
}

/// Assign every service to exactly one layer. Total: no service is ever
/// left unpositioned.
pub fn assign_layers(services: &[Service]) -> HashMap<String, LayerAssignment> {
    let mut assignments = HashMap::with_capacity(services.len());
    for service in services {
        let assignment =
            lookup(&service.name).unwrap_or_else(|| from_category(&service.category));
        assignments.insert(service.name.clone(), assignment);
    }
    assignments
}
