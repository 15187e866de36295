use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    OperationalExcellence,
    Security,
    Reliability,
    PerformanceEfficiency,
    CostOptimization,
    Sustainability,
}

impl Pillar {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pillar::OperationalExcellence => "operational_excellence",
            Pillar::Security => "security",
            Pillar::Reliability => "reliability",
            Pillar::PerformanceEfficiency => "performance_efficiency",
            Pillar::CostOptimization => "cost_optimization",
            Pillar::Sustainability => "sustainability",
        }
    }
}

/// Per-severity finding counts for one service. Field names match the
/// review API's JSON keys.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct SeverityBreakdown {
    #[serde(rename = "CRITICAL", default)]
    pub critical: u32,
    #[serde(rename = "HIGH", default)]
    pub high: u32,
    #[serde(rename = "MEDIUM", default)]
    pub medium: u32,
    #[serde(rename = "LOW", default)]
    pub low: u32,
}

impl SeverityBreakdown {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut breakdown = SeverityBreakdown::default();
        for finding in findings {
            match finding.severity {
                Severity::Critical => breakdown.critical += 1,
                Severity::High => breakdown.high += 1,
                Severity::Medium => breakdown.medium += 1,
                Severity::Low => breakdown.low += 1,
            }
        }
        breakdown
    }

    pub fn count(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> u32 {
        self.critical + self.high + self.medium + self.low
    }

    /// Highest severity with a non-zero count, or None when empty.
    pub fn max_severity(&self) -> Option<Severity> {
        if self.critical > 0 {
            Some(Severity::Critical)
        } else if self.high > 0 {
            Some(Severity::High)
        } else if self.medium > 0 {
            Some(Severity::Medium)
        } else if self.low > 0 {
            Some(Severity::Low)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub title: String,
    pub severity: Severity,
    pub pillar: Pillar,
    pub finding: String,
    pub impact: String,
    pub remediation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likelihood: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "service_name")]
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub finding_count: u32,
    #[serde(default)]
    pub severity_breakdown: SeverityBreakdown,
    #[serde(default)]
    pub max_severity: Option<Severity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub source_service: String,
    pub target_service: String,
    pub relationship_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum ArchitecturePattern {
    #[serde(rename = "3-tier")]
    ThreeTier,
    #[serde(rename = "serverless")]
    Serverless,
    #[serde(rename = "microservices")]
    Microservices,
    #[serde(rename = "event-driven")]
    EventDriven,
    #[serde(rename = "monolith")]
    Monolith,
    #[serde(rename = "custom")]
    Custom,
}

impl ArchitecturePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchitecturePattern::ThreeTier => "3-tier",
            ArchitecturePattern::Serverless => "serverless",
            ArchitecturePattern::Microservices => "microservices",
            ArchitecturePattern::EventDriven => "event-driven",
            ArchitecturePattern::Monolith => "monolith",
            ArchitecturePattern::Custom => "custom",
        }
    }
}

/// One architecture's services and directed connections, as returned by the
/// review API for a single analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topology {
    pub services: Vec<Service>,
    pub connections: Vec<Connection>,
    #[serde(rename = "architecture_pattern", default)]
    pub pattern: Option<ArchitecturePattern>,
    #[serde(rename = "architecture_description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Topology {
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn service_names(&self) -> HashSet<&str> {
        self.services.iter().map(|s| s.name.as_str()).collect()
    }

    /// Connections referencing a service name that does not exist in the
    /// service set. These are data-integrity violations from the collaborator
    /// and are skipped (with a diagnostic) at render time.
    pub fn dangling_connections(&self) -> Vec<&Connection> {
        let names = self.service_names();
        self.connections
            .iter()
            .filter(|c| {
                !names.contains(c.source_service.as_str())
                    || !names.contains(c.target_service.as_str())
            })
            .collect()
    }
}

// --- Generic knowledge-graph model (fallback when no topology exists) ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum NodeKind {
    Analysis,
    Finding,
    #[serde(rename = "AWSService")]
    AwsService,
    Remediation,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Analysis => "Analysis",
            NodeKind::Finding => "Finding",
            NodeKind::AwsService => "AWSService",
            NodeKind::Remediation => "Remediation",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub properties: NodeProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_low_to_critical() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn severity_wire_names_are_uppercase() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"CRITICAL\"");
        let parsed: Severity = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(parsed, Severity::Low);
    }

    #[test]
    fn breakdown_max_severity_prefers_highest() {
        let breakdown = SeverityBreakdown { critical: 0, high: 2, medium: 1, low: 5 };
        assert_eq!(breakdown.max_severity(), Some(Severity::High));
        assert_eq!(SeverityBreakdown::default().max_severity(), None);
    }

    #[test]
    fn pattern_serializes_to_wire_tokens() {
        assert_eq!(serde_json::to_string(&ArchitecturePattern::ThreeTier).unwrap(), "\"3-tier\"");
        let parsed: ArchitecturePattern = serde_json::from_str("\"event-driven\"").unwrap();
        assert_eq!(parsed, ArchitecturePattern::EventDriven);
    }

    #[test]
    fn service_deserializes_from_api_shape() {
        let json = r#"{
            "service_name": "EC2",
            "category": "Compute",
            "finding_count": 3,
            "severity_breakdown": {"CRITICAL": 1, "HIGH": 2, "MEDIUM": 0, "LOW": 0},
            "max_severity": "CRITICAL"
        }"#;
        let service: Service = serde_json::from_str(json).unwrap();
        assert_eq!(service.name, "EC2");
        assert_eq!(service.severity_breakdown.critical, 1);
        assert_eq!(service.max_severity, Some(Severity::Critical));
    }

    #[test]
    fn dangling_connections_reports_missing_endpoints() {
        let topology = Topology {
            services: vec![Service {
                name: "ALB".into(),
                category: "Network".into(),
                finding_count: 0,
                severity_breakdown: SeverityBreakdown::default(),
                max_severity: None,
            }],
            connections: vec![
                Connection {
                    source_service: "ALB".into(),
                    target_service: "EC2".into(),
                    relationship_type: "ROUTES_TO".into(),
                    description: None,
                },
                Connection {
                    source_service: "ALB".into(),
                    target_service: "ALB".into(),
                    relationship_type: "ROUTES_TO".into(),
                    description: None,
                },
            ],
            pattern: None,
            description: None,
        };
        let dangling = topology.dangling_connections();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].target_service, "EC2");
    }

    #[test]
    fn graph_node_kind_uses_type_key() {
        let json = r#"{"id": "svc-1", "label": "S3", "type": "AWSService"}"#;
        let node: GraphNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.kind, NodeKind::AwsService);
        assert!(node.properties.severity.is_none());
    }
}
