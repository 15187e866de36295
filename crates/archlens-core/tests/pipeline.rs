//! End-to-end pipeline: wire JSON -> model -> pattern -> layout -> scene,
//! with the selection synchronizer driving highlights in both views.

use archlens_core::model::{ArchitecturePattern, Finding, Topology};
use archlens_core::selection::ScrollTarget;
use archlens_core::view::{GraphView, ViewEngine};

fn sample_topology() -> Topology {
    serde_json::from_str(
        r#"{
            "services": [
                {
                    "service_name": "ALB",
                    "category": "Network",
                    "finding_count": 1,
                    "severity_breakdown": {"CRITICAL": 0, "HIGH": 1, "MEDIUM": 0, "LOW": 0},
                    "max_severity": "HIGH"
                },
                {
                    "service_name": "EC2",
                    "category": "Compute",
                    "finding_count": 2,
                    "severity_breakdown": {"CRITICAL": 1, "HIGH": 1, "MEDIUM": 0, "LOW": 0},
                    "max_severity": "CRITICAL"
                },
                {
                    "service_name": "RDS",
                    "category": "Database",
                    "finding_count": 0,
                    "severity_breakdown": {"CRITICAL": 0, "HIGH": 0, "MEDIUM": 0, "LOW": 0},
                    "max_severity": null
                }
            ],
            "connections": [
                {"source_service": "ALB", "target_service": "EC2", "relationship_type": "ROUTES_TO"},
                {"source_service": "EC2", "target_service": "RDS", "relationship_type": "WRITES_TO"}
            ],
            "architecture_pattern": null,
            "architecture_description": "Classic web tier"
        }"#,
    )
    .expect("topology JSON parses")
}

fn sample_findings() -> Vec<Finding> {
    serde_json::from_str(
        r#"[
            {
                "id": "risk-1",
                "title": "Public EC2 instance",
                "severity": "CRITICAL",
                "pillar": "security",
                "finding": "EC2 instance has a public IP and an open security group",
                "impact": "Direct compromise of the compute tier",
                "remediation": "Move EC2 behind the ALB and restrict ingress",
                "references": ["https://docs.aws.amazon.com/ec2"]
            },
            {
                "id": "risk-2",
                "title": "Unencrypted traffic",
                "severity": "HIGH",
                "pillar": "security",
                "finding": "ALB listener uses HTTP",
                "impact": "Credentials can be intercepted",
                "remediation": "Terminate TLS at the ALB",
                "references": []
            }
        ]"#,
    )
    .expect("findings JSON parses")
}

#[test]
fn three_tier_review_renders_and_synchronizes() {
    let topology = sample_topology();
    let mut engine = ViewEngine::new();
    assert!(engine.apply(1, sample_findings(), GraphView::Architecture(topology)));

    // Pattern detected from the service set.
    assert_eq!(engine.pattern(), Some(ArchitecturePattern::ThreeTier));

    // Layout covers the full service set, stacked top-to-bottom.
    let scene = engine.scene();
    assert_eq!(scene.nodes.len(), 3);
    assert_eq!(scene.edges.len(), 2);
    assert!(scene.diagnostics.is_empty());
    let y = |id: &str| scene.nodes.iter().find(|n| n.id == id).unwrap().y;
    assert!(y("ALB") < y("EC2"));
    assert!(y("EC2") < y("RDS"));

    // Selecting a finding scrolls the graph and highlights its services.
    assert_eq!(engine.select_finding("risk-1"), Some(ScrollTarget::Graph));
    assert!(engine.is_service_highlighted("EC2"));
    assert!(engine.is_service_highlighted("ALB"));
    assert!(!engine.is_service_highlighted("RDS"));

    // Selecting a service flips the selection and highlights its findings.
    assert_eq!(engine.select_service("ALB"), Some(ScrollTarget::FindingList));
    assert!(engine.is_finding_highlighted("risk-1"));
    assert!(engine.is_finding_highlighted("risk-2"));
    assert_eq!(engine.selection().selected_finding(), None);

    // Toggle off restores the unselected state.
    assert_eq!(engine.select_service("ALB"), None);
    assert!(!engine.is_finding_highlighted("risk-1"));

    // Severity-sorted list and summary for the finding-list view.
    let sorted: Vec<&str> = engine.findings_sorted().iter().map(|f| f.id.as_str()).collect();
    assert_eq!(sorted, ["risk-1", "risk-2"]);
    let summary = engine.summary();
    assert_eq!((summary.total, summary.critical, summary.high), (2, 1, 1));
}

#[test]
fn scene_colours_follow_worst_finding() {
    let topology = sample_topology();
    let mut engine = ViewEngine::new();
    engine.apply(1, sample_findings(), GraphView::Architecture(topology));

    let scene = engine.scene();
    let colour = |id: &str| scene.nodes.iter().find(|n| n.id == id).unwrap().colour.hex();
    assert_eq!(colour("EC2"), "#DC2626");
    assert_eq!(colour("ALB"), "#EA580C");
    assert_eq!(colour("RDS"), "#7C3AED");

    let ec2 = scene.nodes.iter().find(|n| n.id == "EC2").unwrap();
    let badge = ec2.badge.expect("EC2 carries a finding badge");
    assert_eq!(badge.count, 2);
    assert_eq!(ec2.detail.severity_breakdown.unwrap().critical, 1);
}

#[test]
fn scene_is_deterministic_across_rebuilds() {
    let mut engine = ViewEngine::new();
    engine.apply(1, sample_findings(), GraphView::Architecture(sample_topology()));
    let first = serde_json::to_string(&engine.scene()).expect("scene serializes");
    let second = serde_json::to_string(&engine.scene()).expect("scene serializes");
    assert_eq!(first, second);
}
