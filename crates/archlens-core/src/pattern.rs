use std::collections::HashSet;

use crate::model::{ArchitecturePattern, Connection, Service};

const LOAD_BALANCERS: &[&str] =
    &["ALB", "NLB", "Application Load Balancer", "Network Load Balancer"];
const TIER_COMPUTE: &[&str] = &["EC2", "ECS"];
const DATABASES: &[&str] = &["RDS", "Aurora", "DynamoDB"];
const COMPUTE_POOL: &[&str] = &["EC2", "ECS", "Fargate", "Lambda"];
const MESSAGE_QUEUES: &[&str] = &["SQS", "SNS"];

/// Classify a topology into an architecture pattern.
///
/// Rules are evaluated in a fixed order and the first match wins; the order
/// is a policy choice, not incidental. Serverless outranks 3-tier even when
/// a database is present, because API Gateway + Lambda is the stronger
/// signal. `Custom` is the universal fallback, so the function is total.
///
/// Connections are accepted but unused by the current rules; they are the
/// seam for connectivity-based variants.
pub fn detect_pattern(services: &[Service], _connections: &[Connection]) -> ArchitecturePattern {
    let names: HashSet<&str> = services.iter().map(|s| s.name.as_str()).collect();

    let has_any = |candidates: &[&str]| candidates.iter().any(|c| names.contains(c));

    if names.contains("API Gateway") && names.contains("Lambda") {
        return ArchitecturePattern::Serverless;
    }

    if has_any(LOAD_BALANCERS) && has_any(TIER_COMPUTE) && has_any(DATABASES) {
        return ArchitecturePattern::ThreeTier;
    }

    let compute_count = COMPUTE_POOL.iter().filter(|c| names.contains(**c)).count();
    let has_queue = has_any(MESSAGE_QUEUES);

    if compute_count >= 3 && has_queue {
        return ArchitecturePattern::Microservices;
    }

    if (names.contains("Lambda") || compute_count > 0) && (names.contains("EventBridge") || has_queue)
    {
        return ArchitecturePattern::EventDriven;
    }

    ArchitecturePattern::Custom
}
