use std::collections::HashMap;

use crate::model::{Finding, Service};

/// Derived service↔finding association, recomputed on every data change.
///
/// A finding affects a service when the finding's free text mentions the
/// service name verbatim. Both directions come out of the same pass, so the
/// two maps are always symmetric duals of one relation.
#[derive(Debug, Default, Clone)]
pub struct CrossReference {
    service_to_findings: HashMap<String, Vec<String>>,
    finding_to_services: HashMap<String, Vec<String>>,
}

impl CrossReference {
    /// Match rule: case-sensitive substring containment of the service name
    /// in `finding + " " + impact + " " + remediation`. Best-effort by
    /// contract; names not quoted verbatim are missed, and short names can
    /// collide inside longer tokens.
    pub fn build(services: &[Service], findings: &[Finding]) -> Self {
        let mut service_to_findings: HashMap<String, Vec<String>> = HashMap::new();
        let mut finding_to_services: HashMap<String, Vec<String>> = HashMap::new();

        for finding in findings {
            let text =
                format!("{} {} {}", finding.finding, finding.impact, finding.remediation);
            for service in services {
                if text.contains(&service.name) {
                    service_to_findings
                        .entry(service.name.clone())
                        .or_default()
                        .push(finding.id.clone());
                    finding_to_services
                        .entry(finding.id.clone())
                        .or_default()
                        .push(service.name.clone());
                }
            }
        }

        Self { service_to_findings, finding_to_services }
    }

    /// Finding ids affecting `service`. Empty for unknown names.
    pub fn findings_for(&self, service: &str) -> &[String] {
        self.service_to_findings.get(service).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Service names affected by `finding`. Empty for unknown ids.
    pub fn services_for(&self, finding: &str) -> &[String] {
        self.finding_to_services.get(finding).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn affects(&self, finding: &str, service: &str) -> bool {
        self.services_for(finding).iter().any(|s| s == service)
    }
}
