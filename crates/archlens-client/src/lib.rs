#![forbid(unsafe_code)]

//! Read-only client for the remote review API, plus the explicit
//! architecture → generic-graph fallback chain.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use archlens_core::model::{Graph, Topology};
use archlens_core::view::GraphView;

/// Default node cap for the aggregated global graph.
pub const DEFAULT_GLOBAL_LIMIT: usize = 100;

#[derive(Debug)]
pub enum FetchError {
    /// The resource does not exist (e.g. a review created before topology
    /// extraction existed).
    NotFound { url: String },
    Status { status: u16, url: String },
    Network(String),
    Decode(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { url } => write!(f, "not found: {}", url),
            Self::Status { status, url } => write!(f, "request failed with {}: {}", status, url),
            Self::Network(msg) => write!(f, "network error: {}", msg),
            Self::Decode(msg) => write!(f, "invalid response body: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// The three read operations the review API exposes for graph data.
/// `ReviewApi` is the HTTP implementation; tests substitute stubs.
#[allow(async_fn_in_trait)]
pub trait GraphSource {
    /// Architecture topology for one analysis.
    async fn architecture_graph(&self, analysis_id: &str) -> Result<Topology, FetchError>;
    /// Knowledge graph for one analysis.
    async fn analysis_graph(&self, analysis_id: &str) -> Result<Graph, FetchError>;
    /// Aggregated knowledge graph across analyses.
    async fn global_graph(&self, limit: usize) -> Result<Graph, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReviewApi {
    base_url: String,
    http: reqwest::Client,
}

impl ReviewApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, http: reqwest::Client::new() }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound { url });
        }
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), url });
        }
        response.json::<T>().await.map_err(|err| FetchError::Decode(err.to_string()))
    }
}

impl GraphSource for ReviewApi {
    async fn architecture_graph(&self, analysis_id: &str) -> Result<Topology, FetchError> {
        self.get_json(&format!("/api/graph/{}/architecture", analysis_id)).await
    }

    async fn analysis_graph(&self, analysis_id: &str) -> Result<Graph, FetchError> {
        self.get_json(&format!("/api/graph/{}", analysis_id)).await
    }

    async fn global_graph(&self, limit: usize) -> Result<Graph, FetchError> {
        self.get_json(&format!("/api/graph/global/all?limit={}", limit)).await
    }
}

/// Load the best available view for an analysis.
///
/// With an id: try the architecture topology first; when the fetch fails
/// or returns no services, fall back to the analysis knowledge graph
/// (called exactly once). Without an id: the aggregated global graph.
/// A failing fallback propagates its error — the caller owns the retry
/// affordance. This is a two-step chain, not a race.
pub async fn load_view<S: GraphSource>(
    source: &S,
    analysis_id: Option<&str>,
    limit: usize,
) -> Result<GraphView, FetchError> {
    let Some(id) = analysis_id else {
        return Ok(GraphView::Generic(source.global_graph(limit).await?));
    };

    match source.architecture_graph(id).await {
        Ok(topology) if !topology.is_empty() => {
            debug!(services = topology.services.len(), "using architecture topology");
            Ok(GraphView::Architecture(topology))
        }
        Ok(_) => {
            warn!(analysis = id, "architecture topology empty, falling back to knowledge graph");
            Ok(GraphView::Generic(source.analysis_graph(id).await?))
        }
        Err(err) => {
            warn!(analysis = id, %err, "architecture topology unavailable, falling back to knowledge graph");
            Ok(GraphView::Generic(source.analysis_graph(id).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archlens_core::model::{GraphNode, NodeKind, NodeProperties, Service, SeverityBreakdown};
    use std::cell::{Cell, RefCell};

    struct StubSource {
        architecture: RefCell<Option<Result<Topology, FetchError>>>,
        analysis: RefCell<Option<Result<Graph, FetchError>>>,
        global: RefCell<Option<Result<Graph, FetchError>>>,
        architecture_calls: Cell<usize>,
        analysis_calls: Cell<usize>,
        global_calls: Cell<usize>,
        last_limit: Cell<usize>,
    }

    impl StubSource {
        fn new() -> Self {
            Self {
                architecture: RefCell::new(None),
                analysis: RefCell::new(None),
                global: RefCell::new(None),
                architecture_calls: Cell::new(0),
                analysis_calls: Cell::new(0),
                global_calls: Cell::new(0),
                last_limit: Cell::new(0),
            }
        }

        fn with_architecture(self, result: Result<Topology, FetchError>) -> Self {
            *self.architecture.borrow_mut() = Some(result);
            self
        }

        fn with_analysis(self, result: Result<Graph, FetchError>) -> Self {
            *self.analysis.borrow_mut() = Some(result);
            self
        }

        fn with_global(self, result: Result<Graph, FetchError>) -> Self {
            *self.global.borrow_mut() = Some(result);
            self
        }
    }

    impl GraphSource for StubSource {
        async fn architecture_graph(&self, _analysis_id: &str) -> Result<Topology, FetchError> {
            self.architecture_calls.set(self.architecture_calls.get() + 1);
            self.architecture.borrow_mut().take().expect("unexpected architecture fetch")
        }

        async fn analysis_graph(&self, _analysis_id: &str) -> Result<Graph, FetchError> {
            self.analysis_calls.set(self.analysis_calls.get() + 1);
            self.analysis.borrow_mut().take().expect("unexpected analysis fetch")
        }

        async fn global_graph(&self, limit: usize) -> Result<Graph, FetchError> {
            self.global_calls.set(self.global_calls.get() + 1);
            self.last_limit.set(limit);
            self.global.borrow_mut().take().expect("unexpected global fetch")
        }
    }

    fn topology_with_services(count: usize) -> Topology {
        let services = (0..count)
            .map(|i| Service {
                name: format!("svc-{}", i),
                category: "Compute".into(),
                finding_count: 0,
                severity_breakdown: SeverityBreakdown::default(),
                max_severity: None,
            })
            .collect();
        Topology { services, connections: vec![], pattern: None, description: None }
    }

    fn graph_with_one_node() -> Graph {
        Graph {
            nodes: vec![GraphNode {
                id: "analysis-1".into(),
                label: "Review".into(),
                kind: NodeKind::Analysis,
                properties: NodeProperties::default(),
            }],
            edges: vec![],
        }
    }

    #[tokio::test]
    async fn topology_success_uses_architecture_view() {
        let source = StubSource::new().with_architecture(Ok(topology_with_services(2)));
        let view = load_view(&source, Some("a1"), DEFAULT_GLOBAL_LIMIT).await.unwrap();
        assert!(matches!(view, GraphView::Architecture(_)));
        assert_eq!(source.architecture_calls.get(), 1);
        assert_eq!(source.analysis_calls.get(), 0);
        assert_eq!(source.global_calls.get(), 0);
    }

    #[tokio::test]
    async fn topology_failure_falls_back_to_analysis_graph_once() {
        let source = StubSource::new()
            .with_architecture(Err(FetchError::NotFound { url: "arch".into() }))
            .with_analysis(Ok(graph_with_one_node()));
        let view = load_view(&source, Some("a1"), DEFAULT_GLOBAL_LIMIT).await.unwrap();
        assert!(matches!(view, GraphView::Generic(_)));
        assert_eq!(source.architecture_calls.get(), 1);
        assert_eq!(source.analysis_calls.get(), 1);
    }

    #[tokio::test]
    async fn empty_topology_takes_the_same_fallback_path() {
        let source = StubSource::new()
            .with_architecture(Ok(topology_with_services(0)))
            .with_analysis(Ok(graph_with_one_node()));
        let view = load_view(&source, Some("a1"), DEFAULT_GLOBAL_LIMIT).await.unwrap();
        assert!(matches!(view, GraphView::Generic(_)));
        assert_eq!(source.analysis_calls.get(), 1);
    }

    #[tokio::test]
    async fn fallback_failure_propagates() {
        let source = StubSource::new()
            .with_architecture(Err(FetchError::Network("timeout".into())))
            .with_analysis(Err(FetchError::Status { status: 500, url: "graph".into() }));
        let err = load_view(&source, Some("a1"), DEFAULT_GLOBAL_LIMIT).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn global_mode_queries_the_global_graph() {
        let source = StubSource::new().with_global(Ok(graph_with_one_node()));
        let view = load_view(&source, None, 25).await.unwrap();
        assert!(matches!(view, GraphView::Generic(_)));
        assert_eq!(source.global_calls.get(), 1);
        assert_eq!(source.last_limit.get(), 25);
        assert_eq!(source.architecture_calls.get(), 0);
    }
}
