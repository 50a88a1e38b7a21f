//! Context retrieval: concurrent documentation fan-out.
//!
//! One node queries every configured documentation source in parallel for
//! the components discovered in the design tree, then fans the results
//! back into the per-platform slots. Failure is contained at two levels:
//! a single component whose doc fetch fails is omitted from that source's
//! blob, and a source that fails entirely degrades to a fixed placeholder
//! so generation proceeds with reduced context. Neither aborts the run,
//! and one source's failure never touches the other's result.

use async_trait::async_trait;
use futures_util::future::join_all;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::clients::{DocsClient, DocsError};
use crate::node::{Node, NodeContext, NodeError, NodePartial};
use crate::state::{ExecutionState, SlotUpdate};
use crate::status::{StatusEvent, StatusScope};
use crate::types::Platform;

/// Slot content when a whole documentation source fails.
pub const DOCS_ERROR_PLACEHOLDER: &str = "Error retrieving docs.";

/// Documentation gathered from one source.
struct FetchedDocs {
    text: String,
    missing: Vec<String>,
}

/// Node that retrieves component documentation for every configured
/// platform source.
pub struct ContextRetrieval {
    sources: FxHashMap<Platform, Arc<dyn DocsClient>>,
}

impl ContextRetrieval {
    pub fn new(sources: FxHashMap<Platform, Arc<dyn DocsClient>>) -> Self {
        Self { sources }
    }

    /// Fetch docs from one source for the requested component names.
    ///
    /// The source's full component list is intersected with the request;
    /// unknown names are reported back as `missing`. A per-name fetch
    /// failure drops that name with a log line, nothing more.
    async fn fetch_docs(
        client: &Arc<dyn DocsClient>,
        requested: &BTreeSet<String>,
        platform: Platform,
    ) -> Result<FetchedDocs, DocsError> {
        let known = client.list_components().await?;

        let mut missing: Vec<String> = Vec::new();
        let mut sections: Vec<String> = Vec::new();
        for name in requested {
            if !known.contains(name) {
                missing.push(name.clone());
                continue;
            }
            match client.get_doc(name).await {
                Ok(doc) => sections.push(format!("### {name}\n{doc}")),
                Err(err) => {
                    tracing::warn!(
                        component = %name,
                        %platform,
                        error = %err,
                        "doc fetch failed; omitting component"
                    );
                }
            }
        }

        Ok(FetchedDocs {
            text: sections.join("\n"),
            missing,
        })
    }
}

#[async_trait]
impl Node for ContextRetrieval {
    async fn run(
        &self,
        snapshot: ExecutionState,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        let requested: BTreeSet<String> = snapshot
            .design_tree
            .as_ref()
            .map(|tree| tree.component_names())
            .unwrap_or_default();
        tracing::debug!(count = requested.len(), "components discovered in design tree");

        // Query all configured sources concurrently; an unconfigured
        // platform simply keeps its docs slot absent.
        let fetches = self.sources.iter().map(|(platform, client)| {
            let requested = &requested;
            async move { (*platform, Self::fetch_docs(client, requested, *platform).await) }
        });
        let results = join_all(fetches).await;

        let mut events: Vec<StatusEvent> = Vec::new();
        let mut partial = NodePartial::new();

        for (platform, result) in results {
            match result {
                Ok(fetched) => {
                    if !fetched.missing.is_empty() {
                        let warning = StatusEvent::warning(
                            platform.scope(),
                            format!(
                                "{} components not found in the {} documentation source",
                                fetched.missing.len(),
                                platform
                            ),
                        )
                        .with_details(serde_json::json!({"missing": fetched.missing}));
                        ctx.report(&warning).await;
                        events.push(warning);
                    }
                    partial = partial.with_slot(platform, SlotUpdate::new().docs(fetched.text));
                }
                Err(err) => {
                    tracing::error!(%platform, error = %err, "documentation source failed");
                    let event = StatusEvent::error(
                        platform.scope(),
                        format!("{} documentation retrieval failed: {err}", platform.title()),
                    );
                    ctx.report(&event).await;
                    events.push(event);
                    partial =
                        partial.with_slot(platform, SlotUpdate::new().docs(DOCS_ERROR_PLACEHOLDER));
                }
            }
        }

        let done = StatusEvent::success(
            StatusScope::Common,
            format!(
                "Documentation retrieved from {} source(s)",
                self.sources.len()
            ),
        );
        ctx.report(&done).await;
        events.push(done);

        Ok(partial.with_status(events))
    }
}
