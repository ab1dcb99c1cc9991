//! Single-resource lookups: opinion text, cluster metadata, best full text of
//! a cluster.

pub mod model;


pub use model::{ClusterDetails, FullText, FullTextOutcome, OpinionText, TextField};

use tracing::{debug, info};

use crate::api::{ApiError, Transport};
use crate::search::CaseLawClient;
use model::OpinionList;

const OPINION_LIST_PATH: &str = "opinions/";

impl<T: Transport> CaseLawClient<T> {
    /// Fetches one opinion with all its text variants.
    pub async fn fetch_opinion_text(&self, opinion_id: u64) -> Result<OpinionText, ApiError> {
        let path = format!("{OPINION_LIST_PATH}{opinion_id}/");
        let mut opinion: OpinionText = self
            .get_resource("opinion", &path, Vec::new(), self.config().request_timeout)
            .await?;

        opinion.opinion_id.get_or_insert(opinion_id);
        debug!(opinion_id, has_plain_text = opinion.plain_text.is_some(), "Fetched opinion");
        Ok(opinion)
    }

    /// Fetches case-level metadata of a cluster.
    pub async fn fetch_cluster(&self, cluster_id: u64) -> Result<ClusterDetails, ApiError> {
        let path = format!("clusters/{cluster_id}/");
        let mut cluster: ClusterDetails = self
            .get_resource("cluster", &path, Vec::new(), self.config().request_timeout)
            .await?;

        cluster.cluster_id.get_or_insert(cluster_id);
        debug!(cluster_id, sub_opinions = cluster.sub_opinions.len(), "Fetched cluster");
        Ok(cluster)
    }

    /// Returns the first non-blank text of the cluster's opinions, scanning
    /// opinions in order and fields in [`TextField::PRIORITY`] order.
    ///
    /// API errors propagate; an empty cluster or one without any text is an
    /// `Ok` miss.
    pub async fn fetch_full_text_by_cluster(
        &self,
        cluster_id: u64,
    ) -> Result<FullTextOutcome, ApiError> {
        let fields = ["id", "absolute_url", "type"]
            .into_iter()
            .chain(TextField::PRIORITY.iter().map(TextField::as_str))
            .collect::<Vec<_>>()
            .join(",");
        let params = vec![("cluster", cluster_id.to_string()), ("fields", fields)];

        let list: OpinionList = self
            .get_resource(
                "full_text",
                OPINION_LIST_PATH,
                params,
                self.config().full_text_timeout,
            )
            .await?;

        if list.results.is_empty() {
            info!(cluster_id, "Cluster has no opinions");
            return Ok(FullTextOutcome::NoOpinions { cluster_id });
        }

        for opinion in &list.results {
            if let Some((field, text)) = opinion.best_text() {
                debug!(cluster_id, opinion_id = ?opinion.opinion_id, field = field.as_str(), "Selected opinion text");
                return Ok(FullTextOutcome::Found(FullText {
                    cluster_id,
                    opinion_id: opinion.opinion_id,
                    absolute_url: opinion.absolute_url.clone(),
                    opinion_type: opinion.opinion_type.clone(),
                    text_field: field,
                    text: text.to_string(),
                    is_html: field.is_html(),
                }));
            }
        }

        info!(
            cluster_id,
            opinion_count = list.results.len(),
            "No opinion in cluster has text"
        );
        Ok(FullTextOutcome::NoTextContent {
            cluster_id,
            opinion_count: list.results.len(),
        })
    }
}
