//! Shard discovery

use super::{ShardTraversal, TraversalPhase};
use crate::{client::KinesisClientTrait, error::Result, monitoring::ReaderEvent};
use tracing::{info, trace, warn};

impl<C> ShardTraversal<C>
where
    C: KinesisClientTrait,
{
    /// Fetch the complete shard list of the stream.
    ///
    /// Pages are requested until the service reports no more shards, each one
    /// starting after the last shard id already collected. The list is only
    /// stored once every page arrived: a failure part way through leaves the
    /// stream undiscovered, and the next attempt starts again from the first
    /// page.
    pub async fn discover_shards(&mut self) -> Result<()> {
        let mut shards: Vec<String> = Vec::new();
        let mut pages = 0usize;

        loop {
            let start_after = shards.last().map(String::as_str);
            let page = self
                .client
                .describe_stream(self.state.stream_name(), start_after)
                .await
                .inspect_err(|e| {
                    warn!(
                        stream = %self.state.stream_name(),
                        page = pages + 1,
                        error = %e,
                        "Failed to describe stream"
                    );
                })?;
            pages += 1;

            trace!(
                stream = %self.state.stream_name(),
                page = pages,
                shards = page.shard_ids.len(),
                has_more = page.has_more_shards,
                "Received shard page"
            );

            let page_was_empty = page.shard_ids.is_empty();
            shards.extend(page.shard_ids);

            if !page.has_more_shards {
                break;
            }
            if page_was_empty {
                warn!(
                    stream = %self.state.stream_name(),
                    page = pages,
                    "Shard page reported more shards but was empty, stopping pagination"
                );
                break;
            }
        }

        info!(
            stream = %self.state.stream_name(),
            shard_count = shards.len(),
            pages,
            "Discovered stream shards"
        );

        self.send_event(ReaderEvent::shards_discovered(
            self.state.stream_name(),
            shards.len(),
            pages,
        ));
        self.state.set_shards(shards);
        self.phase = TraversalPhase::Discovered;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ReaderError, TransportError};
    use crate::test::mocks::{MockCall, MockKinesisClient};
    use crate::test::TestUtils;
    use pretty_assertions::assert_eq;

    fn traversal(client: &MockKinesisClient) -> ShardTraversal<MockKinesisClient> {
        ShardTraversal::new(client.clone(), TestUtils::test_config("test-stream"), None)
    }

    #[tokio::test]
    async fn test_single_page_sets_shard_list() -> anyhow::Result<()> {
        let client = MockKinesisClient::new();
        client
            .mock_shards(&["shard-0", "shard-1", "shard-2"], false)
            .await;

        let mut traversal = traversal(&client);
        traversal.discover_shards().await?;

        assert_eq!(
            traversal.state().shards(),
            Some(&["shard-0".to_string(), "shard-1".to_string(), "shard-2".to_string()][..])
        );
        assert_eq!(traversal.phase(), TraversalPhase::Discovered);
        assert_eq!(
            client.calls(),
            vec![MockCall::DescribeStream {
                stream_name: "test-stream".to_string(),
                exclusive_start_shard_id: None,
            }]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_pages_are_accumulated_in_order() -> anyhow::Result<()> {
        let client = MockKinesisClient::new();
        client
            .mock_shards(&["shard-0", "shard-1", "shard-2"], true)
            .await;
        client
            .mock_shards(&["shard-3", "shard-4", "shard-5"], false)
            .await;

        let mut traversal = traversal(&client);
        traversal.discover_shards().await?;

        let expected: Vec<String> = (0..6).map(|i| format!("shard-{}", i)).collect();
        assert_eq!(traversal.state().shards(), Some(expected.as_slice()));
        assert_eq!(
            client.calls()[1],
            MockCall::DescribeStream {
                stream_name: "test-stream".to_string(),
                exclusive_start_shard_id: Some("shard-2".to_string()),
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_failure_leaves_stream_undiscovered() -> anyhow::Result<()> {
        let client = MockKinesisClient::new();
        client.mock_shards(&["shard-0"], true).await;
        client
            .mock_describe_stream(Err(TransportError::ResourceNotFound(
                "test-stream".to_string(),
            )))
            .await;

        let mut traversal = traversal(&client);
        let err = traversal.discover_shards().await.unwrap_err();

        assert!(matches!(
            err,
            ReaderError::Transport(TransportError::ResourceNotFound(_))
        ));
        assert!(!traversal.state().is_discovered());
        assert_eq!(traversal.phase(), TraversalPhase::Undiscovered);

        client.mock_shards(&["shard-0", "shard-1"], false).await;
        traversal.discover_shards().await?;
        assert_eq!(traversal.state().shard_count(), 2);
        assert_eq!(
            client.calls()[2],
            MockCall::DescribeStream {
                stream_name: "test-stream".to_string(),
                exclusive_start_shard_id: None,
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_page_with_more_shards_stops() -> anyhow::Result<()> {
        let client = MockKinesisClient::new();
        client.mock_shards(&["shard-0"], true).await;
        client.mock_shards(&[], true).await;
        client.mock_shards(&["never-read"], false).await;

        let mut traversal = traversal(&client);
        traversal.discover_shards().await?;

        assert_eq!(traversal.state().shards(), Some(&["shard-0".to_string()][..]));
        assert_eq!(client.describe_stream_count(), 2);
        Ok(())
    }
}
