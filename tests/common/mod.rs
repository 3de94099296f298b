// tests/common/mod.rs
use kinesis_shard_reader::test::mocks::MockKinesisClient;
use kinesis_shard_reader::test::TestUtils;
use kinesis_shard_reader::{ReaderConfig, ShardReader};

pub fn create_test_config() -> ReaderConfig {
    TestUtils::init_logging();
    TestUtils::test_config("test-stream")
}

pub struct TestContext {
    pub config: ReaderConfig,
    pub client: MockKinesisClient,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            config: create_test_config(),
            client: MockKinesisClient::new(),
        }
    }

    /// Two shards, iterator `ABCD`, one batch of three records
    pub async fn setup_basic_mocks(&self) {
        self.client.mock_shards(&["shard-0", "shard-1"], false).await;
        self.client.mock_get_iterator(Ok("ABCD".to_string())).await;
        self.client
            .mock_records(TestUtils::create_test_records(3), Some("EFGH"))
            .await;
    }

    pub fn reader(&self) -> anyhow::Result<ShardReader<MockKinesisClient>> {
        let (reader, _monitoring_rx) = ShardReader::new(self.client.clone(), self.config.clone())?;
        Ok(reader)
    }
}
