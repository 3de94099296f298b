use std::collections::HashMap;

/// Everything the traversal engine knows about the stream it is reading.
///
/// Owned by a single engine and mutated in place by discovery, cycling,
/// iterator acquisition and record pulls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamState {
    stream_name: String,
    shards: Option<Vec<String>>,
    current_shard: Option<usize>,
    shard_iterators: HashMap<String, String>,
}

impl StreamState {
    pub fn new(stream_name: impl Into<String>) -> Self {
        Self {
            stream_name: stream_name.into(),
            ..Default::default()
        }
    }

    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    /// Discovered shard ids, or `None` before discovery completed
    pub fn shards(&self) -> Option<&[String]> {
        self.shards.as_deref()
    }

    pub fn is_discovered(&self) -> bool {
        self.shards.is_some()
    }

    pub fn shard_count(&self) -> usize {
        self.shards.as_ref().map_or(0, Vec::len)
    }

    /// Index of the selected shard, `None` before the first cycle
    pub fn current_shard_index(&self) -> Option<usize> {
        self.current_shard
    }

    pub fn current_shard_id(&self) -> Option<&str> {
        let index = self.current_shard?;
        self.shards.as_ref()?.get(index).map(String::as_str)
    }

    pub fn shard_iterator(&self, shard_id: &str) -> Option<&str> {
        self.shard_iterators.get(shard_id).map(String::as_str)
    }

    pub fn current_iterator(&self) -> Option<&str> {
        self.shard_iterator(self.current_shard_id()?)
    }

    pub(crate) fn set_shards(&mut self, shards: Vec<String>) {
        self.shards = Some(shards);
    }

    pub(crate) fn select_shard(&mut self, index: usize) {
        debug_assert!(index < self.shard_count());
        self.current_shard = Some(index);
    }

    pub(crate) fn store_iterator(&mut self, shard_id: &str, iterator: String) {
        self.shard_iterators.insert(shard_id.to_string(), iterator);
    }

    pub(crate) fn drop_iterator(&mut self, shard_id: &str) -> Option<String> {
        self.shard_iterators.remove(shard_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_undiscovered() {
        let state = StreamState::new("test-stream");
        assert_eq!(state.stream_name(), "test-stream");
        assert!(!state.is_discovered());
        assert_eq!(state.shard_count(), 0);
        assert_eq!(state.current_shard_index(), None);
        assert_eq!(state.current_shard_id(), None);
        assert_eq!(state.current_iterator(), None);
    }

    #[test]
    fn test_iterators_follow_current_shard() {
        let mut state = StreamState::new("test-stream");
        state.set_shards(vec!["shard-0".to_string(), "shard-1".to_string()]);
        state.store_iterator("shard-1", "ABCD".to_string());

        state.select_shard(0);
        assert_eq!(state.current_shard_id(), Some("shard-0"));
        assert_eq!(state.current_iterator(), None);

        state.select_shard(1);
        assert_eq!(state.current_iterator(), Some("ABCD"));

        state.store_iterator("shard-1", "EFGH".to_string());
        assert_eq!(state.shard_iterator("shard-1"), Some("EFGH"));

        assert_eq!(state.drop_iterator("shard-1").as_deref(), Some("EFGH"));
        assert_eq!(state.current_iterator(), None);
    }
}
