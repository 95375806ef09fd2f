use crate::shard::ShardSummary;

/// Outcome of a conversion run
#[derive(Debug, Clone, Default)]
pub struct ConversionStats {
    pub records: u64,
    pub shards: Vec<ShardSummary>,
    pub estimated_records: Option<u64>,
}

impl ConversionStats {
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub fn rows_written(&self) -> u64 {
        self.shards.iter().map(|s| s.rows).sum()
    }

    /// Absolute gap between the advisory estimate and the real count.
    pub fn estimate_error(&self) -> Option<u64> {
        self.estimated_records
            .map(|estimate| estimate.abs_diff(self.records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn shard(index: u32, rows: u64) -> ShardSummary {
        ShardSummary {
            index,
            path: PathBuf::from(format!("repfeed_{}.csv", index)),
            rows,
        }
    }

    #[test]
    fn default_values_are_zero() {
        let stats = ConversionStats::default();
        assert_eq!(stats.records(), 0);
        assert_eq!(stats.shard_count(), 0);
        assert_eq!(stats.rows_written(), 0);
        assert_eq!(stats.estimate_error(), None);
    }

    #[test]
    fn rows_written_sums_shards() {
        let stats = ConversionStats {
            records: 7,
            shards: vec![shard(1, 3), shard(2, 3), shard(3, 1)],
            estimated_records: None,
        };
        assert_eq!(stats.shard_count(), 3);
        assert_eq!(stats.rows_written(), 7);
    }

    #[test]
    fn estimate_error_is_absolute() {
        let mut stats = ConversionStats {
            records: 100,
            estimated_records: Some(90),
            ..Default::default()
        };
        assert_eq!(stats.estimate_error(), Some(10));
        stats.estimated_records = Some(130);
        assert_eq!(stats.estimate_error(), Some(30));
    }
}
