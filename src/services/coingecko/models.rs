use serde_json::Value;

/// One market entry exactly as the API returned it. Never interpreted.
pub type CoinRecord = Value;

/// The records returned by one fetch, in response order.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionBatch {
    pub records: Vec<CoinRecord>,
}

impl IngestionBatch {
    pub fn new(records: Vec<CoinRecord>) -> Self {
        Self { records }
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Compact JSON array of the records, keys in their original order.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_preserves_key_order() {
        let records: Vec<CoinRecord> =
            serde_json::from_str(r#"[{"symbol":"btc","id":"bitcoin","current_price":50000.5}]"#)
                .unwrap();
        let batch = IngestionBatch::new(records);

        assert_eq!(batch.count(), 1);
        assert_eq!(
            batch.to_payload().unwrap(),
            r#"[{"symbol":"btc","id":"bitcoin","current_price":50000.5}]"#
        );
    }

    #[test]
    fn test_empty_batch() {
        let batch = IngestionBatch::new(vec![]);
        assert!(batch.is_empty());
        assert_eq!(batch.to_payload().unwrap(), "[]");
    }
}
