//! Per-batch sequence counters used to mint record identifiers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Batch;
use crate::errors::AppError;

/// Highest sequence number issued per batch label.
///
/// Counters only ever increase; a deleted record's sequence number is never
/// handed out again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchCounters(IndexMap<String, u64>);

impl BatchCounters {
    /// Highest sequence number issued for `batch`, or 0 if none.
    pub fn current(&self, batch: &str) -> u64 {
        self.0.get(batch).copied().unwrap_or(0)
    }

    /// Advance the counter for `batch` and return the new identifier.
    ///
    /// The sequence segment is zero-padded to three digits and grows past
    /// three digits once a batch exceeds 999 records. An exhausted counter is
    /// an error and is left as it is.
    pub fn mint(&mut self, batch: &Batch) -> Result<String, AppError> {
        let next = self
            .current(batch.as_str())
            .checked_add(1)
            .ok_or_else(|| {
                AppError::Conflict(format!("Batch {} has no sequence numbers left", batch))
            })?;
        self.0.insert(batch.as_str().to_string(), next);
        Ok(format_id(next, batch))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Format an identifier such as `003-2008-10`.
pub fn format_id(sequence: u64, batch: &Batch) -> String {
    format!("{:03}-{}", sequence, batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(label: &str) -> Batch {
        Batch::parse(label).unwrap()
    }

    #[test]
    fn test_mint_is_sequential_per_batch() {
        let mut counters = BatchCounters::default();
        let b = batch("2008-10");

        let ids: Vec<String> = (0..3).map(|_| counters.mint(&b).unwrap()).collect();
        assert_eq!(ids, vec!["001-2008-10", "002-2008-10", "003-2008-10"]);
        assert_eq!(counters.current("2008-10"), 3);
    }

    #[test]
    fn test_batches_are_independent() {
        let mut counters = BatchCounters::default();
        assert_eq!(counters.mint(&batch("2008-10")).unwrap(), "001-2008-10");
        assert_eq!(counters.mint(&batch("2010-12")).unwrap(), "001-2010-12");
        assert_eq!(counters.mint(&batch("2008-10")).unwrap(), "002-2008-10");
        assert_eq!(counters.len(), 2);
    }

    #[test]
    fn test_sequence_grows_past_three_digits() {
        let mut counters = BatchCounters::default();
        let b = batch("2008-10");
        for _ in 0..999 {
            counters.mint(&b).unwrap();
        }
        assert_eq!(counters.mint(&b).unwrap(), "1000-2008-10");
    }

    #[test]
    fn test_counters_serialize_as_plain_map() {
        let mut counters = BatchCounters::default();
        counters.mint(&batch("2008-10")).unwrap();
        counters.mint(&batch("2008-10")).unwrap();

        let json = serde_json::to_value(&counters).unwrap();
        assert_eq!(json, serde_json::json!({ "2008-10": 2 }));
    }

    #[test]
    fn test_exhausted_counter_is_an_error_and_stays_put() {
        let mut counters: BatchCounters =
            serde_json::from_value(serde_json::json!({ "2008-10": u64::MAX })).unwrap();

        assert!(matches!(
            counters.mint(&batch("2008-10")),
            Err(AppError::Conflict(_))
        ));
        assert_eq!(counters.current("2008-10"), u64::MAX);
        assert_eq!(counters.mint(&batch("2010-12")).unwrap(), "001-2010-12");
    }

    #[test]
    fn test_counters_wider_than_32_bits_load() {
        let mut counters: BatchCounters = serde_json::from_value(
            serde_json::json!({ "2008-10": 5_000_000_000u64, "2010-12": 7 }),
        )
        .unwrap();

        assert_eq!(counters.current("2010-12"), 7);
        assert_eq!(
            counters.mint(&batch("2008-10")).unwrap(),
            "5000000001-2008-10"
        );
    }
}
