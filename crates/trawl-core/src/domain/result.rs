//! CrawlResult - 最終 ledger から作る不変スナップショット

use std::collections::HashMap;

use serde::Serialize;

use super::errors::TransportError;
use super::outcome::Outcome;

/// Final partition of a crawl into downloaded URLs and failed ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    /// Successfully fetched URLs, in ledger insertion order.
    pub downloaded: Vec<String>,

    /// Failed URLs with the transport error that ended them.
    pub errors: HashMap<String, TransportError>,
}

/// Counts for logging and CLI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub downloaded: usize,
    pub failed: usize,
}

impl CrawlResult {
    /// Partition ledger entries. `Pending` entries can only remain after an
    /// aborted crawl and are left out.
    pub fn from_ledger(entries: Vec<(String, Outcome)>) -> Self {
        let mut result = CrawlResult::default();
        for (url, outcome) in entries {
            match outcome {
                Outcome::Succeeded => result.downloaded.push(url),
                Outcome::Failed(error) => {
                    result.errors.insert(url, error);
                }
                Outcome::Pending => {}
            }
        }
        result
    }

    pub fn summary(&self) -> CrawlSummary {
        CrawlSummary {
            downloaded: self.downloaded.len(),
            failed: self.errors.len(),
        }
    }

    /// Every URL in the result, downloaded first.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.downloaded
            .iter()
            .map(String::as_str)
            .chain(self.errors.keys().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_by_outcome() {
        let err = TransportError::new("http://b.com/", "404");
        let entries = vec![
            ("http://a.com/".to_string(), Outcome::Succeeded),
            ("http://b.com/".to_string(), Outcome::Failed(err.clone())),
            ("http://c.com/".to_string(), Outcome::Succeeded),
            ("http://d.com/".to_string(), Outcome::Pending),
        ];

        let result = CrawlResult::from_ledger(entries);

        assert_eq!(result.downloaded, vec!["http://a.com/", "http://c.com/"]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors["http://b.com/"], err);
        assert_eq!(
            result.summary(),
            CrawlSummary {
                downloaded: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn serializes_for_reporting() {
        let result = CrawlResult::from_ledger(vec![(
            "http://a.com/".to_string(),
            Outcome::Succeeded,
        )]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["downloaded"][0], "http://a.com/");
        assert!(json["errors"].as_object().unwrap().is_empty());
    }
}
