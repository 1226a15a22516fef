//! CrawlFilter - どの URL をクロールに入れるかの判定
//!
//! フィルタは ledger に入れる前に評価される。弾かれた URL は ledger に入らないので、
//! 別のページから再発見されたら再評価されるだけ（メモ化しない）。

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::target::CrawlTarget;

type Predicate = dyn Fn(&CrawlTarget) -> bool + Send + Sync;

/// Admission predicate applied to the seed and to every discovered link.
#[derive(Clone, Default)]
pub enum CrawlFilter {
    /// Admit everything.
    #[default]
    All,

    /// Admit a URL only if none of the substrings occur in its text.
    Exclude(HashSet<String>),

    /// Admit a URL only if its host is in the set.
    Hosts(HashSet<String>),

    /// Arbitrary predicate.
    Custom(Arc<Predicate>),
}

impl CrawlFilter {
    pub fn excluding<I, S>(substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CrawlFilter::Exclude(substrings.into_iter().map(Into::into).collect())
    }

    pub fn hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CrawlFilter::Hosts(hosts.into_iter().map(Into::into).collect())
    }

    pub fn custom(predicate: impl Fn(&CrawlTarget) -> bool + Send + Sync + 'static) -> Self {
        CrawlFilter::Custom(Arc::new(predicate))
    }

    pub fn admits(&self, target: &CrawlTarget) -> bool {
        match self {
            CrawlFilter::All => true,
            CrawlFilter::Exclude(substrings) => {
                substrings.iter().all(|s| !target.url().contains(s.as_str()))
            }
            CrawlFilter::Hosts(hosts) => hosts.contains(target.host()),
            CrawlFilter::Custom(predicate) => predicate(target),
        }
    }
}

impl fmt::Debug for CrawlFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlFilter::All => f.write_str("All"),
            CrawlFilter::Exclude(s) => f.debug_tuple("Exclude").field(s).finish(),
            CrawlFilter::Hosts(h) => f.debug_tuple("Hosts").field(h).finish(),
            CrawlFilter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
