//! Relevance filter: keeps the candidates that appear on the user's page.

use std::sync::Arc;

use crate::fetch::PageFetcher;

use super::{CandidateKeywords, PageText};

/// Filters candidate keywords against the visible text of a web page.
#[derive(Clone)]
pub struct RelevanceFilter {
    fetcher: Arc<dyn PageFetcher>,
}

impl RelevanceFilter {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Candidates that occur as a whole word on the page at `url`.
    ///
    /// No URL, a blank or malformed URL, and any fetch failure all produce
    /// an empty list; failures are logged, never returned.
    pub async fn filter_by_url(
        &self,
        candidates: &CandidateKeywords,
        url: Option<&str>,
    ) -> Vec<String> {
        let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            return Vec::new();
        };

        if !is_fetchable_url(url) {
            tracing::debug!(url, "Skipping keyword filtering: not an http(s) URL");
            return Vec::new();
        }

        match self.fetcher.fetch_visible_text(url).await {
            Ok(text) => {
                let page = PageText::new(&text);
                let relevant = relevant_keywords(candidates, &page);
                tracing::info!(
                    url,
                    candidates = candidates.len(),
                    relevant = relevant.len(),
                    "Filtered keywords against page"
                );
                relevant
            }
            Err(e) => {
                tracing::error!(url, "Error fetching page for keyword filtering: {}", e);
                Vec::new()
            }
        }
    }
}

/// Candidates whose lowercased form equals a token of `page`, in candidate order.
pub fn relevant_keywords(candidates: &CandidateKeywords, page: &PageText) -> Vec<String> {
    let tokens = page.tokens();
    candidates
        .iter()
        .filter(|candidate| tokens.contains(candidate.to_lowercase().as_str()))
        .cloned()
        .collect()
}

/// Whether `url` parses as an absolute http or https URL.
pub fn is_fetchable_url(url: &str) -> bool {
    reqwest::Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.has_host())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::FetchError;

    /// Serves fixed text and counts calls.
    struct FixedPage {
        text: String,
        calls: AtomicUsize,
    }

    impl FixedPage {
        fn new(text: &str) -> Arc<Self> {
            Arc::new(Self {
                text: text.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PageFetcher for FixedPage {
        async fn fetch_visible_text(&self, _url: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.clone())
        }
    }

    struct DownPage;

    #[async_trait]
    impl PageFetcher for DownPage {
        async fn fetch_visible_text(&self, url: &str) -> Result<String, FetchError> {
            Err(FetchError::Status {
                url: url.to_string(),
                status: 503,
            })
        }
    }

    fn set(items: &[&str]) -> CandidateKeywords {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn whole_word_matching_only() {
        let page = PageText::new("we offer seo and marketing services");
        let result = relevant_keywords(&set(&["seo", "marketingservices", "market"]), &page);
        assert_eq!(result, vec!["seo"]);
    }

    #[test]
    fn matching_ignores_candidate_case() {
        let page = PageText::new("Best SEO in town");
        assert_eq!(relevant_keywords(&set(&["SEO"]), &page), vec!["SEO"]);
    }

    #[test]
    fn multi_word_candidates_never_match() {
        let page = PageText::new("gross revenue grew");
        assert!(relevant_keywords(&set(&["gross revenue"]), &page).is_empty());
    }

    #[test]
    fn output_follows_candidate_order() {
        let page = PageText::new("sale bakery marketing");
        let result = relevant_keywords(&set(&["sale", "bakery", "marketing"]), &page);
        assert_eq!(result, vec!["bakery", "marketing", "sale"]);
    }

    #[test]
    fn fetchable_urls() {
        assert!(is_fetchable_url("https://example.com"));
        assert!(is_fetchable_url("http://example.com/about?x=1"));
        assert!(!is_fetchable_url("example.com"));
        assert!(!is_fetchable_url("ftp://example.com"));
        assert!(!is_fetchable_url("no"));
        assert!(!is_fetchable_url("http://"));
    }

    #[tokio::test]
    async fn no_url_means_no_fetch() {
        let page = FixedPage::new("seo");
        let filter = RelevanceFilter::new(page.clone());
        assert!(filter.filter_by_url(&set(&["seo"]), None).await.is_empty());
        assert!(filter.filter_by_url(&set(&["seo"]), Some("  ")).await.is_empty());
        assert_eq!(page.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_url_means_no_fetch() {
        let page = FixedPage::new("seo");
        let filter = RelevanceFilter::new(page.clone());
        assert!(filter.filter_by_url(&set(&["seo"]), Some("my site")).await.is_empty());
        assert_eq!(page.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetch_failure_degrades_to_empty() {
        let filter = RelevanceFilter::new(Arc::new(DownPage));
        let result = filter
            .filter_by_url(&set(&["seo", "bakery"]), Some("https://example.com"))
            .await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn same_text_same_output() {
        let page = FixedPage::new("Fresh bread, cakes and a weekly SALE at our bakery.");
        let filter = RelevanceFilter::new(page.clone());
        let candidates = set(&["bakery", "bakeshop", "sales", "sale", "marketing"]);

        let first = filter.filter_by_url(&candidates, Some("https://bakery.test")).await;
        let second = filter.filter_by_url(&candidates, Some("https://bakery.test")).await;

        assert_eq!(first, vec!["bakery", "sale"]);
        assert_eq!(first, second);
        assert_eq!(page.calls.load(Ordering::SeqCst), 2);
    }
}
