use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::BankingError;

/// Upper bound on the number of pages fetched by a single paginated call.
const MAX_PAGES: usize = 100;

/// A monetary amount or quantity. Values are kept as the decimal strings the API sends.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AmountValue {
    pub value: String,
    pub unit: String,
}

impl std::fmt::Display for AmountValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.unit.is_empty() {
            f.write_str(&self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}

/// Position of a page within the full result set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paging {
    /// Index of the first entry of the page.
    #[serde(default, deserialize_with = "crate::de::count")]
    pub index: u64,
    /// Total number of entries on the server.
    #[serde(default, deserialize_with = "crate::de::count")]
    pub matches: u64,
}

/// One page of a list endpoint.
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub paging: Paging,
    #[serde(default)]
    pub values: Vec<T>,
}

/// The `paging-first` and `paging-count` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Index of the first entry to return.
    pub first: u64,
    /// Maximum number of entries to return.
    pub count: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            first: 0,
            count: 20,
        }
    }
}

impl PageRequest {
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("paging-first", self.first.to_string()),
            ("paging-count", self.count.to_string()),
        ]
    }
}

/// Fetch consecutive pages starting at `start` and concatenate their values.
///
/// Stops when a page is empty, when all `matches` have been retrieved, when `reached_end` returns
/// true for the values of the last page, or after [`MAX_PAGES`] pages. The returned paging holds
/// the start index and the last reported number of matches.
pub(crate) async fn paginate<T, F, Fut>(
    start: PageRequest,
    mut fetch: F,
    mut reached_end: impl FnMut(&[T]) -> bool,
) -> Result<Page<T>, BankingError>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, BankingError>>,
{
    let mut values = Vec::new();
    let mut matches = 0;

    for page_number in 0..MAX_PAGES {
        let request = PageRequest {
            first: start.first + values.len() as u64,
            count: start.count,
        };
        let page = fetch(request).await?;
        debug!(
            page_number,
            first = request.first,
            received = page.values.len(),
            matches = page.paging.matches,
            "fetched page"
        );

        if page.values.is_empty() {
            break;
        }

        matches = page.paging.matches;
        let end = reached_end(&page.values);
        values.extend(page.values);

        if end || matches <= start.first + values.len() as u64 {
            break;
        }

        if page_number + 1 == MAX_PAGES {
            warn!(retrieved = values.len(), matches, "stopping after {MAX_PAGES} pages");
        }
    }

    Ok(Page {
        paging: Paging {
            index: start.first,
            matches,
        },
        values,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn page(index: u64, len: usize, matches: u64) -> Page<u64> {
        Page {
            paging: Paging { index, matches },
            values: (index..index + len as u64).collect(),
        }
    }

    #[tokio::test]
    async fn stops_when_all_matches_are_retrieved() {
        let requests = Mutex::new(Vec::new());
        let sizes = [20, 20, 5];

        let result = paginate(
            PageRequest::default(),
            |request| {
                let mut requests = requests.lock().unwrap();
                let len = sizes[requests.len()];
                requests.push(request);
                async move { Ok(page(request.first, len, 45)) }
            },
            |_| false,
        )
        .await
        .unwrap();

        assert_eq!(result.values.len(), 45);
        assert_eq!(result.paging.matches, 45);
        assert_eq!(
            requests.into_inner().unwrap(),
            vec![
                PageRequest { first: 0, count: 20 },
                PageRequest { first: 20, count: 20 },
                PageRequest { first: 40, count: 20 },
            ]
        );
    }

    #[tokio::test]
    async fn stops_on_empty_page() {
        let mut calls = 0;

        let result = paginate(
            PageRequest::default(),
            |request| {
                calls += 1;
                let len = if request.first == 0 { 20 } else { 0 };
                async move { Ok(page(request.first, len, 1000)) }
            },
            |_| false,
        )
        .await
        .unwrap();

        assert_eq!(calls, 2);
        assert_eq!(result.values.len(), 20);
    }

    #[tokio::test]
    async fn stops_when_caller_reaches_end() {
        let mut calls = 0;

        let result = paginate(
            PageRequest::default(),
            |request| {
                calls += 1;
                async move { Ok(page(request.first, 20, 1000)) }
            },
            |values: &[u64]| values.contains(&25),
        )
        .await
        .unwrap();

        assert_eq!(calls, 2);
        assert_eq!(result.values.len(), 40);
    }

    #[tokio::test]
    async fn stops_after_page_limit() {
        let mut calls = 0;

        paginate(
            PageRequest { first: 0, count: 1 },
            |request| {
                calls += 1;
                async move { Ok(page(request.first, 1, u64::MAX)) }
            },
            |_| false,
        )
        .await
        .unwrap();

        assert_eq!(calls, MAX_PAGES);
    }

    #[tokio::test]
    async fn errors_are_propagated() {
        let result: Result<Page<u64>, _> = paginate(
            PageRequest::default(),
            |_| async { Err(BankingError::NotAuthenticated(comdirect_core::NotAuthenticatedError)) },
            |_| false,
        )
        .await;

        assert!(matches!(result, Err(BankingError::NotAuthenticated(_))));
    }

    #[test]
    fn query_uses_paging_keys() {
        assert_eq!(
            PageRequest { first: 40, count: 20 }.query(),
            vec![
                ("paging-first", "40".to_string()),
                ("paging-count", "20".to_string())
            ]
        );
    }
}
