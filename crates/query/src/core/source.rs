//! Record sources.
//!
//! A [`RecordSource`] answers a [`RemoteQuery`] with one page of records. A
//! backend service implements it by sending the criteria to the server, which
//! filters and paginates; the page it returns is used as-is and is never
//! filtered again on the client.
//!
//! [`InMemorySource`] is the mock-data service: it runs the same pipeline
//! locally over a fixed collection, optionally after an artificial delay.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FetchError;
use crate::search::{PredicateBuilder, filter_records};
use crate::types::{EntityProfile, FilterCriteria, Record, RemotePage, paginate};

/// A list query pushed to a record source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteQuery {
    /// Entity being listed.
    pub entity: String,

    /// Active filter selections.
    pub criteria: FilterCriteria,

    /// Committed search term.
    pub search: String,

    /// Zero-based page index.
    pub page: usize,

    /// Rows per page.
    pub page_size: usize,
}

impl RemoteQuery {
    /// Creates a query for the first page with no criteria.
    pub fn new(entity: impl Into<String>, page_size: usize) -> Self {
        Self {
            entity: entity.into(),
            criteria: FilterCriteria::new(),
            search: String::new(),
            page: 0,
            page_size,
        }
    }

    /// Sets the criteria.
    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Sets the search term.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Sets the page index.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }
}

/// Produces pages of records for a query.
#[async_trait]
pub trait RecordSource<R>: Send + Sync {
    /// Fetches the page described by `query`.
    ///
    /// # Errors
    ///
    /// * `FetchError::Source` - The backend could not answer
    /// * `FetchError::Decode` - The backend answered with an unreadable payload
    async fn fetch(&self, query: &RemoteQuery) -> Result<RemotePage<R>, FetchError>;
}

/// Decodes a JSON array of records.
pub fn decode_records<R: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<R>, FetchError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// A record source over a fixed in-memory collection.
pub struct InMemorySource<R> {
    profile: EntityProfile,
    records: Arc<[R]>,
    latency: Option<Duration>,
    as_of: NaiveDate,
}

impl<R> InMemorySource<R> {
    /// Creates a source answering immediately.
    pub fn new(profile: EntityProfile, records: impl Into<Arc<[R]>>) -> Self {
        Self {
            profile,
            records: records.into(),
            latency: None,
            as_of: Utc::now().date_naive(),
        }
    }

    /// Delays every answer, the way a network round trip would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Sets the reference date for age ranges.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    /// The records served.
    pub fn records(&self) -> &Arc<[R]> {
        &self.records
    }
}

#[async_trait]
impl<R> RecordSource<R> for InMemorySource<R>
where
    R: Record + Clone + Send + Sync + 'static,
{
    async fn fetch(&self, query: &RemoteQuery) -> Result<RemotePage<R>, FetchError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if query.page_size == 0 {
            return Err(FetchError::source("page size must be positive"));
        }

        let predicate = PredicateBuilder::new(&self.profile)
            .with_as_of(self.as_of)
            .build(&query.criteria, &query.search);
        let matched = filter_records(&self.records, &predicate);
        let requested = i64::try_from(query.page).unwrap_or(i64::MAX);
        let page = paginate(matched, query.page_size, requested);

        debug!(
            entity = %self.profile.entity,
            matched = page.state.total_items,
            page = page.state.current_page,
            "in-memory fetch"
        );

        Ok(RemotePage::from_page(page.map(R::clone)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dimension, DimensionKind, FilterValue, JsonRecord};
    use serde_json::json;

    fn source() -> InMemorySource<JsonRecord> {
        let profile = EntityProfile::new("medicines")
            .searchable(["name"])
            .with_dimension(Dimension::on("category", DimensionKind::Exact));
        let records = decode_records::<JsonRecord>(
            json!([
                {"id": "m1", "name": "Amoxicillin", "category": "Antibiotic"},
                {"id": "m2", "name": "Ibuprofen", "category": "Analgesic"},
                {"id": "m3", "name": "Azithromycin", "category": "Antibiotic"},
                {"id": "m4", "name": "Paracetamol", "category": "Analgesic"}
            ])
            .to_string()
            .as_bytes(),
        )
        .unwrap();
        InMemorySource::new(profile, records)
    }

    #[tokio::test]
    async fn test_in_memory_fetch_filters_and_pages() {
        let source = source();
        let query = RemoteQuery::new("medicines", 1)
            .with_criteria(FilterCriteria::new().with("category", FilterValue::exact("antibiotic")))
            .with_page(1);

        let page = source.fetch(&query).await.unwrap();
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.data[0].id(), "m3");
    }

    #[tokio::test]
    async fn test_in_memory_fetch_clamps_huge_page_to_last() {
        let source = source();
        let query = RemoteQuery::new("medicines", 3).with_page(usize::MAX);

        let page = source.fetch(&query).await.unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id(), "m4");
    }

    #[tokio::test]
    async fn test_in_memory_fetch_rejects_zero_page_size() {
        let source = source();
        let err = source.fetch(&RemoteQuery::new("medicines", 0)).await.unwrap_err();
        assert!(matches!(err, FetchError::Source { .. }));
    }

    #[test]
    fn test_remote_query_json() {
        let query = RemoteQuery::new("patients", 5).with_search("jane");
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["pageSize"], 5);
        assert_eq!(json["search"], "jane");
        assert_eq!(json["criteria"], json!({}));
    }
}
