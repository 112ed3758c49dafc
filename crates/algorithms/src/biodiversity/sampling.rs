//! Occurrence paging
//!
//! Paging is a small state machine driven by page results:
//!
//! ```text
//! Fetching(offset) --page full, below cap--> Fetching(offset + page_size)
//! Fetching(offset) --short page or cap reached--> Done
//! Fetching(offset) --fetch error--> Failed(error)
//! ```
//!
//! Pages are requested strictly one after another. A failed page aborts the
//! whole sample; retrying is left to the caller.

use chrono::NaiveDate;
use ecometrics_core::{
    Aoi, Error, OccurrenceQuery, OccurrenceRecord, OccurrenceSample, OccurrenceSource, Result,
    SamplingPolicy,
};
use tracing::{debug, info};

use super::query::build_query;

/// Where a pager is in its run.
#[derive(Debug)]
pub enum PagingState {
    /// Next page starts at `offset`.
    Fetching { offset: usize },
    Done,
    Failed(Error),
}

/// Accumulates occurrence records page by page up to a cap.
pub struct OccurrencePager<'q, S> {
    source: S,
    query: &'q OccurrenceQuery,
    page_size: usize,
    max_records: usize,
    records: Vec<OccurrenceRecord>,
    pages_fetched: usize,
    state: PagingState,
}

impl<'q, S: OccurrenceSource> OccurrencePager<'q, S> {
    /// A pager for `query`. With `max_records == 0` it starts out done.
    ///
    /// # Errors
    /// * `InvalidParameter` if `page_size` is 0
    pub fn new(
        source: S,
        query: &'q OccurrenceQuery,
        max_records: usize,
        page_size: usize,
    ) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidParameter {
                name: "page_size",
                value: "0".into(),
                reason: "must be > 0".into(),
            });
        }
        let state = if max_records == 0 {
            PagingState::Done
        } else {
            PagingState::Fetching { offset: 0 }
        };
        Ok(Self {
            source,
            query,
            page_size,
            max_records,
            records: Vec::new(),
            pages_fetched: 0,
            state,
        })
    }

    pub fn state(&self) -> &PagingState {
        &self.state
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Records accumulated so far, before truncation to the cap.
    pub fn records(&self) -> &[OccurrenceRecord] {
        &self.records
    }

    /// Fetch one page if still fetching, and return the new state.
    pub fn step(&mut self) -> &PagingState {
        let PagingState::Fetching { offset } = self.state else {
            return &self.state;
        };

        match self.source.fetch_page(self.query, offset, self.page_size) {
            Ok(page) => {
                let returned = page.records.len();
                self.pages_fetched += 1;
                self.records.extend(page.records);
                debug!(
                    "occurrence page {} at offset {}: {} records ({} total)",
                    self.pages_fetched,
                    offset,
                    returned,
                    self.records.len()
                );

                let finished =
                    returned < self.page_size || self.records.len() >= self.max_records;
                self.state = if finished {
                    self.records.truncate(self.max_records);
                    PagingState::Done
                } else {
                    PagingState::Fetching {
                        offset: offset + self.page_size,
                    }
                };
            }
            Err(e) => {
                debug!("occurrence page at offset {} failed: {}", offset, e);
                self.state = PagingState::Failed(e);
            }
        }
        &self.state
    }

    /// Page until done or failed.
    pub fn run(mut self) -> Result<OccurrenceSample> {
        while let PagingState::Fetching { .. } = self.step() {}

        match std::mem::replace(&mut self.state, PagingState::Done) {
            PagingState::Failed(e) => Err(e),
            _ => Ok(OccurrenceSample::new(self.records)),
        }
    }
}

/// Sample up to `max_records` records matching an already built query.
pub fn sample_with_query<S: OccurrenceSource>(
    source: S,
    query: &OccurrenceQuery,
    max_records: usize,
    page_size: usize,
) -> Result<OccurrenceSample> {
    OccurrencePager::new(source, query, max_records, page_size)?.run()
}

/// Sample up to `max_records` occurrences recorded in and around `aoi`
/// during the year ending at `today`.
pub fn sample_occurrences<S: OccurrenceSource>(
    source: S,
    aoi: &Aoi,
    max_records: usize,
    policy: &SamplingPolicy,
    today: NaiveDate,
) -> Result<OccurrenceSample> {
    let query = build_query(aoi, policy, today)?;
    let sample = sample_with_query(source, &query, max_records, policy.page_size)?;
    info!("sampled {} occurrence records (cap {})", sample.len(), max_records);
    Ok(sample)
}

/// An occurrence source bound to a sampling policy.
pub struct OccurrenceSampler<S> {
    source: S,
    policy: SamplingPolicy,
}

impl<S: OccurrenceSource> OccurrenceSampler<S> {
    pub fn new(source: S, policy: SamplingPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> &SamplingPolicy {
        &self.policy
    }

    /// Total records available for `aoi`, from a count-only query.
    pub fn available(&self, aoi: &Aoi, today: NaiveDate) -> Result<u64> {
        let query = build_query(aoi, &self.policy, today)?;
        self.source.count(&query)
    }

    /// Sample at most `max_records`.
    pub fn sample(
        &self,
        aoi: &Aoi,
        max_records: usize,
        today: NaiveDate,
    ) -> Result<OccurrenceSample> {
        sample_occurrences(&self.source, aoi, max_records, &self.policy, today)
    }

    /// Count first, then sample `min(available, policy.max_records)`.
    pub fn sample_capped(&self, aoi: &Aoi, today: NaiveDate) -> Result<OccurrenceSample> {
        let query = build_query(aoi, &self.policy, today)?;
        let available = self.source.count(&query)?;
        let size = self.policy.sample_size(available);
        info!("{} occurrence records available, sampling {}", available, size);
        sample_with_query(&self.source, &query, size, self.policy.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecometrics_core::{DateRange, OccurrencePage};
    use std::cell::RefCell;

    /// Serves `total` numbered records and logs each request.
    struct Numbered {
        total: usize,
        fail_at: Option<usize>,
        calls: RefCell<Vec<(usize, usize)>>,
    }

    impl Numbered {
        fn new(total: usize) -> Self {
            Self {
                total,
                fail_at: None,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl OccurrenceSource for Numbered {
        fn fetch_page(
            &self,
            _: &OccurrenceQuery,
            offset: usize,
            limit: usize,
        ) -> Result<OccurrencePage> {
            self.calls.borrow_mut().push((offset, limit));
            if self.fail_at == Some(offset) {
                return Err(Error::RemoteService {
                    service: "test",
                    reason: "boom".into(),
                });
            }
            let end = (offset + limit).min(self.total);
            let records = (offset.min(end)..end)
                .map(|i| OccurrenceRecord {
                    key: Some(i as u64),
                    ..Default::default()
                })
                .collect();
            Ok(OccurrencePage {
                records,
                count: Some(self.total as u64),
            })
        }

        fn count(&self, _: &OccurrenceQuery) -> Result<u64> {
            Ok(self.total as u64)
        }
    }

    fn query() -> OccurrenceQuery {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        OccurrenceQuery {
            geometry_wkt: "POLYGON((0 0,1 0,1 1,0 0))".into(),
            date_range: DateRange::trailing_year(today),
        }
    }

    #[test]
    fn test_stops_on_short_page() {
        let src = Numbered::new(650);
        let s = sample_with_query(&src, &query(), 10_000, 300).unwrap();
        assert_eq!(s.len(), 650);
        assert_eq!(*src.calls.borrow(), vec![(0, 300), (300, 300), (600, 300)]);
    }

    #[test]
    fn test_truncates_to_cap() {
        let src = Numbered::new(5_000);
        let s = sample_with_query(&src, &query(), 700, 300).unwrap();
        assert_eq!(s.len(), 700);
        assert_eq!(src.calls.borrow().len(), 3);
        assert_eq!(s.records().last().and_then(|r| r.key), Some(699));
    }

    #[test]
    fn test_exact_multiple_needs_one_empty_page() {
        let src = Numbered::new(600);
        let s = sample_with_query(&src, &query(), 10_000, 300).unwrap();
        assert_eq!(s.len(), 600);
        assert_eq!(src.calls.borrow().len(), 3);
    }

    #[test]
    fn test_zero_cap_fetches_nothing() {
        let src = Numbered::new(100);
        let s = sample_with_query(&src, &query(), 0, 300).unwrap();
        assert!(s.is_empty());
        assert!(src.calls.borrow().is_empty());
    }

    #[test]
    fn test_failed_page_aborts_sample() {
        let src = Numbered {
            fail_at: Some(300),
            ..Numbered::new(1_000)
        };
        let q = query();
        let mut pager = OccurrencePager::new(&src, &q, 1_000, 300).unwrap();
        assert!(matches!(pager.step(), PagingState::Fetching { offset: 300 }));
        assert!(matches!(pager.step(), PagingState::Failed(_)));
        // terminal
        assert!(matches!(pager.step(), PagingState::Failed(_)));
        assert_eq!(pager.records().len(), 300);

        let err = sample_with_query(&src, &q, 1_000, 300).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let src = Numbered::new(10);
        assert!(sample_with_query(&src, &query(), 10, 0).is_err());
    }

    #[test]
    fn test_short_pages_only_on_last_fetch() {
        let src = Numbered::new(1_234);
        let q = query();
        let mut pager = OccurrencePager::new(&src, &q, 10_000, 100).unwrap();
        let mut sizes = Vec::new();
        let mut seen = 0;
        while let PagingState::Fetching { .. } = pager.state() {
            pager.step();
            sizes.push(pager.records().len() - seen);
            seen = pager.records().len();
        }
        let (last, full) = sizes.split_last().unwrap();
        assert!(full.iter().all(|&n| n == 100));
        assert_eq!(*last, 34);
    }
}
