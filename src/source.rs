//! Row sources feeding the selectors.
//!
//! Two shapes exist: a remote paginated listing (images, videos, labels) and a
//! list fetched once when the selector mounts (skills, skill-sons). Both expose
//! the same [`RowView`], so the modal never cares which one it is reading.
//!
//! Fetches run on the tokio runtime; the UI thread only ever calls `poll`,
//! which drains finished results without blocking.

use crate::api::{ApiError, ListingBackend, decode_rows};
use crate::model::Selectable;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based.
    pub current: usize,
    pub page_size: usize,
    pub total: usize,
}

impl Pagination {
    pub fn page_count(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.current < self.page_count()
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }
}

/// What the modal needs to draw its table.
#[derive(Debug)]
pub struct RowView<'a, T> {
    pub rows: Option<&'a [T]>,
    pub loading: bool,
    pub pagination: Option<Pagination>,
}

impl<'a, T> RowView<'a, T> {
    /// Absent rows read as an empty table.
    pub fn rows(&self) -> &'a [T] {
        self.rows.unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

pub trait RowSource<T> {
    fn view(&self) -> RowView<'_, T>;

    /// Apply any finished fetch. Returns true when the view changed.
    fn poll(&mut self) -> bool;

    /// Ask for another page; sources without pagination ignore it.
    fn request_page(&mut self, page: usize);

    /// Re-issue the current load.
    fn refetch(&mut self);

    fn load_state(&self) -> &LoadState;
}

/// Single in-flight fetch. Starting a new one aborts the old task, and results
/// tagged with an older generation are dropped. Dropping the slot aborts too,
/// so nothing resolves into a source that no longer exists.
struct FetchSlot<M> {
    runtime: Handle,
    tx: UnboundedSender<(u64, M)>,
    rx: UnboundedReceiver<(u64, M)>,
    task: Option<JoinHandle<()>>,
    generation: u64,
}

impl<M: Send + 'static> FetchSlot<M> {
    fn new(runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            tx,
            rx,
            task: None,
            generation: 0,
        }
    }

    fn spawn<F>(&mut self, fut: F)
    where
        F: Future<Output = M> + Send + 'static,
    {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation += 1;
        let generation = self.generation;
        let tx = self.tx.clone();
        self.task = Some(self.runtime.spawn(async move {
            let outcome = fut.await;
            let _ = tx.send((generation, outcome));
        }));
    }

    /// Latest result of the current generation, if one arrived.
    fn drain(&mut self) -> Option<M> {
        let mut latest = None;
        while let Ok((generation, outcome)) = self.rx.try_recv() {
            if generation == self.generation {
                latest = Some(outcome);
            } else {
                debug!(generation, current = self.generation, "dropping stale fetch result");
            }
        }
        if latest.is_some() {
            self.task = None;
        }
        latest
    }
}

impl<M> Drop for FetchSlot<M> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

type PageOutcome<T> = (usize, Result<(Vec<T>, usize), ApiError>);

/// Remote listing bound by resource name and page size.
pub struct RemoteListing<T: Selectable> {
    backend: Arc<dyn ListingBackend>,
    resource: String,
    rows: Option<Vec<T>>,
    pagination: Pagination,
    /// Last page asked for; differs from `pagination.current` until it loads.
    requested: usize,
    state: LoadState,
    slot: FetchSlot<PageOutcome<T>>,
}

impl<T: Selectable> RemoteListing<T> {
    /// Starts loading the first page right away.
    pub fn new(
        backend: Arc<dyn ListingBackend>,
        runtime: Handle,
        resource: impl Into<String>,
        page_size: usize,
    ) -> Self {
        let mut listing = Self {
            backend,
            resource: resource.into(),
            rows: None,
            pagination: Pagination {
                current: 1,
                page_size: page_size.max(1),
                total: 0,
            },
            requested: 1,
            state: LoadState::Idle,
            slot: FetchSlot::new(runtime),
        };
        listing.request_page(1);
        listing
    }
}

impl<T: Selectable> RowSource<T> for RemoteListing<T> {
    fn view(&self) -> RowView<'_, T> {
        RowView {
            rows: self.rows.as_deref(),
            loading: self.state == LoadState::Loading,
            pagination: Some(self.pagination),
        }
    }

    fn poll(&mut self) -> bool {
        let Some((page, outcome)) = self.slot.drain() else {
            return false;
        };
        match outcome {
            Ok((rows, total)) => {
                debug!(resource = %self.resource, page, rows = rows.len(), total, "page applied");
                self.rows = Some(rows);
                self.pagination.current = page;
                self.pagination.total = total;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                warn!(resource = %self.resource, page, error = %e, "listing fetch failed");
                self.rows = None;
                self.state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    fn request_page(&mut self, page: usize) {
        let page = page.max(1);
        self.requested = page;
        let backend = Arc::clone(&self.backend);
        let resource = self.resource.clone();
        let page_size = self.pagination.page_size;
        debug!(%resource, page, page_size, "requesting page");
        self.state = LoadState::Loading;
        self.slot.spawn(async move {
            let outcome = match backend.list_page(&resource, page, page_size).await {
                Ok(p) => decode_rows::<T>(&resource, p.rows).map(|rows| (rows, p.total)),
                Err(e) => Err(e),
            };
            (page, outcome)
        });
    }

    /// Retries the last requested page, which after a failure is not the
    /// one on screen.
    fn refetch(&mut self) {
        self.request_page(self.requested);
    }

    fn load_state(&self) -> &LoadState {
        &self.state
    }
}

/// Full list fetched once on mount; small vocabularies only.
pub struct EagerList<T: Selectable> {
    backend: Arc<dyn ListingBackend>,
    resource: String,
    rows: Vec<T>,
    state: LoadState,
    slot: FetchSlot<Result<Vec<T>, ApiError>>,
}

impl<T: Selectable> EagerList<T> {
    pub fn new(backend: Arc<dyn ListingBackend>, runtime: Handle, resource: impl Into<String>) -> Self {
        let mut list = Self {
            backend,
            resource: resource.into(),
            rows: Vec::new(),
            state: LoadState::Idle,
            slot: FetchSlot::new(runtime),
        };
        list.refetch();
        list
    }
}

impl<T: Selectable> RowSource<T> for EagerList<T> {
    fn view(&self) -> RowView<'_, T> {
        RowView {
            rows: Some(&self.rows),
            loading: self.state == LoadState::Loading,
            pagination: None,
        }
    }

    fn poll(&mut self) -> bool {
        let Some(outcome) = self.slot.drain() else {
            return false;
        };
        match outcome {
            Ok(rows) => {
                debug!(resource = %self.resource, rows = rows.len(), "full list applied");
                self.rows = rows;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                warn!(resource = %self.resource, error = %e, "full list fetch failed");
                self.rows.clear();
                self.state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    fn request_page(&mut self, _page: usize) {}

    fn refetch(&mut self) {
        let backend = Arc::clone(&self.backend);
        let resource = self.resource.clone();
        self.state = LoadState::Loading;
        self.slot.spawn(async move {
            let rows = backend.list_all(&resource).await?;
            decode_rows::<T>(&resource, rows)
        });
    }

    fn load_state(&self) -> &LoadState {
        &self.state
    }
}

/// Walk every page of a listing. Used by headless mode to resolve ids that may
/// live anywhere in the collection.
pub async fn fetch_all_pages<T: Selectable>(
    backend: &dyn ListingBackend,
    resource: &str,
    page_size: usize,
) -> Result<Vec<T>, ApiError> {
    let page_size = page_size.max(1);
    let mut collected = Vec::new();
    let mut page = 1;
    loop {
        let fetched = backend.list_page(resource, page, page_size).await?;
        let count = fetched.rows.len();
        collected.extend(decode_rows::<T>(resource, fetched.rows)?);
        // A short page is the last one, whatever the reported total says.
        if count < page_size || collected.len() >= fetched.total {
            break;
        }
        page += 1;
    }
    Ok(collected)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::fake::MemoryBackend;
    use crate::model::{Label, Skill};
    use serde_json::json;
    use std::time::Duration;

    /// Poll until the source stops loading.
    pub(crate) async fn settle<T, S: RowSource<T>>(source: &mut S) {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                tokio::task::yield_now().await;
                source.poll();
                if *source.load_state() != LoadState::Loading {
                    break;
                }
            }
        })
        .await
        .expect("source should settle");
    }

    pub(crate) fn labels(n: i64) -> Vec<serde_json::Value> {
        (1..=n)
            .map(|id| json!({"id": id, "name": format!("label-{id}"), "nameEng": format!("tag-{id}")}))
            .collect()
    }

    #[test]
    fn pagination_counts_pages() {
        let p = Pagination {
            current: 1,
            page_size: 10,
            total: 21,
        };
        assert_eq!(p.page_count(), 3);
        assert!(p.has_next());
        assert!(!p.has_previous());
    }

    #[test]
    fn absent_rows_read_as_empty() {
        let view: RowView<'_, Label> = RowView {
            rows: None,
            loading: false,
            pagination: None,
        };
        assert!(view.rows().is_empty());
    }

    #[tokio::test]
    async fn remote_listing_loads_first_page_then_pages_on_request() {
        let backend = Arc::new(MemoryBackend::default().with_rows("labels", labels(25)));
        let mut listing: RemoteListing<Label> =
            RemoteListing::new(backend.clone(), Handle::current(), "labels", 10);
        assert!(listing.view().loading);

        settle(&mut listing).await;
        let view = listing.view();
        assert_eq!(view.rows().len(), 10);
        assert_eq!(view.pagination.map(|p| p.total), Some(25));

        listing.request_page(3);
        settle(&mut listing).await;
        let view = listing.view();
        assert_eq!(view.rows().len(), 5);
        assert_eq!(view.rows()[0].id, 21);
        assert_eq!(view.pagination.map(|p| p.current), Some(3));
    }

    #[tokio::test]
    async fn remote_listing_failure_leaves_rows_empty() {
        let backend = Arc::new(MemoryBackend::default().failing("images"));
        let mut listing: RemoteListing<crate::model::Image> =
            RemoteListing::new(backend, Handle::current(), "images", 10);
        settle(&mut listing).await;
        assert!(listing.view().rows().is_empty());
        assert!(!listing.view().loading);
        assert!(matches!(listing.load_state(), LoadState::Failed(_)));
    }

    #[tokio::test]
    async fn refetch_after_failure_retries_the_failed_page() {
        let backend = Arc::new(MemoryBackend::default().failing("images"));
        let mut listing: RemoteListing<crate::model::Image> =
            RemoteListing::new(backend.clone(), Handle::current(), "images", 10);
        settle(&mut listing).await;
        listing.request_page(2);
        settle(&mut listing).await;
        assert!(matches!(listing.load_state(), LoadState::Failed(_)));

        listing.refetch();
        settle(&mut listing).await;
        let calls = backend.calls.lock().unwrap().clone();
        assert_eq!(calls.last().map(String::as_str), Some("page images 2"));
    }

    #[tokio::test]
    async fn eager_list_distinguishes_empty_from_failed() {
        let empty = Arc::new(MemoryBackend::default());
        let mut skills: EagerList<Skill> = EagerList::new(empty, Handle::current(), "skills");
        settle(&mut skills).await;
        assert_eq!(*skills.load_state(), LoadState::Loaded);
        assert!(skills.view().rows().is_empty());

        let broken = Arc::new(MemoryBackend::default().failing("skills"));
        let mut skills: EagerList<Skill> = EagerList::new(broken, Handle::current(), "skills");
        settle(&mut skills).await;
        assert!(matches!(skills.load_state(), LoadState::Failed(_)));
        assert!(skills.view().rows().is_empty());
    }

    #[tokio::test]
    async fn newer_request_wins_over_older_one() {
        let backend = Arc::new(MemoryBackend::default().with_rows("labels", labels(30)));
        let mut listing: RemoteListing<Label> =
            RemoteListing::new(backend, Handle::current(), "labels", 10);
        listing.request_page(2);
        settle(&mut listing).await;
        assert_eq!(listing.view().pagination.map(|p| p.current), Some(2));
        assert_eq!(listing.view().rows()[0].id, 11);
    }

    #[tokio::test]
    async fn dropped_source_does_not_panic_when_fetch_finishes() {
        let backend = Arc::new(MemoryBackend::default().with_rows("skills", vec![json!({"id": 1})]));
        let skills: EagerList<Skill> = EagerList::new(backend.clone(), Handle::current(), "skills");
        drop(skills);
        tokio::task::yield_now().await;
        assert!(backend.calls.lock().unwrap().len() <= 1);
    }

    #[tokio::test]
    async fn fetch_all_pages_walks_the_whole_listing() {
        let backend = MemoryBackend::default().with_rows("labels", labels(23));
        let all: Vec<Label> = fetch_all_pages(&backend, "labels", 10).await.unwrap();
        assert_eq!(all.len(), 23);
        assert_eq!(all.last().map(|l| l.id), Some(23));
    }

    #[tokio::test]
    async fn fetch_all_pages_without_total_header_reads_until_a_short_page() {
        let backend = MemoryBackend::default()
            .with_rows("labels", labels(25))
            .without_total();
        let all: Vec<Label> = fetch_all_pages(&backend, "labels", 10).await.unwrap();
        assert_eq!(all.len(), 25);

        // Exact multiple: the empty page after the last full one ends the walk.
        let backend = MemoryBackend::default()
            .with_rows("labels", labels(20))
            .without_total();
        let all: Vec<Label> = fetch_all_pages(&backend, "labels", 10).await.unwrap();
        assert_eq!(all.len(), 20);
        assert_eq!(backend.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn remote_listing_without_total_header_still_offers_next_page() {
        let backend = Arc::new(
            MemoryBackend::default()
                .with_rows("labels", labels(25))
                .without_total(),
        );
        let mut listing: RemoteListing<Label> =
            RemoteListing::new(backend, Handle::current(), "labels", 10);
        settle(&mut listing).await;
        assert!(listing.view().pagination.is_some_and(|p| p.has_next()));

        listing.request_page(3);
        settle(&mut listing).await;
        let pagination = listing.view().pagination;
        assert_eq!(listing.view().rows().len(), 5);
        assert!(pagination.is_some_and(|p| !p.has_next() && p.current == 3));
    }
}
