//! Session driver
//!
//! Connects a [`DataSource`] to a [`ReconciliationPipeline`]: user intents go
//! in, the fetches the pipeline asks for are performed one at a time, and
//! each response is fed back with its request ticket.

use std::sync::Arc;

use log::debug;

use crate::SessionConfig;
use crate::error::Error;
use crate::error::FetchError;
use crate::model::Page;
use crate::pipeline::Outcome;
use crate::pipeline::PageRequest;
use crate::pipeline::ReconciliationPipeline;
use crate::source::DataSource;
use crate::surface::RenderSurface;
use crate::surface::SurfaceEvent;

/// The answer to one [`PageRequest`].
#[derive(Debug)]
pub struct Response {
    /// The request this answers.
    pub request: PageRequest,
    /// The fetched page or the fetch error.
    pub result: Result<Page, FetchError>,
}

/// A selection session over one data source.
///
/// [`Session::dispatch`] applies an event and performs every fetch it
/// triggers. Front ends that keep taking input while a fetch is in flight
/// use [`Session::begin`], [`Session::fetch`] and [`Session::complete`]
/// instead; responses that were superseded in the meantime are discarded.
///
/// # Example
///
/// ```ignore
/// use pageselect_lib::{Session, SessionConfig};
/// use pageselect_lib::source::InMemorySource;
/// use pageselect_lib::surface::SurfaceEvent;
///
/// let mut session = Session::new(InMemorySource::generated(50), SessionConfig::default());
/// session.start().await?;
/// session.dispatch(SurfaceEvent::TargetCountChanged(20)).await?;
/// assert_eq!(session.pipeline().selection().len(), 20);
/// ```
pub struct Session<S> {
    source: Arc<S>,
    pipeline: ReconciliationPipeline,
}

impl<S: DataSource + 'static> Session<S> {
    /// Creates a session. Nothing is fetched until [`Session::start`].
    pub fn new(source: S, config: SessionConfig) -> Self {
        Self {
            source: Arc::new(source),
            pipeline: ReconciliationPipeline::new(config),
        }
    }

    /// Loads the first page.
    pub async fn start(&mut self) -> Result<(), Error> {
        self.dispatch(SurfaceEvent::PageChangeRequested(1)).await
    }

    /// Applies one user intent, including every fetch it triggers.
    ///
    /// A failed fetch is recorded for the render surface and returned; the
    /// resident page and the selection stay as they were.
    pub async fn dispatch(&mut self, event: SurfaceEvent) -> Result<(), Error> {
        match self.begin(event)? {
            Some(request) => self.run(request).await,
            None => Ok(()),
        }
    }

    /// Applies one user intent without fetching.
    ///
    /// Returns the fetch the intent needs, if any. The request supersedes any
    /// fetch still in flight.
    pub fn begin(&mut self, event: SurfaceEvent) -> Result<Option<PageRequest>, Error> {
        debug!("dispatching {:?}", event);
        match event {
            SurfaceEvent::PageChangeRequested(index) => self.pipeline.request_page(index).map(Some),
            SurfaceEvent::SelectionEdited(selection) => {
                self.pipeline.on_manual_selection_change(selection)?;
                Ok(None)
            }
            SurfaceEvent::TargetCountChanged(n) => Ok(self.pipeline.on_target_count_changed(n)),
            SurfaceEvent::ClearSelection => {
                self.pipeline.clear_selection();
                Ok(None)
            }
        }
    }

    /// Performs `request` against the source.
    ///
    /// The returned future does not borrow the session, so it can run while
    /// further events are applied.
    pub fn fetch(&self, request: PageRequest) -> impl Future<Output = Response> + Send + use<S> {
        let source = Arc::clone(&self.source);
        async move {
            debug!("fetching page {} ({:?})", request.index, request.origin);
            let result = source.fetch_page(request.index, request.page_size).await;
            Response { request, result }
        }
    }

    /// Feeds a response back into the pipeline.
    ///
    /// Returns the follow-up fetch, if any. Superseded responses are dropped
    /// and yield `Ok(None)`; a failure for the outstanding request is
    /// returned as [`Error::Fetch`].
    pub fn complete(&mut self, response: Response) -> Result<Option<PageRequest>, Error> {
        let Response { request, result } = response;
        match result {
            Ok(page) => Ok(self.pipeline.on_page_loaded(request.ticket, page).next()),
            Err(err) => match self.pipeline.on_fetch_failed(request.ticket, &err) {
                Outcome::Applied { .. } => Err(err.into()),
                Outcome::Stale => Ok(None),
            },
        }
    }

    /// Moves to the next page.
    pub async fn next_page(&mut self) -> Result<(), Error> {
        let request = self.pipeline.next_page()?;
        self.run(request).await
    }

    /// Moves to the previous page.
    pub async fn previous_page(&mut self) -> Result<(), Error> {
        let request = self.pipeline.previous_page()?;
        self.run(request).await
    }

    /// Performs `request` and every follow-up fetch the pipeline asks for.
    async fn run(&mut self, request: PageRequest) -> Result<(), Error> {
        let mut next = Some(request);
        while let Some(request) = next.take() {
            let response = self.fetch(request).await;
            next = self.complete(response)?;
        }
        Ok(())
    }

    /// Draws the current state on `surface`.
    pub fn render(&self, surface: &mut impl RenderSurface) {
        match self.pipeline.view() {
            Ok(view) => surface.render(&view),
            Err(_) => surface.render_unloaded(self.pipeline.last_failure()),
        }
    }

    /// Returns the pipeline.
    pub fn pipeline(&self) -> &ReconciliationPipeline {
        &self.pipeline
    }

    /// Returns the pipeline for direct edits such as row toggles.
    pub fn pipeline_mut(&mut self) -> &mut ReconciliationPipeline {
        &mut self.pipeline
    }

    /// Returns the data source.
    pub fn source(&self) -> &S {
        &self.source
    }
}
