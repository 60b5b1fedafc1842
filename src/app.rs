//! The event loop that owns all display state.
//!
//! Fetches run on their own tasks and hand results back through the event
//! channel; everything else (seen titles, display state, the expiry timer)
//! is only touched from [`NewsBar::run`].

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::aggregator::Aggregator;
use crate::display::{Announcement, CycleId, DisplayCycle, Transition};
use crate::menu::Menu;
use crate::models::AggregatedResult;
use crate::novelty::NoveltyTracker;
use crate::scheduler::RefreshScheduler;
use crate::surface::Surface;

#[derive(Debug)]
pub enum Event {
    Tick,
    ManualRefresh,
    RefreshCompleted(AggregatedResult),
    /// The aggregation task died without a result.
    RefreshAborted,
    AnimationFinished(CycleId),
    Shutdown,
}

/// Cloneable entry point for external triggers.
#[derive(Clone)]
pub struct NewsBarHandle {
    tx: mpsc::UnboundedSender<Event>,
}

impl NewsBarHandle {
    pub fn manual_refresh(&self) {
        self.send(Event::ManualRefresh);
    }

    pub fn animation_finished(&self, cycle: CycleId) {
        self.send(Event::AnimationFinished(cycle));
    }

    pub fn shutdown(&self) {
        self.send(Event::Shutdown);
    }

    fn send(&self, event: Event) {
        if self.tx.send(event).is_err() {
            debug!("Event loop has exited, dropping event");
        }
    }
}

pub struct NewsBar<S> {
    aggregator: Arc<Aggregator>,
    novelty: NoveltyTracker,
    display: DisplayCycle,
    menu: Menu,
    surface: S,
    scheduler: RefreshScheduler,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    in_flight: bool,
    expiry: Option<JoinHandle<()>>,
    refreshes_started: u64,
}

impl<S: Surface> NewsBar<S> {
    pub fn new(
        aggregator: Aggregator,
        display: DisplayCycle,
        refresh_period: Duration,
        surface: S,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            aggregator: Arc::new(aggregator),
            novelty: NoveltyTracker::new(),
            display,
            menu: Menu::loading(),
            surface,
            scheduler: RefreshScheduler::new(refresh_period),
            events_tx,
            events_rx,
            in_flight: false,
            expiry: None,
            refreshes_started: 0,
        }
    }

    pub fn handle(&self) -> NewsBarHandle {
        NewsBarHandle {
            tx: self.events_tx.clone(),
        }
    }

    pub fn novelty(&self) -> &NoveltyTracker {
        &self.novelty
    }

    pub fn display(&self) -> &DisplayCycle {
        &self.display
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight
    }

    pub fn refreshes_started(&self) -> u64 {
        self.refreshes_started
    }

    /// Runs until [`NewsBarHandle::shutdown`] is called, then hands the
    /// final state back.
    pub async fn run(mut self) -> Self {
        self.surface.on_menu(&self.menu);
        self.surface.on_idle();

        let tx = self.events_tx.clone();
        self.scheduler.start(move || {
            let _ = tx.send(Event::Tick);
        });

        while let Some(event) = self.events_rx.recv().await {
            if self.handle_event(event).is_break() {
                break;
            }
        }

        info!("Shutting down");
        self.scheduler.stop();
        self.cancel_expiry();
        self
    }

    /// Handles every queued event without waiting, for hosts that drive
    /// their own loop instead of calling [`NewsBar::run`].
    pub fn pump(&mut self) -> ControlFlow<()> {
        while let Ok(event) = self.events_rx.try_recv() {
            if self.handle_event(event).is_break() {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn handle_event(&mut self, event: Event) -> ControlFlow<()> {
        match event {
            Event::Tick => {
                debug!("Scheduled refresh");
                self.start_refresh();
            }
            Event::ManualRefresh => {
                info!("Manual refresh requested");
                self.novelty.reset();
                self.start_refresh();
            }
            Event::RefreshCompleted(result) => {
                self.in_flight = false;
                self.apply_result(result);
            }
            Event::RefreshAborted => {
                self.in_flight = false;
            }
            Event::AnimationFinished(cycle) => self.finish_cycle(cycle),
            Event::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn start_refresh(&mut self) {
        if self.in_flight {
            debug!("Refresh already in progress, skipping");
            return;
        }
        self.in_flight = true;
        self.refreshes_started += 1;

        let aggregator = self.aggregator.clone();
        let run = tokio::spawn(async move { aggregator.fetch_all().await });

        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = match run.await {
                Ok(result) => Event::RefreshCompleted(result),
                Err(e) => {
                    error!("Refresh task failed: {}", e);
                    Event::RefreshAborted
                }
            };
            let _ = tx.send(event);
        });
    }

    /// Fetches and applies one result inline, outside the scheduler.
    ///
    /// Returns `None` without fetching when a run is already in flight.
    pub async fn refresh_now(&mut self) -> Option<Transition> {
        if self.in_flight {
            debug!("Refresh already in progress, skipping");
            return None;
        }
        self.in_flight = true;
        self.refreshes_started += 1;

        let result = self.aggregator.fetch_all().await;
        self.in_flight = false;

        Some(self.apply_result(result))
    }

    /// [`NewsBar::refresh_now`] with the seen set cleared first. The reset
    /// also applies to a run that is already in flight.
    pub async fn manual_refresh_now(&mut self) -> Option<Transition> {
        self.novelty.reset();
        self.refresh_now().await
    }

    pub fn apply_result(&mut self, result: AggregatedResult) -> Transition {
        let titles = result.titles();
        let is_novel = self.novelty.is_novel(&titles);

        self.menu = Menu::from_result(&result);
        self.surface.on_menu(&self.menu);

        let transition = self
            .display
            .apply(&result.headlines, is_novel, Instant::now());

        match transition {
            Transition::Announce(cycle) => {
                self.novelty.commit(titles);

                let total = self
                    .display
                    .announcement()
                    .map(Announcement::total_duration)
                    .unwrap_or_default();
                info!(
                    cycle = cycle.value(),
                    headlines = result.headlines.len(),
                    "Announcing headlines for {:.1}s",
                    total.as_secs_f64()
                );
                self.schedule_expiry(cycle, total);

                if let Some(announcement) = self.display.announcement() {
                    self.surface.on_announce(announcement);
                }
            }
            Transition::KeepAnnouncing => {
                debug!("Announcement in progress, not interrupting");
            }
            Transition::Idle => {
                debug!(novel = is_novel, "Nothing new to announce");
                self.cancel_expiry();
                self.surface.on_idle();
            }
        }

        transition
    }

    fn finish_cycle(&mut self, cycle: CycleId) {
        if self.display.timer_elapsed(cycle, Instant::now()) {
            info!(cycle = cycle.value(), "Ticker finished");
            self.cancel_expiry();
            self.surface.on_idle();
        }
    }

    fn schedule_expiry(&mut self, cycle: CycleId, after: Duration) {
        self.cancel_expiry();
        let tx = self.events_tx.clone();
        self.expiry = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(Event::AnimationFinished(cycle));
        }));
    }

    fn cancel_expiry(&mut self) {
        if let Some(handle) = self.expiry.take() {
            handle.abort();
        }
    }
}
