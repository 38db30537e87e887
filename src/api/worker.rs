//! Async controller task.
//!
//! Owns the `VoteApi` transport and the poll timer. Listens for `ApiCommand`s
//! from the UI and emits `ApiEvent`s back. The TUI thread never awaits a
//! network call; this task never touches the terminal.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::client::{ApiError, VoteApi};
use super::types::*;
use crate::config::{NotificationsConfig, PollingConfig};

// ─── Poll timer ─────────────────────────────────────────────────────────────

/// The single recurring results timer. Holding the `Interval` in an `Option`
/// means there is never more than one of them alive.
#[derive(Debug)]
pub struct PollTimer {
    period: Duration,
    interval: Option<Interval>,
}

impl PollTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// (Re)arm the timer. Any previous interval is dropped first. The first
    /// tick fires one full period from now.
    pub fn start(&mut self) {
        self.interval.take();
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
    }

    pub fn stop(&mut self) {
        self.interval = None;
    }

    #[allow(dead_code)]
    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Resolve on the next tick, or never while stopped.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

// ─── Busy guard ─────────────────────────────────────────────────────────────

/// Shows the busy overlay for as long as it lives. Dropping it hides the
/// overlay, whichever way the wrapped operation exits.
pub struct BusyGuard {
    evt_tx: mpsc::UnboundedSender<ApiEvent>,
}

impl BusyGuard {
    pub fn show(evt_tx: &mpsc::UnboundedSender<ApiEvent>, message: impl Into<String>) -> Self {
        let _ = evt_tx.send(ApiEvent::Busy(Some(message.into())));
        Self {
            evt_tx: evt_tx.clone(),
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let _ = self.evt_tx.send(ApiEvent::Busy(None));
    }
}

// ─── Controller ─────────────────────────────────────────────────────────────

pub struct Controller {
    api: Arc<dyn VoteApi>,
    evt_tx: mpsc::UnboundedSender<ApiEvent>,
    settings: PollingConfig,
    timer: PollTimer,
    state: LifecycleState,
    auto_refresh: bool,
    visible: bool,
    ready_toast: Duration,
    toggle_toast: Duration,
}

impl Controller {
    pub fn new(
        api: Arc<dyn VoteApi>,
        evt_tx: mpsc::UnboundedSender<ApiEvent>,
        settings: PollingConfig,
        notifications: &NotificationsConfig,
    ) -> Self {
        Self {
            api,
            evt_tx,
            timer: PollTimer::new(Duration::from_millis(settings.interval_ms)),
            auto_refresh: settings.auto_refresh,
            settings,
            state: LifecycleState::Uninitialized,
            visible: true,
            ready_toast: Duration::from_millis(notifications.ready_duration_ms),
            toggle_toast: Duration::from_millis(notifications.toggle_duration_ms),
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[allow(dead_code)]
    pub fn is_polling(&self) -> bool {
        self.timer.is_running()
    }

    fn emit(&self, event: ApiEvent) {
        // The receiver only goes away when the UI is shutting down.
        let _ = self.evt_tx.send(event);
    }

    fn notify(&self, message: impl Into<String>, severity: Severity, duration: Option<Duration>) {
        self.emit(ApiEvent::Notify {
            message: message.into(),
            severity,
            duration,
        });
    }

    fn set_state(&mut self, state: LifecycleState) {
        self.state = state;
        self.emit(ApiEvent::State(state));
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Probe the backend, load the first tally, start polling, then report
    /// ready.
    pub async fn init(&mut self) {
        info!("Initialising voting client");
        match self.api.fetch_health().await {
            Ok(_) => {
                info!("Backend is healthy");
                self.refresh_results().await;
                if self.auto_refresh {
                    self.start_auto_refresh();
                }
                self.set_state(LifecycleState::Ready);
                self.emit(ApiEvent::AutoRefreshChanged(self.auto_refresh));
                self.notify("Ready to vote! 🎉", Severity::Success, Some(self.ready_toast));
            }
            Err(e) => {
                warn!("Initialisation failed: {e}");
                self.timer.stop();
                self.set_state(LifecycleState::Failed);
                self.notify("Error connecting to the server", Severity::Error, None);
            }
        }
    }

    /// Stop polling for good. No request is issued afterwards.
    pub fn teardown(&mut self) {
        self.timer.stop();
        self.set_state(LifecycleState::Closed);
        info!("Controller torn down");
    }

    // ── Voting ──────────────────────────────────────────────────────────

    /// Submit a vote and, once it is accepted, refetch the tally. The busy
    /// overlay is hidden before this returns. Errors come back as the
    /// user-facing message.
    pub async fn vote(&mut self, option: VoteOption) -> Result<VoteReceipt, String> {
        if self.state == LifecycleState::Closed {
            return Err("Voting is closed.".into());
        }

        let result = {
            let _busy = BusyGuard::show(&self.evt_tx, "Sending vote…");
            self.submit_and_refresh(option).await
        };

        result.map_err(|e| {
            warn!("Vote for {option} failed: {e}");
            e
        })
    }

    async fn submit_and_refresh(&mut self, option: VoteOption) -> Result<VoteReceipt, String> {
        let receipt = self
            .api
            .submit_vote(option)
            .await
            .map_err(|e| e.user_message())?;
        if !receipt.ok {
            return Err("Error sending vote".into());
        }
        info!("Vote for {option} accepted ({})", receipt.status);
        if let Some(voted) = receipt.voted.filter(|v| *v != option) {
            warn!("Backend recorded the vote for {voted} instead of {option}");
        }
        self.refresh_results().await;
        Ok(receipt)
    }

    // ── Results ─────────────────────────────────────────────────────────

    /// Fetch and publish the tally. Failures are logged and optionally
    /// surfaced as a warning toast; they never propagate.
    pub async fn refresh_results(&mut self) {
        if self.state == LifecycleState::Closed {
            return;
        }
        match self.api.fetch_results().await {
            Ok(tally) => {
                debug!("Tally: {} cats / {} dogs", tally.cats, tally.dogs);
                self.emit(ApiEvent::Tally(tally));
            }
            Err(e) => {
                warn!("Failed to fetch results: {e}");
                if self.should_warn(&e) {
                    self.notify("Failed to load results", Severity::Warning, None);
                }
            }
        }
    }

    fn should_warn(&self, e: &ApiError) -> bool {
        !e.is_network() || self.settings.warn_on_network_error
    }

    // ── Polling ─────────────────────────────────────────────────────────

    pub fn start_auto_refresh(&mut self) {
        self.timer.start();
        debug!("Auto-refresh started");
    }

    pub fn stop_auto_refresh(&mut self) {
        self.timer.stop();
        debug!("Auto-refresh stopped");
    }

    /// Wait for the next poll tick. Never resolves while polling is stopped.
    pub async fn next_tick(&mut self) {
        self.timer.tick().await;
    }

    pub async fn on_poll_tick(&mut self) {
        if self.auto_refresh && self.state == LifecycleState::Ready {
            self.refresh_results().await;
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.stop_auto_refresh();
        } else if self.auto_refresh && self.state == LifecycleState::Ready {
            self.start_auto_refresh();
        }
    }

    pub fn toggle_auto_refresh(&mut self) {
        self.auto_refresh = !self.auto_refresh;
        if self.auto_refresh {
            if self.visible && self.state == LifecycleState::Ready {
                self.start_auto_refresh();
            }
            self.notify("Auto-refresh on", Severity::Success, Some(self.toggle_toast));
        } else {
            self.stop_auto_refresh();
            self.notify("Auto-refresh off", Severity::Info, Some(self.toggle_toast));
        }
        self.emit(ApiEvent::AutoRefreshChanged(self.auto_refresh));
    }

    // ── Main loop ───────────────────────────────────────────────────────

    /// Returns `false` once the loop should exit.
    pub async fn handle_command(&mut self, cmd: ApiCommand) -> bool {
        match cmd {
            ApiCommand::Vote(option) => {
                let outcome = self.vote(option).await;
                self.emit(ApiEvent::VoteFinished { option, outcome });
            }
            ApiCommand::Refresh => self.refresh_results().await,
            ApiCommand::ToggleAutoRefresh => self.toggle_auto_refresh(),
            ApiCommand::SetVisible(visible) => self.set_visible(visible),
            ApiCommand::Shutdown => return false,
        }
        true
    }

    /// Task entry point. Runs until `Shutdown` or the command channel closes
    /// (i.e. the TUI exits).
    pub async fn run(mut self, mut cmd_rx: mpsc::Receiver<ApiCommand>) {
        self.init().await;

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else {
                        debug!("Command channel closed, controller exiting");
                        break;
                    };
                    if !self.handle_command(cmd).await {
                        break;
                    }
                }
                _ = self.next_tick() => {
                    self.on_poll_tick().await;
                }
            }
        }

        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const PERIOD: Duration = Duration::from_millis(3000);

    /// In-memory backend that counts calls and lets tests script failures.
    #[derive(Default)]
    struct FakeApi {
        tally: Mutex<VoteTally>,
        health_fails: bool,
        /// Answer votes with `{"ok": false}`.
        reject_votes: bool,
        vote_error: Mutex<Option<ApiError>>,
        results_error: Mutex<Option<ApiError>>,
        result_calls: AtomicUsize,
        vote_calls: AtomicUsize,
    }

    impl FakeApi {
        fn with_tally(cats: u64, dogs: u64) -> Arc<Self> {
            Arc::new(Self {
                tally: Mutex::new(VoteTally::new(cats, dogs)),
                ..Default::default()
            })
        }

        fn results(&self) -> usize {
            self.result_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VoteApi for FakeApi {
        async fn fetch_health(&self) -> Result<HealthStatus, ApiError> {
            if self.health_fails {
                return Err(ApiError::Connectivity("refused".into()));
            }
            Ok(HealthStatus {
                status: "ok".into(),
            })
        }

        async fn fetch_results(&self) -> Result<VoteTally, ApiError> {
            self.result_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(e) = self.results_error.lock().unwrap().clone() {
                return Err(e);
            }
            Ok(*self.tally.lock().unwrap())
        }

        async fn submit_vote(&self, option: VoteOption) -> Result<VoteReceipt, ApiError> {
            self.vote_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(e) = self.vote_error.lock().unwrap().clone() {
                return Err(e);
            }
            if self.reject_votes {
                return Ok(VoteReceipt {
                    ok: false,
                    voted: None,
                    status: 201,
                });
            }
            let mut tally = self.tally.lock().unwrap();
            match option {
                VoteOption::Cats => tally.cats += 1,
                VoteOption::Dogs => tally.dogs += 1,
            }
            Ok(VoteReceipt {
                ok: true,
                voted: Some(option),
                status: 201,
            })
        }
    }

    fn settings() -> PollingConfig {
        PollingConfig {
            interval_ms: PERIOD.as_millis() as u64,
            auto_refresh: true,
            warn_on_network_error: false,
        }
    }

    fn toast_settings() -> NotificationsConfig {
        NotificationsConfig {
            default_duration_ms: 3000,
            ready_duration_ms: 2000,
            toggle_duration_ms: 1500,
            slide_speed: 0.08,
        }
    }

    fn controller(api: Arc<FakeApi>) -> (Controller, mpsc::UnboundedReceiver<ApiEvent>) {
        controller_with(api, settings())
    }

    fn controller_with(
        api: Arc<FakeApi>,
        settings: PollingConfig,
    ) -> (Controller, mpsc::UnboundedReceiver<ApiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Controller::new(api, tx, settings, &toast_settings()), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ApiEvent>) -> Vec<ApiEvent> {
        let mut out = Vec::new();
        while let Ok(evt) = rx.try_recv() {
            out.push(evt);
        }
        out
    }

    /// Drive poll ticks for `window` of (paused) time.
    async fn run_ticks(ctl: &mut Controller, window: Duration) {
        let _ = time::timeout(window, async {
            loop {
                ctl.next_tick().await;
                ctl.on_poll_tick().await;
            }
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn init_fetches_results_and_starts_polling() {
        let api = FakeApi::with_tally(3, 1);
        let (mut ctl, mut rx) = controller(api.clone());

        ctl.init().await;

        assert_eq!(ctl.state(), LifecycleState::Ready);
        assert!(ctl.is_polling());
        assert_eq!(api.results(), 1);
        let events = drain(&mut rx);
        let tally = events
            .iter()
            .position(|e| *e == ApiEvent::Tally(VoteTally::new(3, 1)))
            .unwrap();
        let ready = events
            .iter()
            .position(|e| *e == ApiEvent::State(LifecycleState::Ready))
            .unwrap();
        assert!(tally < ready, "{events:?}");
        assert!(events.contains(&ApiEvent::Notify {
            message: "Ready to vote! 🎉".into(),
            severity: Severity::Success,
            duration: Some(Duration::from_millis(2000)),
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_health_probe_leaves_polling_off() {
        let api = Arc::new(FakeApi {
            health_fails: true,
            ..Default::default()
        });
        let (mut ctl, mut rx) = controller(api.clone());

        ctl.init().await;

        assert_eq!(ctl.state(), LifecycleState::Failed);
        assert!(!ctl.is_polling());
        assert_eq!(api.results(), 0);
        let events = drain(&mut rx);
        assert!(events.contains(&ApiEvent::Notify {
            message: "Error connecting to the server".into(),
            severity: Severity::Error,
            duration: None,
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_keeps_a_single_timer() {
        let api = FakeApi::with_tally(0, 0);
        let (mut ctl, _rx) = controller(api.clone());
        ctl.init().await;
        let before = api.results();

        ctl.start_auto_refresh();
        ctl.start_auto_refresh();
        run_ticks(&mut ctl, PERIOD + Duration::from_millis(500)).await;

        assert_eq!(api.results() - before, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn successful_vote_refreshes_immediately() {
        let api = FakeApi::with_tally(5, 5);
        let (mut ctl, mut rx) = controller(api.clone());
        ctl.init().await;
        drain(&mut rx);

        let receipt = ctl.vote(VoteOption::Cats).await.unwrap();

        assert_eq!(receipt.status, 201);
        assert_eq!(
            drain(&mut rx),
            vec![
                ApiEvent::Busy(Some("Sending vote…".into())),
                ApiEvent::Tally(VoteTally::new(6, 5)),
                ApiEvent::Busy(None),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_vote_hides_overlay_and_skips_refresh() {
        let api = FakeApi::with_tally(2, 2);
        *api.vote_error.lock().unwrap() = Some(ApiError::Network("connection reset".into()));
        let (mut ctl, mut rx) = controller(api.clone());
        ctl.init().await;
        drain(&mut rx);
        let before = api.results();

        let err = ctl.vote(VoteOption::Dogs).await.unwrap_err();

        assert_eq!(err, "Connection error. Check that the server is running.");
        assert_eq!(api.results(), before);
        assert_eq!(
            drain(&mut rx),
            vec![
                ApiEvent::Busy(Some("Sending vote…".into())),
                ApiEvent::Busy(None),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_vote_is_a_failure() {
        let api = Arc::new(FakeApi {
            tally: Mutex::new(VoteTally::new(1, 1)),
            reject_votes: true,
            ..Default::default()
        });
        let (mut ctl, mut rx) = controller(api.clone());
        ctl.init().await;
        drain(&mut rx);
        let before = api.results();

        let err = ctl.vote(VoteOption::Cats).await.unwrap_err();

        assert_eq!(err, "Error sending vote");
        assert_eq!(api.results(), before);
        assert_eq!(drain(&mut rx).last(), Some(&ApiEvent::Busy(None)));
    }

    #[tokio::test(start_paused = true)]
    async fn network_blips_toast_when_configured() {
        let api = FakeApi::with_tally(0, 0);
        let (mut ctl, mut rx) = controller_with(
            api.clone(),
            PollingConfig {
                warn_on_network_error: true,
                ..settings()
            },
        );
        ctl.init().await;
        drain(&mut rx);

        *api.results_error.lock().unwrap() = Some(ApiError::Network("timed out".into()));
        ctl.refresh_results().await;

        assert_eq!(
            drain(&mut rx),
            vec![ApiEvent::Notify {
                message: "Failed to load results".into(),
                severity: Severity::Warning,
                duration: None,
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn network_blips_do_not_toast_but_http_errors_do() {
        let api = FakeApi::with_tally(0, 0);
        let (mut ctl, mut rx) = controller(api.clone());
        ctl.init().await;
        drain(&mut rx);

        *api.results_error.lock().unwrap() = Some(ApiError::Network("timed out".into()));
        ctl.refresh_results().await;
        assert!(drain(&mut rx).is_empty());

        *api.results_error.lock().unwrap() = Some(ApiError::Http { status: 500 });
        ctl.refresh_results().await;
        assert!(matches!(
            drain(&mut rx).as_slice(),
            [ApiEvent::Notify { severity: Severity::Warning, .. }]
        ));
        assert!(ctl.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn hidden_pauses_and_visible_resumes_polling() {
        let api = FakeApi::with_tally(1, 1);
        let (mut ctl, _rx) = controller(api.clone());
        ctl.init().await;

        ctl.set_visible(false);
        let before = api.results();
        run_ticks(&mut ctl, PERIOD * 3).await;
        assert_eq!(api.results(), before);

        ctl.set_visible(true);
        run_ticks(&mut ctl, PERIOD + Duration::from_millis(100)).await;
        assert_eq!(api.results(), before + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_flips_flag_and_timer() {
        let api = FakeApi::with_tally(0, 0);
        let (mut ctl, mut rx) = controller(api.clone());
        ctl.init().await;
        drain(&mut rx);

        let toggle = Some(Duration::from_millis(1500));

        ctl.toggle_auto_refresh();
        assert!(!ctl.is_polling());
        assert_eq!(
            drain(&mut rx),
            vec![
                ApiEvent::Notify {
                    message: "Auto-refresh off".into(),
                    severity: Severity::Info,
                    duration: toggle,
                },
                ApiEvent::AutoRefreshChanged(false),
            ]
        );

        ctl.toggle_auto_refresh();
        assert!(ctl.is_polling());
        assert_eq!(
            drain(&mut rx),
            vec![
                ApiEvent::Notify {
                    message: "Auto-refresh on".into(),
                    severity: Severity::Success,
                    duration: toggle,
                },
                ApiEvent::AutoRefreshChanged(true),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_stops_all_requests() {
        let api = FakeApi::with_tally(0, 0);
        let (mut ctl, _rx) = controller(api.clone());
        ctl.init().await;
        let before = api.results();

        ctl.teardown();
        ctl.refresh_results().await;
        assert!(ctl.vote(VoteOption::Cats).await.is_err());

        assert_eq!(ctl.state(), LifecycleState::Closed);
        assert!(!ctl.is_polling());
        assert_eq!(api.results(), before);
        assert_eq!(api.vote_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn run_loop_reports_votes_and_exits_on_shutdown() {
        let api = FakeApi::with_tally(0, 0);
        let (ctl, mut rx) = controller(api.clone());
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let task = tokio::spawn(ctl.run(cmd_rx));

        cmd_tx.send(ApiCommand::Vote(VoteOption::Dogs)).await.unwrap();
        cmd_tx.send(ApiCommand::Shutdown).await.unwrap();
        task.await.unwrap();

        let events = drain(&mut rx);
        assert!(events.iter().any(|e| matches!(
            e,
            ApiEvent::VoteFinished { option: VoteOption::Dogs, outcome: Ok(_) }
        )));
        assert_eq!(events.last(), Some(&ApiEvent::State(LifecycleState::Closed)));
    }
}
