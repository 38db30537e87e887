//! Application state and input handling.
//!
//! `App` is the single source of truth for what is on screen. It is only
//! mutated from the main event loop, so no `Arc<Mutex<>>` is needed. Network
//! work is requested through `AppAction::Api` and its results come back as
//! `ApiEvent`s.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::types::*;
use crate::notify::{BusyIndicator, NotificationQueue};
use crate::results::ResultsView;

// ─── Input modes ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Help overlay is open; keys only close it.
    Help,
}

// ─── Vote controls ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

/// One voting button. Disabled while its submission is in flight, so each
/// control has at most one request outstanding.
#[derive(Debug, Clone)]
pub struct VoteControl {
    pub option: VoteOption,
    state: SubmissionState,
}

impl VoteControl {
    pub fn new(option: VoteOption) -> Self {
        Self {
            option,
            state: SubmissionState::Idle,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state == SubmissionState::Idle
    }

    /// Click. Returns `false` if the control is disabled and the click is
    /// ignored.
    pub fn begin(&mut self) -> bool {
        if self.state == SubmissionState::Submitting {
            return false;
        }
        self.state = SubmissionState::Submitting;
        true
    }

    /// Response arrived. Returns `false` if the control was already idle.
    pub fn finish(&mut self) -> bool {
        if self.state == SubmissionState::Idle {
            return false;
        }
        self.state = SubmissionState::Idle;
        true
    }

    pub fn label(&self) -> String {
        match self.state {
            SubmissionState::Idle => format!("Vote for {}", self.option.display_name()),
            SubmissionState::Submitting => "Sending…".to_string(),
        }
    }
}

// ─── Actions produced by input handling ─────────────────────────────────────

/// Actions that the main loop should execute after processing input.
#[derive(Debug, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    /// Send a command to the controller task.
    Api(ApiCommand),
    /// Event was consumed and needs no further action.
    Consumed,
}

// ─── App state ──────────────────────────────────────────────────────────────

pub struct App {
    pub controls: [VoteControl; 2],
    /// Last rendered tally, `None` until the first fetch lands.
    pub results: Option<ResultsView>,
    pub notifications: NotificationQueue,
    pub busy: BusyIndicator,
    pub lifecycle: LifecycleState,
    pub auto_refresh: bool,
    /// Whether the terminal currently has focus.
    pub visible: bool,
    pub input_mode: InputMode,
    /// Monotonic tick counter for animations.
    pub tick_count: u64,
    pub running: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            controls: VoteOption::ALL.map(VoteControl::new),
            results: None,
            notifications: NotificationQueue::new(),
            busy: BusyIndicator::default(),
            lifecycle: LifecycleState::Uninitialized,
            auto_refresh: crate::config::get().polling.auto_refresh,
            visible: true,
            input_mode: InputMode::Normal,
            tick_count: 0,
            running: true,
        }
    }

    pub fn control(&self, option: VoteOption) -> &VoteControl {
        &self.controls[option as usize]
    }

    fn control_mut(&mut self, option: VoteOption) -> &mut VoteControl {
        &mut self.controls[option as usize]
    }

    /// Show a toast with the configured default duration.
    pub fn toast(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        let duration =
            Duration::from_millis(crate::config::get().notifications.default_duration_ms);
        self.notifications.show(message, severity, duration, now);
    }

    // ── Tick handling ───────────────────────────────────────────────────

    /// Called on every animation tick.
    pub fn on_tick(&mut self, now: Instant) {
        self.tick_count = self.tick_count.wrapping_add(1);
        let speed = crate::config::get().notifications.slide_speed;
        self.notifications.animate(speed);
        self.notifications.prune_expired(now);
    }

    // ── Controller event handling ───────────────────────────────────────

    /// Apply an event from the controller task to the app state.
    pub fn handle_api_event(&mut self, event: ApiEvent, now: Instant) {
        match event {
            ApiEvent::State(state) => {
                self.lifecycle = state;
            }

            ApiEvent::Tally(tally) => {
                self.results = Some(ResultsView::from_tally(&tally));
            }

            ApiEvent::Busy(Some(message)) => self.busy.show(message),
            ApiEvent::Busy(None) => self.busy.hide(),

            ApiEvent::VoteFinished { option, outcome } => {
                self.control_mut(option).finish();
                match outcome {
                    Ok(_) => {
                        let message = format!(
                            "Thanks for voting for the {}! {}",
                            option.display_name(),
                            option.emoji()
                        );
                        self.toast(message, Severity::Success, now);
                    }
                    Err(message) => self.toast(message, Severity::Error, now),
                }
            }

            ApiEvent::AutoRefreshChanged(on) => {
                self.auto_refresh = on;
            }

            ApiEvent::Notify {
                message,
                severity,
                duration,
            } => match duration {
                Some(d) => {
                    self.notifications.show(message, severity, d, now);
                }
                None => self.toast(message, severity, now),
            },
        }
    }

    /// Terminal focus changed.
    pub fn set_visible(&mut self, visible: bool) -> AppAction {
        if self.visible == visible {
            return AppAction::Consumed;
        }
        self.visible = visible;
        AppAction::Api(ApiCommand::SetVisible(visible))
    }

    // ── Input handling ──────────────────────────────────────────────────

    /// Process a key event and return an action for the main loop.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        // Ctrl+C always quits (system convention, non-configurable).
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return AppAction::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Help => self.handle_help_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> AppAction {
        let kb = &crate::config::get().keys;

        match key.code {
            c if c == kb.quit => AppAction::Quit,

            c if c == kb.vote_cats => self.click(VoteOption::Cats),
            c if c == kb.vote_dogs => self.click(VoteOption::Dogs),

            c if c == kb.toggle_refresh => AppAction::Api(ApiCommand::ToggleAutoRefresh),
            c if c == kb.refresh => AppAction::Api(ApiCommand::Refresh),

            c if c == kb.dismiss || c == KeyCode::Esc => {
                self.notifications.dismiss_selected();
                AppAction::Consumed
            }

            c if c == kb.next_toast => {
                self.notifications.select_next();
                AppAction::Consumed
            }

            c if c == kb.focus_error => {
                if let Some(id) = self.notifications.latest(Severity::Error).map(|n| n.id) {
                    self.notifications.select(id);
                }
                AppAction::Consumed
            }

            c if c == kb.help => {
                self.input_mode = InputMode::Help;
                AppAction::Consumed
            }

            _ => AppAction::Consumed,
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) -> AppAction {
        let kb = &crate::config::get().keys;
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
            }
            c if c == kb.help || c == kb.quit => {
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
        AppAction::Consumed
    }

    /// Press a vote button. Ignored while the overlay is up, before the
    /// controller is ready, or while that control is already submitting.
    fn click(&mut self, option: VoteOption) -> AppAction {
        if self.busy.is_visible() || self.lifecycle != LifecycleState::Ready {
            return AppAction::Consumed;
        }
        if self.control_mut(option).begin() {
            AppAction::Api(ApiCommand::Vote(option))
        } else {
            AppAction::Consumed
        }
    }
}
