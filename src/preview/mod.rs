//! Interactive template previews
//!
//! A [`PreviewSession`] owns the ephemeral state of the template currently on
//! screen. Each template is a screen controller with explicit transitions;
//! the session adds what they all share: interaction tracking, toasts,
//! simulated network latency and failures, and the timers behind them.
//!
//! Network-like actions are split in two. [`Screen::handle`] returns a
//! request, the session shows the loading overlay and schedules the commit
//! after the simulated latency. Navigating or starting another request
//! cancels the pending commit, so a late result never lands on a screen the
//! user already left.

pub mod blog;
pub mod dashboard;
pub mod ecommerce;
pub mod fitness;
pub mod node;
pub mod portfolio;
pub mod social;
pub mod theme;
pub mod tilt;

use std::rc::Rc;
use std::time::{Duration, Instant};

use serde_json::{Value, json};
use tracing::{debug, info, warn};

pub use node::{Icon, Overlay, PreviewNode, PreviewView};
pub use theme::Palette;

use crate::config::{SimulatorConfig, SimulatorKind};
use crate::constants::{fitness as fitness_consts, network};
use crate::network::NetworkSimulator;
use crate::notify::{Notification, Toasts};
use crate::tasks::{TaskHandle, Timers};
use crate::templates::TemplateKind;
use crate::tracker::InteractionTracker;

/// Something the user can do inside a preview
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewAction {
    Ecommerce(ecommerce::Action),
    Social(social::Action),
    Fitness(fitness::Action),
    Dashboard(dashboard::Action),
    Blog(blog::Action),
    Portfolio(portfolio::Action),
    DismissError,
    RetryError,
}

impl PreviewAction {
    /// The same field edit carrying `text`; any other action is returned unchanged
    pub fn with_text(self, text: String) -> Self {
        match self {
            PreviewAction::Dashboard(dashboard::Action::EditField(field, _)) => {
                PreviewAction::Dashboard(dashboard::Action::EditField(field, text))
            }
            PreviewAction::Portfolio(portfolio::Action::EditField(field, _)) => {
                PreviewAction::Portfolio(portfolio::Action::EditField(field, text))
            }
            other => other,
        }
    }
}

/// Outcome of one action on a screen
#[derive(Debug)]
pub struct Reaction<C> {
    /// Tracked event name; `None` means the action was not valid here
    pub event: Option<&'static str>,
    pub payload: Option<Value>,
    /// The visible screen changed
    pub navigated: bool,
    pub notice: Option<Notification>,
    /// Deferred effect to apply after the simulated latency
    pub request: Option<C>,
}

impl<C> Reaction<C> {
    pub fn new(event: &'static str) -> Self {
        Self {
            event: Some(event),
            payload: None,
            navigated: false,
            notice: None,
            request: None,
        }
    }

    /// The action does not apply in the current state, or only edited a form buffer
    pub fn ignored() -> Self {
        Self {
            event: None,
            payload: None,
            navigated: false,
            notice: None,
            request: None,
        }
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn navigation(mut self) -> Self {
        self.navigated = true;
        self
    }

    pub fn notify(mut self, notice: Notification) -> Self {
        self.notice = Some(notice);
        self
    }

    pub fn request(mut self, commit: C) -> Self {
        self.request = Some(commit);
        self
    }

    fn map_request<D>(self, f: impl FnOnce(C) -> D) -> Reaction<D> {
        Reaction {
            event: self.event,
            payload: self.payload,
            navigated: self.navigated,
            notice: self.notice,
            request: self.request.map(f),
        }
    }
}

/// Screen controller of one template
pub trait Screen {
    type Action;
    type Commit;

    fn handle(&mut self, action: Self::Action) -> Reaction<Self::Commit>;

    /// Apply a request whose simulated latency elapsed without failure
    fn commit(&mut self, commit: Self::Commit) -> Option<Notification>;

    /// Whether the one-second clock should be running
    fn wants_clock(&self) -> bool {
        false
    }

    fn on_clock(&mut self) {}

    fn render(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode;
}

enum ScreenState {
    Ecommerce(ecommerce::EcommerceScreen),
    Social(social::SocialScreen),
    Fitness(fitness::FitnessScreen),
    Dashboard(dashboard::DashboardScreen),
    Blog(blog::BlogScreen),
    Portfolio(portfolio::PortfolioScreen),
}

impl ScreenState {
    fn new(template: TemplateKind) -> Self {
        match template {
            TemplateKind::Ecommerce => ScreenState::Ecommerce(Default::default()),
            TemplateKind::Social => ScreenState::Social(Default::default()),
            TemplateKind::Fitness => ScreenState::Fitness(Default::default()),
            TemplateKind::Dashboard => ScreenState::Dashboard(Default::default()),
            TemplateKind::Blog => ScreenState::Blog(Default::default()),
            TemplateKind::Portfolio => ScreenState::Portfolio(Default::default()),
        }
    }

    fn handle(&mut self, action: PreviewAction) -> Option<Reaction<PendingCommit>> {
        let reaction = match (self, action) {
            (ScreenState::Ecommerce(s), PreviewAction::Ecommerce(a)) => {
                s.handle(a).map_request(PendingCommit::Ecommerce)
            }
            (ScreenState::Social(s), PreviewAction::Social(a)) => s.handle(a).map_request(PendingCommit::Social),
            (ScreenState::Fitness(s), PreviewAction::Fitness(a)) => s.handle(a).map_request(PendingCommit::Fitness),
            (ScreenState::Dashboard(s), PreviewAction::Dashboard(a)) => {
                s.handle(a).map_request(PendingCommit::Dashboard)
            }
            (ScreenState::Blog(s), PreviewAction::Blog(a)) => s.handle(a).map_request(PendingCommit::Blog),
            (ScreenState::Portfolio(s), PreviewAction::Portfolio(a)) => {
                s.handle(a).map_request(PendingCommit::Portfolio)
            }
            _ => return None,
        };
        Some(reaction)
    }

    fn commit(&mut self, commit: PendingCommit) -> Option<Notification> {
        match (self, commit) {
            (ScreenState::Ecommerce(s), PendingCommit::Ecommerce(c)) => s.commit(c),
            (ScreenState::Social(s), PendingCommit::Social(c)) => s.commit(c),
            (ScreenState::Fitness(s), PendingCommit::Fitness(c)) => s.commit(c),
            (ScreenState::Dashboard(s), PendingCommit::Dashboard(c)) => s.commit(c),
            (ScreenState::Blog(s), PendingCommit::Blog(c)) => s.commit(c),
            (ScreenState::Portfolio(s), PendingCommit::Portfolio(c)) => s.commit(c),
            (_, commit) => {
                warn!(?commit, "Dropping commit for a different template");
                None
            }
        }
    }

    fn wants_clock(&self) -> bool {
        match self {
            ScreenState::Fitness(s) => s.wants_clock(),
            _ => false,
        }
    }

    fn on_clock(&mut self) {
        if let ScreenState::Fitness(s) = self {
            s.on_clock();
        }
    }

    fn render(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        match self {
            ScreenState::Ecommerce(s) => s.render(config, palette),
            ScreenState::Social(s) => s.render(config, palette),
            ScreenState::Fitness(s) => s.render(config, palette),
            ScreenState::Dashboard(s) => s.render(config, palette),
            ScreenState::Blog(s) => s.render(config, palette),
            ScreenState::Portfolio(s) => s.render(config, palette),
        }
    }
}

#[derive(Debug)]
enum PendingCommit {
    Ecommerce(ecommerce::Commit),
    Social(social::Commit),
    Fitness(fitness::Commit),
    Dashboard(dashboard::Commit),
    Blog(blog::Commit),
    Portfolio(portfolio::Commit),
}

enum Deferred {
    Commit { event: &'static str, commit: PendingCommit },
    DismissError,
    Clock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionError {
    /// Event name of the request that failed
    pub action: &'static str,
    pub message: String,
}

pub struct PreviewSession {
    template: TemplateKind,
    screen: ScreenState,
    timers: Timers<Deferred>,
    pending_request: Option<TaskHandle>,
    error_dismiss: Option<TaskHandle>,
    clock: Option<TaskHandle>,
    /// Deadline of the scheduled clock tick; the next one is counted from it
    clock_due: Option<Instant>,
    error: Option<ConnectionError>,
    network: NetworkSimulator,
    toasts: Toasts,
    tracker: Rc<dyn InteractionTracker>,
}

impl PreviewSession {
    pub fn new(simulator: SimulatorKind, template: TemplateKind, tracker: Rc<dyn InteractionTracker>) -> Self {
        Self::with_network(simulator, template, tracker, NetworkSimulator::new())
    }

    pub fn with_network(
        simulator: SimulatorKind,
        template: TemplateKind,
        tracker: Rc<dyn InteractionTracker>,
        network: NetworkSimulator,
    ) -> Self {
        debug!(simulator = ?simulator, template = template.id(), "Starting preview session");
        Self {
            template,
            screen: ScreenState::new(template),
            timers: Timers::new(),
            pending_request: None,
            error_dismiss: None,
            clock: None,
            clock_due: None,
            error: None,
            network,
            toasts: Toasts::new(),
            tracker,
        }
    }

    pub fn template(&self) -> TemplateKind {
        self.template
    }

    /// A simulated request is in flight
    pub fn is_loading(&self) -> bool {
        self.pending_request
            .as_ref()
            .is_some_and(|handle| self.timers.is_pending(handle))
    }

    pub fn error(&self) -> Option<&ConnectionError> {
        self.error.as_ref()
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.timers.next_deadline(), self.toasts.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn dispatch(&mut self, action: PreviewAction, now: Instant) {
        match action {
            PreviewAction::DismissError => self.clear_error("dismiss_error"),
            PreviewAction::RetryError => self.clear_error("retry_connection"),
            action => {
                let Some(reaction) = self.screen.handle(action.clone()) else {
                    warn!(template = self.template.id(), ?action, "Action does not belong to the active template");
                    return;
                };
                self.apply(reaction, now);
            }
        }
        self.sync_clock(now);
    }

    fn apply(&mut self, reaction: Reaction<PendingCommit>, now: Instant) {
        let Some(event) = reaction.event else {
            debug!(template = self.template.id(), "Action produced no tracked event");
            return;
        };
        self.tracker.record(event, reaction.payload.as_ref());

        if reaction.navigated || reaction.request.is_some() {
            self.cancel_pending_request();
        }
        if let Some(commit) = reaction.request {
            let handle = self
                .timers
                .schedule(now, self.network.latency(), Deferred::Commit { event, commit });
            self.pending_request = Some(handle);
        }
        if let Some(notice) = reaction.notice {
            self.toasts.push(notice, now);
        }
    }

    fn cancel_pending_request(&mut self) {
        if let Some(handle) = self.pending_request.take() {
            if self.timers.is_pending(&handle) {
                debug!(template = self.template.id(), "Cancelling pending request");
            }
            handle.cancel();
        }
    }

    fn clear_error(&mut self, event: &'static str) {
        if let Some(handle) = self.error_dismiss.take() {
            handle.cancel();
        }
        if let Some(error) = self.error.take() {
            self.tracker.record(event, Some(&json!({ "action": error.action })));
        }
    }

    /// Run every effect that is due
    pub fn tick(&mut self, now: Instant) {
        self.toasts.poll(now);
        for effect in self.timers.poll(now) {
            match effect {
                Deferred::Commit { event, commit } => self.finish_request(event, commit, now),
                Deferred::DismissError => {
                    self.error_dismiss = None;
                    if self.error.take().is_some() {
                        debug!(template = self.template.id(), "Connection error dismissed automatically");
                    }
                }
                Deferred::Clock => self.run_clock(now),
            }
        }
        self.sync_clock(now);
    }

    fn finish_request(&mut self, event: &'static str, commit: PendingCommit, now: Instant) {
        self.pending_request = None;
        if self.network.roll_failure() {
            info!(template = self.template.id(), action = event, "Simulated connection error");
            self.tracker
                .record("connection_error", Some(&json!({ "action": event })));
            if let Some(handle) = self.error_dismiss.take() {
                handle.cancel();
            }
            self.error = Some(ConnectionError {
                action: event,
                message: network::CONNECTION_ERROR_MESSAGE.to_string(),
            });
            self.error_dismiss = Some(self.timers.schedule(
                now,
                Duration::from_millis(network::ERROR_DISMISS_MS),
                Deferred::DismissError,
            ));
            return;
        }
        if let Some(notice) = self.screen.commit(commit) {
            self.toasts.push(notice, now);
        }
    }

    /// Advance the clock once per elapsed interval, counted from the previous deadline
    fn run_clock(&mut self, now: Instant) {
        let interval = Duration::from_millis(fitness_consts::TICK_MS);
        let mut due = self.clock_due.take().unwrap_or(now);
        self.clock = None;
        loop {
            self.screen.on_clock();
            due += interval;
            if !self.screen.wants_clock() {
                return;
            }
            if due > now {
                break;
            }
        }
        self.schedule_clock(now, due);
    }

    fn schedule_clock(&mut self, now: Instant, due: Instant) {
        let delay = due.saturating_duration_since(now);
        self.clock = Some(self.timers.schedule(now, delay, Deferred::Clock));
        self.clock_due = Some(due);
    }

    fn sync_clock(&mut self, now: Instant) {
        let running = self.clock.as_ref().is_some_and(|h| self.timers.is_pending(h));
        match (self.screen.wants_clock(), running) {
            (true, false) => {
                self.schedule_clock(now, now + Duration::from_millis(fitness_consts::TICK_MS));
            }
            (false, true) => {
                self.clock_due = None;
                if let Some(handle) = self.clock.take() {
                    handle.cancel();
                }
            }
            _ => {}
        }
    }

    pub fn render(&self, config: &SimulatorConfig) -> PreviewView {
        let palette = Palette::from_config(config);
        let overlay = match (&self.error, self.is_loading()) {
            (Some(error), _) => Some(Overlay::ConnectionError { message: error.message.clone() }),
            (None, true) => Some(Overlay::Loading),
            (None, false) => None,
        };
        PreviewView {
            root: self.screen.render(config, &palette),
            overlay,
            toasts: self.toasts.visible().to_vec(),
        }
    }

    #[cfg(test)]
    fn ecommerce(&self) -> Option<&ecommerce::EcommerceScreen> {
        match &self.screen {
            ScreenState::Ecommerce(s) => Some(s),
            _ => None,
        }
    }

    #[cfg(test)]
    fn fitness(&self) -> Option<&fitness::FitnessScreen> {
        match &self.screen {
            ScreenState::Fitness(s) => Some(s),
            _ => None,
        }
    }
}

/// Format an amount in cents as `1,299.99`
pub fn format_price(cents: u64) -> String {
    let units = cents / 100;
    let mut grouped = String::new();
    let digits = units.to_string();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeLevel;
    use crate::tracker::RecordingTracker;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn session(template: TemplateKind, failure_rate: f64) -> (PreviewSession, Rc<RecordingTracker>) {
        let tracker = Rc::new(RecordingTracker::new());
        let session = PreviewSession::with_network(
            SimulatorKind::Showcase,
            template,
            tracker.clone(),
            NetworkSimulator::with_failure_rate(failure_rate),
        );
        (session, tracker)
    }

    fn shop(action: ecommerce::Action) -> PreviewAction {
        PreviewAction::Ecommerce(action)
    }

    #[test]
    fn test_network_action_applies_after_latency() {
        let start = Instant::now();
        let (mut session, tracker) = session(TemplateKind::Ecommerce, 0.0);

        session.dispatch(shop(ecommerce::Action::AddToCart(1)), start);
        assert!(session.is_loading());
        assert_eq!(session.ecommerce().map(|s| s.cart_count()), Some(0));

        session.tick(start + ms(network::LATENCY_MS - 1));
        assert!(session.is_loading());

        session.tick(start + ms(network::LATENCY_MS));
        assert!(!session.is_loading());
        assert_eq!(session.ecommerce().map(|s| s.cart_count()), Some(1));
        assert_eq!(session.toasts().count(NoticeLevel::Success), 1);
        assert_eq!(tracker.names(), vec!["add_to_cart"]);
    }

    #[test]
    fn test_scenario_total_through_session() {
        let mut now = Instant::now();
        let (mut session, _) = session(TemplateKind::Ecommerce, 0.0);
        for id in [1, 3, 3] {
            session.dispatch(shop(ecommerce::Action::AddToCart(id)), now);
            now += ms(network::LATENCY_MS);
            session.tick(now);
        }
        let screen = session.ecommerce().expect("ecommerce screen");
        assert_eq!(screen.total_cents(), 229_997);
        assert_eq!(format_price(screen.total_cents()), "$2,299.97");
    }

    #[test]
    fn test_navigation_cancels_pending_commit() {
        let start = Instant::now();
        let (mut session, _) = session(TemplateKind::Ecommerce, 1.0);

        session.dispatch(shop(ecommerce::Action::OpenProduct(1)), start);
        session.dispatch(shop(ecommerce::Action::AddToCart(1)), start);
        session.dispatch(shop(ecommerce::Action::Back), start + ms(100));
        assert!(!session.is_loading());

        session.tick(start + ms(10_000));
        assert!(session.error().is_none(), "stale request must not surface an error");
        assert_eq!(session.ecommerce().map(|s| s.cart_count()), Some(0));
    }

    #[test]
    fn test_newer_request_replaces_older() {
        let start = Instant::now();
        let (mut session, _) = session(TemplateKind::Ecommerce, 0.0);

        session.dispatch(shop(ecommerce::Action::AddToCart(1)), start);
        session.dispatch(shop(ecommerce::Action::AddToCart(2)), start + ms(400));
        session.tick(start + ms(network::LATENCY_MS));
        assert_eq!(session.ecommerce().map(|s| s.cart_count()), Some(0));

        session.tick(start + ms(400 + network::LATENCY_MS));
        let screen = session.ecommerce().expect("ecommerce screen");
        assert_eq!(screen.cart_count(), 1);
        assert_eq!(screen.quantity_of(2), 1);
    }

    #[test]
    fn test_failure_shows_modal_then_auto_dismisses() {
        let start = Instant::now();
        let (mut session, tracker) = session(TemplateKind::Ecommerce, 1.0);
        let config = SimulatorConfig::default_for(SimulatorKind::Showcase);

        session.dispatch(shop(ecommerce::Action::AddToCart(1)), start);
        let failed_at = start + ms(network::LATENCY_MS);
        session.tick(failed_at);

        assert_eq!(session.error().map(|e| e.action), Some("add_to_cart"));
        assert!(matches!(session.render(&config).overlay, Some(Overlay::ConnectionError { .. })));
        assert_eq!(session.ecommerce().map(|s| s.cart_count()), Some(0));
        assert!(tracker.names().contains(&"connection_error".to_string()));

        session.tick(failed_at + ms(network::ERROR_DISMISS_MS - 1));
        assert!(session.error().is_some());
        session.tick(failed_at + ms(network::ERROR_DISMISS_MS));
        assert!(session.error().is_none());
        assert_eq!(session.render(&config).overlay, None);
    }

    #[test]
    fn test_retry_only_clears_error() {
        let start = Instant::now();
        let (mut session, tracker) = session(TemplateKind::Ecommerce, 1.0);

        session.dispatch(shop(ecommerce::Action::AddToCart(1)), start);
        session.tick(start + ms(network::LATENCY_MS));
        session.dispatch(PreviewAction::RetryError, start + ms(network::LATENCY_MS + 10));

        assert!(session.error().is_none());
        assert!(!session.is_loading());
        assert_eq!(session.next_deadline(), None);
        assert_eq!(tracker.names().last().map(String::as_str), Some("retry_connection"));
    }

    #[test]
    fn test_foreign_action_is_ignored() {
        let (mut session, tracker) = session(TemplateKind::Blog, 0.0);
        session.dispatch(shop(ecommerce::Action::OpenCart), Instant::now());
        assert!(tracker.names().is_empty());
    }

    #[test]
    fn test_workout_clock_runs_only_while_active() {
        let start = Instant::now();
        let (mut session, _) = session(TemplateKind::Fitness, 0.0);
        assert_eq!(session.next_deadline(), None);

        session.dispatch(PreviewAction::Fitness(fitness::Action::StartWorkout(0)), start);
        let started = start + ms(network::LATENCY_MS);
        session.tick(started);
        assert!(session.fitness().is_some_and(|s| s.is_running()));

        for second in 1..=3 {
            session.tick(started + ms(fitness_consts::TICK_MS * second));
        }
        assert_eq!(session.fitness().map(|s| s.elapsed_seconds()), Some(3));

        session.dispatch(PreviewAction::Fitness(fitness::Action::PauseWorkout), started + ms(3_500));
        session.tick(started + ms(10_000));
        assert_eq!(session.fitness().map(|s| s.elapsed_seconds()), Some(3));
    }

    fn rendered_sign_in(session: &PreviewSession, config: &SimulatorConfig) -> PreviewAction {
        session
            .render(config)
            .root
            .actions()
            .into_iter()
            .find(|action| matches!(action, PreviewAction::Dashboard(dashboard::Action::SignIn { .. })))
            .expect("sign-in form has a submit button")
    }

    #[test]
    fn test_typed_wrong_credentials_fail_without_request() {
        let start = Instant::now();
        let (mut session, tracker) = session(TemplateKind::Dashboard, 0.0);
        let config = SimulatorConfig::default_for(SimulatorKind::Showcase);
        let edit = |field, text: &str| PreviewAction::Dashboard(dashboard::Action::EditField(field, text.to_string()));

        session.dispatch(edit(dashboard::Field::Email, crate::constants::demo::EMAIL), start);
        session.dispatch(edit(dashboard::Field::Password, "incorrecta"), start);
        session.dispatch(rendered_sign_in(&session, &config), start);

        assert!(!session.is_loading());
        assert_eq!(session.toasts().count(NoticeLevel::Error), 1);
        assert_eq!(session.toasts().visible().len(), 1);
        assert_eq!(tracker.names(), vec!["sign_in_failed"]);

        session.tick(start + ms(network::LATENCY_MS * 2));
        assert!(session.render(&config).outline().contains("Iniciar sesión"));
    }

    #[test]
    fn test_typed_demo_credentials_sign_in() {
        let start = Instant::now();
        let (mut session, tracker) = session(TemplateKind::Dashboard, 0.0);
        let config = SimulatorConfig::default_for(SimulatorKind::Showcase);
        let edit = |field, text: &str| PreviewAction::Dashboard(dashboard::Action::EditField(field, text.to_string()));

        session.dispatch(edit(dashboard::Field::Email, crate::constants::demo::EMAIL), start);
        session.dispatch(edit(dashboard::Field::Password, crate::constants::demo::PASSWORD), start);
        session.dispatch(rendered_sign_in(&session, &config), start);
        assert!(session.is_loading());

        session.tick(start + ms(network::LATENCY_MS));
        assert_eq!(tracker.names(), vec!["sign_in"]);
        assert_eq!(session.toasts().count(NoticeLevel::Success), 1);
        assert!(!session.render(&config).outline().contains("Iniciar sesión"));
    }

    #[test]
    fn test_workout_clock_keeps_cadence_when_frames_are_late() {
        let start = Instant::now();
        let (mut session, _) = session(TemplateKind::Fitness, 0.0);
        let tick = fitness_consts::TICK_MS;

        session.dispatch(PreviewAction::Fitness(fitness::Action::StartWorkout(0)), start);
        let started = start + ms(network::LATENCY_MS);
        session.tick(started);

        session.tick(started + ms(tick + 400));
        assert_eq!(session.fitness().map(|s| s.elapsed_seconds()), Some(1));
        assert_eq!(session.next_deadline(), Some(started + ms(tick * 2)));

        session.tick(started + ms(tick * 2));
        assert_eq!(session.fitness().map(|s| s.elapsed_seconds()), Some(2));

        // A stalled frame catches up on every missed second
        session.tick(started + ms(tick * 5 + 10));
        assert_eq!(session.fitness().map(|s| s.elapsed_seconds()), Some(5));
        assert_eq!(session.next_deadline(), Some(started + ms(tick * 6)));
    }

    #[test]
    fn test_render_shows_loading_overlay() {
        let start = Instant::now();
        let (mut session, _) = session(TemplateKind::Ecommerce, 0.0);
        let config = SimulatorConfig::default_for(SimulatorKind::Showcase);
        session.dispatch(shop(ecommerce::Action::AddToCart(1)), start);
        assert_eq!(session.render(&config).overlay, Some(Overlay::Loading));
    }

    #[test]
    fn test_format_price_groups_thousands() {
        assert_eq!(format_price(0), "$0.00");
        assert_eq!(format_price(49_999), "$499.99");
        assert_eq!(format_price(129_999), "$1,299.99");
        assert_eq!(format_price(123_456_789), "$1,234,567.89");
    }
}
