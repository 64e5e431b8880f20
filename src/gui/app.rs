//! Main window implemented with egui/eframe
//!
//! Left: the control panel of the selected simulator. Center: the live
//! preview. Two more tabs hold the quote builder and the flow editor.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use eframe::{CreationContext, NativeOptions, egui};
use tracing::{debug, info, warn};

use super::components::branding::{self, BrandingAction, BrandingState};
use super::components::flow_editor::{self, FlowEditorState};
use super::components::preview_pane::{Chrome, PreviewPane};
use super::components::quote_editor;
use super::components::simulator_selector::{SelectorAction, SimulatorSelector};
use super::constants::*;
use crate::automation::Flow;
use crate::config::store::SubscriptionId;
use crate::config::{ConfigStore, SimulatorKind, StorageBackend};
use crate::control::{ConfigField, ControlPanel};
use crate::preview::{Palette, PreviewSession};
use crate::quote::{QuoteDraft, open_quote_store};
use crate::tracker::{InteractionTracker, LogTracker};
use crate::upload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Simulator,
    Quote,
    Automation,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Simulator, Tab::Quote, Tab::Automation];

    fn label(&self) -> &'static str {
        match self {
            Tab::Simulator => "📱 Simulador",
            Tab::Quote => "🧾 Cotización",
            Tab::Automation => "💬 Automatización",
        }
    }
}

struct StatusMessage {
    text: String,
    color: egui::Color32,
}

struct SimulatorApp {
    backend: Rc<dyn StorageBackend>,
    tracker: Rc<dyn InteractionTracker>,
    simulator: SimulatorKind,
    panel: ControlPanel,
    session: PreviewSession,
    selector: SimulatorSelector,
    branding: BrandingState,
    preview: PreviewPane,
    quote: ConfigStore<QuoteDraft>,
    flow: Flow,
    flow_state: FlowEditorState,
    tab: Tab,
    status_message: Option<StatusMessage>,
    /// Set by the store subscription whenever the panel writes a new config
    config_changed: Rc<Cell<bool>>,
    config_watch: Option<SubscriptionId>,
}

impl SimulatorApp {
    fn new(_cc: &CreationContext<'_>, backend: Rc<dyn StorageBackend>) -> Self {
        info!("Initializing simulator window");

        let simulator = SimulatorKind::App;
        let tracker: Rc<dyn InteractionTracker> = Rc::new(LogTracker);
        let panel = ControlPanel::new(backend.clone(), simulator);
        let session = PreviewSession::new(simulator, panel.config().template_kind(simulator), tracker.clone());
        let mut branding = BrandingState::new();
        branding.load_from_config(panel.config());

        let mut app = Self {
            quote: open_quote_store(backend.clone()),
            backend,
            tracker,
            simulator,
            panel,
            session,
            selector: SimulatorSelector::new(),
            branding,
            preview: PreviewPane::new(),
            flow: Flow::welcome(),
            flow_state: FlowEditorState::new(),
            tab: Tab::Simulator,
            status_message: None,
            config_changed: Rc::new(Cell::new(false)),
            config_watch: None,
        };
        app.watch_config();
        app
    }

    fn watch_config(&mut self) {
        let changed = self.config_changed.clone();
        self.config_watch = Some(self.panel.store_mut().subscribe(move |_| changed.set(true)));
    }

    fn unwatch_config(&mut self) {
        if let Some(id) = self.config_watch.take() {
            self.panel.store_mut().unsubscribe(id);
        }
    }

    fn set_status(&mut self, text: impl Into<String>, color: egui::Color32) {
        self.status_message = Some(StatusMessage { text: text.into(), color });
    }

    fn open_simulator(&mut self, simulator: SimulatorKind) {
        info!(simulator = ?simulator, "Switching simulator");
        self.unwatch_config();
        self.simulator = simulator;
        self.panel = ControlPanel::new(self.backend.clone(), simulator);
        self.session = PreviewSession::new(
            simulator,
            self.panel.config().template_kind(simulator),
            self.tracker.clone(),
        );
        self.branding.load_from_config(self.panel.config());
        self.preview.clear_textures();
        self.status_message = None;
        self.watch_config();
    }

    /// Start a fresh preview session when the configured template changed
    fn sync_session(&mut self) {
        let template = self.panel.config().template_kind(self.simulator);
        if self.session.template() != template {
            debug!(template = template.id(), "Template changed, restarting preview");
            self.session = PreviewSession::new(self.simulator, template, self.tracker.clone());
        }
    }

    fn apply_branding(&mut self, action: BrandingAction, now: Instant) {
        match action {
            BrandingAction::Apply(field) => {
                self.panel.apply(field);
            }
            BrandingAction::Upload { target, path } => match self.panel.submit_file(target, &path, now) {
                Ok(()) => self.set_status(format!("Leyendo {}...", upload::display_name(&path)), STATUS_PENDING),
                Err(err) => self.set_status(err.to_string(), STATUS_ERROR),
            },
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context, now: Instant) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            let target = self.branding.drop_target().clone();
            let declared = (!file.mime.is_empty()).then_some(file.mime.as_str());
            let result = match (&file.bytes, &file.path) {
                (Some(bytes), path) => {
                    let name = match path {
                        Some(path) if file.name.is_empty() => upload::display_name(path),
                        _ => file.name.clone(),
                    };
                    self.panel.submit_bytes(target, &name, declared, bytes.to_vec(), now)
                }
                (None, Some(path)) => self.panel.submit_file(target, path, now),
                (None, None) => {
                    warn!(name = %file.name, "Dropped file has neither bytes nor a path");
                    continue;
                }
            };
            match result {
                Ok(()) => self.set_status("Leyendo imagen...", STATUS_PENDING),
                Err(err) => self.set_status(err.to_string(), STATUS_ERROR),
            }
        }
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui, now: Instant) {
        let mut selected = self.simulator;
        match self.selector.ui(ui, &mut selected, self.panel.config()) {
            SelectorAction::SwitchSimulator if selected != self.simulator => self.open_simulator(selected),
            SelectorAction::SelectTemplate(kind) => {
                self.panel.apply(ConfigField::Template(kind));
            }
            SelectorAction::Reset => {
                self.panel.reset(now);
                self.branding.load_from_config(self.panel.config());
                self.preview.clear_textures();
                self.set_status("Configuración restablecida", STATUS_OK);
            }
            _ => {}
        }

        ui.add_space(SECTION_SPACING);

        let actions = branding::ui(ui, self.simulator, self.panel.config(), &mut self.branding);
        for action in actions {
            self.apply_branding(action, now);
        }
    }

    fn preview_ui(&mut self, ui: &mut egui::Ui, now: Instant) {
        let config = self.panel.config();
        let palette = Palette::from_config(config);
        let mut view = self.session.render(config);
        view.toasts.extend(self.panel.toasts().visible().iter().cloned());

        let chrome = if self.simulator.uses_device() {
            Chrome::Device(config.device().frame())
        } else {
            Chrome::Browser { title: &config.app_name }
        };
        let actions = self.preview.ui(ui, &view, &palette, chrome);
        for action in actions {
            self.session.dispatch(action, now);
        }
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let persist_error = self
                .panel
                .last_persist_error()
                .or_else(|| self.quote.last_persist_error());
            if let Some(err) = persist_error {
                ui.colored_label(STATUS_ERROR, format!("\u{25CF}  No se pudo guardar: {err}"));
            } else if self.panel.pending_uploads() > 0 {
                ui.colored_label(STATUS_PENDING, "\u{25CF}  Leyendo imagen...");
            } else if let Some(message) = &self.status_message {
                ui.colored_label(message.color, &message.text);
            } else {
                ui.colored_label(STATUS_OK, "\u{25CF}  Cambios guardados");
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let template = self.session.template().info();
                ui.label(
                    egui::RichText::new(format!("{} · {}", self.simulator.label(), template.name))
                        .small()
                        .weak(),
                );
            });
        });
    }

    /// Time until the next timer, upload or animation frame needs a repaint
    fn repaint_delay(&self, now: Instant) -> Duration {
        if self.preview.is_animating() {
            return Duration::from_millis(ANIMATION_REPAINT_MS);
        }
        if self.panel.pending_uploads() > 0 {
            return Duration::from_millis(UPLOAD_POLL_MS);
        }
        let idle = Duration::from_millis(IDLE_REPAINT_MS);
        [self.session.next_deadline(), self.panel.toasts().next_deadline()]
            .into_iter()
            .flatten()
            .min()
            .map_or(idle, |deadline| deadline.saturating_duration_since(now).min(idle))
    }
}

impl eframe::App for SimulatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.handle_dropped_files(ctx, now);
        if self.panel.poll_uploads(now) > 0 {
            self.set_status("Imagen actualizada", STATUS_OK);
        }
        self.panel.tick(now);
        self.session.tick(now);

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.add_space(PADDING);
            ui.horizontal(|ui| {
                ui.heading("JimmyDev Simulator");
                ui.separator();
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.tab, tab, tab.label());
                }
            });
            ui.add_space(PADDING);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.add_space(PADDING / 2.0);
            self.status_bar(ui);
            ui.add_space(PADDING / 2.0);
        });

        match self.tab {
            Tab::Simulator => {
                egui::SidePanel::left("controls")
                    .default_width(SIDE_PANEL_WIDTH)
                    .resizable(true)
                    .show(ctx, |ui| {
                        egui::ScrollArea::vertical().show(ui, |ui| {
                            ui.add_space(PADDING);
                            self.controls_ui(ui, now);
                        });
                    });
                egui::CentralPanel::default().show(ctx, |ui| self.preview_ui(ui, now));
            }
            Tab::Quote => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        let mut draft = self.quote.get().clone();
                        if quote_editor::ui(ui, &mut draft) {
                            self.quote.set(draft);
                        }
                    });
                });
            }
            Tab::Automation => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        if flow_editor::ui(ui, &mut self.flow, &mut self.flow_state) {
                            debug!(flow = %self.flow.name, steps = self.flow.steps().len(), "Flow edited");
                        }
                    });
                });
            }
        }

        if self.config_changed.replace(false) {
            self.sync_session();
            ctx.request_repaint();
        }

        ctx.request_repaint_after(self.repaint_delay(now));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(err) = self.panel.last_persist_error() {
            warn!(error = %err, "Exiting with unsaved simulator config");
        }
        info!("Simulator exiting");
    }
}

pub fn run_gui(backend: Rc<dyn StorageBackend>) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_drag_and_drop(true)
            .with_title("JimmyDev Simulator"),
        ..Default::default()
    };

    eframe::run_native(
        "JimmyDev Simulator",
        options,
        Box::new(move |cc| Ok(Box::new(SimulatorApp::new(cc, backend)))),
    )
    .map_err(|err| anyhow!("Failed to launch simulator window: {err}"))
}
