use eframe::egui;

use crate::config::{SimulatorConfig, SimulatorKind};
use crate::gui::constants::*;
use crate::templates::{TemplateKind, TemplateRegistry};

pub struct SimulatorSelector {
    show_reset_confirm: bool,
}

impl SimulatorSelector {
    pub fn new() -> Self {
        Self { show_reset_confirm: false }
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        selected: &mut SimulatorKind,
        config: &SimulatorConfig,
    ) -> SelectorAction {
        let mut action = SelectorAction::None;

        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Simulador:").strong());

                egui::ComboBox::from_id_salt("simulator_selector")
                    .selected_text(selected.label())
                    .show_ui(ui, |ui| {
                        for kind in SimulatorKind::ALL {
                            if ui.selectable_value(selected, kind, kind.label()).clicked() {
                                action = SelectorAction::SwitchSimulator;
                            }
                        }
                    });
            });

            ui.add_space(ITEM_SPACING);

            let registry = TemplateRegistry::for_simulator(*selected);
            let current = config.template_kind(*selected);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Plantilla:").strong());

                let info = current.info();
                egui::ComboBox::from_id_salt("template_selector")
                    .selected_text(format!("{} {}", info.icon.glyph(), info.name))
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for kind in registry.templates() {
                            let info = kind.info();
                            let label = format!("{} {} - {}", info.icon.glyph(), info.name, info.description);
                            if ui.selectable_label(*kind == current, label).clicked() && *kind != current {
                                action = SelectorAction::SelectTemplate(*kind);
                            }
                        }
                    });
            });
            ui.label(egui::RichText::new(current.info().description).small().weak());

            ui.add_space(ITEM_SPACING);

            ui.horizontal(|ui| {
                if ui.button("↺ Restablecer").clicked() {
                    self.show_reset_confirm = true;
                }
            });
        });

        if self.show_reset_confirm {
            action = self.reset_confirm_dialog(ui.ctx(), *selected);
        }

        action
    }

    fn reset_confirm_dialog(&mut self, ctx: &egui::Context, simulator: SimulatorKind) -> SelectorAction {
        let mut action = SelectorAction::None;

        egui::Window::new("Restablecer configuración")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("¿Volver a los valores por defecto de {}?", simulator.label()));
                ui.colored_label(STATUS_ERROR, "Se borrarán el logo y las imágenes subidas.");

                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    if ui.button("Restablecer").clicked() {
                        action = SelectorAction::Reset;
                        self.show_reset_confirm = false;
                    }

                    if ui.button("Cancelar").clicked() {
                        self.show_reset_confirm = false;
                    }
                });
            });

        action
    }
}

impl Default for SimulatorSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectorAction {
    None,
    SwitchSimulator,
    SelectTemplate(TemplateKind),
    Reset,
}
