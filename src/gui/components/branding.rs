//! Branding controls: name, colors, dark mode, device and images

use std::collections::HashMap;
use std::path::PathBuf;

use eframe::egui;

use crate::color::HexColor;
use crate::config::{SimulatorConfig, SimulatorKind};
use crate::constants::upload as upload_consts;
use crate::control::ConfigField;
use crate::device::DeviceModel;
use crate::gui::constants::*;
use crate::upload::ImageTarget;

/// Edits requested by the branding controls
#[derive(Debug, Clone, PartialEq)]
pub enum BrandingAction {
    Apply(ConfigField),
    Upload { target: ImageTarget, path: PathBuf },
}

/// Text buffers behind the branding controls
pub struct BrandingState {
    app_name: String,
    primary_color: String,
    secondary_color: String,
    image_paths: HashMap<String, String>,
    drop_target: ImageTarget,
}

impl BrandingState {
    pub fn new() -> Self {
        Self {
            app_name: String::new(),
            primary_color: String::new(),
            secondary_color: String::new(),
            image_paths: HashMap::new(),
            drop_target: ImageTarget::Logo,
        }
    }

    /// Load text buffers from the stored config
    pub fn load_from_config(&mut self, config: &SimulatorConfig) {
        self.app_name = config.app_name.clone();
        self.primary_color = config.primary_color.clone();
        self.secondary_color = config.secondary_color.clone();
        self.image_paths.clear();
        self.drop_target = ImageTarget::Logo;
    }

    /// Slot that receives files dropped onto the window
    pub fn drop_target(&self) -> &ImageTarget {
        &self.drop_target
    }
}

impl Default for BrandingState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn ui(
    ui: &mut egui::Ui,
    simulator: SimulatorKind,
    config: &SimulatorConfig,
    state: &mut BrandingState,
) -> Vec<BrandingAction> {
    let mut actions = Vec::new();

    ui.group(|ui| {
        ui.label(egui::RichText::new("Marca").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            ui.label("Nombre:");
            let text_edit = egui::TextEdit::singleline(&mut state.app_name).desired_width(200.0);
            if ui.add(text_edit).changed() {
                actions.push(BrandingAction::Apply(ConfigField::AppName(state.app_name.clone())));
            }
        });

        if let Some(color) = color_row(ui, "Color primario:", &mut state.primary_color) {
            actions.push(BrandingAction::Apply(ConfigField::PrimaryColor(color)));
        }
        if let Some(color) = color_row(ui, "Color secundario:", &mut state.secondary_color) {
            actions.push(BrandingAction::Apply(ConfigField::SecondaryColor(color)));
        }

        ui.horizontal(|ui| {
            ui.label("Tema:");
            let mut dark = config.dark_mode;
            if ui.checkbox(&mut dark, "Modo oscuro").changed() {
                actions.push(BrandingAction::Apply(ConfigField::DarkMode(dark)));
            }
        });

        if simulator.uses_device() {
            ui.horizontal(|ui| {
                ui.label("Dispositivo:");
                let current = config.device();
                egui::ComboBox::from_id_salt("device_model")
                    .selected_text(current.name())
                    .show_ui(ui, |ui| {
                        for device in DeviceModel::ALL {
                            if ui.selectable_label(device == current, device.name()).clicked() && device != current {
                                actions.push(BrandingAction::Apply(ConfigField::Device(device)));
                            }
                        }
                    });
            });
        }
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Imágenes").strong());
        ui.label(
            egui::RichText::new(format!(
                "Solo archivos {}/*, recomendado hasta {} MB. Arrastra un archivo a la ventana para usar el destino marcado.",
                upload_consts::ACCEPTED_TYPE,
                upload_consts::SUGGESTED_MAX_BYTES / (1024 * 1024)
            ))
            .small()
            .weak(),
        );
        ui.add_space(ITEM_SPACING);

        let targets = std::iter::once(ImageTarget::Logo)
            .chain(simulator.image_slots().iter().map(|slot| ImageTarget::parse(slot)));
        for target in targets {
            image_row(ui, config, state, target, &mut actions);
        }
    });

    actions
}

/// Hex text field plus color picker; returns the new value when either changed
fn color_row(ui: &mut egui::Ui, label: &str, value: &mut String) -> Option<String> {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(label);
        let text_edit = egui::TextEdit::singleline(value).desired_width(100.0);
        if ui.add(text_edit).changed() {
            changed = true;
        }

        match parse_hex_color(value) {
            Some(mut color) => {
                if ui.color_edit_button_srgba(&mut color).changed() {
                    *value = format_hex_color(color);
                    changed = true;
                }
            }
            None => {
                ui.colored_label(STATUS_ERROR, "⚠")
                    .on_hover_text("Color no válido; la vista previa usa el color por defecto");
            }
        }
    });
    changed.then(|| value.clone())
}

fn image_row(
    ui: &mut egui::Ui,
    config: &SimulatorConfig,
    state: &mut BrandingState,
    target: ImageTarget,
    actions: &mut Vec<BrandingAction>,
) {
    let slot = target.slot().to_string();
    let loaded = target.current(config).is_some();

    ui.horizontal(|ui| {
        let is_drop_target = state.drop_target == target;
        if ui.radio(is_drop_target, "").on_hover_text("Destino al arrastrar archivos").clicked() {
            state.drop_target = target.clone();
        }
        ui.label(egui::RichText::new(&slot).monospace());
        if loaded {
            ui.colored_label(STATUS_OK, "●").on_hover_text("Imagen cargada");
        } else {
            ui.label(egui::RichText::new("○").weak()).on_hover_text("Sin imagen");
        }

        let path = state.image_paths.entry(slot.clone()).or_default();
        let text_edit = egui::TextEdit::singleline(path)
            .desired_width(140.0)
            .hint_text("/ruta/imagen.png");
        ui.add(text_edit);

        if ui.button("📂 Subir").clicked() && !path.trim().is_empty() {
            actions.push(BrandingAction::Upload {
                target: target.clone(),
                path: PathBuf::from(path.trim()),
            });
        }
        if ui.add_enabled(loaded, egui::Button::new("🗑")).on_hover_text("Quitar imagen").clicked() {
            actions.push(BrandingAction::Apply(ConfigField::Image(target.clone(), None)));
        }
    });
}

/// Parse a `#RRGGBB` or `#RRGGBBAA` string into an egui color
pub fn parse_hex_color(hex: &str) -> Option<egui::Color32> {
    HexColor::parse(hex).map(to_color32)
}

/// Format an egui color as `#RRGGBB`, or `#RRGGBBAA` when translucent
pub fn format_hex_color(color: egui::Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    HexColor { r, g, b, a }.to_string()
}

pub fn to_color32(color: HexColor) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}
