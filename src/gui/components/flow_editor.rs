//! WhatsApp flow editor with drag-and-drop step ordering

use eframe::egui;

use crate::automation::{Flow, Speaker, StepKind, Trigger, TranscriptLine};
use crate::gui::constants::*;

struct StepDraft {
    id: u32,
    kind: StepKind,
    content: String,
}

/// State for the flow editor UI
pub struct FlowEditorState {
    new_kind: StepKind,
    new_content: String,
    last_keyword: String,
    editing: Option<StepDraft>,
    test_message: String,
    transcript: Vec<TranscriptLine>,
}

impl FlowEditorState {
    pub fn new() -> Self {
        Self {
            new_kind: StepKind::Message,
            new_content: String::new(),
            last_keyword: "hola".to_string(),
            editing: None,
            test_message: "Hola, quiero saber el precio".to_string(),
            transcript: Vec::new(),
        }
    }
}

impl Default for FlowEditorState {
    fn default() -> Self {
        Self::new()
    }
}

fn step_glyph(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Message => "💬",
        StepKind::Question => "❓",
        StepKind::Delay => "⏱",
        StepKind::Condition => "🔀",
        StepKind::Handoff => "👤",
    }
}

fn content_hint(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Message | StepKind::Question => "Texto del mensaje",
        StepKind::Delay => "Segundos",
        StepKind::Condition => "Palabra clave",
        StepKind::Handoff => "Nota para el agente (opcional)",
    }
}

/// Renders the flow editor and returns true if the flow changed
pub fn ui(ui: &mut egui::Ui, flow: &mut Flow, state: &mut FlowEditorState) -> bool {
    let mut changed = false;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Flujo").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            ui.label("Nombre:");
            if ui.text_edit_singleline(&mut flow.name).changed() {
                changed = true;
            }
            if ui.checkbox(&mut flow.active, "Activo").changed() {
                changed = true;
            }
        });

        ui.horizontal(|ui| {
            ui.label("Disparador:");
            let mut any_message = matches!(flow.trigger, Trigger::AnyMessage);
            if ui.checkbox(&mut any_message, "Cualquier mensaje").changed() {
                flow.trigger = if any_message {
                    Trigger::AnyMessage
                } else {
                    Trigger::Keyword(state.last_keyword.clone())
                };
                changed = true;
            }
            if let Trigger::Keyword(keyword) = &mut flow.trigger {
                let text_edit = egui::TextEdit::singleline(keyword)
                    .desired_width(140.0)
                    .hint_text("palabra clave");
                if ui.add(text_edit).changed() {
                    state.last_keyword = keyword.clone();
                    changed = true;
                }
            }
        });
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Pasos").strong());
        ui.label("Arrastra los pasos para reordenarlos; clic derecho para editar o borrar.");
        ui.add_space(ITEM_SPACING / 2.0);

        if steps_list(ui, flow, state) {
            changed = true;
        }

        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            kind_combo(ui, "new_step_kind", &mut state.new_kind);
            let text_edit = egui::TextEdit::singleline(&mut state.new_content)
                .desired_width(200.0)
                .hint_text(content_hint(state.new_kind));
            ui.add(text_edit);
            if ui.button("➕ Agregar").clicked() {
                flow.add_step(state.new_kind, state.new_content.trim());
                state.new_content.clear();
                changed = true;
            }
        });

        ui.label(
            egui::RichText::new(format!("{} paso(s)", flow.steps().len()))
                .small()
                .weak(),
        );
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Probar flujo").strong());
        ui.add_space(ITEM_SPACING);
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut state.test_message);
            if ui.button("▶ Simular").clicked() {
                state.transcript = flow.simulate(&state.test_message);
            }
        });
        ui.add_space(ITEM_SPACING / 2.0);
        for line in &state.transcript {
            let text = egui::RichText::new(line.to_string());
            ui.label(match line.speaker {
                Speaker::Customer => text.strong(),
                Speaker::Bot => text.color(STATUS_OK),
                Speaker::System => text.weak().italics(),
            });
        }
    });

    if state.editing.is_some() && edit_step_dialog(ui.ctx(), flow, state) {
        changed = true;
    }

    changed
}

fn kind_combo(ui: &mut egui::Ui, id_salt: &str, kind: &mut StepKind) {
    egui::ComboBox::from_id_salt(id_salt)
        .selected_text(format!("{} {}", step_glyph(*kind), kind.label()))
        .show_ui(ui, |ui| {
            for option in StepKind::ALL {
                ui.selectable_value(kind, option, format!("{} {}", step_glyph(option), option.label()));
            }
        });
}

fn steps_list(ui: &mut egui::Ui, flow: &mut Flow, state: &mut FlowEditorState) -> bool {
    let mut changed = false;
    let mut from_idx = None;
    let mut to_idx = None;
    let mut to_delete = None;

    let frame = egui::Frame::default()
        .inner_margin(4.0)
        .stroke(ui.visuals().widgets.noninteractive.bg_stroke);

    let step_count = flow.steps().len();
    let (_, dropped_payload) = ui.dnd_drop_zone::<usize, ()>(frame, |ui| {
        ui.set_min_height(100.0);

        for (row_idx, step) in flow.steps().iter().enumerate() {
            let item_id = egui::Id::new("flow_step").with(step.id);

            let response = ui
                .dnd_drag_source(item_id, row_idx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new("☰").weak());
                        ui.label(format!("{}. {} {}", row_idx + 1, step_glyph(step.kind), step.kind.label()));
                        if !step.content.is_empty() {
                            ui.label(egui::RichText::new(&step.content).weak());
                        }
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(" ");
                        });
                    });
                })
                .response;

            if row_idx + 1 < step_count {
                ui.separator();
            }

            if let (Some(pointer), Some(hovered_payload)) = (
                ui.input(|i| i.pointer.interact_pos()),
                response.dnd_hover_payload::<usize>(),
            ) {
                let rect = response.rect;
                let stroke = egui::Stroke::new(2.0, ui.visuals().selection.stroke.color);

                let insert_row_idx = if *hovered_payload == row_idx {
                    ui.painter().hline(rect.x_range(), rect.center().y, stroke);
                    row_idx
                } else if pointer.y < rect.center().y {
                    ui.painter().hline(rect.x_range(), rect.top(), stroke);
                    row_idx
                } else {
                    ui.painter().hline(rect.x_range(), rect.bottom(), stroke);
                    row_idx + 1
                };

                if let Some(dragged_payload) = response.dnd_release_payload::<usize>() {
                    from_idx = Some(*dragged_payload);
                    to_idx = Some(insert_row_idx);
                }
            }

            response.context_menu(|ui| {
                if ui.button("✏ Editar").clicked() {
                    state.editing = Some(StepDraft {
                        id: step.id,
                        kind: step.kind,
                        content: step.content.clone(),
                    });
                    ui.close();
                }
                if ui.button("🗑 Borrar").clicked() {
                    to_delete = Some(step.id);
                    ui.close();
                }
            });
        }
    });

    // Dropped onto the empty area below the last step
    if let Some(dragged_payload) = dropped_payload {
        from_idx = Some(*dragged_payload);
        to_idx = Some(step_count);
    }

    if let Some(id) = to_delete {
        changed |= flow.remove_step(id);
    }

    if let (Some(from), Some(to)) = (from_idx, to_idx) {
        changed |= flow.move_step(from, to);
    }

    changed
}

fn edit_step_dialog(ctx: &egui::Context, flow: &mut Flow, state: &mut FlowEditorState) -> bool {
    let mut changed = false;
    let mut close = false;
    let Some(draft) = state.editing.as_mut() else {
        return false;
    };

    egui::Window::new("Editar paso")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            kind_combo(ui, "edit_step_kind", &mut draft.kind);
            let text_edit = egui::TextEdit::singleline(&mut draft.content).hint_text(content_hint(draft.kind));
            ui.add(text_edit);

            ui.add_space(ITEM_SPACING);

            ui.horizontal(|ui| {
                if ui.button("Guardar").clicked() {
                    changed = flow.update_step(draft.id, draft.kind, draft.content.trim());
                    close = true;
                }

                if ui.button("Cancelar").clicked() {
                    close = true;
                }
            });
        });

    if close {
        state.editing = None;
    }
    changed
}
