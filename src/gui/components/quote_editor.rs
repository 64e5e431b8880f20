//! Quote builder component

use eframe::egui;

use crate::constants::quote as quote_consts;
use crate::gui::constants::*;
use crate::preview::format_price;
use crate::quote::{QuoteDraft, SERVICES, service};

/// Renders the quote builder and returns true if the draft changed
pub fn ui(ui: &mut egui::Ui, draft: &mut QuoteDraft) -> bool {
    let mut changed = false;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Cliente").strong());
        ui.add_space(ITEM_SPACING);
        ui.horizontal(|ui| {
            ui.label("Nombre:");
            if ui.text_edit_singleline(&mut draft.client_name).changed() {
                changed = true;
            }
        });
    });

    ui.add_space(SECTION_SPACING);

    ui.columns(2, |columns| {
        columns[0].group(|ui| {
            ui.label(egui::RichText::new("Servicios").strong());
            ui.add_space(ITEM_SPACING);
            for service in SERVICES {
                ui.horizontal(|ui| {
                    if ui.button("➕").clicked() && draft.add_service(service.id) {
                        changed = true;
                    }
                    ui.label(service.name);
                    let period = if service.monthly { "/mes" } else { "" };
                    ui.label(egui::RichText::new(format!("{}{period}", format_price(service.price_cents))).weak());
                });
            }
        });

        columns[1].group(|ui| {
            ui.label(egui::RichText::new("Cotización").strong());
            ui.add_space(ITEM_SPACING);

            if draft.items.is_empty() {
                ui.label(egui::RichText::new("Agrega servicios desde la lista").weak());
            }

            let mut quantity_edit = None;
            let mut to_remove = None;
            for line in &draft.items {
                let Some(service) = service(&line.service_id) else { continue };
                ui.horizontal(|ui| {
                    let mut quantity = line.quantity;
                    if ui
                        .add(egui::DragValue::new(&mut quantity).range(0..=quote_consts::MAX_QUANTITY))
                        .changed()
                    {
                        quantity_edit = Some((line.service_id.clone(), quantity));
                    }
                    ui.label(service.name);
                    ui.label(format_price(QuoteDraft::line_total_cents(line)));
                    if ui.small_button("🗑").clicked() {
                        to_remove = Some(line.service_id.clone());
                    }
                });
            }

            if let Some((id, quantity)) = quantity_edit {
                draft.set_quantity(&id, quantity);
                changed = true;
            }
            if let Some(id) = to_remove {
                draft.remove_service(&id);
                changed = true;
            }

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Descuento:");
                let mut discount = draft.discount_percent;
                if ui
                    .add(egui::Slider::new(&mut discount, 0..=quote_consts::MAX_DISCOUNT_PERCENT).suffix("%"))
                    .changed()
                {
                    draft.set_discount(discount);
                    changed = true;
                }
            });
            ui.horizontal(|ui| {
                ui.label("Impuestos:");
                let mut tax = draft.tax_percent;
                if ui.add(egui::DragValue::new(&mut tax).range(0..=100).suffix("%")).changed() {
                    draft.set_tax(tax);
                    changed = true;
                }
            });

            ui.add_space(ITEM_SPACING);
            egui::Grid::new("quote_totals").num_columns(2).show(ui, |ui| {
                ui.label("Subtotal");
                ui.label(format_price(draft.subtotal_cents()));
                ui.end_row();
                ui.label("Descuento");
                ui.label(format!("-{}", format_price(draft.discount_cents())));
                ui.end_row();
                ui.label("Impuestos");
                ui.label(format_price(draft.tax_cents()));
                ui.end_row();
                ui.label(egui::RichText::new("Total").strong());
                ui.label(egui::RichText::new(format_price(draft.total_cents())).strong());
                ui.end_row();
            });
        });
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Notas").strong());
        let text_edit = egui::TextEdit::multiline(&mut draft.notes)
            .desired_rows(3)
            .desired_width(f32::INFINITY)
            .hint_text("Plazos, condiciones de pago...");
        if ui.add(text_edit).changed() {
            changed = true;
        }
    });

    ui.add_space(SECTION_SPACING);

    ui.horizontal(|ui| {
        if ui.button("📋 Copiar resumen").clicked() {
            ui.ctx().copy_text(draft.summary());
        }
        if ui.button("🗑 Vaciar").clicked() {
            let client_name = std::mem::take(&mut draft.client_name);
            *draft = QuoteDraft { client_name, ..QuoteDraft::default() };
            changed = true;
        }
    });

    ui.collapsing("Vista previa del resumen", |ui| {
        ui.label(egui::RichText::new(draft.summary()).monospace());
    });

    changed
}
