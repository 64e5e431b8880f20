//! Live preview: device or browser frame, the template tree, overlays and toasts

use eframe::egui;

use crate::device::DeviceFrame;
use crate::gui::components::branding::to_color32;
use crate::gui::constants::*;
use crate::gui::textures::TextureCache;
use crate::notify::{NoticeLevel, Toast};
use crate::preview::node::{ButtonStyle, ImageSource, InputKind, Tone};
use crate::preview::tilt::Tilt;
use crate::preview::{Overlay, Palette, PreviewAction, PreviewNode, PreviewView};

/// How the preview is framed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Chrome<'a> {
    Device(DeviceFrame),
    Browser { title: &'a str },
}

pub struct PreviewPane {
    tilt: Tilt,
    tilt_target: Tilt,
    textures: TextureCache,
}

impl PreviewPane {
    pub fn new() -> Self {
        Self {
            tilt: Tilt::FLAT,
            tilt_target: Tilt::FLAT,
            textures: TextureCache::new(),
        }
    }

    /// The frame is still easing towards the pointer
    pub fn is_animating(&self) -> bool {
        (self.tilt.rotate_x - self.tilt_target.rotate_x).abs() > 0.05
            || (self.tilt.rotate_y - self.tilt_target.rotate_y).abs() > 0.05
    }

    pub fn clear_textures(&mut self) {
        self.textures.clear();
    }

    /// Paint the preview and return the actions the user triggered
    pub fn ui(&mut self, ui: &mut egui::Ui, view: &PreviewView, palette: &Palette, chrome: Chrome<'_>) -> Vec<PreviewAction> {
        let mut actions = Vec::new();
        let available = ui.available_rect_before_wrap();
        ui.allocate_rect(available, egui::Sense::hover());

        let screen = match chrome {
            Chrome::Device(frame) => self.paint_device(ui, available, frame, palette),
            Chrome::Browser { title } => {
                self.tilt = Tilt::FLAT;
                self.tilt_target = Tilt::FLAT;
                paint_browser(ui, available, title, palette)
            }
        };

        let mut content = ui.new_child(egui::UiBuilder::new().max_rect(screen.shrink(PADDING)));
        content.set_clip_rect(screen);
        content.visuals_mut().override_text_color = Some(to_color32(palette.text));
        content.add_enabled_ui(view.overlay.is_none(), |ui| {
            egui::ScrollArea::vertical()
                .id_salt("preview_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    paint_node(ui, &view.root, palette, &mut self.textures, &mut actions);
                });
        });

        match &view.overlay {
            Some(Overlay::Loading) => {
                ui.painter().rect_filled(screen, egui::CornerRadius::ZERO, egui::Color32::from_black_alpha(90));
                ui.put(
                    egui::Rect::from_center_size(screen.center(), egui::vec2(36.0, 36.0)),
                    egui::Spinner::new().size(36.0).color(to_color32(palette.primary)),
                );
            }
            Some(Overlay::ConnectionError { message }) => {
                ui.painter().rect_filled(screen, egui::CornerRadius::ZERO, egui::Color32::from_black_alpha(140));
                let modal = egui::Rect::from_center_size(
                    screen.center(),
                    egui::vec2((screen.width() * 0.85).min(360.0), 170.0),
                );
                let mut modal_ui = ui.new_child(egui::UiBuilder::new().max_rect(modal));
                error_modal(&mut modal_ui, message, palette, &mut actions);
            }
            None => {}
        }

        paint_toasts(ui, screen, &view.toasts, palette);
        actions
    }

    fn paint_device(&mut self, ui: &mut egui::Ui, available: egui::Rect, frame: DeviceFrame, palette: &Palette) -> egui::Rect {
        let size = fit_frame(available.size(), frame);
        let centered = egui::Rect::from_center_size(available.center(), size);

        self.tilt_target = match ui.input(|i| i.pointer.hover_pos()) {
            Some(pos) if available.contains(pos) => Tilt::from_pointer(
                (pos.x, pos.y),
                (centered.center().x, centered.center().y),
                (size.x / 2.0, size.y / 2.0),
            ),
            _ => Tilt::FLAT,
        };
        self.tilt = self.tilt.approach(self.tilt_target, TILT_EASING);

        // Lean the frame towards the tilt and push the shadow the other way
        let (skew_x, skew_y) = self.tilt.skew(size.x, size.y);
        let lean = egui::vec2(skew_x, -skew_y) * 0.12;
        let screen = centered.translate(lean);
        let shell = screen.expand(BEZEL);

        let scale = size.x / frame.width;
        let radius = corner((frame.corner_radius + BEZEL) * scale);
        let painter = ui.painter();
        painter.rect_filled(
            shell.translate(-lean * 2.0 + egui::vec2(0.0, 10.0)),
            radius,
            egui::Color32::from_black_alpha(70),
        );
        painter.rect_filled(shell, radius, BEZEL_COLOR);
        painter.rect_filled(screen, corner(frame.corner_radius * scale), to_color32(palette.background));

        if frame.has_notch {
            let notch = egui::Rect::from_center_size(
                egui::pos2(screen.center().x, screen.top() + 12.0 * scale),
                egui::vec2(screen.width() * 0.3, 18.0 * scale),
            );
            painter.rect_filled(notch, corner(9.0 * scale), BEZEL_COLOR);
            return egui::Rect::from_min_max(egui::pos2(screen.left(), notch.bottom() + 4.0), screen.max);
        }
        screen
    }
}

impl Default for PreviewPane {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest size that keeps the device aspect ratio, never scaled up
pub fn fit_frame(available: egui::Vec2, frame: DeviceFrame) -> egui::Vec2 {
    let room = available - egui::vec2(BEZEL * 4.0, BEZEL * 4.0);
    let scale = (room.x / frame.width).min(room.y / frame.height).clamp(0.05, 1.0);
    egui::vec2(frame.width * scale, frame.height * scale)
}

/// Fake address shown in the browser bar
pub fn address_for(title: &str) -> String {
    let slug: String = title
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.split('-').filter(|part| !part.is_empty()).collect::<Vec<_>>().join("-");
    if slug.is_empty() {
        "https://www.ejemplo.com".to_string()
    } else {
        format!("https://www.{slug}.com")
    }
}

fn corner(radius: f32) -> egui::CornerRadius {
    egui::CornerRadius::same(radius.clamp(0.0, 255.0) as u8)
}

fn paint_browser(ui: &mut egui::Ui, available: egui::Rect, title: &str, palette: &Palette) -> egui::Rect {
    let width = available.width().min(BROWSER_MAX_WIDTH) - PADDING * 2.0;
    let window = egui::Rect::from_center_size(available.center(), egui::vec2(width, available.height() - PADDING * 2.0));
    let bar = egui::Rect::from_min_size(window.min, egui::vec2(window.width(), BROWSER_BAR_HEIGHT));

    let painter = ui.painter();
    painter.rect_filled(window, corner(8.0), to_color32(palette.background));
    painter.rect_filled(bar, corner(8.0), egui::Color32::from_gray(225));
    for (i, color) in [(255, 95, 86), (255, 189, 46), (39, 201, 63)].into_iter().enumerate() {
        let center = egui::pos2(bar.left() + 14.0 + i as f32 * 16.0, bar.center().y);
        painter.circle_filled(center, 5.0, egui::Color32::from_rgb(color.0, color.1, color.2));
    }
    painter.text(
        egui::pos2(bar.left() + 70.0, bar.center().y),
        egui::Align2::LEFT_CENTER,
        address_for(title),
        egui::FontId::monospace(12.0),
        egui::Color32::from_gray(80),
    );

    egui::Rect::from_min_max(egui::pos2(window.left(), bar.bottom()), window.max)
}

fn paint_node(
    ui: &mut egui::Ui,
    node: &PreviewNode,
    palette: &Palette,
    textures: &mut TextureCache,
    actions: &mut Vec<PreviewAction>,
) {
    match node {
        PreviewNode::Column(children) => {
            ui.vertical(|ui| {
                for child in children {
                    paint_node(ui, child, palette, textures, actions);
                }
            });
        }
        PreviewNode::Row(children) => {
            ui.horizontal_wrapped(|ui| {
                for child in children {
                    paint_node(ui, child, palette, textures, actions);
                }
            });
        }
        PreviewNode::Surface { fill, children } => {
            egui::Frame::new()
                .fill(to_color32(*fill))
                .corner_radius(egui::CornerRadius::same(8))
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.visuals_mut().override_text_color = Some(to_color32(fill.contrasting_text()));
                    for child in children {
                        paint_node(ui, child, palette, textures, actions);
                    }
                });
        }
        PreviewNode::Heading { text, color } => {
            ui.label(egui::RichText::new(text).heading().color(to_color32(*color)));
        }
        PreviewNode::Text { text, tone } => {
            let text = egui::RichText::new(text);
            let text = match tone {
                Tone::Normal => text,
                Tone::Muted => text.small().color(to_color32(palette.muted)),
                Tone::Accent => text.color(to_color32(palette.primary)),
                Tone::Strong => text.strong(),
            };
            ui.label(text);
        }
        PreviewNode::Icon { icon, color } => {
            let text = egui::RichText::new(icon.glyph()).size(18.0);
            ui.label(match color {
                Some(color) => text.color(to_color32(*color)),
                None => text,
            });
        }
        PreviewNode::Image { slot, source, height } => {
            let texture = match source {
                ImageSource::Data(data) => textures.get(ui.ctx(), slot, data),
                ImageSource::Placeholder(_) => None,
            };
            match texture {
                Some(texture) => {
                    ui.add(
                        egui::Image::new(&texture)
                            .max_height(*height)
                            .max_width(ui.available_width()),
                    );
                }
                None => {
                    let glyph = match source {
                        ImageSource::Placeholder(icon) => icon.glyph(),
                        ImageSource::Data(_) => crate::preview::Icon::Image.glyph(),
                    };
                    let (rect, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), *height), egui::Sense::hover());
                    ui.painter().rect_filled(rect, corner(6.0), to_color32(palette.surface));
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        glyph,
                        egui::FontId::proportional((*height * 0.3).clamp(12.0, 48.0)),
                        to_color32(palette.muted),
                    );
                }
            }
        }
        PreviewNode::Button { label, icon, action, style, enabled } => {
            let text = match icon {
                Some(icon) => format!("{} {label}", icon.glyph()),
                None => label.clone(),
            };
            let button = match style {
                ButtonStyle::Filled(fill) => {
                    egui::Button::new(egui::RichText::new(text).color(to_color32(fill.contrasting_text())))
                        .fill(to_color32(*fill))
                }
                ButtonStyle::Outline(color) => egui::Button::new(egui::RichText::new(text).color(to_color32(*color)))
                    .fill(egui::Color32::TRANSPARENT)
                    .stroke(egui::Stroke::new(1.0, to_color32(*color))),
                ButtonStyle::Ghost => egui::Button::new(text).frame(false),
            };
            if ui.add_enabled(*enabled, button).clicked() {
                actions.push(action.clone());
            }
        }
        PreviewNode::TabBar(tabs) => {
            ui.separator();
            ui.horizontal(|ui| {
                for tab in tabs {
                    let color = if tab.active { palette.primary } else { palette.muted };
                    let text = egui::RichText::new(format!("{} {}", tab.icon.glyph(), tab.label)).color(to_color32(color));
                    if ui.selectable_label(tab.active, text).clicked() && !tab.active {
                        actions.push(tab.action.clone());
                    }
                }
            });
        }
        PreviewNode::Badge { text, fill } => {
            egui::Frame::new()
                .fill(to_color32(*fill))
                .corner_radius(egui::CornerRadius::same(8))
                .inner_margin(egui::Margin::symmetric(6, 2))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(text).small().color(to_color32(fill.contrasting_text())));
                });
        }
        PreviewNode::Progress { fraction, color } => {
            ui.add(
                egui::ProgressBar::new(fraction.clamp(0.0, 1.0))
                    .fill(to_color32(*color))
                    .desired_height(6.0),
            );
        }
        PreviewNode::Divider => {
            ui.separator();
        }
        PreviewNode::Input { value, hint, kind, action } => {
            let mut text = value.clone();
            let edit = match kind {
                InputKind::Line => egui::TextEdit::singleline(&mut text),
                InputKind::Password => egui::TextEdit::singleline(&mut text).password(true),
                InputKind::Multiline => egui::TextEdit::multiline(&mut text).desired_rows(3),
            };
            let changed = ui
                .add(edit.hint_text(hint.as_str()).desired_width(ui.available_width()))
                .changed();
            if changed {
                actions.push(action.clone().with_text(text));
            }
        }
    }
}

fn error_modal(ui: &mut egui::Ui, message: &str, palette: &Palette, actions: &mut Vec<PreviewAction>) {
    egui::Frame::new()
        .fill(to_color32(palette.surface))
        .corner_radius(egui::CornerRadius::same(12))
        .inner_margin(egui::Margin::same(14))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(format!("{} Error de conexión", crate::preview::Icon::Alert.glyph()))
                        .strong()
                        .color(to_color32(palette.danger)),
                );
                ui.add_space(ITEM_SPACING);
                ui.label(egui::RichText::new(message).color(to_color32(palette.text)));
                ui.add_space(ITEM_SPACING);
                ui.horizontal(|ui| {
                    let retry = egui::Button::new(egui::RichText::new("Reintentar").color(to_color32(palette.on_primary)))
                        .fill(to_color32(palette.primary));
                    if ui.add(retry).clicked() {
                        actions.push(PreviewAction::RetryError);
                    }
                    if ui.button("Cerrar").clicked() {
                        actions.push(PreviewAction::DismissError);
                    }
                });
            });
        });
}

fn paint_toasts(ui: &mut egui::Ui, screen: egui::Rect, toasts: &[Toast], palette: &Palette) {
    if toasts.is_empty() {
        return;
    }
    let area = egui::Rect::from_min_size(
        screen.min + egui::vec2(PADDING, PADDING),
        egui::vec2(screen.width() - PADDING * 2.0, screen.height() / 2.0),
    );
    let mut toast_ui = ui.new_child(egui::UiBuilder::new().max_rect(area));
    for toast in toasts {
        let fill = match toast.notice.level {
            NoticeLevel::Success => STATUS_OK,
            NoticeLevel::Error => to_color32(palette.danger),
            NoticeLevel::Info => to_color32(palette.primary),
        };
        egui::Frame::new()
            .fill(fill)
            .corner_radius(egui::CornerRadius::same(6))
            .inner_margin(egui::Margin::symmetric(8, 4))
            .show(&mut toast_ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(egui::RichText::new(&toast.notice.message).color(egui::Color32::WHITE));
            });
        toast_ui.add_space(4.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceModel;

    #[test]
    fn test_fit_frame_keeps_aspect_ratio() {
        let frame = DeviceModel::Iphone15Pro.frame();
        let size = fit_frame(egui::vec2(1000.0, 500.0), frame);
        assert!(size.y <= 500.0);
        assert!((size.x / size.y - frame.width / frame.height).abs() < 0.001);
    }

    #[test]
    fn test_fit_frame_never_upscales() {
        let frame = DeviceModel::IphoneSe.frame();
        let size = fit_frame(egui::vec2(4000.0, 4000.0), frame);
        assert_eq!(size, egui::vec2(frame.width, frame.height));
    }

    #[test]
    fn test_browser_address_from_title() {
        assert_eq!(address_for("Mi Sitio Web"), "https://www.mi-sitio-web.com");
        assert_eq!(address_for("  Café & Co. "), "https://www.caf-co.com");
        assert_eq!(address_for("¡¡!!"), "https://www.ejemplo.com");
    }
}
