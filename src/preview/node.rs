//! Framework-independent preview tree
//!
//! Template renderers build a [`PreviewNode`] tree; the GUI paints it and the
//! CLI prints its [`outline`](PreviewNode::outline). Buttons, tabs and inputs
//! carry the [`PreviewAction`] they trigger instead of callbacks.

use std::fmt::Write as _;

use super::PreviewAction;
use crate::color::HexColor;
use crate::notify::Toast;

/// Icon set used by the mockups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Alert,
    Back,
    Bell,
    Bookmark,
    Briefcase,
    Cart,
    Chart,
    Check,
    Clock,
    Comment,
    Dumbbell,
    Flame,
    Heart,
    Home,
    Image,
    Lock,
    Mail,
    Pause,
    Pen,
    Play,
    Plus,
    Search,
    Settings,
    Share,
    Star,
    Trash,
    User,
    Users,
}

impl Icon {
    /// Glyph drawn for this icon
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Alert => "⚠",
            Icon::Back => "←",
            Icon::Bell => "🔔",
            Icon::Bookmark => "🔖",
            Icon::Briefcase => "💼",
            Icon::Cart => "🛒",
            Icon::Chart => "📊",
            Icon::Check => "✔",
            Icon::Clock => "⏱",
            Icon::Comment => "💬",
            Icon::Dumbbell => "🏋",
            Icon::Flame => "🔥",
            Icon::Heart => "❤",
            Icon::Home => "🏠",
            Icon::Image => "🖼",
            Icon::Lock => "🔒",
            Icon::Mail => "✉",
            Icon::Pause => "⏸",
            Icon::Pen => "✏",
            Icon::Play => "▶",
            Icon::Plus => "➕",
            Icon::Search => "🔍",
            Icon::Settings => "⚙",
            Icon::Share => "📤",
            Icon::Star => "⭐",
            Icon::Trash => "🗑",
            Icon::User => "👤",
            Icon::Users => "👥",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Data URI supplied by the user
    Data(String),
    /// Nothing uploaded for this slot
    Placeholder(Icon),
}

impl ImageSource {
    pub fn from_option(data: Option<&str>, placeholder: Icon) -> Self {
        match data {
            Some(data) => ImageSource::Data(data.to_string()),
            None => ImageSource::Placeholder(placeholder),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Muted,
    Accent,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ButtonStyle {
    Filled(HexColor),
    Outline(HexColor),
    Ghost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Line,
    Password,
    Multiline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    pub label: String,
    pub icon: Icon,
    pub action: PreviewAction,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewNode {
    Column(Vec<PreviewNode>),
    Row(Vec<PreviewNode>),
    /// Filled container, used for headers, banners and cards
    Surface { fill: HexColor, children: Vec<PreviewNode> },
    Heading { text: String, color: HexColor },
    Text { text: String, tone: Tone },
    Icon { icon: Icon, color: Option<HexColor> },
    Image { slot: String, source: ImageSource, height: f32 },
    Button { label: String, icon: Option<Icon>, action: PreviewAction, style: ButtonStyle, enabled: bool },
    /// Text field; every edit dispatches `action` carrying the new text
    Input { value: String, hint: String, kind: InputKind, action: PreviewAction },
    TabBar(Vec<Tab>),
    Badge { text: String, fill: HexColor },
    Progress { fraction: f32, color: HexColor },
    Divider,
}

impl PreviewNode {
    pub fn column(children: Vec<PreviewNode>) -> Self {
        PreviewNode::Column(children)
    }

    pub fn row(children: Vec<PreviewNode>) -> Self {
        PreviewNode::Row(children)
    }

    pub fn surface(fill: HexColor, children: Vec<PreviewNode>) -> Self {
        PreviewNode::Surface { fill, children }
    }

    pub fn heading(text: impl Into<String>, color: HexColor) -> Self {
        PreviewNode::Heading { text: text.into(), color }
    }

    pub fn text(text: impl Into<String>) -> Self {
        PreviewNode::Text { text: text.into(), tone: Tone::Normal }
    }

    pub fn muted(text: impl Into<String>) -> Self {
        PreviewNode::Text { text: text.into(), tone: Tone::Muted }
    }

    pub fn accent(text: impl Into<String>) -> Self {
        PreviewNode::Text { text: text.into(), tone: Tone::Accent }
    }

    pub fn strong(text: impl Into<String>) -> Self {
        PreviewNode::Text { text: text.into(), tone: Tone::Strong }
    }

    pub fn icon(icon: Icon) -> Self {
        PreviewNode::Icon { icon, color: None }
    }

    pub fn tinted_icon(icon: Icon, color: HexColor) -> Self {
        PreviewNode::Icon { icon, color: Some(color) }
    }

    pub fn image(slot: impl Into<String>, data: Option<&str>, placeholder: Icon, height: f32) -> Self {
        PreviewNode::Image {
            slot: slot.into(),
            source: ImageSource::from_option(data, placeholder),
            height,
        }
    }

    pub fn button(label: impl Into<String>, action: PreviewAction, style: ButtonStyle) -> Self {
        PreviewNode::Button {
            label: label.into(),
            icon: None,
            action,
            style,
            enabled: true,
        }
    }

    pub fn icon_button(icon: Icon, label: impl Into<String>, action: PreviewAction) -> Self {
        PreviewNode::Button {
            label: label.into(),
            icon: Some(icon),
            action,
            style: ButtonStyle::Ghost,
            enabled: true,
        }
    }

    /// Same node, disabled when `enabled` is false; no-op for non-buttons
    pub fn enabled(mut self, value: bool) -> Self {
        if let PreviewNode::Button { enabled, .. } = &mut self {
            *enabled = value;
        }
        self
    }

    pub fn input(value: &str, hint: impl Into<String>, kind: InputKind, action: PreviewAction) -> Self {
        PreviewNode::Input {
            value: value.to_string(),
            hint: hint.into(),
            kind,
            action,
        }
    }

    pub fn badge(text: impl Into<String>, fill: HexColor) -> Self {
        PreviewNode::Badge { text: text.into(), fill }
    }

    /// Every action reachable from this subtree, in paint order
    #[cfg(test)]
    pub fn actions(&self) -> Vec<PreviewAction> {
        let mut out = Vec::new();
        self.collect_actions(&mut out);
        out
    }

    #[cfg(test)]
    fn collect_actions(&self, out: &mut Vec<PreviewAction>) {
        match self {
            PreviewNode::Column(children)
            | PreviewNode::Row(children)
            | PreviewNode::Surface { children, .. } => {
                for child in children {
                    child.collect_actions(out);
                }
            }
            PreviewNode::Button { action, enabled: true, .. } => out.push(action.clone()),
            PreviewNode::TabBar(tabs) => out.extend(tabs.iter().map(|t| t.action.clone())),
            _ => {}
        }
    }

    /// Indented plain-text rendering, one node per line
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        // Writing into a String cannot fail
        let _ = match self {
            PreviewNode::Column(children) | PreviewNode::Row(children) => {
                let label = if matches!(self, PreviewNode::Column(_)) { "column" } else { "row" };
                let _ = writeln!(out, "{pad}{label}");
                for child in children {
                    child.write_outline(out, depth + 1);
                }
                Ok(())
            }
            PreviewNode::Surface { fill, children } => {
                let _ = writeln!(out, "{pad}surface {fill}");
                for child in children {
                    child.write_outline(out, depth + 1);
                }
                Ok(())
            }
            PreviewNode::Heading { text, .. } => writeln!(out, "{pad}# {text}"),
            PreviewNode::Text { text, tone } => match tone {
                Tone::Normal => writeln!(out, "{pad}{text}"),
                Tone::Muted => writeln!(out, "{pad}({text})"),
                Tone::Accent | Tone::Strong => writeln!(out, "{pad}*{text}*"),
            },
            PreviewNode::Icon { icon, .. } => writeln!(out, "{pad}{}", icon.glyph()),
            PreviewNode::Image { slot, source, .. } => match source {
                ImageSource::Data(_) => writeln!(out, "{pad}[image {slot}]"),
                ImageSource::Placeholder(icon) => writeln!(out, "{pad}[{} {slot}]", icon.glyph()),
            },
            PreviewNode::Button { label, icon, enabled, .. } => {
                let glyph = icon.map(|i| format!("{} ", i.glyph())).unwrap_or_default();
                let state = if *enabled { "" } else { " (disabled)" };
                writeln!(out, "{pad}[{glyph}{label}]{state}")
            }
            PreviewNode::TabBar(tabs) => {
                let labels: Vec<String> = tabs
                    .iter()
                    .map(|t| if t.active { format!("<{}>", t.label) } else { t.label.clone() })
                    .collect();
                writeln!(out, "{pad}tabs: {}", labels.join(" | "))
            }
            PreviewNode::Badge { text, .. } => writeln!(out, "{pad}«{text}»"),
            PreviewNode::Progress { fraction, .. } => {
                writeln!(out, "{pad}progress {:.0}%", fraction.clamp(0.0, 1.0) * 100.0)
            }
            PreviewNode::Input { value, hint, kind, .. } => {
                let shown = match kind {
                    InputKind::Password => "•".repeat(value.chars().count()),
                    InputKind::Line | InputKind::Multiline => value.clone(),
                };
                writeln!(out, "{pad}{hint}: [{shown}]")
            }
            PreviewNode::Divider => writeln!(out, "{pad}---"),
        };
    }
}

/// Modal layer above the template
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Loading,
    ConnectionError { message: String },
}

/// Everything the preview pane shows for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewView {
    pub root: PreviewNode,
    pub overlay: Option<Overlay>,
    pub toasts: Vec<Toast>,
}

impl PreviewView {
    pub fn outline(&self) -> String {
        let mut out = self.root.outline();
        match &self.overlay {
            Some(Overlay::Loading) => out.push_str("[overlay] Cargando...\n"),
            Some(Overlay::ConnectionError { message }) => {
                let _ = writeln!(out, "[overlay] {message} [Reintentar] [Cerrar]");
            }
            None => {}
        }
        for toast in &self.toasts {
            let _ = writeln!(out, "[toast {:?}] {}", toast.notice.level, toast.notice.message);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::ecommerce;

    #[test]
    fn test_outline_indents_children() {
        let tree = PreviewNode::column(vec![
            PreviewNode::heading("Tienda", HexColor::BLACK),
            PreviewNode::row(vec![PreviewNode::text("a"), PreviewNode::muted("b")]),
        ]);
        assert_eq!(tree.outline(), "column\n  # Tienda\n  row\n    a\n    (b)\n");
    }

    #[test]
    fn test_image_without_data_is_placeholder() {
        let node = PreviewNode::image("logo", None, Icon::Image, 40.0);
        assert!(matches!(
            node,
            PreviewNode::Image { source: ImageSource::Placeholder(Icon::Image), .. }
        ));
        assert_eq!(node.outline(), "[🖼 logo]\n");
    }

    #[test]
    fn test_disabled_buttons_expose_no_action() {
        let action = PreviewAction::Ecommerce(ecommerce::Action::OpenCart);
        let tree = PreviewNode::column(vec![
            PreviewNode::button("Carrito", action.clone(), ButtonStyle::Ghost),
            PreviewNode::button("Pagar", PreviewAction::DismissError, ButtonStyle::Ghost).enabled(false),
        ]);
        assert_eq!(tree.actions(), vec![action]);
        assert!(tree.outline().contains("[Pagar] (disabled)"));
    }

    #[test]
    fn test_password_input_is_masked_in_outline() {
        let edit = PreviewAction::DismissError;
        let tree = PreviewNode::column(vec![
            PreviewNode::input("ana@correo.com", "Correo", InputKind::Line, edit.clone()),
            PreviewNode::input("secreto", "Contraseña", InputKind::Password, edit),
        ]);
        assert_eq!(tree.outline(), "column\n  Correo: [ana@correo.com]\n  Contraseña: [•••••••]\n");
    }
}
