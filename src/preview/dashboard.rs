//! Admin dashboard template
//!
//! Guarded by a demo sign-in form. Only the hard-coded demo credentials are
//! accepted; nothing is checked against a server.

use serde_json::json;

use super::node::{ButtonStyle, Icon, InputKind, PreviewNode, Tab};
use super::{Palette, PreviewAction, Reaction, Screen, format_price};
use crate::config::SimulatorConfig;
use crate::constants::demo;
use crate::notify::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Overview,
    Analytics,
    Customers,
    Settings,
}

impl Section {
    const ALL: [Section; 4] = [Section::Overview, Section::Analytics, Section::Customers, Section::Settings];

    fn label(&self) -> &'static str {
        match self {
            Section::Overview => "Resumen",
            Section::Analytics => "Analítica",
            Section::Customers => "Clientes",
            Section::Settings => "Ajustes",
        }
    }

    fn icon(&self) -> Icon {
        match self {
            Section::Overview => Icon::Home,
            Section::Analytics => Icon::Chart,
            Section::Customers => Icon::Users,
            Section::Settings => Icon::Settings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    Week,
    Month,
    Quarter,
}

impl Range {
    const ALL: [Range; 3] = [Range::Week, Range::Month, Range::Quarter];

    pub fn days(&self) -> u32 {
        match self {
            Range::Week => 7,
            Range::Month => 30,
            Range::Quarter => 90,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    EmailReports,
    TwoFactor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    EditField(Field, String),
    SignIn { email: String, password: String },
    SignOut,
    SelectSection(Section),
    SetRange(Range),
    ToggleSetting(Setting),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    SignIn,
}

const DAILY_REVENUE_CENTS: u64 = 184_250;
const DAILY_ORDERS: u32 = 37;
const DAILY_VISITORS: u32 = 1_240;

const CUSTOMERS: &[(&str, &str, u64)] = &[
    ("Lucía Fernández", "lucia@correo.com", 459_900),
    ("Diego Martínez", "diego@correo.com", 312_450),
    ("Sofía Torres", "sofia@correo.com", 128_000),
    ("Andrés Gómez", "andres@correo.com", 89_990),
];

pub struct DashboardScreen {
    email: String,
    password: String,
    signed_in: bool,
    section: Section,
    range: Range,
    email_reports: bool,
    two_factor: bool,
}

impl Default for DashboardScreen {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            signed_in: false,
            section: Section::Overview,
            range: Range::Week,
            email_reports: true,
            two_factor: false,
        }
    }
}

impl DashboardScreen {
    pub fn revenue_cents(&self) -> u64 {
        DAILY_REVENUE_CENTS * u64::from(self.range.days())
    }

    pub fn orders(&self) -> u32 {
        DAILY_ORDERS * self.range.days()
    }

    pub fn setting(&self, setting: Setting) -> bool {
        match setting {
            Setting::EmailReports => self.email_reports,
            Setting::TwoFactor => self.two_factor,
        }
    }
}

fn dash(action: Action) -> PreviewAction {
    PreviewAction::Dashboard(action)
}

impl Screen for DashboardScreen {
    type Action = Action;
    type Commit = Commit;

    fn handle(&mut self, action: Action) -> Reaction<Commit> {
        match action {
            Action::EditField(field, value) if !self.signed_in => {
                match field {
                    Field::Email => self.email = value,
                    Field::Password => self.password = value,
                }
                Reaction::ignored()
            }
            Action::SignIn { email, password } if !self.signed_in => {
                if email.trim() == demo::EMAIL && password == demo::PASSWORD {
                    Reaction::new("sign_in").request(Commit::SignIn)
                } else {
                    self.password.clear();
                    Reaction::new("sign_in_failed")
                        .payload(json!({ "email": email }))
                        .notify(Notification::error("Credenciales incorrectas"))
                }
            }
            Action::SignOut if self.signed_in => {
                *self = Self::default();
                Reaction::new("sign_out").navigation()
            }
            Action::SelectSection(section) if self.signed_in && section != self.section => {
                self.section = section;
                Reaction::new("select_section")
                    .navigation()
                    .payload(json!({ "section": section.label() }))
            }
            Action::SetRange(range) if self.signed_in && range != self.range => {
                self.range = range;
                Reaction::new("set_range").payload(json!({ "days": range.days() }))
            }
            Action::ToggleSetting(setting) if self.signed_in => {
                let value = match setting {
                    Setting::EmailReports => &mut self.email_reports,
                    Setting::TwoFactor => &mut self.two_factor,
                };
                *value = !*value;
                Reaction::new("toggle_setting")
                    .payload(json!({ "setting": format!("{setting:?}"), "enabled": *value }))
                    .notify(Notification::success("Ajustes guardados"))
            }
            _ => Reaction::ignored(),
        }
    }

    fn commit(&mut self, commit: Commit) -> Option<Notification> {
        match commit {
            Commit::SignIn => {
                self.signed_in = true;
                self.section = Section::Overview;
                self.password.clear();
                Some(Notification::success("Bienvenido de nuevo"))
            }
        }
    }

    fn render(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        if !self.signed_in {
            return self.render_sign_in(config, palette);
        }

        let header = PreviewNode::surface(
            palette.surface,
            vec![PreviewNode::row(vec![
                PreviewNode::image("logo", config.logo.as_deref(), Icon::Chart, 28.0),
                PreviewNode::heading(&config.app_name, palette.text),
                PreviewNode::icon_button(Icon::Lock, "Salir", dash(Action::SignOut)),
            ])],
        );

        let nav = Section::ALL
            .iter()
            .map(|section| Tab {
                label: section.label().to_string(),
                icon: section.icon(),
                action: dash(Action::SelectSection(*section)),
                active: *section == self.section,
            })
            .collect();

        let body = match self.section {
            Section::Overview => self.render_overview(palette),
            Section::Analytics => self.render_analytics(palette),
            Section::Customers => render_customers(palette),
            Section::Settings => self.render_settings(palette),
        };

        PreviewNode::column(vec![header, PreviewNode::TabBar(nav), body])
    }
}

impl DashboardScreen {
    fn render_sign_in(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        PreviewNode::column(vec![
            PreviewNode::image("logo", config.logo.as_deref(), Icon::Lock, 48.0),
            PreviewNode::heading(format!("{} · Panel", config.app_name), palette.text),
            PreviewNode::input(
                &self.email,
                "Correo",
                InputKind::Line,
                dash(Action::EditField(Field::Email, String::new())),
            ),
            PreviewNode::input(
                &self.password,
                "Contraseña",
                InputKind::Password,
                dash(Action::EditField(Field::Password, String::new())),
            ),
            PreviewNode::button(
                "Iniciar sesión",
                dash(Action::SignIn {
                    email: self.email.clone(),
                    password: self.password.clone(),
                }),
                ButtonStyle::Filled(palette.primary),
            ),
            PreviewNode::muted(format!("Cuenta demo: {} / {}", demo::EMAIL, demo::PASSWORD)),
        ])
    }

    fn range_picker(&self, palette: &Palette) -> PreviewNode {
        PreviewNode::row(
            Range::ALL
                .iter()
                .map(|range| {
                    let style = if *range == self.range {
                        ButtonStyle::Filled(palette.primary)
                    } else {
                        ButtonStyle::Outline(palette.primary)
                    };
                    PreviewNode::button(format!("{} días", range.days()), dash(Action::SetRange(*range)), style)
                })
                .collect(),
        )
    }

    fn render_overview(&self, palette: &Palette) -> PreviewNode {
        let kpi = |label: &str, value: String, icon: Icon| {
            PreviewNode::surface(
                palette.surface,
                vec![
                    PreviewNode::tinted_icon(icon, palette.primary),
                    PreviewNode::muted(label),
                    PreviewNode::strong(value),
                ],
            )
        };
        PreviewNode::column(vec![
            self.range_picker(palette),
            PreviewNode::row(vec![
                kpi("Ingresos", format_price(self.revenue_cents()), Icon::Chart),
                kpi("Pedidos", self.orders().to_string(), Icon::Cart),
            ]),
            PreviewNode::row(vec![
                kpi("Visitantes", (DAILY_VISITORS * self.range.days()).to_string(), Icon::Users),
                kpi("Conversión", "3.2%".to_string(), Icon::Star),
            ]),
        ])
    }

    fn render_analytics(&self, palette: &Palette) -> PreviewNode {
        let channels = [("Orgánico", 0.42), ("Redes sociales", 0.28), ("Email", 0.18), ("Directo", 0.12)];
        let mut children = vec![
            self.range_picker(palette),
            PreviewNode::heading("Tráfico por canal", palette.text),
        ];
        for (channel, share) in channels {
            children.push(PreviewNode::row(vec![
                PreviewNode::muted(channel),
                PreviewNode::Progress { fraction: share, color: palette.secondary },
                PreviewNode::muted(format!("{:.0}%", share * 100.0)),
            ]));
        }
        PreviewNode::column(children)
    }

    fn render_settings(&self, palette: &Palette) -> PreviewNode {
        let toggle = |label: &str, setting: Setting| {
            let state = if self.setting(setting) { "Activado" } else { "Desactivado" };
            PreviewNode::row(vec![
                PreviewNode::text(label),
                PreviewNode::button(state, dash(Action::ToggleSetting(setting)), ButtonStyle::Outline(palette.primary)),
            ])
        };
        PreviewNode::column(vec![
            PreviewNode::heading("Ajustes", palette.text),
            toggle("Reportes por correo", Setting::EmailReports),
            toggle("Verificación en dos pasos", Setting::TwoFactor),
        ])
    }
}

fn render_customers(palette: &Palette) -> PreviewNode {
    let mut children = vec![PreviewNode::heading("Clientes recientes", palette.text)];
    for (name, email, spent) in CUSTOMERS {
        children.push(PreviewNode::row(vec![
            PreviewNode::icon(Icon::User),
            PreviewNode::strong(*name),
            PreviewNode::muted(*email),
            PreviewNode::accent(format_price(*spent)),
        ]));
    }
    PreviewNode::column(children)
}

#[cfg(test)]
impl DashboardScreen {
    pub fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn range(&self) -> Range {
        self.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_in(email: &str, password: &str) -> Action {
        Action::SignIn {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn signed_in() -> DashboardScreen {
        let mut screen = DashboardScreen::default();
        let commit = screen
            .handle(sign_in(demo::EMAIL, demo::PASSWORD))
            .request
            .expect("demo sign-in is a network action");
        screen.commit(commit);
        screen
    }

    #[test]
    fn test_wrong_credentials_rejected() {
        let mut screen = DashboardScreen::default();
        let reaction = screen.handle(sign_in(demo::EMAIL, "wrong"));
        assert_eq!(reaction.event, Some("sign_in_failed"));
        assert!(reaction.request.is_none());
        assert!(reaction.notice.is_some());
        assert!(!screen.is_signed_in());
    }

    #[test]
    fn test_sign_in_button_submits_typed_credentials() {
        let mut screen = DashboardScreen::default();
        screen.handle(Action::EditField(Field::Email, "otra@correo.com".to_string()));
        screen.handle(Action::EditField(Field::Password, "1234".to_string()));

        let config = SimulatorConfig::default_for(crate::config::SimulatorKind::Showcase);
        let palette = Palette::from_config(&config);
        let outline = screen.render(&config, &palette).outline();
        assert!(outline.contains("Correo: [otra@correo.com]"));
        assert!(outline.contains("Contraseña: [••••]"));

        let submitted = screen.render(&config, &palette).actions().into_iter().find_map(|action| match action {
            PreviewAction::Dashboard(action @ Action::SignIn { .. }) => Some(action),
            _ => None,
        });
        assert_eq!(submitted, Some(sign_in("otra@correo.com", "1234")));
    }

    #[test]
    fn test_failed_sign_in_clears_password() {
        let mut screen = DashboardScreen::default();
        screen.handle(Action::EditField(Field::Password, "nope".to_string()));
        screen.handle(sign_in(demo::EMAIL, "nope"));
        assert!(screen.password.is_empty());
        assert!(screen.handle(Action::EditField(Field::Email, "x".to_string())).event.is_none());
    }

    #[test]
    fn test_sections_require_sign_in() {
        let mut screen = DashboardScreen::default();
        assert!(screen.handle(Action::SelectSection(Section::Customers)).event.is_none());

        let mut screen = signed_in();
        assert!(screen.handle(Action::SelectSection(Section::Customers)).navigated);
        assert_eq!(screen.section(), Section::Customers);
    }

    #[test]
    fn test_range_scales_metrics() {
        let mut screen = signed_in();
        let week = screen.revenue_cents();
        screen.handle(Action::SetRange(Range::Quarter));
        assert_eq!(screen.range().days(), 90);
        assert_eq!(screen.revenue_cents(), week / 7 * 90);
    }

    #[test]
    fn test_sign_out_resets_state() {
        let mut screen = signed_in();
        screen.handle(Action::ToggleSetting(Setting::TwoFactor));
        assert!(screen.setting(Setting::TwoFactor));
        screen.handle(Action::SignOut);
        assert!(!screen.is_signed_in());
        assert!(!screen.setting(Setting::TwoFactor));
    }
}
