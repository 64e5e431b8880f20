//! Portfolio template

use serde_json::json;

use super::node::{ButtonStyle, Icon, InputKind, PreviewNode, Tab};
use super::{Palette, PreviewAction, Reaction, Screen};
use crate::config::SimulatorConfig;
use crate::notify::Notification;

pub struct Project {
    pub id: u32,
    pub title: &'static str,
    pub category: &'static str,
    pub summary: &'static str,
    pub stack: &'static [&'static str],
    pub image_slot: &'static str,
}

pub const PROJECTS: &[Project] = &[
    Project {
        id: 1,
        title: "Tienda online Moda Sur",
        category: "Web",
        summary: "E-commerce con pasarela de pago y panel de inventario.",
        stack: &["React", "Node.js", "Stripe"],
        image_slot: "project1",
    },
    Project {
        id: 2,
        title: "App de reservas FitClub",
        category: "Móvil",
        summary: "Reserva de clases y seguimiento de progreso para gimnasios.",
        stack: &["React Native", "Firebase"],
        image_slot: "project2",
    },
    Project {
        id: 3,
        title: "Identidad visual Café Norte",
        category: "Branding",
        summary: "Logotipo, paleta de colores y guía de estilo.",
        stack: &["Figma", "Illustrator"],
        image_slot: "project3",
    },
];

pub const CATEGORIES: &[&str] = &["Web", "Móvil", "Branding"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Projects,
    Project(u32),
    Contact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Message,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ShowHome,
    ShowProjects,
    ShowContact,
    FilterCategory(Option<&'static str>),
    OpenProject(u32),
    Back,
    EditField(Field, String),
    SendMessage { email: String, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    SendMessage,
}

pub struct PortfolioScreen {
    view: View,
    category: Option<&'static str>,
    contact_email: String,
    contact_message: String,
    messages_sent: u32,
}

impl Default for PortfolioScreen {
    fn default() -> Self {
        Self {
            view: View::Home,
            category: None,
            contact_email: String::new(),
            contact_message: String::new(),
            messages_sent: 0,
        }
    }
}

impl PortfolioScreen {
    pub fn visible_projects(&self) -> impl Iterator<Item = &'static Project> + '_ {
        PROJECTS
            .iter()
            .filter(move |p| self.category.is_none_or(|c| p.category == c))
    }

    fn go(&mut self, view: View, event: &'static str) -> Reaction<Commit> {
        if self.view == view {
            return Reaction::ignored();
        }
        self.view = view;
        Reaction::new(event).navigation()
    }
}

fn folio(action: Action) -> PreviewAction {
    PreviewAction::Portfolio(action)
}

impl Screen for PortfolioScreen {
    type Action = Action;
    type Commit = Commit;

    fn handle(&mut self, action: Action) -> Reaction<Commit> {
        match action {
            Action::ShowHome => self.go(View::Home, "show_home"),
            Action::ShowProjects => self.go(View::Projects, "show_projects"),
            Action::ShowContact => self.go(View::Contact, "show_contact"),
            Action::FilterCategory(category) if self.view == View::Projects && category != self.category => {
                if category.is_some_and(|c| !CATEGORIES.contains(&c)) {
                    return Reaction::ignored();
                }
                self.category = category;
                Reaction::new("filter_projects").payload(json!({ "category": category }))
            }
            Action::OpenProject(id) if self.view == View::Projects && PROJECTS.iter().any(|p| p.id == id) => {
                self.go(View::Project(id), "open_project").payload(json!({ "projectId": id }))
            }
            Action::Back if matches!(self.view, View::Project(_)) => self.go(View::Projects, "navigate_back"),
            Action::EditField(field, value) if self.view == View::Contact => {
                match field {
                    Field::Email => self.contact_email = value,
                    Field::Message => self.contact_message = value,
                }
                Reaction::ignored()
            }
            Action::SendMessage { email, message } if self.view == View::Contact => {
                if !email.contains('@') || message.trim().is_empty() {
                    return Reaction::new("contact_invalid")
                        .notify(Notification::error("Completa un correo válido y tu mensaje"));
                }
                Reaction::new("send_message")
                    .payload(json!({ "length": message.chars().count() }))
                    .request(Commit::SendMessage)
            }
            _ => Reaction::ignored(),
        }
    }

    fn commit(&mut self, commit: Commit) -> Option<Notification> {
        match commit {
            Commit::SendMessage => {
                self.messages_sent += 1;
                self.contact_message.clear();
                Some(Notification::success("Mensaje enviado. Te responderemos pronto."))
            }
        }
    }

    fn render(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        let nav = [
            ("Inicio", Icon::Home, Action::ShowHome, self.view == View::Home),
            (
                "Proyectos",
                Icon::Briefcase,
                Action::ShowProjects,
                matches!(self.view, View::Projects | View::Project(_)),
            ),
            ("Contacto", Icon::Mail, Action::ShowContact, self.view == View::Contact),
        ]
        .into_iter()
        .map(|(label, icon, action, active)| Tab {
            label: label.to_string(),
            icon,
            action: folio(action),
            active,
        })
        .collect();

        let header = PreviewNode::surface(
            palette.background,
            vec![
                PreviewNode::row(vec![
                    PreviewNode::image("logo", config.logo.as_deref(), Icon::Briefcase, 28.0),
                    PreviewNode::heading(&config.app_name, palette.primary),
                ]),
                PreviewNode::TabBar(nav),
            ],
        );

        let body = match self.view {
            View::Home => render_home(config, palette),
            View::Projects => self.render_projects(config, palette),
            View::Project(id) => render_project(id, config, palette),
            View::Contact => self.render_contact(palette),
        };

        PreviewNode::column(vec![header, body])
    }
}

fn render_home(config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
    PreviewNode::column(vec![
        PreviewNode::image("hero", config.custom_image("hero"), Icon::User, 140.0),
        PreviewNode::heading(format!("Hola, somos {}", config.app_name), palette.text),
        PreviewNode::muted("Diseño y desarrollo de productos digitales"),
        PreviewNode::row(vec![
            PreviewNode::button("Ver proyectos", folio(Action::ShowProjects), ButtonStyle::Filled(palette.primary)),
            PreviewNode::button("Contactar", folio(Action::ShowContact), ButtonStyle::Outline(palette.secondary)),
        ]),
    ])
}

fn render_project(id: u32, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
    let Some(project) = PROJECTS.iter().find(|p| p.id == id) else {
        return PreviewNode::muted("Proyecto no encontrado");
    };
    PreviewNode::column(vec![
        PreviewNode::icon_button(Icon::Back, "Proyectos", folio(Action::Back)),
        PreviewNode::image(project.image_slot, config.custom_image(project.image_slot), Icon::Image, 160.0),
        PreviewNode::heading(project.title, palette.text),
        PreviewNode::badge(project.category, palette.secondary),
        PreviewNode::text(project.summary),
        PreviewNode::row(project.stack.iter().map(|tech| PreviewNode::badge(*tech, palette.primary)).collect()),
    ])
}

impl PortfolioScreen {
    fn render_projects(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        let style = |active: bool| {
            if active {
                ButtonStyle::Filled(palette.primary)
            } else {
                ButtonStyle::Outline(palette.primary)
            }
        };
        let mut filters = vec![PreviewNode::button(
            "Todos",
            folio(Action::FilterCategory(None)),
            style(self.category.is_none()),
        )];
        for &category in CATEGORIES {
            filters.push(PreviewNode::button(
                category,
                folio(Action::FilterCategory(Some(category))),
                style(self.category == Some(category)),
            ));
        }

        let mut children = vec![PreviewNode::row(filters)];
        for project in self.visible_projects() {
            children.push(PreviewNode::surface(
                palette.surface,
                vec![
                    PreviewNode::image(project.image_slot, config.custom_image(project.image_slot), Icon::Image, 90.0),
                    PreviewNode::button(project.title, folio(Action::OpenProject(project.id)), ButtonStyle::Ghost),
                    PreviewNode::muted(project.category),
                ],
            ));
        }
        PreviewNode::column(children)
    }

    fn render_contact(&self, palette: &Palette) -> PreviewNode {
        let mut children = vec![
            PreviewNode::heading("Hablemos", palette.text),
            PreviewNode::input(
                &self.contact_email,
                "Tu correo",
                InputKind::Line,
                folio(Action::EditField(Field::Email, String::new())),
            ),
            PreviewNode::input(
                &self.contact_message,
                "Cuéntanos tu proyecto",
                InputKind::Multiline,
                folio(Action::EditField(Field::Message, String::new())),
            ),
            PreviewNode::button(
                "Enviar mensaje",
                folio(Action::SendMessage {
                    email: self.contact_email.clone(),
                    message: self.contact_message.clone(),
                }),
                ButtonStyle::Filled(palette.primary),
            ),
        ];
        if self.messages_sent > 0 {
            children.push(PreviewNode::row(vec![
                PreviewNode::tinted_icon(Icon::Check, palette.secondary),
                PreviewNode::muted(format!("{} mensajes enviados", self.messages_sent)),
            ]));
        }
        PreviewNode::column(children)
    }
}

#[cfg(test)]
impl PortfolioScreen {
    pub fn view(&self) -> View {
        self.view
    }

    pub fn messages_sent(&self) -> u32 {
        self.messages_sent
    }
}
