//! Blog template

use std::collections::BTreeSet;

use serde_json::json;

use super::node::{ButtonStyle, Icon, PreviewNode};
use super::{Palette, PreviewAction, Reaction, Screen};
use crate::config::SimulatorConfig;
use crate::notify::Notification;

pub struct Article {
    pub id: u32,
    pub title: &'static str,
    pub category: &'static str,
    pub excerpt: &'static str,
    pub read_minutes: u32,
    pub image_slot: &'static str,
}

pub const ARTICLES: &[Article] = &[
    Article {
        id: 1,
        title: "10 tendencias de diseño web para este año",
        category: "Diseño",
        excerpt: "Tipografías grandes, modo oscuro y microinteracciones que marcan la diferencia.",
        read_minutes: 6,
        image_slot: "product1",
    },
    Article {
        id: 2,
        title: "Cómo elegir el stack de tu próxima app",
        category: "Desarrollo",
        excerpt: "Comparamos rendimiento, comunidad y coste de mantenimiento.",
        read_minutes: 9,
        image_slot: "product2",
    },
    Article {
        id: 3,
        title: "SEO técnico sin complicaciones",
        category: "Marketing",
        excerpt: "Lo mínimo que tu sitio necesita para aparecer en buscadores.",
        read_minutes: 5,
        image_slot: "product3",
    },
    Article {
        id: 4,
        title: "Accesibilidad: una guía práctica",
        category: "Diseño",
        excerpt: "Contraste, foco visible y textos alternativos en diez minutos.",
        read_minutes: 7,
        image_slot: "banner",
    },
];

pub const CATEGORIES: &[&str] = &["Diseño", "Desarrollo", "Marketing"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Article(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `None` shows every category
    FilterCategory(Option<&'static str>),
    OpenArticle(u32),
    Back,
    ToggleBookmark(u32),
    Subscribe,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    Subscribe,
}

pub struct BlogScreen {
    view: View,
    category: Option<&'static str>,
    bookmarks: BTreeSet<u32>,
    subscribed: bool,
}

impl Default for BlogScreen {
    fn default() -> Self {
        Self {
            view: View::List,
            category: None,
            bookmarks: BTreeSet::new(),
            subscribed: false,
        }
    }
}

impl BlogScreen {
    #[cfg(test)]
    pub fn view(&self) -> View {
        self.view
    }

    #[cfg(test)]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn is_bookmarked(&self, id: u32) -> bool {
        self.bookmarks.contains(&id)
    }

    /// Articles shown under the current category filter
    pub fn visible_articles(&self) -> impl Iterator<Item = &'static Article> + '_ {
        ARTICLES
            .iter()
            .filter(move |a| self.category.is_none_or(|c| a.category == c))
    }
}

fn blog(action: Action) -> PreviewAction {
    PreviewAction::Blog(action)
}

impl Screen for BlogScreen {
    type Action = Action;
    type Commit = Commit;

    fn handle(&mut self, action: Action) -> Reaction<Commit> {
        match (action, self.view) {
            (Action::FilterCategory(category), View::List) if category != self.category => {
                if category.is_some_and(|c| !CATEGORIES.contains(&c)) {
                    return Reaction::ignored();
                }
                self.category = category;
                Reaction::new("filter_category").payload(json!({ "category": category }))
            }
            (Action::OpenArticle(id), View::List) if ARTICLES.iter().any(|a| a.id == id) => {
                self.view = View::Article(id);
                Reaction::new("open_article").navigation().payload(json!({ "articleId": id }))
            }
            (Action::Back, View::Article(_)) => {
                self.view = View::List;
                Reaction::new("navigate_back").navigation()
            }
            (Action::ToggleBookmark(id), _) if ARTICLES.iter().any(|a| a.id == id) => {
                let saved = self.bookmarks.insert(id);
                if !saved {
                    self.bookmarks.remove(&id);
                }
                Reaction::new("bookmark_article").payload(json!({ "articleId": id, "bookmarked": saved }))
            }
            (Action::Subscribe, _) if !self.subscribed => Reaction::new("subscribe_newsletter").request(Commit::Subscribe),
            _ => Reaction::ignored(),
        }
    }

    fn commit(&mut self, commit: Commit) -> Option<Notification> {
        match commit {
            Commit::Subscribe => {
                self.subscribed = true;
                Some(Notification::success("¡Gracias por suscribirte!"))
            }
        }
    }

    fn render(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        let header = PreviewNode::surface(
            palette.background,
            vec![PreviewNode::row(vec![
                PreviewNode::image("logo", config.logo.as_deref(), Icon::Pen, 28.0),
                PreviewNode::heading(&config.app_name, palette.primary),
                PreviewNode::muted("Inicio · Artículos · Contacto"),
            ])],
        );

        let body = match self.view {
            View::List => self.render_list(config, palette),
            View::Article(id) => self.render_article(id, config, palette),
        };

        PreviewNode::column(vec![header, body, self.render_newsletter(palette)])
    }
}

impl BlogScreen {
    fn render_list(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        let mut filters = vec![PreviewNode::button(
            "Todos",
            blog(Action::FilterCategory(None)),
            filter_style(self.category.is_none(), palette),
        )];
        for &category in CATEGORIES {
            filters.push(PreviewNode::button(
                category,
                blog(Action::FilterCategory(Some(category))),
                filter_style(self.category == Some(category), palette),
            ));
        }

        let mut children = vec![
            PreviewNode::image("hero", config.custom_image("hero"), Icon::Image, 120.0),
            PreviewNode::row(filters),
        ];
        for article in self.visible_articles() {
            let mark = if self.is_bookmarked(article.id) { "Guardado" } else { "Guardar" };
            children.push(PreviewNode::surface(
                palette.surface,
                vec![
                    PreviewNode::image(article.image_slot, config.custom_image(article.image_slot), Icon::Image, 90.0),
                    PreviewNode::badge(article.category, palette.secondary),
                    PreviewNode::button(article.title, blog(Action::OpenArticle(article.id)), ButtonStyle::Ghost),
                    PreviewNode::muted(article.excerpt),
                    PreviewNode::row(vec![
                        PreviewNode::muted(format!("{} min de lectura", article.read_minutes)),
                        PreviewNode::icon_button(Icon::Bookmark, mark, blog(Action::ToggleBookmark(article.id))),
                    ]),
                ],
            ));
        }
        PreviewNode::column(children)
    }

    fn render_article(&self, id: u32, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        let Some(article) = ARTICLES.iter().find(|a| a.id == id) else {
            return PreviewNode::muted("Artículo no encontrado");
        };
        PreviewNode::column(vec![
            PreviewNode::icon_button(Icon::Back, "Volver", blog(Action::Back)),
            PreviewNode::badge(article.category, palette.secondary),
            PreviewNode::heading(article.title, palette.text),
            PreviewNode::muted(format!("Por {} · {} min", config.app_name, article.read_minutes)),
            PreviewNode::image(article.image_slot, config.custom_image(article.image_slot), Icon::Image, 160.0),
            PreviewNode::text(article.excerpt),
            PreviewNode::text("Contenido de ejemplo para la vista previa del artículo."),
        ])
    }

    fn render_newsletter(&self, palette: &Palette) -> PreviewNode {
        let content = if self.subscribed {
            vec![PreviewNode::tinted_icon(Icon::Check, palette.on_primary), PreviewNode::text("Ya estás suscrito")]
        } else {
            vec![
                PreviewNode::icon(Icon::Mail),
                PreviewNode::text("Recibe los nuevos artículos en tu correo"),
                PreviewNode::button("Suscribirme", blog(Action::Subscribe), ButtonStyle::Filled(palette.secondary)),
            ]
        };
        PreviewNode::surface(palette.primary, content)
    }
}

fn filter_style(active: bool, palette: &Palette) -> ButtonStyle {
    if active {
        ButtonStyle::Filled(palette.primary)
    } else {
        ButtonStyle::Outline(palette.primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_category() {
        let mut screen = BlogScreen::default();
        assert_eq!(screen.visible_articles().count(), ARTICLES.len());
        screen.handle(Action::FilterCategory(Some("Diseño")));
        let ids: Vec<u32> = screen.visible_articles().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert!(screen.handle(Action::FilterCategory(Some("Cocina"))).event.is_none());
    }

    #[test]
    fn test_article_navigation() {
        let mut screen = BlogScreen::default();
        assert!(screen.handle(Action::Back).event.is_none());
        assert!(screen.handle(Action::OpenArticle(2)).navigated);
        assert_eq!(screen.view(), View::Article(2));
        assert!(screen.handle(Action::OpenArticle(3)).event.is_none());
        screen.handle(Action::Back);
        assert_eq!(screen.view(), View::List);
    }

    #[test]
    fn test_subscribe_once() {
        let mut screen = BlogScreen::default();
        let commit = screen.handle(Action::Subscribe).request.expect("subscribe is a network action");
        screen.commit(commit);
        assert!(screen.is_subscribed());
        assert!(screen.handle(Action::Subscribe).event.is_none());
    }
}
