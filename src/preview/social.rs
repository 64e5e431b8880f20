//! Social network template

use std::collections::BTreeSet;

use serde_json::json;

use super::node::{ButtonStyle, Icon, PreviewNode, Tab};
use super::{Palette, PreviewAction, Reaction, Screen};
use crate::config::SimulatorConfig;
use crate::notify::Notification;

struct Post {
    id: u32,
    author: &'static str,
    handle: &'static str,
    body: &'static str,
    likes: u32,
    comments: u32,
    image_slot: Option<&'static str>,
}

const POSTS: &[Post] = &[
    Post {
        id: 1,
        author: "María García",
        handle: "@mariag",
        body: "¡Lanzamos nuestra nueva colección! 🎉",
        likes: 128,
        comments: 14,
        image_slot: Some("banner"),
    },
    Post {
        id: 2,
        author: "Carlos Ruiz",
        handle: "@carlosr",
        body: "Tres consejos para mejorar tu productividad esta semana.",
        likes: 56,
        comments: 8,
        image_slot: None,
    },
    Post {
        id: 3,
        author: "Ana López",
        handle: "@analopez",
        body: "Atardecer desde la oficina. No está mal para un lunes.",
        likes: 342,
        comments: 27,
        image_slot: Some("product1"),
    },
];

struct Suggestion {
    id: u32,
    name: &'static str,
    handle: &'static str,
}

const SUGGESTIONS: &[Suggestion] = &[
    Suggestion { id: 10, name: "Diseño Digital", handle: "@disenodigital" },
    Suggestion { id: 11, name: "Tech News", handle: "@technews" },
    Suggestion { id: 12, name: "Laura Méndez", handle: "@lauram" },
];

const TRENDING: &[&str] = &["#Tecnología", "#Emprendimiento", "#Diseño", "#Marketing"];

const NOTIFICATIONS: &[&str] = &[
    "A María García le gustó tu publicación",
    "Carlos Ruiz comenzó a seguirte",
    "Ana López comentó: ¡Increíble!",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialTab {
    Feed,
    Explore,
    Notifications,
    Profile,
}

impl SocialTab {
    const ALL: [SocialTab; 4] = [SocialTab::Feed, SocialTab::Explore, SocialTab::Notifications, SocialTab::Profile];

    fn label(&self) -> &'static str {
        match self {
            SocialTab::Feed => "Inicio",
            SocialTab::Explore => "Explorar",
            SocialTab::Notifications => "Avisos",
            SocialTab::Profile => "Perfil",
        }
    }

    fn icon(&self) -> Icon {
        match self {
            SocialTab::Feed => Icon::Home,
            SocialTab::Explore => Icon::Search,
            SocialTab::Notifications => Icon::Bell,
            SocialTab::Profile => Icon::User,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectTab(SocialTab),
    ToggleLike(u32),
    ToggleBookmark(u32),
    Follow(u32),
    Unfollow(u32),
    Publish,
    MarkAllRead,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    Follow(u32),
    Publish,
}

pub struct SocialScreen {
    tab: SocialTab,
    liked: BTreeSet<u32>,
    bookmarked: BTreeSet<u32>,
    following: BTreeSet<u32>,
    published: u32,
    unread: usize,
}

impl Default for SocialScreen {
    fn default() -> Self {
        Self {
            tab: SocialTab::Feed,
            liked: BTreeSet::new(),
            bookmarked: BTreeSet::new(),
            following: BTreeSet::new(),
            published: 0,
            unread: NOTIFICATIONS.len(),
        }
    }
}

impl SocialScreen {
    #[cfg(test)]
    pub fn tab(&self) -> SocialTab {
        self.tab
    }

    pub fn like_count(&self, post_id: u32) -> Option<u32> {
        let post = POSTS.iter().find(|p| p.id == post_id)?;
        Some(post.likes + u32::from(self.liked.contains(&post_id)))
    }

    pub fn is_bookmarked(&self, post_id: u32) -> bool {
        self.bookmarked.contains(&post_id)
    }

    pub fn is_following(&self, user_id: u32) -> bool {
        self.following.contains(&user_id)
    }

    #[cfg(test)]
    pub fn published(&self) -> u32 {
        self.published
    }

    #[cfg(test)]
    pub fn unread(&self) -> usize {
        self.unread
    }
}

fn toggle(set: &mut BTreeSet<u32>, id: u32) -> bool {
    if set.remove(&id) {
        false
    } else {
        set.insert(id);
        true
    }
}

fn social(action: Action) -> PreviewAction {
    PreviewAction::Social(action)
}

impl Screen for SocialScreen {
    type Action = Action;
    type Commit = Commit;

    fn handle(&mut self, action: Action) -> Reaction<Commit> {
        let known_post = |id: u32| POSTS.iter().any(|p| p.id == id);
        let known_user = |id: u32| SUGGESTIONS.iter().any(|s| s.id == id);

        match action {
            Action::SelectTab(tab) if tab != self.tab => {
                self.tab = tab;
                Reaction::new("select_tab")
                    .navigation()
                    .payload(json!({ "tab": tab.label() }))
            }
            Action::ToggleLike(id) if known_post(id) => {
                let liked = toggle(&mut self.liked, id);
                Reaction::new("like_post").payload(json!({ "postId": id, "liked": liked }))
            }
            Action::ToggleBookmark(id) if known_post(id) => {
                let saved = toggle(&mut self.bookmarked, id);
                let notice = if saved {
                    Notification::info("Guardado en favoritos")
                } else {
                    Notification::info("Eliminado de favoritos")
                };
                Reaction::new("bookmark_post")
                    .payload(json!({ "postId": id, "bookmarked": saved }))
                    .notify(notice)
            }
            Action::Follow(id) if known_user(id) && !self.is_following(id) => Reaction::new("follow_user")
                .payload(json!({ "userId": id }))
                .request(Commit::Follow(id)),
            Action::Unfollow(id) => {
                if self.following.remove(&id) {
                    Reaction::new("unfollow_user").payload(json!({ "userId": id }))
                } else {
                    Reaction::ignored()
                }
            }
            Action::Publish => Reaction::new("publish_post").request(Commit::Publish),
            Action::MarkAllRead if self.unread > 0 => {
                self.unread = 0;
                Reaction::new("mark_notifications_read")
            }
            _ => Reaction::ignored(),
        }
    }

    fn commit(&mut self, commit: Commit) -> Option<Notification> {
        match commit {
            Commit::Follow(id) => {
                let user = SUGGESTIONS.iter().find(|s| s.id == id)?;
                self.following.insert(id);
                Some(Notification::success(format!("Ahora sigues a {}", user.name)))
            }
            Commit::Publish => {
                self.published += 1;
                Some(Notification::success("Publicación compartida"))
            }
        }
    }

    fn render(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        let header = PreviewNode::surface(
            palette.background,
            vec![PreviewNode::row(vec![
                PreviewNode::image("logo", config.logo.as_deref(), Icon::Users, 28.0),
                PreviewNode::heading(&config.app_name, palette.primary),
                PreviewNode::icon_button(Icon::Plus, "Publicar", social(Action::Publish)),
            ])],
        );

        let body = match self.tab {
            SocialTab::Feed => self.render_feed(config, palette),
            SocialTab::Explore => self.render_explore(palette),
            SocialTab::Notifications => self.render_notifications(palette),
            SocialTab::Profile => self.render_profile(config, palette),
        };

        let tabs = SocialTab::ALL
            .iter()
            .map(|tab| Tab {
                label: tab.label().to_string(),
                icon: tab.icon(),
                action: social(Action::SelectTab(*tab)),
                active: *tab == self.tab,
            })
            .collect();

        PreviewNode::column(vec![header, body, PreviewNode::TabBar(tabs)])
    }
}

impl SocialScreen {
    fn render_feed(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        let mut children = Vec::new();
        for post in POSTS {
            let mut card = vec![
                PreviewNode::row(vec![
                    PreviewNode::image("avatar", config.custom_image("avatar"), Icon::User, 32.0),
                    PreviewNode::strong(post.author),
                    PreviewNode::muted(post.handle),
                ]),
                PreviewNode::text(post.body),
            ];
            if let Some(slot) = post.image_slot {
                card.push(PreviewNode::image(slot, config.custom_image(slot), Icon::Image, 140.0));
            }
            let likes = self.like_count(post.id).unwrap_or(post.likes);
            let saved = if self.is_bookmarked(post.id) { "Guardado" } else { "Guardar" };
            card.push(PreviewNode::row(vec![
                PreviewNode::icon_button(Icon::Heart, likes.to_string(), social(Action::ToggleLike(post.id))),
                PreviewNode::icon(Icon::Comment),
                PreviewNode::muted(post.comments.to_string()),
                PreviewNode::icon(Icon::Share),
                PreviewNode::icon_button(Icon::Bookmark, saved, social(Action::ToggleBookmark(post.id))),
            ]));
            children.push(PreviewNode::surface(palette.surface, card));
        }
        PreviewNode::column(children)
    }

    fn render_explore(&self, palette: &Palette) -> PreviewNode {
        let mut children = vec![
            PreviewNode::row(vec![PreviewNode::icon(Icon::Search), PreviewNode::muted("Buscar")]),
            PreviewNode::heading("Tendencias", palette.text),
        ];
        children.push(PreviewNode::row(
            TRENDING.iter().map(|tag| PreviewNode::badge(*tag, palette.secondary)).collect(),
        ));
        children.push(PreviewNode::heading("Sugerencias para ti", palette.text));
        for user in SUGGESTIONS {
            let button = if self.is_following(user.id) {
                PreviewNode::button("Siguiendo", social(Action::Unfollow(user.id)), ButtonStyle::Outline(palette.primary))
            } else {
                PreviewNode::button("Seguir", social(Action::Follow(user.id)), ButtonStyle::Filled(palette.primary))
            };
            children.push(PreviewNode::row(vec![
                PreviewNode::icon(Icon::User),
                PreviewNode::strong(user.name),
                PreviewNode::muted(user.handle),
                button,
            ]));
        }
        PreviewNode::column(children)
    }

    fn render_notifications(&self, palette: &Palette) -> PreviewNode {
        let mut children = vec![PreviewNode::row(vec![
            PreviewNode::heading("Notificaciones", palette.text),
            PreviewNode::button("Marcar como leídas", social(Action::MarkAllRead), ButtonStyle::Ghost)
                .enabled(self.unread > 0),
        ])];
        for (index, message) in NOTIFICATIONS.iter().enumerate() {
            let node = if index < self.unread {
                PreviewNode::strong(*message)
            } else {
                PreviewNode::muted(*message)
            };
            children.push(PreviewNode::row(vec![PreviewNode::icon(Icon::Bell), node]));
        }
        PreviewNode::column(children)
    }

    fn render_profile(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        let mut children = vec![
            PreviewNode::image("avatar", config.custom_image("avatar"), Icon::User, 72.0),
            PreviewNode::heading(&config.app_name, palette.text),
            PreviewNode::row(vec![
                PreviewNode::strong(format!("{} publicaciones", self.published)),
                PreviewNode::strong(format!("{} siguiendo", self.following.len())),
                PreviewNode::strong(format!("{} guardados", self.bookmarked.len())),
            ]),
        ];
        if self.published == 0 {
            children.push(PreviewNode::muted("Aún no has publicado nada"));
        }
        PreviewNode::column(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulatorKind;

    #[test]
    fn test_like_toggles_count() {
        let mut screen = SocialScreen::default();
        assert_eq!(screen.like_count(1), Some(128));
        screen.handle(Action::ToggleLike(1));
        assert_eq!(screen.like_count(1), Some(129));
        let reaction = screen.handle(Action::ToggleLike(1));
        assert_eq!(screen.like_count(1), Some(128));
        assert_eq!(reaction.payload, Some(json!({ "postId": 1, "liked": false })));
    }

    #[test]
    fn test_follow_commits_after_request() {
        let mut screen = SocialScreen::default();
        let commit = screen.handle(Action::Follow(10)).request.expect("follow is a network action");
        assert!(!screen.is_following(10));
        assert!(screen.commit(commit).is_some());
        assert!(screen.is_following(10));

        assert!(screen.handle(Action::Follow(10)).event.is_none());
        assert!(screen.handle(Action::Unfollow(10)).event.is_some());
        assert!(!screen.is_following(10));
    }

    #[test]
    fn test_tab_switch_is_navigation() {
        let mut screen = SocialScreen::default();
        let reaction = screen.handle(Action::SelectTab(SocialTab::Profile));
        assert!(reaction.navigated);
        assert_eq!(screen.tab(), SocialTab::Profile);
        assert!(screen.handle(Action::SelectTab(SocialTab::Profile)).event.is_none());
    }

    #[test]
    fn test_mark_all_read_once() {
        let mut screen = SocialScreen::default();
        assert!(screen.handle(Action::MarkAllRead).event.is_some());
        assert_eq!(screen.unread(), 0);
        assert!(screen.handle(Action::MarkAllRead).event.is_none());
    }

    #[test]
    fn test_render_marks_active_tab() {
        let config = SimulatorConfig::default_for(SimulatorKind::Mobile);
        let outline = SocialScreen::default().render(&config, &Palette::from_config(&config)).outline();
        assert!(outline.contains("tabs: <Inicio> | Explorar | Avisos | Perfil"));
        assert!(outline.contains("[👤 avatar]"));
    }
}
