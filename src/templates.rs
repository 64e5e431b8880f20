//! Template registry
//!
//! Maps template ids to metadata and decides which templates a simulator
//! offers. Rendering itself lives in [`crate::preview`] and is selected by
//! matching on [`TemplateKind`].

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::SimulatorKind;
use crate::preview::node::Icon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Ecommerce,
    Social,
    Fitness,
    Dashboard,
    Blog,
    Portfolio,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateInfo {
    pub kind: TemplateKind,
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: Icon,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 6] = [
        TemplateKind::Ecommerce,
        TemplateKind::Social,
        TemplateKind::Fitness,
        TemplateKind::Dashboard,
        TemplateKind::Blog,
        TemplateKind::Portfolio,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            TemplateKind::Ecommerce => "ecommerce",
            TemplateKind::Social => "social",
            TemplateKind::Fitness => "fitness",
            TemplateKind::Dashboard => "dashboard",
            TemplateKind::Blog => "blog",
            TemplateKind::Portfolio => "portfolio",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    pub fn info(&self) -> TemplateInfo {
        let (name, description, icon) = match self {
            TemplateKind::Ecommerce => ("E-commerce", "Tienda online con catálogo, carrito y checkout", Icon::Cart),
            TemplateKind::Social => ("Red Social", "Feed, historias, likes y perfiles", Icon::Users),
            TemplateKind::Fitness => ("Fitness", "Rutinas, cronómetro y progreso", Icon::Dumbbell),
            TemplateKind::Dashboard => ("Dashboard", "Panel de métricas con acceso demo", Icon::Chart),
            TemplateKind::Blog => ("Blog", "Artículos, categorías y newsletter", Icon::Pen),
            TemplateKind::Portfolio => ("Portafolio", "Proyectos destacados y contacto", Icon::Briefcase),
        };
        TemplateInfo {
            kind: *self,
            id: self.id(),
            name,
            description,
            icon,
        }
    }
}

/// The templates one simulator offers, in display order
#[derive(Debug, Clone, Copy)]
pub struct TemplateRegistry {
    simulator: SimulatorKind,
    templates: &'static [TemplateKind],
}

impl TemplateRegistry {
    pub fn for_simulator(simulator: SimulatorKind) -> Self {
        const APP: &[TemplateKind] = &[TemplateKind::Ecommerce, TemplateKind::Social, TemplateKind::Fitness];
        const WEBSITE: &[TemplateKind] = &[
            TemplateKind::Ecommerce,
            TemplateKind::Blog,
            TemplateKind::Portfolio,
            TemplateKind::Dashboard,
        ];

        let templates: &'static [TemplateKind] = match simulator {
            SimulatorKind::App | SimulatorKind::Mobile => APP,
            SimulatorKind::Website => WEBSITE,
            SimulatorKind::Showcase => &TemplateKind::ALL,
        };
        Self { simulator, templates }
    }

    /// First entry of the list
    pub fn default_template(&self) -> TemplateKind {
        self.templates[0]
    }

    pub fn templates(&self) -> &'static [TemplateKind] {
        self.templates
    }

    pub fn contains(&self, kind: TemplateKind) -> bool {
        self.templates.contains(&kind)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        TemplateKind::from_id(id).is_some_and(|kind| self.contains(kind))
    }

    /// Resolve an id; unknown ids and templates of other simulators fall back to the default
    pub fn resolve(&self, id: &str) -> TemplateKind {
        match TemplateKind::from_id(id) {
            Some(kind) if self.contains(kind) => kind,
            _ => {
                let fallback = self.default_template();
                warn!(simulator = ?self.simulator, template = %id, using = fallback.id(), "Unknown template, falling back to default");
                fallback
            }
        }
    }

    pub fn list_all(&self) -> Vec<TemplateInfo> {
        self.templates.iter().map(TemplateKind::info).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_ids() {
        let registry = TemplateRegistry::for_simulator(SimulatorKind::App);
        assert_eq!(registry.resolve("social"), TemplateKind::Social);
        assert_eq!(registry.resolve("fitness"), TemplateKind::Fitness);
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_default() {
        for simulator in SimulatorKind::ALL {
            let registry = TemplateRegistry::for_simulator(simulator);
            assert_eq!(registry.resolve("nonexistent"), registry.default_template());
            assert_eq!(registry.resolve(""), registry.default_template());
        }
    }

    #[test]
    fn test_resolve_rejects_templates_of_other_simulators() {
        let registry = TemplateRegistry::for_simulator(SimulatorKind::Website);
        assert_eq!(registry.resolve("fitness"), TemplateKind::Ecommerce);
        assert!(!registry.contains_id("social"));
        assert!(registry.contains_id("blog"));
    }

    #[test]
    fn test_list_all_preserves_order() {
        let ids: Vec<_> = TemplateRegistry::for_simulator(SimulatorKind::Website)
            .list_all()
            .into_iter()
            .map(|info| info.id)
            .collect();
        assert_eq!(ids, vec!["ecommerce", "blog", "portfolio", "dashboard"]);

        assert_eq!(TemplateRegistry::for_simulator(SimulatorKind::Showcase).list_all().len(), 6);
    }

    #[test]
    fn test_default_is_ecommerce_everywhere() {
        for simulator in SimulatorKind::ALL {
            assert_eq!(
                TemplateRegistry::for_simulator(simulator).default_template(),
                TemplateKind::Ecommerce
            );
        }
    }
}
