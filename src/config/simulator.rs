//! Simulator kinds and their persisted branding config

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::storage::StorageBackend;
use super::store::ConfigStore;
use crate::constants::{branding, storage};
use crate::device::DeviceModel;
use crate::templates::{TemplateKind, TemplateRegistry};

/// The independent simulators, each with its own storage key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum SimulatorKind {
    App,
    Mobile,
    Website,
    Showcase,
}

impl SimulatorKind {
    pub const ALL: [SimulatorKind; 4] = [
        SimulatorKind::App,
        SimulatorKind::Mobile,
        SimulatorKind::Website,
        SimulatorKind::Showcase,
    ];

    /// Local-storage key, e.g. `jimmydev-app-simulator`
    pub fn storage_key(&self) -> String {
        match self {
            SimulatorKind::App => format!("{}-app-simulator", storage::NAMESPACE),
            SimulatorKind::Mobile => format!("{}-mobile-simulator", storage::NAMESPACE),
            SimulatorKind::Website => format!("{}-website-simulator", storage::NAMESPACE),
            SimulatorKind::Showcase => format!("{}-simulator", storage::NAMESPACE),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SimulatorKind::App => "App Simulator",
            SimulatorKind::Mobile => "Mobile Preview",
            SimulatorKind::Website => "Website Simulator",
            SimulatorKind::Showcase => "Template Showcase",
        }
    }

    /// Whether the preview sits inside a phone/tablet frame
    pub fn uses_device(&self) -> bool {
        matches!(self, SimulatorKind::App | SimulatorKind::Mobile)
    }

    /// Keys accepted in `customImages`
    pub fn image_slots(&self) -> &'static [&'static str] {
        const APP: &[&str] = &["banner", "product1", "product2", "product3", "avatar"];
        const WEBSITE: &[&str] = &[
            "hero", "banner", "product1", "product2", "product3", "project1", "project2", "project3",
        ];
        const SHOWCASE: &[&str] = &[
            "hero", "banner", "product1", "product2", "product3", "avatar", "project1", "project2",
            "project3",
        ];
        match self {
            SimulatorKind::App | SimulatorKind::Mobile => APP,
            SimulatorKind::Website => WEBSITE,
            SimulatorKind::Showcase => SHOWCASE,
        }
    }

    pub fn accepts_image_slot(&self, key: &str) -> bool {
        self.image_slots().contains(&key)
    }

    fn default_name(&self) -> &'static str {
        match self {
            SimulatorKind::App | SimulatorKind::Mobile => branding::DEFAULT_APP_NAME,
            SimulatorKind::Website => branding::DEFAULT_SITE_TITLE,
            SimulatorKind::Showcase => branding::DEFAULT_COMPANY,
        }
    }
}

impl fmt::Display for SimulatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Branding and template selection for one simulator
///
/// Field names match the JSON payload written to local storage. Every field
/// has a serde default so payloads from older versions still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorConfig {
    /// Logo as a data URI
    #[serde(default)]
    pub logo: Option<String>,

    #[serde(default = "default_primary_color")]
    pub primary_color: String,

    #[serde(default = "default_secondary_color")]
    pub secondary_color: String,

    /// Raw template id; resolve through [`TemplateRegistry`] before use
    #[serde(default = "default_template_id")]
    pub template: String,

    #[serde(default = "default_app_name", alias = "title", alias = "companyName")]
    pub app_name: String,

    /// App and Mobile simulators only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_model: Option<String>,

    #[serde(default)]
    pub dark_mode: bool,

    #[serde(default)]
    pub custom_images: BTreeMap<String, String>,
}

fn default_primary_color() -> String {
    branding::DEFAULT_PRIMARY.to_string()
}

fn default_secondary_color() -> String {
    branding::DEFAULT_SECONDARY.to_string()
}

fn default_template_id() -> String {
    TemplateKind::Ecommerce.id().to_string()
}

fn default_app_name() -> String {
    branding::DEFAULT_APP_NAME.to_string()
}

impl SimulatorConfig {
    /// Hard-coded config used the first time a simulator is opened
    pub fn default_for(kind: SimulatorKind) -> Self {
        Self {
            logo: None,
            primary_color: default_primary_color(),
            secondary_color: default_secondary_color(),
            template: TemplateRegistry::for_simulator(kind).default_template().id().to_string(),
            app_name: kind.default_name().to_string(),
            device_model: kind.uses_device().then(|| DeviceModel::DEFAULT.id().to_string()),
            dark_mode: false,
            custom_images: BTreeMap::new(),
        }
    }

    /// Template this config selects, falling back to the simulator default
    pub fn template_kind(&self, kind: SimulatorKind) -> TemplateKind {
        TemplateRegistry::for_simulator(kind).resolve(&self.template)
    }

    /// Device this config selects, falling back to the default device
    pub fn device(&self) -> DeviceModel {
        self.device_model
            .as_deref()
            .and_then(DeviceModel::from_id)
            .unwrap_or_default()
    }

    pub fn custom_image(&self, slot: &str) -> Option<&str> {
        self.custom_images.get(slot).map(String::as_str)
    }

    /// Replace stale values with defaults; returns the names of corrected fields
    ///
    /// Colors and names are free-form and never touched here.
    pub fn sanitize(&mut self, kind: SimulatorKind) -> Vec<&'static str> {
        let mut corrected = Vec::new();
        let registry = TemplateRegistry::for_simulator(kind);

        if !registry.contains_id(&self.template) {
            let fallback = registry.default_template();
            warn!(simulator = ?kind, template = %self.template, using = fallback.id(), "Unknown template in stored config, using default");
            self.template = fallback.id().to_string();
            corrected.push("template");
        }

        if kind.uses_device() {
            let valid = self.device_model.as_deref().and_then(DeviceModel::from_id).is_some();
            if !valid {
                warn!(simulator = ?kind, device = ?self.device_model, using = DeviceModel::DEFAULT.id(), "Unknown device model in stored config, using default");
                self.device_model = Some(DeviceModel::DEFAULT.id().to_string());
                corrected.push("deviceModel");
            }
        } else if self.device_model.is_some() {
            warn!(simulator = ?kind, device = ?self.device_model, "Dropping device model from a simulator without a device frame");
            self.device_model = None;
            corrected.push("deviceModel");
        }

        let before = self.custom_images.len();
        self.custom_images.retain(|slot, _| {
            let keep = kind.accepts_image_slot(slot);
            if !keep {
                warn!(simulator = ?kind, slot = %slot, "Dropping image stored under an unknown slot");
            }
            keep
        });
        if self.custom_images.len() != before {
            corrected.push("customImages");
        }

        corrected
    }
}

/// Open the config store of one simulator and correct stale values in storage
pub fn open_simulator_store(
    backend: Rc<dyn StorageBackend>,
    kind: SimulatorKind,
) -> ConfigStore<SimulatorConfig> {
    let mut store = ConfigStore::open(backend, kind.storage_key(), SimulatorConfig::default_for(kind));
    let mut corrected = Vec::new();
    if store.update(|config| corrected = config.sanitize(kind)) {
        info!(simulator = ?kind, fields = ?corrected, "Corrected stored simulator config");
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::storage::MemoryStorage;
    use crate::config::store::read_json;

    fn branded(kind: SimulatorKind) -> SimulatorConfig {
        let mut config = SimulatorConfig::default_for(kind);
        config.logo = Some("data:image/png;base64,iVBORw0KGgo=".to_string());
        config.primary_color = "#FF5733".to_string();
        config.secondary_color = "not-a-color".to_string();
        config.app_name = "Tienda Luna".to_string();
        config.dark_mode = true;
        config
            .custom_images
            .insert("banner".to_string(), "data:image/jpeg;base64,/9j/4AAQ".to_string());
        config
    }

    #[test]
    fn test_storage_keys_are_distinct() {
        assert_eq!(SimulatorKind::App.storage_key(), "jimmydev-app-simulator");
        assert_eq!(SimulatorKind::Website.storage_key(), "jimmydev-website-simulator");
        assert_eq!(SimulatorKind::Showcase.storage_key(), "jimmydev-simulator");

        let mut keys: Vec<_> = SimulatorKind::ALL.iter().map(|k| k.storage_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), SimulatorKind::ALL.len());
    }

    #[test]
    fn test_round_trip_through_store() {
        let backend: Rc<dyn StorageBackend> = Rc::new(MemoryStorage::new());

        for kind in SimulatorKind::ALL {
            for template in TemplateRegistry::for_simulator(kind).templates() {
                for dark_mode in [false, true] {
                    let mut config = branded(kind);
                    config.template = template.id().to_string();
                    config.dark_mode = dark_mode;

                    let mut store = open_simulator_store(backend.clone(), kind);
                    store.set(config.clone());

                    let reopened = open_simulator_store(backend.clone(), kind);
                    assert_eq!(reopened.get(), &config);
                }
            }
        }
    }

    #[test]
    fn test_missing_custom_images_defaults_to_empty() {
        let json = r##"{"logo":null,"primaryColor":"#000000","secondaryColor":"#ffffff","template":"social","appName":"Old"}"##;
        let config: SimulatorConfig = serde_json::from_str(json).unwrap();
        assert!(config.custom_images.is_empty());
        assert!(!config.dark_mode);
    }

    #[test]
    fn test_title_alias_accepted() {
        let config: SimulatorConfig = serde_json::from_str(r#"{"title":"Mi Blog"}"#).unwrap();
        assert_eq!(config.app_name, "Mi Blog");
        assert_eq!(config.template, "ecommerce");
    }

    #[test]
    fn test_unknown_template_corrected_in_storage() {
        let backend = Rc::new(MemoryStorage::new());
        backend.insert_raw("jimmydev-app-simulator", r#"{"template":"nonexistent","appName":"X"}"#);

        let store = open_simulator_store(backend.clone(), SimulatorKind::App);
        assert_eq!(store.get().template, "ecommerce");
        assert_eq!(store.get().template_kind(SimulatorKind::App), TemplateKind::Ecommerce);
        assert_eq!(store.get().app_name, "X");

        let stored: SimulatorConfig = read_json(backend.as_ref(), "jimmydev-app-simulator").unwrap();
        assert_eq!(stored.template, "ecommerce");
    }

    #[test]
    fn test_template_from_other_simulator_is_invalid() {
        let mut config = SimulatorConfig::default_for(SimulatorKind::App);
        config.template = "blog".to_string();

        assert_eq!(config.template_kind(SimulatorKind::App), TemplateKind::Ecommerce);
        assert_eq!(config.sanitize(SimulatorKind::App), vec!["template"]);
    }

    #[test]
    fn test_unknown_device_falls_back() {
        let mut config = SimulatorConfig::default_for(SimulatorKind::Mobile);
        config.device_model = Some("nokia-3310".to_string());

        assert_eq!(config.device(), DeviceModel::Iphone15Pro);
        assert_eq!(config.sanitize(SimulatorKind::Mobile), vec!["deviceModel"]);
        assert_eq!(config.device_model.as_deref(), Some("iphone-15-pro"));
    }

    #[test]
    fn test_website_has_no_device() {
        let config = SimulatorConfig::default_for(SimulatorKind::Website);
        assert_eq!(config.device_model, None);

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("deviceModel"));
    }

    #[test]
    fn test_stale_device_dropped_from_browser_simulators() {
        for kind in [SimulatorKind::Website, SimulatorKind::Showcase] {
            let mut config = SimulatorConfig::default_for(kind);
            config.device_model = Some("iphone-15".to_string());

            assert_eq!(config.sanitize(kind), vec!["deviceModel"]);
            assert_eq!(config.device_model, None);
        }

        let backend = Rc::new(MemoryStorage::new());
        backend.insert_raw("jimmydev-website-simulator", r#"{"template":"blog","deviceModel":"iphone-15"}"#);

        let store = open_simulator_store(backend.clone(), SimulatorKind::Website);
        assert_eq!(store.get().device_model, None);

        let json = backend.get_item("jimmydev-website-simulator").unwrap();
        assert!(!json.contains("deviceModel"));
    }

    #[test]
    fn test_unknown_image_slots_dropped() {
        let mut config = SimulatorConfig::default_for(SimulatorKind::App);
        config.custom_images.insert("banner".to_string(), "data:a".to_string());
        config.custom_images.insert("wallpaper".to_string(), "data:b".to_string());

        assert_eq!(config.sanitize(SimulatorKind::App), vec!["customImages"]);
        assert_eq!(config.custom_images.len(), 1);
        assert!(config.custom_image("banner").is_some());
    }

    #[test]
    fn test_colors_never_sanitized() {
        let mut config = branded(SimulatorKind::App);
        assert!(config.sanitize(SimulatorKind::App).is_empty());
        assert_eq!(config.secondary_color, "not-a-color");
    }
}
