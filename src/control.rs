//! Control panel: the only writer of a simulator's config
//!
//! Every control maps to one [`ConfigField`], and applying it is one
//! whole-object replacement in the store. Image uploads are validated here
//! and read by the [`UploadReader`]; a rejected file shows exactly one error
//! toast and leaves the config untouched.

use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::color::HexColor;
use crate::config::{ConfigStore, SimulatorConfig, SimulatorKind, StorageBackend, open_simulator_store};
use crate::device::DeviceModel;
use crate::notify::Toasts;
use crate::templates::{TemplateKind, TemplateRegistry};
use crate::upload::{self, ImageTarget, UploadError, UploadReader};

/// One editable field with its new value
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigField {
    AppName(String),
    PrimaryColor(String),
    SecondaryColor(String),
    Template(TemplateKind),
    Device(DeviceModel),
    DarkMode(bool),
    /// `None` clears the image
    Image(ImageTarget, Option<String>),
}

impl ConfigField {
    pub fn name(&self) -> &'static str {
        match self {
            ConfigField::AppName(_) => "appName",
            ConfigField::PrimaryColor(_) => "primaryColor",
            ConfigField::SecondaryColor(_) => "secondaryColor",
            ConfigField::Template(_) => "template",
            ConfigField::Device(_) => "deviceModel",
            ConfigField::DarkMode(_) => "darkMode",
            ConfigField::Image(ImageTarget::Logo, _) => "logo",
            ConfigField::Image(ImageTarget::Custom(_), _) => "customImages",
        }
    }

    /// Parse a `field value` pair typed on the command line
    pub fn parse(simulator: SimulatorKind, field: &str, value: &str) -> Result<Self> {
        let parsed = match field {
            "appName" | "app-name" | "title" | "companyName" => ConfigField::AppName(value.to_string()),
            "primaryColor" | "primary-color" => ConfigField::PrimaryColor(value.to_string()),
            "secondaryColor" | "secondary-color" => ConfigField::SecondaryColor(value.to_string()),
            "template" => {
                let registry = TemplateRegistry::for_simulator(simulator);
                match TemplateKind::from_id(value).filter(|kind| registry.contains(*kind)) {
                    Some(kind) => ConfigField::Template(kind),
                    None => {
                        let known: Vec<&str> = registry.templates().iter().map(|t| t.id()).collect();
                        bail!("Unknown template '{value}' for the {simulator} simulator (expected one of: {})", known.join(", "))
                    }
                }
            }
            "deviceModel" | "device-model" | "device" => {
                if !simulator.uses_device() {
                    bail!("The {simulator} simulator has no device model");
                }
                match DeviceModel::from_id(value) {
                    Some(device) => ConfigField::Device(device),
                    None => {
                        let known: Vec<&str> = DeviceModel::ALL.iter().map(|d| d.id()).collect();
                        bail!("Unknown device '{value}' (expected one of: {})", known.join(", "))
                    }
                }
            }
            "darkMode" | "dark-mode" => match value {
                "true" | "on" | "1" => ConfigField::DarkMode(true),
                "false" | "off" | "0" => ConfigField::DarkMode(false),
                _ => bail!("darkMode expects true or false, got '{value}'"),
            },
            _ => bail!("Unknown field '{field}'"),
        };

        if let ConfigField::PrimaryColor(color) | ConfigField::SecondaryColor(color) = &parsed {
            if HexColor::parse(color).is_none() {
                warn!(field, value = %color, "Color is not a hex value; previews will use the default");
            }
        }
        Ok(parsed)
    }

    pub fn apply(self, config: &mut SimulatorConfig) {
        match self {
            ConfigField::AppName(name) => config.app_name = name,
            ConfigField::PrimaryColor(color) => config.primary_color = color,
            ConfigField::SecondaryColor(color) => config.secondary_color = color,
            ConfigField::Template(kind) => config.template = kind.id().to_string(),
            ConfigField::Device(device) => config.device_model = Some(device.id().to_string()),
            ConfigField::DarkMode(dark) => config.dark_mode = dark,
            ConfigField::Image(target, data) => target.write(config, data),
        }
    }
}

pub struct ControlPanel {
    simulator: SimulatorKind,
    store: ConfigStore<SimulatorConfig>,
    uploads: UploadReader,
    toasts: Toasts,
}

impl ControlPanel {
    pub fn new(backend: Rc<dyn StorageBackend>, simulator: SimulatorKind) -> Self {
        Self {
            simulator,
            store: open_simulator_store(backend, simulator),
            uploads: UploadReader::new(),
            toasts: Toasts::new(),
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        self.store.get()
    }

    pub fn store_mut(&mut self) -> &mut ConfigStore<SimulatorConfig> {
        &mut self.store
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn pending_uploads(&self) -> usize {
        self.uploads.in_flight()
    }

    pub fn last_persist_error(&self) -> Option<&str> {
        self.store.last_persist_error()
    }

    /// Apply one field; values outside this simulator's catalog are refused
    pub fn apply(&mut self, field: ConfigField) -> bool {
        let allowed = match &field {
            ConfigField::Template(kind) => TemplateRegistry::for_simulator(self.simulator).contains(*kind),
            ConfigField::Device(_) => self.simulator.uses_device(),
            ConfigField::Image(target, _) => target.check(self.simulator).is_ok(),
            _ => true,
        };
        if !allowed {
            warn!(simulator = ?self.simulator, field = field.name(), "Field not available for this simulator");
            return false;
        }

        let name = field.name();
        if self.store.update(|config| field.apply(config)) {
            info!(simulator = ?self.simulator, field = name, "Config updated");
        }
        true
    }

    /// Validate and start reading an image file
    pub fn submit_file(&mut self, target: ImageTarget, path: &Path, now: Instant) -> Result<(), UploadError> {
        let name = upload::display_name(path);
        let mime = self.admit(&target, &name, None, now)?;
        info!(slot = target.slot(), file = %name, mime = %mime, "Reading image");
        self.uploads.read_file(target, path.to_path_buf(), mime);
        Ok(())
    }

    /// Same as [`submit_file`](Self::submit_file) for bytes already in memory (drag and drop)
    pub fn submit_bytes(
        &mut self,
        target: ImageTarget,
        name: &str,
        declared_mime: Option<&str>,
        bytes: Vec<u8>,
        now: Instant,
    ) -> Result<(), UploadError> {
        let mime = self.admit(&target, name, declared_mime, now)?;
        info!(slot = target.slot(), file = %name, mime = %mime, size = bytes.len(), "Encoding dropped image");
        self.uploads.read_bytes(target, bytes, mime);
        Ok(())
    }

    fn admit(
        &mut self,
        target: &ImageTarget,
        name: &str,
        declared_mime: Option<&str>,
        now: Instant,
    ) -> Result<mime_guess::mime::Mime, UploadError> {
        let checked = target
            .check(self.simulator)
            .and_then(|()| upload::validate_mime(name, declared_mime));
        checked.inspect_err(|err| {
            warn!(slot = target.slot(), file = %name, error = %err, "Rejected upload");
            self.toasts.error(err.to_string(), now);
        })
    }

    /// Apply finished image reads
    pub fn poll_uploads(&mut self, now: Instant) -> usize {
        let done = self.uploads.poll();
        self.finish_uploads(done, now)
    }

    /// Block until pending image reads finish (command line use)
    pub fn wait_for_uploads(&mut self, timeout: Duration, now: Instant) -> usize {
        let done = self.uploads.wait(timeout);
        self.finish_uploads(done, now)
    }

    fn finish_uploads(&mut self, done: Vec<upload::UploadOutcome>, now: Instant) -> usize {
        let mut applied = 0;
        for outcome in done {
            match outcome.result {
                Ok(data) => {
                    self.apply(ConfigField::Image(outcome.target, Some(data)));
                    self.toasts.success("Imagen actualizada", now);
                    applied += 1;
                }
                Err(err) => {
                    warn!(slot = outcome.target.slot(), error = %err, "Image read failed");
                    self.toasts.error(err.to_string(), now);
                }
            }
        }
        applied
    }

    /// Restore the default config; pending uploads are dropped
    pub fn reset(&mut self, now: Instant) {
        self.uploads.cancel_all();
        self.store.reset();
        info!(simulator = ?self.simulator, "Config restored to defaults");
        self.toasts.success("Configuración restablecida", now);
    }

    pub fn tick(&mut self, now: Instant) {
        self.toasts.poll(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStorage;
    use crate::notify::NoticeLevel;

    fn panel(simulator: SimulatorKind) -> (ControlPanel, Rc<MemoryStorage>) {
        let backend = Rc::new(MemoryStorage::new());
        (ControlPanel::new(backend.clone(), simulator), backend)
    }

    #[test]
    fn test_field_mutation_persists() {
        let (mut panel, backend) = panel(SimulatorKind::App);
        assert!(panel.apply(ConfigField::AppName("Café Luna".into())));
        assert!(panel.apply(ConfigField::Template(TemplateKind::Fitness)));

        let stored = backend.get_item(&SimulatorKind::App.storage_key()).expect("persisted");
        let stored: SimulatorConfig = serde_json::from_str(&stored).expect("valid json");
        assert_eq!(stored.app_name, "Café Luna");
        assert_eq!(stored.template, "fitness");
        assert_eq!(&stored, panel.config());
    }

    #[test]
    fn test_template_outside_simulator_refused() {
        let (mut panel, _) = panel(SimulatorKind::App);
        assert!(!panel.apply(ConfigField::Template(TemplateKind::Blog)));
        assert_eq!(panel.config().template, "ecommerce");
        assert!(!panel.apply(ConfigField::Image(ImageTarget::parse("hero"), Some("data:x".into()))));
    }

    #[test]
    fn test_non_image_upload_rejected_once() {
        let (mut panel, _) = panel(SimulatorKind::Website);
        let before = panel.config().clone();
        let now = Instant::now();

        let result = panel.submit_file(ImageTarget::Logo, Path::new("/tmp/contract.pdf"), now);
        assert!(matches!(result, Err(UploadError::NotAnImage { .. })));
        assert_eq!(panel.toasts().count(NoticeLevel::Error), 1);
        assert_eq!(panel.toasts().visible().len(), 1);
        assert_eq!(panel.pending_uploads(), 0);
        assert_eq!(panel.poll_uploads(now), 0);
        assert_eq!(panel.config(), &before);
    }

    #[test]
    fn test_declared_type_rejects_disguised_file() {
        let (mut panel, _) = panel(SimulatorKind::App);
        let result = panel.submit_bytes(
            ImageTarget::parse("banner"),
            "banner.png",
            Some("text/plain"),
            b"hello".to_vec(),
            Instant::now(),
        );
        assert!(result.is_err());
        assert_eq!(panel.toasts().count(NoticeLevel::Error), 1);
        assert!(panel.config().custom_images.is_empty());
    }

    #[test]
    fn test_accepted_upload_sets_image() {
        let (mut panel, _) = panel(SimulatorKind::App);
        let now = Instant::now();
        panel
            .submit_bytes(ImageTarget::parse("banner"), "banner.png", None, vec![0x89, b'P'], now)
            .expect("png accepted");
        assert_eq!(panel.wait_for_uploads(Duration::from_secs(5), now), 1);
        assert_eq!(panel.config().custom_image("banner"), Some("data:image/png;base64,iVA="));
        assert_eq!(panel.toasts().count(NoticeLevel::Success), 1);
    }

    #[test]
    fn test_reset_drops_pending_upload_and_is_idempotent() {
        let (mut panel, _) = panel(SimulatorKind::Mobile);
        let now = Instant::now();
        panel.apply(ConfigField::DarkMode(true));
        panel
            .submit_bytes(ImageTarget::Logo, "logo.gif", None, vec![1, 2, 3], now)
            .expect("gif accepted");

        panel.reset(now);
        let once = panel.config().clone();
        panel.reset(now);
        assert_eq!(panel.config(), &once);
        assert_eq!(once, SimulatorConfig::default_for(SimulatorKind::Mobile));

        std::thread::sleep(Duration::from_millis(200));
        assert_eq!(panel.poll_uploads(now), 0);
        assert_eq!(panel.config().logo, None);
    }

    #[test]
    fn test_parse_cli_fields() {
        let field = ConfigField::parse(SimulatorKind::Website, "template", "blog").expect("valid");
        assert_eq!(field, ConfigField::Template(TemplateKind::Blog));
        assert!(ConfigField::parse(SimulatorKind::App, "template", "blog").is_err());
        assert!(ConfigField::parse(SimulatorKind::Website, "device", "pixel-8").is_err());
        assert_eq!(
            ConfigField::parse(SimulatorKind::App, "darkMode", "on").expect("valid"),
            ConfigField::DarkMode(true)
        );
        assert!(ConfigField::parse(SimulatorKind::App, "logo", "x").is_err());
    }
}
