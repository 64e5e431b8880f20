#![forbid(unsafe_code)]

mod automation;
mod color;
mod config;
mod constants;
mod control;
mod device;
mod gui;
mod network;
mod notify;
mod preview;
mod quote;
mod tasks;
mod templates;
mod tracker;
mod upload;

use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use config::{FileStorage, SimulatorKind, StorageBackend};
use control::{ConfigField, ControlPanel};
use preview::PreviewSession;
use templates::{TemplateKind, TemplateRegistry};
use tracker::LogTracker;
use upload::ImageTarget;

/// How long `image` waits for the file to be read and encoded
const IMAGE_READ_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "jimmydev-simulator", version, about = "Branded template previews, quotes and chat flows")]
struct Cli {
    /// Local storage file (defaults to the platform data directory)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the simulator window (default)
    Gui,
    /// List the templates a simulator offers
    Templates {
        #[arg(long, value_enum, default_value = "app")]
        simulator: SimulatorKind,
    },
    /// Print the stored config as JSON
    Show {
        #[arg(long, value_enum, default_value = "app")]
        simulator: SimulatorKind,
    },
    /// Change one config field, e.g. `set primaryColor "#FF5733"`
    Set {
        #[arg(long, value_enum, default_value = "app")]
        simulator: SimulatorKind,
        field: String,
        value: String,
    },
    /// Upload an image into the logo or a custom image slot
    Image {
        #[arg(long, value_enum, default_value = "app")]
        simulator: SimulatorKind,
        slot: String,
        path: PathBuf,
    },
    /// Restore the default config
    Reset {
        #[arg(long, value_enum, default_value = "app")]
        simulator: SimulatorKind,
    },
    /// Print the preview outline of a template
    Render {
        #[arg(long, value_enum, default_value = "app")]
        simulator: SimulatorKind,
        /// Template id; defaults to the stored one
        #[arg(long)]
        template: Option<String>,
    },
    /// Print the stored quote
    Quote,
}

fn init_logging() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to install log subscriber")
}

/// Fail the command when the last write did not reach the storage file
fn ensure_persisted(panel: &ControlPanel) -> Result<()> {
    match panel.last_persist_error() {
        Some(err) => bail!("Config changed in memory but could not be saved: {err}"),
        None => Ok(()),
    }
}

fn run(command: Command, backend: Rc<dyn StorageBackend>) -> Result<()> {
    match command {
        Command::Gui => gui::run_gui(backend),
        Command::Templates { simulator } => {
            let registry = TemplateRegistry::for_simulator(simulator);
            let current = ControlPanel::new(backend, simulator).config().template_kind(simulator);
            for info in registry.list_all() {
                let marker = if info.kind == current { "*" } else { " " };
                println!("{marker} {:<10} {} {:<12} {}", info.id, info.icon.glyph(), info.name, info.description);
            }
            Ok(())
        }
        Command::Show { simulator } => {
            let panel = ControlPanel::new(backend, simulator);
            let json = serde_json::to_string_pretty(panel.config()).context("Failed to serialize config")?;
            println!("{json}");
            Ok(())
        }
        Command::Set { simulator, field, value } => {
            let field = ConfigField::parse(simulator, &field, &value)?;
            let mut panel = ControlPanel::new(backend, simulator);
            let name = field.name();
            if !panel.apply(field) {
                bail!("{name} cannot be changed on the {simulator} simulator");
            }
            ensure_persisted(&panel)?;
            info!(simulator = ?simulator, field = name, "Saved");
            Ok(())
        }
        Command::Image { simulator, slot, path } => {
            let mut panel = ControlPanel::new(backend, simulator);
            let now = Instant::now();
            panel
                .submit_file(ImageTarget::parse(&slot), &path, now)
                .with_context(|| format!("Cannot use {} as {slot}", path.display()))?;
            if panel.wait_for_uploads(IMAGE_READ_TIMEOUT, now) == 0 {
                let reason = panel
                    .toasts()
                    .visible()
                    .last()
                    .map(|toast| toast.notice.message.clone())
                    .unwrap_or_else(|| "timed out".to_string());
                bail!("Failed to read {}: {reason}", path.display());
            }
            ensure_persisted(&panel)?;
            info!(simulator = ?simulator, slot = %slot, "Image saved");
            Ok(())
        }
        Command::Reset { simulator } => {
            let mut panel = ControlPanel::new(backend, simulator);
            panel.reset(Instant::now());
            ensure_persisted(&panel)
        }
        Command::Render { simulator, template } => {
            let panel = ControlPanel::new(backend, simulator);
            let registry = TemplateRegistry::for_simulator(simulator);
            let template = match template {
                Some(id) => TemplateKind::from_id(&id)
                    .filter(|kind| registry.contains(*kind))
                    .with_context(|| format!("Unknown template '{id}' for the {simulator} simulator"))?,
                None => panel.config().template_kind(simulator),
            };
            let session = PreviewSession::new(simulator, template, Rc::new(LogTracker));
            print!("{}", session.render(panel.config()).outline());
            Ok(())
        }
        Command::Quote => {
            let store = quote::open_quote_store(backend);
            print!("{}", store.get().summary());
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let path = cli.storage.unwrap_or_else(FileStorage::default_path);
    let backend: Rc<dyn StorageBackend> = Rc::new(FileStorage::open(&path));
    info!(path = %path.display(), "Using local storage");

    run(cli.command.unwrap_or(Command::Gui), backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use config::MemoryStorage;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_gui() {
        let cli = Cli::try_parse_from(["jimmydev-simulator"]).expect("parses");
        assert!(cli.command.is_none());
        let cli = Cli::try_parse_from(["jimmydev-simulator", "show", "--storage", "/tmp/x.json"]).expect("parses");
        assert_eq!(cli.storage, Some(PathBuf::from("/tmp/x.json")));
    }

    #[test]
    fn test_set_then_show_uses_same_storage() {
        let backend: Rc<dyn StorageBackend> = Rc::new(MemoryStorage::new());
        run(
            Command::Set {
                simulator: SimulatorKind::Website,
                field: "template".into(),
                value: "blog".into(),
            },
            backend.clone(),
        )
        .expect("set succeeds");
        let panel = ControlPanel::new(backend, SimulatorKind::Website);
        assert_eq!(panel.config().template, "blog");
    }

    #[test]
    fn test_set_reports_storage_failure() {
        let storage = Rc::new(MemoryStorage::new());
        storage.set_disabled(true);
        let result = run(
            Command::Set {
                simulator: SimulatorKind::App,
                field: "appName".into(),
                value: "X".into(),
            },
            storage,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_render_rejects_foreign_template() {
        let backend: Rc<dyn StorageBackend> = Rc::new(MemoryStorage::new());
        let result = run(
            Command::Render {
                simulator: SimulatorKind::App,
                template: Some("blog".into()),
            },
            backend,
        );
        assert!(result.is_err());
    }
}
