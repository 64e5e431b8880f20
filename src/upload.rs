//! Image uploads for the logo and custom image slots
//!
//! Validation happens on the caller's thread before anything is read: the
//! declared MIME type (or the one guessed from the file name) must be
//! `image/*`. Accepted files are read and encoded into data URIs on a
//! background thread. Results come back over a channel tagged with the
//! generation they were started in; [`UploadReader::cancel_all`] bumps the
//! generation so results for a torn-down panel are dropped on arrival.

use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use mime_guess::mime::{self, Mime};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{SimulatorConfig, SimulatorKind};
use crate::constants::upload;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{name} no es una imagen ({mime})")]
    NotAnImage { name: String, mime: String },

    #[error("no se pudo determinar el tipo de {name}")]
    UnknownType { name: String },

    #[error("el simulador {simulator} no tiene una imagen llamada {slot}")]
    UnknownSlot { simulator: SimulatorKind, slot: String },

    #[error("no se pudo leer {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{name} está vacío")]
    Empty { name: String },
}

/// Config field an upload writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageTarget {
    Logo,
    Custom(String),
}

impl ImageTarget {
    /// `logo` or a custom image slot name
    pub fn parse(slot: &str) -> Self {
        if slot == upload::LOGO_SLOT {
            ImageTarget::Logo
        } else {
            ImageTarget::Custom(slot.to_string())
        }
    }

    pub fn slot(&self) -> &str {
        match self {
            ImageTarget::Logo => upload::LOGO_SLOT,
            ImageTarget::Custom(slot) => slot,
        }
    }

    /// Reject slots the simulator does not define
    pub fn check(&self, simulator: SimulatorKind) -> Result<(), UploadError> {
        match self {
            ImageTarget::Logo => Ok(()),
            ImageTarget::Custom(slot) if simulator.accepts_image_slot(slot) => Ok(()),
            ImageTarget::Custom(slot) => Err(UploadError::UnknownSlot {
                simulator,
                slot: slot.clone(),
            }),
        }
    }

    pub fn current<'a>(&self, config: &'a SimulatorConfig) -> Option<&'a str> {
        match self {
            ImageTarget::Logo => config.logo.as_deref(),
            ImageTarget::Custom(slot) => config.custom_image(slot),
        }
    }

    /// Store (or clear, with `None`) the image data for this target
    pub fn write(&self, config: &mut SimulatorConfig, data: Option<String>) {
        match (self, data) {
            (ImageTarget::Logo, data) => config.logo = data,
            (ImageTarget::Custom(slot), Some(data)) => {
                config.custom_images.insert(slot.clone(), data);
            }
            (ImageTarget::Custom(slot), None) => {
                config.custom_images.remove(slot);
            }
        }
    }
}

/// Accept only `image/*`; a non-empty declared type wins over the file name
pub fn validate_mime(name: &str, declared: Option<&str>) -> Result<Mime, UploadError> {
    let mime = match declared.map(str::trim).filter(|m| !m.is_empty()) {
        Some(declared) => declared.parse::<Mime>().map_err(|_| UploadError::NotAnImage {
            name: name.to_string(),
            mime: declared.to_string(),
        })?,
        None => mime_guess::from_path(name)
            .first()
            .ok_or_else(|| UploadError::UnknownType { name: name.to_string() })?,
    };

    if mime.type_() != mime::IMAGE {
        return Err(UploadError::NotAnImage {
            name: name.to_string(),
            mime: mime.essence_str().to_string(),
        });
    }
    Ok(mime)
}

pub fn encode_data_uri(mime: &Mime, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime.essence_str(), STANDARD.encode(bytes))
}

/// Split a base64 data URI into its MIME type and bytes
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}

/// Width and height of a PNG, `None` for anything else
pub fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    let decoder = png::Decoder::new(Cursor::new(bytes));
    let reader = decoder.read_info().ok()?;
    let info = reader.info();
    Some((info.width, info.height))
}

enum Source {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

struct Completed {
    generation: u64,
    target: ImageTarget,
    outcome: Result<String, UploadError>,
}

/// Finished upload handed back to the UI thread
#[derive(Debug)]
pub struct UploadOutcome {
    pub target: ImageTarget,
    /// Data URI of the image
    pub result: Result<String, UploadError>,
}

/// Reads accepted images off the UI thread
pub struct UploadReader {
    tx: Sender<Completed>,
    rx: Receiver<Completed>,
    generation: u64,
    in_flight: usize,
}

impl Default for UploadReader {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadReader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            generation: 0,
            in_flight: 0,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn read_file(&mut self, target: ImageTarget, path: PathBuf, mime: Mime) {
        self.spawn(target, Source::Path(path), mime);
    }

    pub fn read_bytes(&mut self, target: ImageTarget, bytes: Vec<u8>, mime: Mime) {
        self.spawn(target, Source::Bytes(bytes), mime);
    }

    fn spawn(&mut self, target: ImageTarget, source: Source, mime: Mime) {
        let tx = self.tx.clone();
        let generation = self.generation;
        self.in_flight += 1;

        thread::spawn(move || {
            let outcome = read_source(source).map(|bytes| {
                if let Some((width, height)) = png_dimensions(&bytes) {
                    debug!(slot = target.slot(), width, height, "Decoded PNG header");
                }
                encode_data_uri(&mime, &bytes)
            });
            // The receiver is gone once the panel is dropped; nothing to do then
            let _ = tx.send(Completed { generation, target, outcome });
        });
    }

    /// Drop every read still in flight
    pub fn cancel_all(&mut self) {
        if self.in_flight > 0 {
            debug!(pending = self.in_flight, "Discarding pending image reads");
        }
        self.generation += 1;
        self.in_flight = 0;
    }

    fn accept(&mut self, completed: Completed) -> Option<UploadOutcome> {
        if completed.generation != self.generation {
            debug!(slot = completed.target.slot(), "Ignoring stale image read");
            return None;
        }
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(UploadOutcome {
            target: completed.target,
            result: completed.outcome,
        })
    }

    /// Finished reads, without blocking
    pub fn poll(&mut self) -> Vec<UploadOutcome> {
        let mut done = Vec::new();
        while let Ok(completed) = self.rx.try_recv() {
            done.extend(self.accept(completed));
        }
        done
    }

    /// Block until every current read finished or `timeout` elapsed
    pub fn wait(&mut self, timeout: Duration) -> Vec<UploadOutcome> {
        let deadline = Instant::now() + timeout;
        let mut done = Vec::new();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(completed) => done.extend(self.accept(completed)),
                Err(RecvTimeoutError::Timeout) => {
                    warn!(pending = self.in_flight, "Timed out waiting for image reads");
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        done
    }
}

impl Drop for UploadReader {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

fn read_source(source: Source) -> Result<Vec<u8>, UploadError> {
    let (bytes, name) = match source {
        Source::Path(path) => {
            let bytes = std::fs::read(&path).map_err(|source| UploadError::Read {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), size = bytes.len(), "Read image file");
            (bytes, path.display().to_string())
        }
        Source::Bytes(bytes) => (bytes, "archivo".to_string()),
    };
    if bytes.is_empty() {
        return Err(UploadError::Empty { name });
    }
    if bytes.len() as u64 > upload::SUGGESTED_MAX_BYTES {
        debug!(size = bytes.len(), "Image is larger than the suggested size");
    }
    Ok(bytes)
}

/// File name shown in messages
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
