//! GUI-specific constants for layout, status colors and repaint timing

use egui;

/// Main window dimensions
pub const WINDOW_WIDTH: f32 = 1280.0;
pub const WINDOW_HEIGHT: f32 = 860.0;
pub const WINDOW_MIN_WIDTH: f32 = 900.0;
pub const WINDOW_MIN_HEIGHT: f32 = 600.0;

/// Width of the control panel column
pub const SIDE_PANEL_WIDTH: f32 = 360.0;

/// Layout spacing
pub const PADDING: f32 = 6.0;
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Status colors
pub const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);
pub const STATUS_PENDING: egui::Color32 = egui::Color32::from_rgb(200, 200, 0);

/// Device frame bezel around the screen
pub const BEZEL: f32 = 10.0;
pub const BEZEL_COLOR: egui::Color32 = egui::Color32::from_rgb(28, 28, 30);

/// Browser chrome height for the website preview
pub const BROWSER_BAR_HEIGHT: f32 = 32.0;
pub const BROWSER_MAX_WIDTH: f32 = 960.0;

/// Fraction of the remaining tilt covered each frame
pub const TILT_EASING: f32 = 0.2;

/// Repaint cadence while something animates or an upload is being read
pub const ANIMATION_REPAINT_MS: u64 = 16;
pub const UPLOAD_POLL_MS: u64 = 100;

/// Repaint cadence when nothing is scheduled
pub const IDLE_REPAINT_MS: u64 = 1_000;

/// Largest image side turned into a texture
pub const MAX_TEXTURE_SIDE: u32 = 4096;
