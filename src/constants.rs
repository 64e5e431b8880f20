//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Local storage file layout and keys
pub mod storage {
    /// Directory created under the platform data dir
    pub const APP_DIR: &str = "jimmydev";

    /// File holding every local-storage entry as one JSON object
    pub const FILENAME: &str = "local-storage.json";

    /// Prefix shared by every storage key
    pub const NAMESPACE: &str = "jimmydev";

    /// Browser-like quota for the whole storage file (5 MiB)
    pub const QUOTA_BYTES: usize = 5 * 1024 * 1024;

    /// Key of the persisted quote draft
    pub const QUOTE_KEY: &str = "jimmydev-quote-builder";
}

/// Simulated network behaviour for preview actions
pub mod network {
    /// Delay before a "network" action takes visible effect
    pub const LATENCY_MS: u64 = 800;

    /// Probability that a simulated request fails
    pub const FAILURE_RATE: f64 = 0.1;

    /// Connection-error modal auto-dismiss delay
    pub const ERROR_DISMISS_MS: u64 = 5_000;

    pub const CONNECTION_ERROR_MESSAGE: &str =
        "Error de conexión. Verifica tu conexión a internet e inténtalo de nuevo.";
}

/// Toast notifications
pub mod notifications {
    /// Lifetime of a toast before it is dismissed
    pub const TOAST_DURATION_MS: u64 = 3_000;

    /// Maximum toasts kept on screen; the oldest is dropped first
    pub const MAX_VISIBLE: usize = 4;
}

/// Device tilt effect
pub mod tilt {
    /// Rotation limit in degrees on both axes
    pub const MAX_TILT_DEG: f32 = 20.0;
}

/// Image uploads
pub mod upload {
    /// MIME top-level type accepted by every uploader
    pub const ACCEPTED_TYPE: &str = "image";

    /// Size suggested to users; informational only, never enforced
    pub const SUGGESTED_MAX_BYTES: u64 = 2 * 1024 * 1024;

    /// Storage key of the logo pseudo-slot
    pub const LOGO_SLOT: &str = "logo";
}

/// Branding defaults
pub mod branding {
    pub const DEFAULT_PRIMARY: &str = "#3B82F6";
    pub const DEFAULT_SECONDARY: &str = "#10B981";
    pub const DEFAULT_APP_NAME: &str = "Mi App";
    pub const DEFAULT_SITE_TITLE: &str = "Mi Sitio Web";
    pub const DEFAULT_COMPANY: &str = "Mi Empresa";
}

/// Demo credentials accepted by the dashboard template
pub mod demo {
    pub const EMAIL: &str = "demo@jimmydev.com";
    pub const PASSWORD: &str = "demo123";
}

/// Fitness template workout clock
pub mod fitness {
    /// Interval between workout clock ticks
    pub const TICK_MS: u64 = 1_000;
}

/// Quote builder limits
pub mod quote {
    pub const MAX_DISCOUNT_PERCENT: u8 = 50;
    pub const DEFAULT_TAX_PERCENT: u8 = 19;
    pub const MAX_QUANTITY: u32 = 99;
}
