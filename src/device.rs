//! Device catalog for the App and Mobile simulators

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceModel {
    Iphone15Pro,
    IphoneSe,
    Pixel8,
    GalaxyS24,
    IpadAir,
}

/// Screen layout of a device mockup, in logical points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceFrame {
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub has_notch: bool,
}

impl DeviceModel {
    pub const ALL: [DeviceModel; 5] = [
        DeviceModel::Iphone15Pro,
        DeviceModel::IphoneSe,
        DeviceModel::Pixel8,
        DeviceModel::GalaxyS24,
        DeviceModel::IpadAir,
    ];

    pub const DEFAULT: DeviceModel = DeviceModel::Iphone15Pro;

    pub fn id(&self) -> &'static str {
        match self {
            DeviceModel::Iphone15Pro => "iphone-15-pro",
            DeviceModel::IphoneSe => "iphone-se",
            DeviceModel::Pixel8 => "pixel-8",
            DeviceModel::GalaxyS24 => "galaxy-s24",
            DeviceModel::IpadAir => "ipad-air",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeviceModel::Iphone15Pro => "iPhone 15 Pro",
            DeviceModel::IphoneSe => "iPhone SE",
            DeviceModel::Pixel8 => "Pixel 8",
            DeviceModel::GalaxyS24 => "Galaxy S24",
            DeviceModel::IpadAir => "iPad Air",
        }
    }

    pub fn frame(&self) -> DeviceFrame {
        match self {
            DeviceModel::Iphone15Pro => DeviceFrame { width: 393.0, height: 852.0, corner_radius: 48.0, has_notch: true },
            DeviceModel::IphoneSe => DeviceFrame { width: 375.0, height: 667.0, corner_radius: 12.0, has_notch: false },
            DeviceModel::Pixel8 => DeviceFrame { width: 412.0, height: 915.0, corner_radius: 36.0, has_notch: false },
            DeviceModel::GalaxyS24 => DeviceFrame { width: 384.0, height: 832.0, corner_radius: 32.0, has_notch: false },
            DeviceModel::IpadAir => DeviceFrame { width: 820.0, height: 1180.0, corner_radius: 20.0, has_notch: false },
        }
    }
}

impl Default for DeviceModel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for device in DeviceModel::ALL {
            assert_eq!(DeviceModel::from_id(device.id()), Some(device));
        }
        assert_eq!(DeviceModel::from_id("nokia-3310"), None);
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&DeviceModel::GalaxyS24).unwrap();
        assert_eq!(json, "\"galaxy-s24\"");
    }
}
