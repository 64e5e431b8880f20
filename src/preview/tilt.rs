//! Device tilt effect
//!
//! The device frame leans towards the pointer (or follows device
//! orientation). Both axes are clamped to [`MAX_TILT_DEG`](tilt::MAX_TILT_DEG).

use crate::constants::tilt;

/// Rotation applied to the device frame, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    /// Rotation around the horizontal axis
    pub rotate_x: f32,
    /// Rotation around the vertical axis
    pub rotate_y: f32,
}

fn clamp_deg(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-tilt::MAX_TILT_DEG, tilt::MAX_TILT_DEG)
    } else {
        0.0
    }
}

impl Tilt {
    pub const FLAT: Tilt = Tilt { rotate_x: 0.0, rotate_y: 0.0 };

    /// Orientation sensor input: `beta` is front-back, `gamma` left-right
    pub fn from_orientation(beta: f32, gamma: f32) -> Self {
        Self {
            rotate_x: clamp_deg(beta),
            rotate_y: clamp_deg(gamma),
        }
    }

    /// Pointer position relative to a frame centered at `center` with the given half extents
    pub fn from_pointer(pointer: (f32, f32), center: (f32, f32), half_size: (f32, f32)) -> Self {
        if half_size.0 <= 0.0 || half_size.1 <= 0.0 {
            return Self::FLAT;
        }
        let dx = ((pointer.0 - center.0) / half_size.0).clamp(-1.0, 1.0);
        let dy = ((pointer.1 - center.1) / half_size.1).clamp(-1.0, 1.0);
        // Pointer above the center tips the top edge away
        Self::from_orientation(-dy * tilt::MAX_TILT_DEG, dx * tilt::MAX_TILT_DEG)
    }

    /// Move a fraction of the way towards `target`
    pub fn approach(self, target: Tilt, factor: f32) -> Self {
        let t = factor.clamp(0.0, 1.0);
        Self {
            rotate_x: clamp_deg(self.rotate_x + (target.rotate_x - self.rotate_x) * t),
            rotate_y: clamp_deg(self.rotate_y + (target.rotate_y - self.rotate_y) * t),
        }
    }

    /// Horizontal and vertical skew in pixels for a frame of the given size
    pub fn skew(&self, width: f32, height: f32) -> (f32, f32) {
        let x = self.rotate_y.to_radians().sin() * width * 0.5;
        let y = self.rotate_x.to_radians().sin() * height * 0.5;
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_is_clamped() {
        let t = Tilt::from_orientation(90.0, 50.0);
        assert_eq!(t, Tilt { rotate_x: 20.0, rotate_y: 20.0 });

        let t = Tilt::from_orientation(-90.0, 12.5);
        assert_eq!(t, Tilt { rotate_x: -20.0, rotate_y: 12.5 });
    }

    #[test]
    fn test_non_finite_input_is_flat() {
        assert_eq!(Tilt::from_orientation(f32::NAN, f32::INFINITY), Tilt::FLAT);
    }

    #[test]
    fn test_pointer_far_outside_stays_in_range() {
        let t = Tilt::from_pointer((5_000.0, -5_000.0), (100.0, 100.0), (50.0, 80.0));
        assert_eq!(t.rotate_x, tilt::MAX_TILT_DEG);
        assert_eq!(t.rotate_y, tilt::MAX_TILT_DEG);
        assert_eq!(Tilt::from_pointer((1.0, 1.0), (0.0, 0.0), (0.0, 10.0)), Tilt::FLAT);
    }

    #[test]
    fn test_pointer_maps_onto_orientation() {
        let t = Tilt::from_pointer((125.0, 60.0), (100.0, 100.0), (50.0, 80.0));
        assert_eq!(t, Tilt::from_orientation(10.0, 10.0));
    }

    #[test]
    fn test_approach_converges() {
        let target = Tilt::from_orientation(90.0, -90.0);
        let mut t = Tilt::FLAT;
        for _ in 0..50 {
            t = t.approach(target, 0.3);
        }
        assert!((t.rotate_x - 20.0).abs() < 0.01);
        assert!((t.rotate_y + 20.0).abs() < 0.01);
        assert_eq!(Tilt::FLAT.approach(target, 1.0), target);
    }
}
