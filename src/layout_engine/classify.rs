use serde::{Deserialize, Serialize};

use super::PlacementError;
use crate::common::config::Settings;
use crate::sys::geometry::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// Ordered from least to most wide.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AspectClass {
    Standard,
    Ultrawide,
    ExtraUltrawide,
}

impl AspectClass {
    pub fn is_wide(self) -> bool { self != AspectClass::Standard }
}

#[derive(Clone, Copy, Debug)]
pub struct AspectThresholds {
    pub ultrawide: f64,
    pub extra_ultrawide: f64,
}

impl Default for AspectThresholds {
    fn default() -> Self { Self::from(&Settings::default()) }
}

impl From<&Settings> for AspectThresholds {
    fn from(settings: &Settings) -> Self {
        Self {
            ultrawide: settings.ultrawide_ratio,
            extra_ultrawide: settings.extra_ultrawide_ratio,
        }
    }
}

impl AspectThresholds {
    pub fn classify(&self, ratio: f64) -> AspectClass {
        if ratio > self.extra_ultrawide {
            AspectClass::ExtraUltrawide
        } else if ratio > self.ultrawide {
            AspectClass::Ultrawide
        } else {
            AspectClass::Standard
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorClass {
    pub orientation: Orientation,
    pub aspect: AspectClass,
}

impl MonitorClass {
    /// Classifies a work area.
    ///
    /// The aspect ratio is taken from the landscape-normalized rectangle, so a
    /// rotated ultrawide monitor is still an ultrawide (in portrait).
    pub fn of(work_area: Rect, thresholds: &AspectThresholds) -> Result<Self, PlacementError> {
        if work_area.is_empty() {
            return Err(PlacementError::UnsupportedGeometry(work_area));
        }
        let orientation = if work_area.height > work_area.width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        };
        let Rect { width, height, .. } = work_area.landscape();
        let ratio = width as f64 / height as f64;
        Ok(Self {
            orientation,
            aspect: thresholds.classify(ratio),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(width: i32, height: i32) -> MonitorClass {
        MonitorClass::of(Rect::new(0, 0, width, height), &AspectThresholds::default()).unwrap()
    }

    #[test]
    fn square_monitors_are_standard() {
        for side in [1, 7, 600, 1024, 4096] {
            let class = classify(side, side);
            assert_eq!(class.aspect, AspectClass::Standard);
            assert_eq!(class.orientation, Orientation::Landscape);
        }
    }

    #[test]
    fn common_monitors() {
        assert_eq!(classify(1920, 1200).aspect, AspectClass::Standard);
        assert_eq!(classify(1920, 1080).aspect, AspectClass::Standard);
        assert_eq!(classify(2560, 1080).aspect, AspectClass::Ultrawide);
        assert_eq!(classify(3440, 1440).aspect, AspectClass::Ultrawide);
        assert_eq!(classify(5120, 1440).aspect, AspectClass::ExtraUltrawide);
    }

    #[test]
    fn rotated_ultrawide_keeps_its_class() {
        let class = classify(1440, 3440);
        assert_eq!(class.orientation, Orientation::Portrait);
        assert_eq!(class.aspect, AspectClass::Ultrawide);

        let class = classify(1440, 5120);
        assert_eq!(class.aspect, AspectClass::ExtraUltrawide);
    }

    #[test]
    fn aspect_is_monotonic_in_ratio() {
        let thresholds = AspectThresholds::default();
        let mut last = AspectClass::Standard;
        for step in 0..=400 {
            let ratio = 1.0 + step as f64 * 0.01;
            let class = thresholds.classify(ratio);
            assert!(class >= last, "{ratio}: {class} after {last}");
            if class == AspectClass::ExtraUltrawide {
                assert!(ratio > thresholds.ultrawide);
            }
            last = class;
        }
        assert_eq!(last, AspectClass::ExtraUltrawide);
    }

    #[test]
    fn degenerate_work_area_is_unsupported() {
        let area = Rect::new(0, 0, 0, 1080);
        assert!(matches!(
            MonitorClass::of(area, &AspectThresholds::default()),
            Err(PlacementError::UnsupportedGeometry(a)) if a == area
        ));
    }
}
