//! Device capability classification
//!
//! Computed once at startup from host signals; never changes afterwards.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// User-agent tokens that mark a handheld device
const MOBILE_UA_TOKENS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Raw host signals used to pick a [`DeviceProfile`]
#[derive(Debug, Clone, Default)]
pub struct CapabilitySignals {
    pub user_agent: String,
    /// `ontouchstart` present on the window
    pub touch_events: bool,
    pub max_touch_points: u32,
    /// `(pointer: coarse)` media query matches
    pub coarse_pointer: bool,
}

impl CapabilitySignals {
    /// Signals of a desktop browser with a mouse
    pub fn desktop() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64)".to_string(),
            ..Default::default()
        }
    }

    fn mobile_user_agent(&self) -> bool {
        let ua = self.user_agent.to_lowercase();
        MOBILE_UA_TOKENS.iter().any(|token| ua.contains(token))
    }
}

/// Static capability class gating effect intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeviceProfile {
    Constrained,
    #[default]
    Full,
}

impl DeviceProfile {
    /// Classify the host. Any touch/coarse/mobile hint means constrained.
    pub fn detect(signals: &CapabilitySignals) -> Self {
        let constrained = signals.mobile_user_agent()
            || signals.touch_events
            || signals.max_touch_points > 0
            || signals.coarse_pointer;
        let profile = if constrained {
            DeviceProfile::Constrained
        } else {
            DeviceProfile::Full
        };
        log::info!("Device profile: {}", profile.as_str());
        profile
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceProfile::Constrained => "Constrained",
            DeviceProfile::Full => "Full",
        }
    }

    /// Whether canvas-heavy effects may be instantiated at all
    pub fn allows_heavyweight(&self) -> bool {
        matches!(self, DeviceProfile::Full)
    }

    pub fn max_stars(&self) -> usize {
        match self {
            DeviceProfile::Constrained => STARS_CONSTRAINED,
            DeviceProfile::Full => STARS_FULL,
        }
    }

    pub fn max_particles(&self) -> usize {
        match self {
            DeviceProfile::Constrained => PARTICLES_CONSTRAINED,
            DeviceProfile::Full => PARTICLES_FULL,
        }
    }

    pub fn max_sparkles(&self) -> usize {
        match self {
            DeviceProfile::Constrained => SPARKLES_CONSTRAINED,
            DeviceProfile::Full => SPARKLES_FULL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_is_full() {
        assert_eq!(DeviceProfile::detect(&CapabilitySignals::desktop()), DeviceProfile::Full);
    }

    #[test]
    fn test_mobile_hints_are_constrained() {
        let iphone = CapabilitySignals {
            user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)".into(),
            ..Default::default()
        };
        assert_eq!(DeviceProfile::detect(&iphone), DeviceProfile::Constrained);

        let opera = CapabilitySignals {
            user_agent: "Opera/9.80 (J2ME/MIDP; OPERA MINI/9.80)".into(),
            ..Default::default()
        };
        assert_eq!(DeviceProfile::detect(&opera), DeviceProfile::Constrained);

        let touch_laptop = CapabilitySignals {
            max_touch_points: 10,
            ..CapabilitySignals::desktop()
        };
        assert_eq!(DeviceProfile::detect(&touch_laptop), DeviceProfile::Constrained);

        let coarse = CapabilitySignals {
            coarse_pointer: true,
            ..CapabilitySignals::desktop()
        };
        assert_eq!(DeviceProfile::detect(&coarse), DeviceProfile::Constrained);
    }

    #[test]
    fn test_capacities_scale_with_profile() {
        assert!(DeviceProfile::Constrained.max_stars() < DeviceProfile::Full.max_stars());
        assert!(DeviceProfile::Constrained.max_particles() < DeviceProfile::Full.max_particles());
        assert!(!DeviceProfile::Constrained.allows_heavyweight());
    }
}
