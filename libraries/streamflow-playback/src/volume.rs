//! Volume level with logarithmic output gain
//!
//! The level is the 0-100 integer the UI shows. The media output receives a
//! perceptual gain derived from it: 0% = silence, 1% = -60 dB, 100% = 0 dB.

/// Volume controller
///
/// The level persists across track changes; mute keeps the level so unmuting
/// restores it.
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,

    /// Mute state (preserves volume level)
    muted: bool,

    /// Cached linear gain multiplier
    linear_gain: f32,
}

impl Volume {
    /// Create new volume controller, clamping to 0-100
    pub fn new(level: i32) -> Self {
        let level = clamp_level(level);
        Self {
            level,
            muted: false,
            linear_gain: Self::calculate_linear_gain(level),
        }
    }

    /// Set volume level, clamping to 0-100
    ///
    /// Returns the stored level.
    pub fn set_level(&mut self, level: i32) -> u8 {
        self.level = clamp_level(level);
        self.linear_gain = Self::calculate_linear_gain(self.level);
        self.level
    }

    /// Current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Toggle mute state, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Linear gain for the media output
    ///
    /// Returns 0.0 if muted, otherwise logarithmic gain based on level
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.linear_gain
        }
    }

    /// Formula: gain = 10^((level% - 100) * 0.6 / 20)
    /// - 1%   → -59.4 dB
    /// - 50%  → -30 dB → 0.0316
    /// - 75%  → -15 dB → 0.178 (default)
    /// - 100% →   0 dB → 1.0
    fn calculate_linear_gain(level: u8) -> f32 {
        if level == 0 {
            return 0.0;
        }

        let db = (level as f32 - 100.0) * 0.6;
        10.0_f32.powf(db / 20.0)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(75)
    }
}

fn clamp_level(level: i32) -> u8 {
    level.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_volume_level_clamps() {
        let mut vol = Volume::new(50);
        assert_eq!(vol.level(), 50);

        assert_eq!(vol.set_level(150), 100);
        assert_eq!(vol.set_level(-20), 0);
        assert_eq!(vol.set_level(75), 75);
    }

    #[test]
    fn constructor_clamps() {
        assert_eq!(Volume::new(300).level(), 100);
        assert_eq!(Volume::new(-1).level(), 0);
    }

    #[test]
    fn mute_preserves_level() {
        let mut vol = Volume::new(80);
        assert!(vol.toggle_mute());
        assert_eq!(vol.level(), 80);
        assert_eq!(vol.gain(), 0.0);

        assert!(!vol.toggle_mute());
        assert!(vol.gain() > 0.0);
    }

    #[test]
    fn gain_calculation() {
        assert_eq!(Volume::new(0).gain(), 0.0);
        assert!((Volume::new(100).gain() - 1.0).abs() < 0.001);
        assert!((Volume::new(50).gain() - 0.0316).abs() < 0.001);
        assert!((Volume::new(75).gain() - 0.178).abs() < 0.01);
    }
}
