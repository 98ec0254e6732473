//! Parameter sets for matching, occlusion detection and densification.

use sv_core::{Error, Result};

/// Parameters of the adaptive-weights matching cost.
#[derive(Debug, Clone, Copy)]
pub struct MatchParams {
    /// Truncation threshold for the color L1 cost.
    pub color_threshold: f32,
    /// Truncation threshold for the x-gradient cost.
    pub gradient_threshold: f32,
    /// Blend factor between color (1 - alpha) and gradient (alpha) costs.
    pub alpha: f32,
    /// Gamma of the color-similarity kernel.
    pub gamma_color: f32,
    /// Gamma of the spatial-proximity kernel.
    pub gamma_position: f32,
    /// Radius of the square support window.
    pub window_radius: i32,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            color_threshold: 30.0,
            gradient_threshold: 2.0,
            alpha: 0.9,
            gamma_color: 12.0,
            gamma_position: 17.5,
            window_radius: 17,
        }
    }
}

impl MatchParams {
    pub fn validate(&self) -> Result<()> {
        if self.color_threshold < 0.0 {
            return Err(Error::InvalidInput(format!(
                "color_threshold must be >= 0, got {}",
                self.color_threshold
            )));
        }
        if self.gradient_threshold < 0.0 {
            return Err(Error::InvalidInput(format!(
                "gradient_threshold must be >= 0, got {}",
                self.gradient_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidInput(format!(
                "alpha must be in [0, 1], got {}",
                self.alpha
            )));
        }
        if self.gamma_color <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "gamma_color must be > 0, got {}",
                self.gamma_color
            )));
        }
        if self.gamma_position <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "gamma_position must be > 0, got {}",
                self.gamma_position
            )));
        }
        if self.window_radius < 0 {
            return Err(Error::InvalidInput(format!(
                "window_radius must be >= 0, got {}",
                self.window_radius
            )));
        }
        Ok(())
    }
}

/// Parameters of occlusion detection and weighted-median densification.
#[derive(Debug, Clone, Copy)]
pub struct OcclusionParams {
    /// Tolerated left/right disparity difference.
    pub tol_disp: f32,
    /// Radius of the weighted-median window.
    pub median_radius: i32,
    /// Sigma of the guidance color kernel.
    pub sigma_color: f32,
    /// Sigma of the spatial kernel.
    pub sigma_space: f32,
}

impl Default for OcclusionParams {
    fn default() -> Self {
        Self {
            tol_disp: 0.0,
            median_radius: 9,
            sigma_color: 25.5,
            sigma_space: 9.0,
        }
    }
}

impl OcclusionParams {
    pub fn validate(&self) -> Result<()> {
        if self.tol_disp < 0.0 {
            return Err(Error::InvalidInput(format!(
                "tol_disp must be >= 0, got {}",
                self.tol_disp
            )));
        }
        if self.median_radius < 0 {
            return Err(Error::InvalidInput(format!(
                "median_radius must be >= 0, got {}",
                self.median_radius
            )));
        }
        if self.sigma_color <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "sigma_color must be > 0, got {}",
                self.sigma_color
            )));
        }
        if self.sigma_space <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "sigma_space must be > 0, got {}",
                self.sigma_space
            )));
        }
        Ok(())
    }
}

/// How the reference and target support weights are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightCombination {
    /// Reference weights only; the target support is ignored.
    Left,
    Max,
    Min,
    #[default]
    Mult,
    Plus,
}

/// Horizontal camera motion, selecting the monotone-fill gap policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMotion {
    /// Camera moves right; gaps take the larger neighboring disparity.
    #[default]
    ToRight,
    /// Camera moves left; gaps take the smaller neighboring disparity.
    ToLeft,
}

impl CameraMotion {
    /// Map the CLI sense value (0 = right, 1 = left).
    pub fn from_sense(sense: i32) -> Result<Self> {
        match sense {
            0 => Ok(Self::ToRight),
            1 => Ok(Self::ToLeft),
            other => Err(Error::InvalidInput(format!(
                "camera sense must be 0 or 1, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(MatchParams::default().validate().is_ok());
        assert!(OcclusionParams::default().validate().is_ok());
    }

    #[test]
    fn validate_names_the_bad_field() {
        let params = MatchParams {
            gamma_color: 0.0,
            ..Default::default()
        };
        let msg = params.validate().unwrap_err().to_string();
        assert!(msg.contains("gamma_color"));

        let params = OcclusionParams {
            sigma_space: -1.0,
            ..Default::default()
        };
        let msg = params.validate().unwrap_err().to_string();
        assert!(msg.contains("sigma_space"));
    }

    #[test]
    fn sense_values_map_to_motion() {
        assert_eq!(CameraMotion::from_sense(0).unwrap(), CameraMotion::ToRight);
        assert_eq!(CameraMotion::from_sense(1).unwrap(), CameraMotion::ToLeft);
        assert!(CameraMotion::from_sense(2).is_err());
    }
}
