//! Flick configuration
//!
//! Every option has a default, so a config can be built in code with the
//! builder methods or read from a TOML document with camelCase keys:
//!
//! ```toml
//! property = "translateY"
//! min = -2000.0
//! max = 0.0
//! step = 100.0
//! maxSpeed = 2.5
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{FlickError, Result};

/// Deceleration used for inertial throws, in units per ms²
pub const DEFAULT_DECELERATION: f64 = 0.0006;

/// Tags that keep their default touch-move behaviour (form controls)
pub const DEFAULT_PREVENT_DEFAULT_EXCEPTION: &str = "^(INPUT|TEXTAREA|BUTTON|SELECT)$";

/// Axis whose touch displacement drives the bound property
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Select this axis' component
    pub fn pick(self, x: f64, y: f64) -> f64 {
        match self {
            Axis::Horizontal => x,
            Axis::Vertical => y,
        }
    }
}

/// Construction options, immutable once a `Flick` is built
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlickConfig {
    /// Name of the property on the target that follows the gesture
    pub property: String,
    /// Track vertical movement (default: true); horizontal otherwise
    pub vertical: bool,
    /// Ignore gestures that start along the other axis (default: true)
    pub lock_direction: bool,
    /// Value written to the property at construction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<f64>,
    /// Suppress the host default action on touch move (default: true)
    pub prevent_default: bool,
    /// Target tags exempt from default-action suppression
    pub prevent_default_exception: String,
    /// Touch distance to property distance ratio (default: 1)
    pub sensitivity: f64,
    /// Drag damping inside the bounds (default: 1)
    pub move_factor: f64,
    /// Inertia speed multiplier (default: 1)
    pub factor: f64,
    /// Drag damping past the bounds; smaller is stiffer (default: 0.3)
    pub out_factor: f64,
    /// Fire callbacks but never write the property (default: false)
    pub fixed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Snap resting positions to multiples of this value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Keep moving after release (default: true)
    pub inertia: bool,
    /// Cap on the projected release speed, units per ms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
    /// Overshoot past which the elastic region stops growing (default: 600)
    pub max_region: f64,
    /// Largest spring displacement past a bound (default: 60)
    pub spring_max_region: f64,
    /// Inertial deceleration, units per ms² (default: 0.0006)
    pub deceleration: f64,
}

impl Default for FlickConfig {
    fn default() -> Self {
        Self {
            property: String::new(),
            vertical: true,
            lock_direction: true,
            initial_value: None,
            prevent_default: true,
            prevent_default_exception: DEFAULT_PREVENT_DEFAULT_EXCEPTION.to_string(),
            sensitivity: 1.0,
            move_factor: 1.0,
            factor: 1.0,
            out_factor: 0.3,
            fixed: false,
            min: None,
            max: None,
            step: None,
            inertia: true,
            max_speed: None,
            max_region: 600.0,
            spring_max_region: 60.0,
            deceleration: DEFAULT_DECELERATION,
        }
    }
}

impl FlickConfig {
    /// Default config bound to `property`
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ..Default::default()
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: FlickConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check option consistency
    pub fn validate(&self) -> Result<()> {
        if self.property.is_empty() {
            return Err(FlickError::InvalidConfig(
                "property name must not be empty".into(),
            ));
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(FlickError::InvalidBounds { min, max });
            }
        }
        if let Some(step) = self.step {
            if !(step.is_finite() && step > 0.0) {
                return Err(FlickError::InvalidStep(step));
            }
        }
        if !(self.deceleration.is_finite() && self.deceleration > 0.0) {
            return Err(FlickError::InvalidConfig(format!(
                "deceleration must be positive, got {}",
                self.deceleration
            )));
        }
        if self.max_region <= 0.0 {
            return Err(FlickError::InvalidConfig(format!(
                "maxRegion must be positive, got {}",
                self.max_region
            )));
        }
        self.exception_pattern()?;
        Ok(())
    }

    /// Compiled preventDefault exception
    pub fn exception_pattern(&self) -> Result<Regex> {
        Ok(Regex::new(&self.prevent_default_exception)?)
    }

    pub fn axis(&self) -> Axis {
        if self.vertical {
            Axis::Vertical
        } else {
            Axis::Horizontal
        }
    }

    /// The bound `value` lies beyond, checking max first
    pub fn exceeded_bound(&self, value: f64) -> Option<f64> {
        match (self.min, self.max) {
            (_, Some(max)) if value > max => Some(max),
            (Some(min), _) if value < min => Some(min),
            _ => None,
        }
    }

    // =========================================================================
    // Builder
    // =========================================================================

    pub fn vertical(mut self, vertical: bool) -> Self {
        self.vertical = vertical;
        self
    }

    pub fn horizontal(self) -> Self {
        self.vertical(false)
    }

    pub fn lock_direction(mut self, enabled: bool) -> Self {
        self.lock_direction = enabled;
        self
    }

    pub fn initial_value(mut self, value: f64) -> Self {
        self.initial_value = Some(value);
        self
    }

    pub fn prevent_default(mut self, enabled: bool) -> Self {
        self.prevent_default = enabled;
        self
    }

    pub fn prevent_default_exception(mut self, pattern: impl Into<String>) -> Self {
        self.prevent_default_exception = pattern.into();
        self
    }

    pub fn sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn move_factor(mut self, factor: f64) -> Self {
        self.move_factor = factor;
        self
    }

    pub fn factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    pub fn out_factor(mut self, factor: f64) -> Self {
        self.out_factor = factor;
        self
    }

    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn bounds(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn inertia(mut self, enabled: bool) -> Self {
        self.inertia = enabled;
        self
    }

    pub fn max_speed(mut self, speed: f64) -> Self {
        self.max_speed = Some(speed);
        self
    }

    pub fn max_region(mut self, region: f64) -> Self {
        self.max_region = region;
        self
    }

    pub fn spring_max_region(mut self, region: f64) -> Self {
        self.spring_max_region = region;
        self
    }

    pub fn deceleration(mut self, deceleration: f64) -> Self {
        self.deceleration = deceleration;
        self
    }
}
