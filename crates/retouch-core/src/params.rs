//! Adjustment parameters, identity values and normalization.
//!
//! Every field of [`AdjustmentParameters`] has an identity value at which its
//! stage is a no-op; `Default` produces exactly those values. Out-of-range
//! input is never an error: [`AdjustmentParameters::normalized`] clamps it
//! into the configured [`ParameterLimits`].

use serde::{Deserialize, Serialize};

use crate::mode::EditCategory;

/// Smoothing kernel variant. At most one is armed at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingVariant {
    /// Unweighted mean filter.
    Box,
    /// Gaussian-weighted filter, sigma derived from the kernel size.
    Gaussian,
    /// Median filter.
    Median,
    /// Edge-preserving bilateral filter.
    Bilateral,
    /// No smoothing, whatever the kernel size.
    #[default]
    None,
}

impl SmoothingVariant {
    /// The four filters a user can arm.
    pub const ALL: [SmoothingVariant; 4] = [
        SmoothingVariant::Box,
        SmoothingVariant::Gaussian,
        SmoothingVariant::Median,
        SmoothingVariant::Bilateral,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SmoothingVariant::Box => "box",
            SmoothingVariant::Gaussian => "gaussian",
            SmoothingVariant::Median => "median",
            SmoothingVariant::Bilateral => "bilateral",
            SmoothingVariant::None => "none",
        }
    }
}

/// The full mutable parameter set driving the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentParameters {
    /// Additive brightness offset (identity 0)
    pub brightness: i32,
    /// Multiplicative contrast gain (identity 1.0)
    pub contrast: f32,
    /// Equalize the luma histogram (identity false)
    pub equalize: bool,
    /// Hue shift in half-degrees, hue range is 0-180 (identity 0)
    pub hue: i32,
    /// Saturation gain (identity 1.0)
    pub saturation: f32,
    /// Value gain (identity 1.0)
    pub value: f32,
    /// Smoothing kernel size, >= 1 (identity 1)
    pub kernel_size: u32,
    /// Armed smoothing filter (identity None)
    pub variant: SmoothingVariant,
    /// Unsharp-mask amount (identity 0.0)
    pub sharpen: f32,
    /// Rotation in degrees, positive = counter-clockwise (identity 0.0)
    pub angle: f32,
    /// Uniform scale factor (identity 1.0)
    pub scale: f32,
}

impl Default for AdjustmentParameters {
    fn default() -> Self {
        Self {
            brightness: 0,
            contrast: 1.0,
            equalize: false,
            hue: 0,
            saturation: 1.0,
            value: 1.0,
            kernel_size: 1,
            variant: SmoothingVariant::None,
            sharpen: 0.0,
            angle: 0.0,
            scale: 1.0,
        }
    }
}

impl AdjustmentParameters {
    /// Create a parameter set with every field at identity
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if every stage is a no-op
    pub fn is_identity(&self) -> bool {
        self.basic_is_identity()
            && self.color_is_identity()
            && self.smoothing_is_identity()
            && self.sharpen_is_identity()
            && self.geometric_is_identity()
    }

    pub fn basic_is_identity(&self) -> bool {
        self.brightness == 0 && self.contrast == 1.0
    }

    pub fn color_is_identity(&self) -> bool {
        !self.equalize && self.hsv_is_identity()
    }

    pub fn hsv_is_identity(&self) -> bool {
        self.hue == 0 && self.saturation == 1.0 && self.value == 1.0
    }

    /// The variant is not part of this check: a kernel size of 1 is a
    /// no-op for every variant.
    pub fn smoothing_is_identity(&self) -> bool {
        self.kernel_size == 1
    }

    pub fn sharpen_is_identity(&self) -> bool {
        self.sharpen == 0.0
    }

    pub fn geometric_is_identity(&self) -> bool {
        self.angle == 0.0 && self.scale == 1.0
    }

    /// Whether the given exclusive category carries an uncommitted edit.
    pub fn has_pending(&self, category: EditCategory) -> bool {
        match category {
            EditCategory::Basic => !self.basic_is_identity(),
            EditCategory::Smoothing => !self.smoothing_is_identity(),
        }
    }

    /// Reset the fields in `scope` to identity. Idempotent.
    pub fn reset(&mut self, scope: ResetScope) {
        let identity = Self::default();
        match scope {
            ResetScope::Basic => {
                self.brightness = identity.brightness;
                self.contrast = identity.contrast;
            }
            ResetScope::Color => {
                self.equalize = identity.equalize;
                self.hue = identity.hue;
                self.saturation = identity.saturation;
                self.value = identity.value;
            }
            ResetScope::Smoothing => {
                self.kernel_size = identity.kernel_size;
                self.variant = identity.variant;
            }
            ResetScope::Sharpen => self.sharpen = identity.sharpen,
            ResetScope::Geometric => {
                self.angle = identity.angle;
                self.scale = identity.scale;
            }
            ResetScope::All => *self = identity,
        }
    }

    /// The parameters a commit of `category` bakes into the base: every stage
    /// up to and including the category's own, everything after it at
    /// identity.
    ///
    /// Smoothing sits between color and sharpen, and sharpen reads the
    /// color output, so a smoothing commit bakes basic, color, smoothing and
    /// sharpen together. Geometric parameters are never baked.
    pub fn folded(&self, category: EditCategory) -> Self {
        let mut baked = Self {
            brightness: self.brightness,
            contrast: self.contrast,
            ..Self::default()
        };
        if category == EditCategory::Smoothing {
            baked.equalize = self.equalize;
            baked.hue = self.hue;
            baked.saturation = self.saturation;
            baked.value = self.value;
            baked.kernel_size = self.kernel_size;
            baked.variant = self.variant;
            baked.sharpen = self.sharpen;
        }
        baked
    }

    /// Return the fields [`folded`](Self::folded) bakes to identity. The
    /// armed variant survives so the next kernel edit uses the same filter.
    pub fn clear_folded(&mut self, category: EditCategory) {
        self.reset(ResetScope::Basic);
        if category == EditCategory::Smoothing {
            self.reset(ResetScope::Color);
            self.reset(ResetScope::Sharpen);
            self.kernel_size = Self::default().kernel_size;
        }
    }

    /// Clamp every numeric field into `limits` and round the kernel size up
    /// to the next odd integer. Non-finite floats fall back to identity.
    pub fn normalized(&self, limits: &ParameterLimits) -> Self {
        let identity = Self::default();
        let mut kernel_size = limits.kernel_size.clamp(self.kernel_size);
        if kernel_size % 2 == 0 {
            kernel_size += 1;
        }
        Self {
            brightness: limits.brightness.clamp(self.brightness),
            contrast: limits.contrast.clamp_finite(self.contrast, identity.contrast),
            equalize: self.equalize,
            hue: limits.hue.clamp(self.hue),
            saturation: limits
                .saturation
                .clamp_finite(self.saturation, identity.saturation),
            value: limits.value.clamp_finite(self.value, identity.value),
            kernel_size,
            variant: self.variant,
            sharpen: limits.sharpen.clamp_finite(self.sharpen, identity.sharpen),
            angle: limits.angle.clamp_finite(self.angle, identity.angle),
            scale: limits.scale.clamp_finite(self.scale, identity.scale),
        }
    }
}

/// Which group of parameters a reset control targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetScope {
    Basic,
    Color,
    Smoothing,
    Sharpen,
    Geometric,
    All,
}

/// Inclusive numeric range for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, v: T) -> T {
        if v < self.min {
            self.min
        } else if v > self.max {
            self.max
        } else {
            v
        }
    }

    pub fn contains(&self, v: T) -> bool {
        v >= self.min && v <= self.max
    }

    fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Replace the range with `default` if it is inverted or excludes
    /// `identity`, returning a warning for `limits.{name}`.
    fn sanitize(&mut self, name: &str, default: Self, identity: T) -> Option<String> {
        if self.is_ordered() && self.contains(identity) {
            return None;
        }
        *self = default;
        Some(format!(
            "limits.{name} must be ordered and contain the identity value; using default"
        ))
    }
}

impl Bounds<f32> {
    fn clamp_finite(&self, v: f32, fallback: f32) -> f32 {
        if v.is_finite() {
            self.clamp(v)
        } else {
            fallback
        }
    }
}

/// Declared numeric range of every parameter.
///
/// The defaults mirror the ranges of the editing controls: gains run from
/// 0 to 3 (slider 0-99 divided by 33), hue shifts cover the whole hue
/// circle in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterLimits {
    pub brightness: Bounds<i32>,
    pub contrast: Bounds<f32>,
    pub hue: Bounds<i32>,
    pub saturation: Bounds<f32>,
    pub value: Bounds<f32>,
    pub kernel_size: Bounds<u32>,
    pub sharpen: Bounds<f32>,
    pub angle: Bounds<f32>,
    pub scale: Bounds<f32>,
}

impl Default for ParameterLimits {
    fn default() -> Self {
        Self {
            brightness: Bounds::new(-255, 255),
            contrast: Bounds::new(0.0, 3.0),
            hue: Bounds::new(-180, 180),
            saturation: Bounds::new(0.0, 3.0),
            value: Bounds::new(0.0, 3.0),
            kernel_size: Bounds::new(1, 99),
            sharpen: Bounds::new(0.0, 5.0),
            angle: Bounds::new(-360.0, 360.0),
            scale: Bounds::new(0.1, 10.0),
        }
    }
}

impl ParameterLimits {
    /// Replace any inverted range, or one that excludes the identity
    /// value, with its default. Returns a description of each fix.
    pub fn sanitize(&mut self) -> Vec<String> {
        let defaults = Self::default();
        let identity = AdjustmentParameters::default();
        [
            self.brightness
                .sanitize("brightness", defaults.brightness, identity.brightness),
            self.contrast
                .sanitize("contrast", defaults.contrast, identity.contrast),
            self.hue.sanitize("hue", defaults.hue, identity.hue),
            self.saturation
                .sanitize("saturation", defaults.saturation, identity.saturation),
            self.value.sanitize("value", defaults.value, identity.value),
            self.kernel_size
                .sanitize("kernel_size", defaults.kernel_size, identity.kernel_size),
            self.sharpen
                .sanitize("sharpen", defaults.sharpen, identity.sharpen),
            self.angle.sanitize("angle", defaults.angle, identity.angle),
            self.scale.sanitize("scale", defaults.scale, identity.scale),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// A single parameter edit coming from a UI control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "param", content = "value", rename_all = "snake_case")]
pub enum ParameterChange {
    Brightness(i32),
    Contrast(f32),
    Equalize(bool),
    Hue(i32),
    Saturation(f32),
    Value(f32),
    KernelSize(u32),
    Sharpen(f32),
    Angle(f32),
    Scale(f32),
}

impl ParameterChange {
    /// The exclusive edit category this change belongs to, if any.
    ///
    /// Color, sharpen and geometric edits are live in every mode and never
    /// trigger a commit.
    pub fn category(&self) -> Option<EditCategory> {
        match self {
            ParameterChange::Brightness(_) | ParameterChange::Contrast(_) => {
                Some(EditCategory::Basic)
            }
            ParameterChange::KernelSize(_) => Some(EditCategory::Smoothing),
            _ => None,
        }
    }

    /// Write the change into `params`, clamped to `limits`.
    pub fn apply_to(&self, params: &mut AdjustmentParameters, limits: &ParameterLimits) {
        let identity = AdjustmentParameters::default();
        match *self {
            ParameterChange::Brightness(v) => params.brightness = limits.brightness.clamp(v),
            ParameterChange::Contrast(v) => {
                params.contrast = limits.contrast.clamp_finite(v, identity.contrast)
            }
            ParameterChange::Equalize(v) => params.equalize = v,
            ParameterChange::Hue(v) => params.hue = limits.hue.clamp(v),
            ParameterChange::Saturation(v) => {
                params.saturation = limits.saturation.clamp_finite(v, identity.saturation)
            }
            ParameterChange::Value(v) => {
                params.value = limits.value.clamp_finite(v, identity.value)
            }
            ParameterChange::KernelSize(v) => params.kernel_size = limits.kernel_size.clamp(v),
            ParameterChange::Sharpen(v) => {
                params.sharpen = limits.sharpen.clamp_finite(v, identity.sharpen)
            }
            ParameterChange::Angle(v) => {
                params.angle = limits.angle.clamp_finite(v, identity.angle)
            }
            ParameterChange::Scale(v) => {
                params.scale = limits.scale.clamp_finite(v, identity.scale)
            }
        }
    }
}
