//! Mapping between UI controls and parameter changes.
//!
//! Sliders report integer positions. Brightness, hue and kernel size take the
//! position as is; gains (contrast, saturation, value, sharpen) divide it by
//! [`SliderScale::gain_divisor`], so with the default divisor of 33 a slider
//! at 33 sits at identity. Drag and release events go through the same
//! mapping.

use serde::{Deserialize, Serialize};

use crate::params::{AdjustmentParameters, ParameterChange};

/// An integer-positioned slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Brightness,
    Contrast,
    Hue,
    Saturation,
    Value,
    KernelSize,
    Sharpen,
}

impl Control {
    pub const ALL: [Control; 7] = [
        Control::Brightness,
        Control::Contrast,
        Control::Hue,
        Control::Saturation,
        Control::Value,
        Control::KernelSize,
        Control::Sharpen,
    ];

    /// Whether the slider position is divided by the gain divisor.
    pub fn is_gain(self) -> bool {
        matches!(
            self,
            Control::Contrast | Control::Saturation | Control::Value | Control::Sharpen
        )
    }
}

/// A button that nudges a geometric parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    ZoomIn,
    ZoomOut,
    /// Counter-clockwise.
    RotateLeft,
    /// Clockwise.
    RotateRight,
}

/// Slider and step-button scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderScale {
    /// Slider position that maps to a gain of 1.0
    pub gain_divisor: f32,
    /// Scale change per zoom click
    pub scale_step: f32,
    /// Angle change in degrees per rotate click
    pub rotation_step: f32,
}

impl Default for SliderScale {
    fn default() -> Self {
        Self {
            gain_divisor: 33.0,
            scale_step: 0.1,
            rotation_step: 5.0,
        }
    }
}

impl SliderScale {
    /// Replace non-positive or non-finite values with defaults.
    pub fn sanitize(&mut self) -> Vec<String> {
        let defaults = Self::default();
        let mut warnings = Vec::new();
        for (name, value, default) in [
            ("gain_divisor", &mut self.gain_divisor, defaults.gain_divisor),
            ("scale_step", &mut self.scale_step, defaults.scale_step),
            ("rotation_step", &mut self.rotation_step, defaults.rotation_step),
        ] {
            if !value.is_finite() || *value <= 0.0 {
                warnings.push(format!("sliders.{name} must be positive; using {default}"));
                *value = default;
            }
        }
        warnings
    }
}

/// The parameter change a slider at `position` produces.
pub fn slider_change(control: Control, position: i32, scale: &SliderScale) -> ParameterChange {
    let gain = position as f32 / scale.gain_divisor;
    match control {
        Control::Brightness => ParameterChange::Brightness(position),
        Control::Contrast => ParameterChange::Contrast(gain),
        Control::Hue => ParameterChange::Hue(position),
        Control::Saturation => ParameterChange::Saturation(gain),
        Control::Value => ParameterChange::Value(gain),
        Control::KernelSize => ParameterChange::KernelSize(position.max(0) as u32),
        Control::Sharpen => ParameterChange::Sharpen(gain),
    }
}

/// Where a slider should sit to reflect `params`.
pub fn slider_position(
    control: Control,
    params: &AdjustmentParameters,
    scale: &SliderScale,
) -> i32 {
    let gain_position = |gain: f32| (gain * scale.gain_divisor).round() as i32;
    match control {
        Control::Brightness => params.brightness,
        Control::Contrast => gain_position(params.contrast),
        Control::Hue => params.hue,
        Control::Saturation => gain_position(params.saturation),
        Control::Value => gain_position(params.value),
        Control::KernelSize => params.kernel_size.min(i32::MAX as u32) as i32,
        Control::Sharpen => gain_position(params.sharpen),
    }
}

/// The parameter change one click of `step` produces from `params`.
pub fn step_change(
    step: Step,
    params: &AdjustmentParameters,
    scale: &SliderScale,
) -> ParameterChange {
    match step {
        Step::ZoomIn => ParameterChange::Scale(params.scale + scale.scale_step),
        Step::ZoomOut => ParameterChange::Scale(params.scale - scale.scale_step),
        Step::RotateLeft => ParameterChange::Angle(params.angle + scale.rotation_step),
        Step::RotateRight => ParameterChange::Angle(params.angle - scale.rotation_step),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_positions() {
        let scale = SliderScale::default();
        let params = AdjustmentParameters::default();
        assert_eq!(slider_position(Control::Brightness, &params, &scale), 0);
        assert_eq!(slider_position(Control::Contrast, &params, &scale), 33);
        assert_eq!(slider_position(Control::Saturation, &params, &scale), 33);
        assert_eq!(slider_position(Control::Value, &params, &scale), 33);
        assert_eq!(slider_position(Control::KernelSize, &params, &scale), 1);
        assert_eq!(slider_position(Control::Sharpen, &params, &scale), 0);
    }

    #[test]
    fn test_gain_sliders_divide_by_33() {
        let scale = SliderScale::default();
        assert_eq!(
            slider_change(Control::Contrast, 33, &scale),
            ParameterChange::Contrast(1.0)
        );
        assert_eq!(
            slider_change(Control::Saturation, 66, &scale),
            ParameterChange::Saturation(2.0)
        );
        assert_eq!(
            slider_change(Control::Value, 0, &scale),
            ParameterChange::Value(0.0)
        );
    }

    #[test]
    fn test_verbatim_sliders() {
        let scale = SliderScale::default();
        assert_eq!(
            slider_change(Control::Brightness, -40, &scale),
            ParameterChange::Brightness(-40)
        );
        assert_eq!(
            slider_change(Control::Hue, 25, &scale),
            ParameterChange::Hue(25)
        );
        assert_eq!(
            slider_change(Control::KernelSize, 7, &scale),
            ParameterChange::KernelSize(7)
        );
        assert_eq!(
            slider_change(Control::KernelSize, -3, &scale),
            ParameterChange::KernelSize(0)
        );
    }

    #[test]
    fn test_position_round_trip() {
        let scale = SliderScale::default();
        for control in Control::ALL {
            for position in [0, 1, 17, 33, 50, 99] {
                let mut params = AdjustmentParameters::default();
                match slider_change(control, position, &scale) {
                    ParameterChange::Brightness(v) => params.brightness = v,
                    ParameterChange::Contrast(v) => params.contrast = v,
                    ParameterChange::Hue(v) => params.hue = v,
                    ParameterChange::Saturation(v) => params.saturation = v,
                    ParameterChange::Value(v) => params.value = v,
                    ParameterChange::KernelSize(v) => params.kernel_size = v,
                    ParameterChange::Sharpen(v) => params.sharpen = v,
                    other => panic!("unexpected change {other:?}"),
                }
                assert_eq!(
                    slider_position(control, &params, &scale),
                    position,
                    "{control:?} at {position}"
                );
            }
        }
    }

    #[test]
    fn test_step_buttons() {
        let scale = SliderScale::default();
        let params = AdjustmentParameters::default();
        assert_eq!(
            step_change(Step::ZoomIn, &params, &scale),
            ParameterChange::Scale(1.1)
        );
        assert_eq!(
            step_change(Step::ZoomOut, &params, &scale),
            ParameterChange::Scale(0.9)
        );
        assert_eq!(
            step_change(Step::RotateLeft, &params, &scale),
            ParameterChange::Angle(5.0)
        );
        assert_eq!(
            step_change(Step::RotateRight, &params, &scale),
            ParameterChange::Angle(-5.0)
        );
    }

    #[test]
    fn test_gain_flags() {
        assert!(Control::Contrast.is_gain());
        assert!(!Control::Brightness.is_gain());
        assert!(!Control::KernelSize.is_gain());
    }

    #[test]
    fn test_sanitize_replaces_bad_steps() {
        let mut scale = SliderScale {
            gain_divisor: 0.0,
            scale_step: f32::NAN,
            rotation_step: 15.0,
        };
        let warnings = scale.sanitize();
        assert_eq!(warnings.len(), 2);
        assert_eq!(scale.gain_divisor, 33.0);
        assert_eq!(scale.scale_step, 0.1);
        assert_eq!(scale.rotation_step, 15.0);
    }
}
