//! Virtual input widgets and their frame decoders
//!
//! Each widget kind owns exactly one [`ControllerSample`] for the lifetime of
//! the dispatcher. A decoder only ever writes the fields its kind defines, so
//! values it does not touch persist across frames.
//!
//! Malformed frames are discarded whole: every field is parsed before any
//! field is written, and a short or unparsable frame leaves the sample as it
//! was.

mod button_array;
mod color_picker;
mod joystick;
mod slider;

pub use button_array::ButtonArray;
pub use color_picker::ColorPicker;
pub use joystick::Joystick;
pub use slider::Slider;

use std::fmt;
use thiserror::Error;

/// Last-known state of one widget
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerSample {
    pub r: f64,
    pub theta: f64,
    pub x: f64,
    pub y: f64,
    pub intensity: f64,
    pub button_state: bool,
}

/// The four widget kinds a client can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidgetKind {
    Joystick,
    ColorPicker,
    ButtonArray,
    Slider,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 4] = [
        WidgetKind::Joystick,
        WidgetKind::ColorPicker,
        WidgetKind::ButtonArray,
        WidgetKind::Slider,
    ];

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::Joystick => "joystick",
            WidgetKind::ColorPicker => "color-picker",
            WidgetKind::ButtonArray => "button-array",
            WidgetKind::Slider => "slider",
        }
    }

    /// Resolve either the long name or the wire tag (`cpk`, `bar`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "joystick" => Some(WidgetKind::Joystick),
            "color-picker" | "colorpicker" | "cpk" => Some(WidgetKind::ColorPicker),
            "button-array" | "buttonarray" | "bar" => Some(WidgetKind::ButtonArray),
            "slider" => Some(WidgetKind::Slider),
            _ => None,
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reasons a widget frame is discarded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("{kind} frame needs {expected} fields, got {actual}")]
    TooFewFields {
        kind: WidgetKind,
        expected: usize,
        actual: usize,
    },

    #[error("{kind} field '{field}' is not a finite number: {value:?}")]
    InvalidNumber {
        kind: WidgetKind,
        field: &'static str,
        value: String,
    },

    #[error("{kind} field '{field}' is not a button state: {value:?}")]
    InvalidBool {
        kind: WidgetKind,
        field: &'static str,
        value: String,
    },
}

/// Converts the fields of one frame into a sample update
///
/// `fields` is the full field sequence including the tag at index 0.
/// Implementations check the length before indexing and ignore trailing
/// fields.
pub trait WidgetDecoder: Send {
    fn kind(&self) -> WidgetKind;

    fn sample(&self) -> &ControllerSample;

    fn update_data(&mut self, fields: &[&str]) -> Result<(), DecodeError>;
}

/// Fail unless at least `expected` fields (tag included) are present
pub(crate) fn require_fields(
    kind: WidgetKind,
    fields: &[&str],
    expected: usize,
) -> Result<(), DecodeError> {
    if fields.len() < expected {
        return Err(DecodeError::TooFewFields {
            kind,
            expected,
            actual: fields.len(),
        });
    }
    Ok(())
}

pub(crate) fn parse_number(
    kind: WidgetKind,
    field: &'static str,
    value: &str,
) -> Result<f64, DecodeError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DecodeError::InvalidNumber {
            kind,
            field,
            value: value.to_string(),
        })
}

/// Button states arrive as `1`/`0` from the app, `true`/`false` from scripts
pub(crate) fn parse_bool(
    kind: WidgetKind,
    field: &'static str,
    value: &str,
) -> Result<bool, DecodeError> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(DecodeError::InvalidBool {
            kind,
            field,
            value: value.to_string(),
        }),
    }
}

/// One decoder per widget kind
pub struct WidgetSet {
    joystick: Joystick,
    color_picker: ColorPicker,
    button_array: ButtonArray,
    slider: Slider,
}

impl WidgetSet {
    pub fn new() -> Self {
        Self {
            joystick: Joystick::default(),
            color_picker: ColorPicker::default(),
            button_array: ButtonArray::default(),
            slider: Slider::default(),
        }
    }

    pub fn decoder_mut(&mut self, kind: WidgetKind) -> &mut dyn WidgetDecoder {
        match kind {
            WidgetKind::Joystick => &mut self.joystick,
            WidgetKind::ColorPicker => &mut self.color_picker,
            WidgetKind::ButtonArray => &mut self.button_array,
            WidgetKind::Slider => &mut self.slider,
        }
    }

    pub fn sample(&self, kind: WidgetKind) -> ControllerSample {
        match kind {
            WidgetKind::Joystick => *self.joystick.sample(),
            WidgetKind::ColorPicker => *self.color_picker.sample(),
            WidgetKind::ButtonArray => *self.button_array.sample(),
            WidgetKind::Slider => *self.slider.sample(),
        }
    }
}

impl Default for WidgetSet {
    fn default() -> Self {
        Self::new()
    }
}
