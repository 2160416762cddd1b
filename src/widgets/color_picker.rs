//! Color picker decoder - `cpk,<r>,<theta>`
//!
//! The picker reports a point on the color wheel in polar form: `r` is the
//! distance from the center (saturation), `theta` the angle (hue).

use super::{parse_number, require_fields, ControllerSample, DecodeError, WidgetDecoder, WidgetKind};

const FIELDS: usize = 3;

#[derive(Debug, Default)]
pub struct ColorPicker {
    sample: ControllerSample,
}

impl WidgetDecoder for ColorPicker {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ColorPicker
    }

    fn sample(&self) -> &ControllerSample {
        &self.sample
    }

    fn update_data(&mut self, fields: &[&str]) -> Result<(), DecodeError> {
        require_fields(self.kind(), fields, FIELDS)?;
        let r = parse_number(self.kind(), "r", fields[1])?;
        let theta = parse_number(self.kind(), "theta", fields[2])?;

        self.sample.r = r;
        self.sample.theta = theta;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updates_polar_fields() {
        let mut picker = ColorPicker::default();
        picker.update_data(&["cpk", "0.75", "180"]).unwrap();

        let s = picker.sample();
        assert_eq!(s.r, 0.75);
        assert_eq!(s.theta, 180.0);
        assert_eq!(s.x, 0.0);
        assert_eq!(s.y, 0.0);
    }

    #[test]
    fn test_tag_only_frame_is_discarded() {
        let mut picker = ColorPicker::default();
        assert!(matches!(
            picker.update_data(&["cpk"]),
            Err(DecodeError::TooFewFields { actual: 1, .. })
        ));
    }

    #[test]
    fn test_empty_field_is_a_parse_failure() {
        let mut picker = ColorPicker::default();
        picker.update_data(&["cpk", "1", "90"]).unwrap();

        let err = picker.update_data(&["cpk", "", "45"]).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { field: "r", .. }));
        assert_eq!(picker.sample().theta, 90.0);
    }
}
