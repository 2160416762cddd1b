//! Slider decoder - `slider,<intensity>`

use super::{parse_number, require_fields, ControllerSample, DecodeError, WidgetDecoder, WidgetKind};

const FIELDS: usize = 2;

#[derive(Debug, Default)]
pub struct Slider {
    sample: ControllerSample,
}

impl WidgetDecoder for Slider {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Slider
    }

    fn sample(&self) -> &ControllerSample {
        &self.sample
    }

    fn update_data(&mut self, fields: &[&str]) -> Result<(), DecodeError> {
        require_fields(self.kind(), fields, FIELDS)?;
        self.sample.intensity = parse_number(self.kind(), "intensity", fields[1])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updates_intensity() {
        let mut slider = Slider::default();
        slider.update_data(&["slider", "42.5"]).unwrap();
        assert_eq!(slider.sample().intensity, 42.5);
    }

    #[test]
    fn test_missing_value() {
        let mut slider = Slider::default();
        assert!(slider.update_data(&["slider"]).is_err());
        assert!(slider.update_data(&[]).is_err());
        assert_eq!(slider.sample().intensity, 0.0);
    }
}
