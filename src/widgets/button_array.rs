//! Button array decoder - `bar,<state>`

use super::{parse_bool, require_fields, ControllerSample, DecodeError, WidgetDecoder, WidgetKind};

const FIELDS: usize = 2;

#[derive(Debug, Default)]
pub struct ButtonArray {
    sample: ControllerSample,
}

impl WidgetDecoder for ButtonArray {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ButtonArray
    }

    fn sample(&self) -> &ControllerSample {
        &self.sample
    }

    fn update_data(&mut self, fields: &[&str]) -> Result<(), DecodeError> {
        require_fields(self.kind(), fields, FIELDS)?;
        self.sample.button_state = parse_bool(self.kind(), "button_state", fields[1])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut bar = ButtonArray::default();

        bar.update_data(&["bar", "1"]).unwrap();
        assert!(bar.sample().button_state);

        bar.update_data(&["bar", "0"]).unwrap();
        assert!(!bar.sample().button_state);
    }

    #[test]
    fn test_invalid_state_keeps_previous_value() {
        let mut bar = ButtonArray::default();
        bar.update_data(&["bar", "true"]).unwrap();

        assert!(bar.update_data(&["bar", "pressed"]).is_err());
        assert!(bar.sample().button_state);
    }
}
