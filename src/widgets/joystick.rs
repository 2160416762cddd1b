//! Joystick decoder - `joystick,<x>,<y>`

use super::{parse_number, require_fields, ControllerSample, DecodeError, WidgetDecoder, WidgetKind};

const FIELDS: usize = 3;

/// Two-axis stick; writes `x` and `y` only
#[derive(Debug, Default)]
pub struct Joystick {
    sample: ControllerSample,
}

impl WidgetDecoder for Joystick {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Joystick
    }

    fn sample(&self) -> &ControllerSample {
        &self.sample
    }

    fn update_data(&mut self, fields: &[&str]) -> Result<(), DecodeError> {
        require_fields(self.kind(), fields, FIELDS)?;
        let x = parse_number(self.kind(), "x", fields[1])?;
        let y = parse_number(self.kind(), "y", fields[2])?;

        self.sample.x = x;
        self.sample.y = y;
        Ok(())
    }
}
