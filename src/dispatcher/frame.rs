//! Inbound frame handling and tag routing

use tracing::{debug, trace};

use crate::protocol::{self, Tag, DELIMITER, INIT_REQUEST};
use crate::session::PeerId;
use crate::widgets::{DecodeError, WidgetKind};

/// The single effect a frame had
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Sender does not hold the session; nothing happened
    NotAdmitted,
    /// A widget sample was updated
    Widget(WidgetKind),
    /// Widget frame discarded, sample untouched
    Rejected(DecodeError),
    /// `cms` answered with `sms,<value>`; `sent` is false if the transport failed
    Echo { sent: bool },
    /// `serial,initrequest` answered with the greeting
    Greeting { sent: bool },
    /// `serial,<command>` stored for the host
    CommandStored,
    /// Tag known but required fields missing
    MissingField(Tag),
    UnknownTag,
}

impl super::ProtocolDispatcher {
    /// Process one text frame from `sender`
    ///
    /// Frames from anyone but the admitted peer are ignored before any
    /// parsing. Otherwise the first field selects the handler:
    /// - `joystick`, `cpk`, `bar`, `slider` → widget decoder
    /// - `cms,<v>` → reply `sms,<v>`
    /// - `serial,initrequest` → greeting with the current address
    /// - `serial,<anything else>` → pending command (raw text after the tag)
    /// - anything else → dropped
    pub fn handle_frame(&mut self, sender: PeerId, raw: &str) -> FrameOutcome {
        if !self.gate.is_active_for(sender) {
            trace!("Ignoring frame from {}: not the active session", sender);
            return FrameOutcome::NotAdmitted;
        }

        self.last_message.text = raw.to_string();
        self.last_message.arrived = true;

        let fields = protocol::split(raw, DELIMITER);
        let tag_field = fields.first().copied().unwrap_or_default();

        match Tag::parse(tag_field) {
            Tag::Joystick => self.decode_widget(WidgetKind::Joystick, raw, &fields),
            Tag::ColorPicker => self.decode_widget(WidgetKind::ColorPicker, raw, &fields),
            Tag::ButtonArray => self.decode_widget(WidgetKind::ButtonArray, raw, &fields),
            Tag::Slider => self.decode_widget(WidgetKind::Slider, raw, &fields),
            Tag::Cms => match fields.get(1) {
                Some(value) => {
                    debug!("Channel {}, message is {}, echoed to client", sender, value);
                    let sent = self
                        .commands
                        .send_to(&self.gate, sender, protocol::sms_frame(value));
                    FrameOutcome::Echo { sent }
                },
                None => {
                    debug!("Dropping cms frame without a value");
                    FrameOutcome::MissingField(Tag::Cms)
                },
            },
            Tag::Serial => self.handle_serial(sender, raw, &fields),
            Tag::Unknown => {
                trace!("Dropping frame with unknown tag {:?}", tag_field);
                FrameOutcome::UnknownTag
            },
        }
    }

    fn decode_widget(&mut self, kind: WidgetKind, raw: &str, fields: &[&str]) -> FrameOutcome {
        match self.widgets.decoder_mut(kind).update_data(fields) {
            Ok(()) => {
                trace!("{} sample updated: {:?}", kind, self.widgets.sample(kind));
                FrameOutcome::Widget(kind)
            },
            Err(e) => {
                debug!("Discarding frame {:?}: {}", raw, e);
                FrameOutcome::Rejected(e)
            },
        }
    }

    fn handle_serial(&mut self, sender: PeerId, raw: &str, fields: &[&str]) -> FrameOutcome {
        let Some(first) = fields.get(1) else {
            debug!("Dropping serial frame without a command");
            return FrameOutcome::MissingField(Tag::Serial);
        };

        if *first == INIT_REQUEST {
            let greeting = protocol::greeting(&self.address.current_address());
            debug!("Handshake requested by {}, replying {:?}", sender, greeting);
            let sent = self
                .commands
                .send_to(&self.gate, sender, protocol::monitor_frame(&greeting));
            return FrameOutcome::Greeting { sent };
        }

        // A second field exists, so the frame has at least one delimiter
        let command = protocol::after_tag(raw, DELIMITER).unwrap_or_default();
        debug!("Incoming command: {:?}", command);
        self.commands.set_pending(command);
        FrameOutcome::CommandStored
    }
}
