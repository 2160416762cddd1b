//! Wire protocol - comma-tagged text frames
//!
//! Every frame is UTF-8 text whose fields are separated by a literal comma.
//! The first field is the tag that selects the handler:
//!
//! ```text
//! joystick,0.5,-0.3      → joystick sample
//! cms,42                 → reply "sms,42"
//! serial,initrequest     → greeting reply
//! serial,movemotor       → pending command "movemotor"
//! ```

mod tag;

pub use tag::Tag;

/// Field delimiter used by both directions of the link
pub const DELIMITER: &str = ",";

/// Tag prefixed to host print lines
pub const MONITOR_TAG: &str = "monitor";

/// Tag of the `cms` echo reply
pub const SMS_TAG: &str = "sms";

/// Second field of a `serial` frame that requests the greeting
pub const INIT_REQUEST: &str = "initrequest";

/// Split a frame into its fields
///
/// Splits left-to-right on every non-overlapping occurrence of `delimiter`.
/// The remainder after the last occurrence is always pushed, so a frame with
/// `k` delimiters yields exactly `k + 1` fields (some possibly empty).
/// An empty delimiter never matches and yields the whole frame.
pub fn split<'a>(frame: &'a str, delimiter: &str) -> Vec<&'a str> {
    if delimiter.is_empty() {
        return vec![frame];
    }
    frame.split(delimiter).collect()
}

/// Everything after the first delimiter, or `None` if the frame has none
pub fn after_tag<'a>(frame: &'a str, delimiter: &str) -> Option<&'a str> {
    if delimiter.is_empty() {
        return None;
    }
    frame.split_once(delimiter).map(|(_, rest)| rest)
}

/// Build the reply to a `cms` frame
pub fn sms_frame(value: &str) -> String {
    format!("{}{}{}", SMS_TAG, DELIMITER, value)
}

/// Build a host print line
pub fn monitor_frame(text: &str) -> String {
    format!("{}{}{}", MONITOR_TAG, DELIMITER, text)
}

/// Free-text greeting sent in answer to `serial,initrequest`
pub fn greeting(address: &str) -> String {
    format!("Connected to Server {}", address)
}
