use super::{Formatter, iso8601_timestamp};
use crate::session::ChannelReport;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, report: &ChannelReport) -> String {
        let value = serde_json::json!({
            "ts": iso8601_timestamp(),
            "channel": report.channel,
            "apnea_fraction": report.result.as_ref().map(|r| r.apnea_fraction()),
            "windows": report.result.as_ref().map(|r| r.window_count()),
            "episodes": report.result.as_ref().map(|r| r.episodes()),
            "error": report.error,
        });
        value.to_string()
    }
}
