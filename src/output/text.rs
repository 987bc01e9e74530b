use super::Formatter;
use crate::session::ChannelReport;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &ChannelReport) -> String {
        let Some(result) = &report.result else {
            let error = report.error.as_deref().unwrap_or("no result");
            return format!("{}: {}", report.channel, error);
        };

        let mut lines = report.lines();
        if self.verbose {
            lines.push(format!(
                "{}: {} windows, {} episodes, {} s of apnea",
                report.channel,
                result.window_count(),
                result.episodes().len(),
                result.total_apnea_secs()
            ));
        }
        lines.join("\n")
    }
}
