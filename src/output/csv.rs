use super::Formatter;
use crate::session::ChannelReport;

/// One row per episode; channels without episodes get a single row with
/// empty episode columns.
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, report: &ChannelReport) -> String {
        let Some(result) = &report.result else {
            return format!("{},,,,", report.channel);
        };

        let fraction = format!("{:.4}", result.apnea_fraction());
        if result.episodes().is_empty() {
            return format!("{},{},,,", report.channel, fraction);
        }

        result
            .episodes()
            .iter()
            .enumerate()
            .map(|(k, e)| format!("{},{},{},{},{}", report.channel, fraction, k + 1, e.start, e.end))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn header(&self) -> Option<&'static str> {
        Some("channel,apnea_fraction,interval,start,end")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::{failed_report, sample_report};

    #[test]
    fn test_csv_rows() {
        let csv = CsvFormatter.format(&sample_report());
        assert_eq!(csv, "MLII,0.7500,1,0,120\nMLII,0.7500,2,180,180");
        assert_eq!(CsvFormatter.format(&failed_report()), "V5,,,,");
    }
}
