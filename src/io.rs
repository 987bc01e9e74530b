//! Plain-text R-peak files.
//!
//! A file holds non-negative sample indices separated by whitespace, commas
//! or newlines. Everything after a `#` on a line is ignored.

use crate::error::{ApneaError, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Parse R-peak indices from text.
pub fn parse_rpeaks(content: &str) -> Result<Vec<u64>> {
    let mut peaks = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let data = line.split('#').next().unwrap_or("");
        for token in data
            .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
            .filter(|t| !t.is_empty())
        {
            let index = token.parse::<u64>().map_err(|_| {
                ApneaError::Parse(format!("line {}: invalid R-peak index '{}'", line_no + 1, token))
            })?;
            peaks.push(index);
        }
    }
    Ok(peaks)
}

/// Read R-peak indices from a file.
pub fn read_rpeaks(path: impl AsRef<Path>) -> Result<Vec<u64>> {
    let content = fs::read_to_string(path)?;
    parse_rpeaks(&content)
}

/// Write R-peak indices, one per line.
pub fn write_rpeaks(path: impl AsRef<Path>, peaks: &[u64]) -> Result<()> {
    let mut writer = std::io::BufWriter::new(fs::File::create(path)?);
    for peak in peaks {
        writeln!(writer, "{}", peak)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_separators() {
        let peaks = parse_rpeaks("# record 100\n12 250,480\n\n  733 ; 990 # trailing\n").unwrap();
        assert_eq!(peaks, vec![12, 250, 480, 733, 990]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_rpeaks("10\n20\nabc\n").unwrap_err();
        assert!(err.to_string().contains("line 3"));
        assert!(parse_rpeaks("-5").is_err());
    }

    #[test]
    fn test_write_then_read() {
        let path = std::env::temp_dir().join(format!("apneaclub_io_{}.txt", std::process::id()));
        write_rpeaks(&path, &[1, 2, 300]).unwrap();
        assert_eq!(read_rpeaks(&path).unwrap(), vec![1, 2, 300]);
        let _ = fs::remove_file(&path);
    }
}
