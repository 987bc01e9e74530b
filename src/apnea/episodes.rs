use super::{ApneaEpisode, DetectionResult, WindowFlag};

/// Merges consecutive apnea windows into episodes.
///
/// An episode opens at the first apnea window after a normal one and closes
/// at the next normal window's start. An episode still open after the last
/// window closes at that window's start. Bounds are truncated to whole
/// seconds.
pub struct EpisodeAggregator;

impl EpisodeAggregator {
    pub fn aggregate(flags: &[WindowFlag]) -> DetectionResult {
        if flags.is_empty() {
            return DetectionResult::empty();
        }

        let mut episodes = Vec::new();
        let mut open: Option<f64> = None;
        let mut positive = 0usize;

        for flag in flags {
            match (flag.is_apnea, open) {
                (true, None) => open = Some(flag.start_time),
                (false, Some(start)) => {
                    episodes.push(episode(start, flag.start_time));
                    open = None;
                }
                _ => {}
            }
            if flag.is_apnea {
                positive += 1;
            }
        }

        if let (Some(start), Some(last)) = (open, flags.last()) {
            episodes.push(episode(start, last.start_time));
        }

        let fraction = positive as f64 / flags.len() as f64;
        DetectionResult::new(episodes, fraction, flags.len())
    }
}

fn episode(start: f64, end: f64) -> ApneaEpisode {
    ApneaEpisode {
        start: start as u64,
        end: end as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(pattern: &[(f64, bool)]) -> Vec<WindowFlag> {
        pattern.iter().map(|&(t, a)| WindowFlag::new(t, a)).collect()
    }

    #[test]
    fn test_merges_and_closes_at_end() {
        let result = EpisodeAggregator::aggregate(&flags(&[
            (0.0, true),
            (60.0, true),
            (120.0, false),
            (180.0, true),
        ]));

        assert_eq!(
            result.episodes(),
            &[
                ApneaEpisode { start: 0, end: 120 },
                ApneaEpisode { start: 180, end: 180 },
            ]
        );
        assert_eq!(result.apnea_fraction(), 0.75);
        assert_eq!(result.window_count(), 4);
        assert_eq!(result.total_apnea_secs(), 120);
    }

    #[test]
    fn test_consecutive_normal_windows_close_once() {
        let result = EpisodeAggregator::aggregate(&flags(&[
            (0.0, false),
            (60.5, true),
            (120.9, false),
            (180.0, false),
            (240.0, false),
        ]));
        assert_eq!(result.episodes(), &[ApneaEpisode { start: 60, end: 120 }]);
        assert_eq!(result.apnea_fraction(), 0.2);
    }

    #[test]
    fn test_no_apnea() {
        let result = EpisodeAggregator::aggregate(&flags(&[(0.0, false), (60.0, false)]));
        assert!(result.episodes().is_empty());
        assert_eq!(result.apnea_fraction(), 0.0);
    }

    #[test]
    fn test_empty_flags() {
        let result = EpisodeAggregator::aggregate(&[]);
        assert!(result.is_empty());
        assert_eq!(result.apnea_fraction(), 0.0);
    }
}
