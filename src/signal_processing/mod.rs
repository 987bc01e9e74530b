pub mod highpass;
pub mod hilbert;
pub mod intervals;
pub mod math;
pub mod mean_filter;
pub mod median_filter;
pub mod moving_average;
pub mod resample;

pub use highpass::HighPassFilter;
pub use hilbert::{HilbertOutput, HilbertTransformer};
pub use intervals::IntervalExtractor;
pub use math::{Normalizer, series_stats};
pub use mean_filter::MeanFilter;
pub use median_filter::MedianFilter;
pub use moving_average::{LowPassFilter, MovingAverage};
pub use resample::Resampler;
