//! Statistics aggregation over daily, weekly and chapter buckets.

mod accumulator;
mod bucket;
pub mod metrics;
mod overview;
mod repository;

pub use accumulator::{Counters, StatsAccumulator};
pub use bucket::{BucketKey, ChapterKey, Dimension};
pub use metrics::{accuracy, average_time_minutes, round_tenths};
pub use overview::ChapterOverview;
pub use repository::{ChapterStats, DailyStats, RecordedBuckets, StatsRepository, WeeklyStats};
