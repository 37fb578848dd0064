//! Power telemetry analysis.
//!
//! Readings are bucketed into fixed windows, then rated against the system's
//! nameplate capacity and compared panel-by-panel against the best performer.

pub mod aggregate;
pub mod anomaly;
pub mod efficiency;
pub mod grade;
pub mod summary;
pub mod types;
pub mod utility;

pub use aggregate::{aggregate_intervals, merge_buckets};
pub use anomaly::{find_underperforming_panels, rank_panels};
pub use efficiency::analyze_efficiency;
pub use grade::Rating;
pub use summary::{daily_energy, summarize_intervals};
pub use types::{AggregateBucket, DailyEnergy, EfficiencyReport, IntervalSummary, PanelSummary};
