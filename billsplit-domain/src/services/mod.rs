pub mod allocator;
pub mod assignment_resolver;
pub mod itemized_breakdown;
pub mod results_aggregator;

pub use allocator::distribute;
pub use assignment_resolver::{AssignmentResolver, Resolution, Weights};
pub use itemized_breakdown::{ItemizedBreakdownBuilder, compute_itemized_breakdown};
pub use results_aggregator::{ResultsAggregator, compute_results};
