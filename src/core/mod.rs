pub mod allocator;
pub mod cost;
pub mod etl;
pub mod pipeline;
pub mod preference;
pub mod reducer;
pub mod report;
pub mod slots;
pub mod solver;
pub mod table;

pub use crate::domain::model::{AllocationReport, Participant, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
