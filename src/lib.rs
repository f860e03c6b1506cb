pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::core::allocator::{Allocator, AllocatorOptions};
pub use crate::core::{etl::AllocationEngine, pipeline::AllocationPipeline};
pub use crate::domain::model::{
    AchievedRank, Activity, ActivityCatalog, AllocationReport, Assignment, CapacityRow,
    Participant, RankRow,
};
pub use crate::utils::error::{AllocError, Result};
