//! Member profile domain module.

mod model;
mod repository;

pub use model::{Profile, ProfileRow, ProfileStats, ProfileStatsRow};
pub use repository::ProfileRepository;
