//! Community feed domain module.

mod model;
mod repository;

pub use model::{
    AuthorRef, AuthorRow, Post, PostRow, PostStats, PostStatsRow, Reply, ReplyRow, RowId,
    UNKNOWN_AUTHOR, count_or_zero, validate_row, validate_rows,
};
pub use repository::CommunityRepository;
