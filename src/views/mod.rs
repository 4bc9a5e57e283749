//! View-composition engine
//!
//! Paginated, joined, projected read models. Each feed is a single SQL
//! statement: the join happens in the store, never as per-row follow-up
//! queries. Sorting always precedes LIMIT/OFFSET so page boundaries are
//! stable under concurrent inserts.

pub mod feeds;
pub mod types;

pub use types::{
    ChannelProfile, ChannelStats, ChannelSummary, CommentView, OwnerSummary, PlaylistView,
    VideoView,
};
