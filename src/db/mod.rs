pub mod comments;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod toggle;
pub mod tweets;
pub mod users;
pub mod videos;
