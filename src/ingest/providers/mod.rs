pub mod json_feed;

pub use json_feed::JsonFeedProvider;
