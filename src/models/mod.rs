pub mod entry;
pub mod feed;
