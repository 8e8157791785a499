pub mod reconstruct;
pub mod summary;
pub mod timeline;
