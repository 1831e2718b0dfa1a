//! The librespeed-cli speed test executable.

pub mod client;
pub mod requests;
