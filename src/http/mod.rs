//! HTTP protocol layer module
//!
//! Protocol helpers shared by the static file handler and the middleware
//! stages, decoupled from path resolution.

pub mod date;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_301_response, build_304_response, build_400_response, build_403_response,
    build_404_response, build_405_response, build_500_response, build_options_response, Body,
};
