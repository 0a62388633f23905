//! Request handler module
//!
//! Static file resolution plus the pipeline that decorates and logs each
//! response.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::{handle_request, RequestContext};
pub use static_files::StaticFiles;
