//! GitLab API model types.

mod status_check;

pub use status_check::*;
