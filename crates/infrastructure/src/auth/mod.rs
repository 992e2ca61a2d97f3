//! Authentication adapters.

mod http_refresher;

pub use http_refresher::{HttpTokenRefresher, REFRESH_PATH};
