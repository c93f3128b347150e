pub mod middleware;
pub mod router;
pub mod services;

pub use router::{HostClass, HostGuard, classify_host};
