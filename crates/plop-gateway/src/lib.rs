//! HTTP surface of the bot: webhook callback, liveness probes, and the
//! reminder trigger endpoints.

mod gateway_router;

pub use gateway_router::{build_router, run_server, AppState};
