//! Integration test harness.

mod mock_backend;
mod dispatch_flow;
