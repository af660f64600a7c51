//! Unit tests across module seams.
//!
//! - `save_client_tests`: HTTP client against a wiremock server
//! - `server_tests`: the axum router driven with `tower::ServiceExt`
//! - `panel_runtime_tests`: panel updates executed through `Services`

mod panel_runtime_tests;
mod save_client_tests;
mod server_tests;
