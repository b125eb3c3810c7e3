//! Transport layer for the Apotheca storefront client.
//!
//! Every data-bound screen talks to the backend through this crate:
//!
//! - **Request model** — [`Method`] and [`ApiRequest`] describe one network
//!   operation with a generic JSON payload.
//! - **Transport seam** — [`ApiService`] is the opaque collaborator the
//!   rest of the client is written against; [`HttpApiService`] is the
//!   `reqwest`-backed implementation.
//! - **Call wrapper** — [`RemoteCall`] adds stale-response suppression
//!   (newest invocation wins) and the optional response-shaping
//!   interceptor.
//! - **Error taxonomy** — [`ApiError`] distinguishes transport faults from
//!   user-meaningful business and validation rejections; see
//!   [`ApiError::is_external`].
//! - **Configuration** — [`ApiConfig`], TOML-persisted in the user's config
//!   directory.
//!
//! Retry, backoff and multi-request orchestration are deliberately absent:
//! requests are independent, with at most one published result per
//! call-site at a time.

mod call;
mod config;
mod error;
mod request;
mod service;

pub use call::{CallOutcome, RemoteCall, ResponseInterceptor};
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use request::{ApiRequest, Method};
pub use service::{ApiService, HttpApiService};
