//! Boundary to the session backend

mod client;
mod error;
mod http;
pub mod mock;

pub use client::{SessionApi, UploadFile};
pub use error::ApiError;
pub use http::HttpApi;
