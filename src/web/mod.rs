//! Web API module for folio.
//!
//! Exposes the contact relay at `POST /api/contact` and the repository
//! stats proxy at `GET /api/github`.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
