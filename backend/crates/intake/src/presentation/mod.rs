//! Presentation Layer
//!
//! Multipart extraction, HTTP handlers and DTOs for the API.

pub mod dto;
pub mod handlers;
pub mod multipart;
pub mod router;
