//! HTTP request handlers for the WPS service.

pub mod health;
pub mod jobs;
pub mod wps;
