//! Web server for the Team Lument site
//!
//! Serves the landing page and the `/api/members` roster endpoint it reads from.

mod api;
mod pages;
mod server;

pub use server::{start_web_server, WebServerConfig};
