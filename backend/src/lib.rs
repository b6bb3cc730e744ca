//! Syndica backend: subscription plan purchase and account provisioning.
//!
//! Laid out hexagonally: `domain` holds entities, the signup use-case, and
//! its ports; `inbound::http` adapts Actix Web onto the use-case;
//! `outbound` implements the ports over PostgreSQL and the mail gateway;
//! `server` wires everything together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;
