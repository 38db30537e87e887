//! Backend access: the HTTP transport, the controller task that owns it, and
//! the plain-data messages exchanged with the UI loop.

pub mod client;
pub mod types;
pub mod worker;
