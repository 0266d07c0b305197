//! Inbound transports.

pub mod gateway;
