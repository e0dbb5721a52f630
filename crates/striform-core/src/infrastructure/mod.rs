//! Concrete adapters for the outbound ports

pub mod http;
