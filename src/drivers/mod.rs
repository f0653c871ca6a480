//! Hardware access backends.

pub mod dev_port;
