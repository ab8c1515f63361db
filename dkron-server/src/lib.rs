pub mod cluster;
pub mod server;
pub mod shutdown;
