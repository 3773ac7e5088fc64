pub mod classifier;
pub mod host;
pub mod request_builder;
pub mod session;
pub mod size_map;
pub mod transport;
