//! Agent backend adapters

pub mod agent_api;

pub use agent_api::AgentApiBackend;
