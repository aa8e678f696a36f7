// LLM abstraction layer

pub mod gateway;
pub mod provider;

pub use gateway::GatewayAdapter;
pub use provider::*;
