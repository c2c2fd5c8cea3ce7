mod fault;
mod memory_gateway;

pub use fault::{FaultOp, GatewayCall};
pub use memory_gateway::MemoryGateway;
