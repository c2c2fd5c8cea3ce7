mod http_gateway;
mod token_refresher;

pub use http_gateway::HttpGateway;
pub use token_refresher::RefreshHandle;
