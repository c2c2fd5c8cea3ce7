mod change_filter;
mod memory_gateway;
