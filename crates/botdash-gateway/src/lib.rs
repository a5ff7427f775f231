pub mod client;
pub mod handle;

pub use client::ChatClient;
pub use handle::GatewayHandle;
