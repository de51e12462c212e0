//! Page server library: hierarchical content pages for an SPA client.

pub mod client;
pub mod config;
pub mod content;
pub mod export;
pub mod http;
pub mod observability;
pub mod resolver;
pub mod routing;
pub mod template;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use resolver::{PageResolver, PageResult};
pub use routing::RouteTable;
