pub mod config;
pub mod connection;
pub mod exception;
pub mod http;
pub mod param;
pub mod request;
pub mod response;

pub use config::Config;
pub use connection::{Connection, TcpConnection};
pub use exception::Exception;
pub use http::{Http, RequestHandler};
pub use request::{Request, RequestParser};
pub use response::Response;
