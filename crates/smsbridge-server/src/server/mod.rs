pub mod app;
pub mod error;
pub mod routes;
pub mod static_files;
pub mod websocket;

pub use app::*;
pub use error::*;
pub use routes::*;
pub use static_files::*;
pub use websocket::*;
