pub mod example;
pub mod routes;

pub use example::ExampleValue;
pub use routes::{CompiledRoutes, HttpMethod, RouteRecord, RouteTable};
