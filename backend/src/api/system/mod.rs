pub mod handlers;
pub mod monitor;
pub mod routes;
