pub mod errors;
pub mod gateway;
pub mod observability;
pub mod routes;
pub mod rpc;
pub mod startup;

pub use routes::AppState;
pub use startup::run;
