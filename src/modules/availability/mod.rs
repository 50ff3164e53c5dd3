mod handlers;
mod routes;

pub use routes::availability_routes;
