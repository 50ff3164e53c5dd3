mod handlers;
mod routes;

pub use routes::schedule_config_routes;
