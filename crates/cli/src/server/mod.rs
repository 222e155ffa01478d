mod web;

pub use web::start_http_server;
