pub mod doh;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use doh::{http_to_message, message_to_http_response, DohResponse, DNS_MESSAGE_CONTENT_TYPE};
pub use errors::ApiError;
pub use routes::create_api_routes;
pub use state::AppState;
