use crate::{
    doh::{http_to_message, message_to_http_response, DohResponse},
    errors::ApiError,
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, Method},
};
use std::collections::HashMap;
use tracing::{debug, instrument};

#[instrument(skip_all, name = "api_dns_query", fields(method = %method))]
pub async fn dns_query(
    State(state): State<AppState>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<DohResponse, ApiError> {
    let request = http_to_message(&method, &params, &headers, &body)?;

    if let Some(question) = request.first_question() {
        debug!(
            id = request.header.id,
            qname = %question.qname,
            qtype = %question.record_type(),
            "DoH query received"
        );
    }

    let response = state.handle_query.execute(&request).await?;
    Ok(message_to_http_response(&response)?)
}
