//! GET /api/v1/agents - the routing configuration in use.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use devdesk_types::agent::RoutingConfig;

use crate::http::response::{ApiResponse, request_id};
use crate::state::AppState;

pub async fn get_agents(State(state): State<AppState>) -> Json<ApiResponse<RoutingConfig>> {
    let start = Instant::now();
    let routing = state.chat.routing().clone();
    let elapsed = start.elapsed().as_millis() as u64;
    Json(ApiResponse::success(routing, request_id(), elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::echo_state;

    #[tokio::test]
    async fn test_returns_default_graph() {
        let Json(resp) = get_agents(State(echo_state())).await;
        let routing = resp.data.unwrap();
        assert_eq!(routing.entry_agent, "Web Development Agent");
        assert_eq!(routing.agents.len(), 3);
    }
}
