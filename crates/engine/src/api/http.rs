//! HTTP routes.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use tavern_domain::{CampaignSummary, Character, Game, ItemRule, MonsterRule};

use crate::app::App;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/games/{id}", get(get_game))
        .route(
            "/api/games/{id}/players/{player_id}/character",
            get(get_character),
        )
        .route("/api/campaigns", get(list_campaigns))
        .route("/api/campaigns/{id}/dialogues", get(list_campaign_dialogues))
        .route("/api/rules/monsters", get(list_monster_rules))
        .route("/api/rules/items", get(list_item_rules))
}

async fn health() -> &'static str {
    "OK"
}

async fn get_game(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<Game>, ApiError> {
    let game = app
        .use_cases
        .session
        .game_state(&id)
        .ok_or(ApiError::NotFound)?;
    Ok(Json(game))
}

async fn get_character(
    State(app): State<Arc<App>>,
    Path((id, player_id)): Path<(String, String)>,
) -> Result<Json<Character>, ApiError> {
    let character = app
        .use_cases
        .characters
        .export(&id, &player_id)
        .ok_or(ApiError::NotFound)?;
    Ok(Json(character))
}

// =============================================================================
// Content
// =============================================================================

async fn list_campaigns(State(app): State<Arc<App>>) -> Json<Vec<CampaignSummary>> {
    Json(app.use_cases.campaigns.list())
}

async fn list_campaign_dialogues(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    if app.content.campaign(&id).is_none() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(app.content.dialogues_for_campaign(&id)))
}

async fn list_monster_rules(State(app): State<Arc<App>>) -> Json<BTreeMap<String, MonsterRule>> {
    Json(app.content.rules().monsters.clone())
}

async fn list_item_rules(State(app): State<Arc<App>>) -> Json<BTreeMap<String, ItemRule>> {
    Json(app.content.rules().items.clone())
}

/// Errors returned by the HTTP routes.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => {
                (axum::http::StatusCode::NOT_FOUND, "Not found").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{app_with, sample_content};
    use crate::infrastructure::clock::FixedRandom;
    use crate::use_cases::NewCharacter;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
    };
    use tower::ServiceExt;

    fn router() -> (Arc<App>, Router) {
        let app = app_with(sample_content(), Arc::new(FixedRandom(6)));
        (app.clone(), routes().with_state(app))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = HttpRequest::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (_, router) = router();
        let request = HttpRequest::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn game_snapshot_or_not_found() {
        let (app, router) = router();
        app.use_cases.session.join("g1", "p1", "Rowan");

        let (status, json) = get_json(router.clone(), "/api/games/g1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["players"][0]["name"], "Rowan");
        assert_eq!(json["log"][0], "Rowan joined the game");

        let (status, _) = get_json(router, "/api/games/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!app.registry.contains("nowhere"));
    }

    #[tokio::test]
    async fn character_export() {
        let (app, router) = router();
        app.use_cases.session.join("g1", "p1", "Rowan");

        let (status, _) = get_json(router.clone(), "/api/games/g1/players/p1/character").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        app.use_cases
            .characters
            .create(
                "g1",
                "p1",
                NewCharacter {
                    name: "Rowan".into(),
                    race: "human".into(),
                    class: "fighter".into(),
                    ..NewCharacter::default()
                },
            )
            .unwrap();

        let (status, json) = get_json(router, "/api/games/g1/players/p1/character").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["hitPoints"], 6);
        assert_eq!(json["class"], "fighter");
    }

    #[tokio::test]
    async fn content_listings() {
        let (_, router) = router();

        let (_, campaigns) = get_json(router.clone(), "/api/campaigns").await;
        assert_eq!(campaigns[0]["id"], "keep");

        let (_, dialogues) = get_json(router.clone(), "/api/campaigns/keep/dialogues").await;
        assert_eq!(dialogues, serde_json::json!(["innkeeper"]));

        let (status, _) = get_json(router.clone(), "/api/campaigns/tomb/dialogues").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, monsters) = get_json(router.clone(), "/api/rules/monsters").await;
        assert_eq!(monsters["orc"]["armorClass"], 13);

        let (_, items) = get_json(router, "/api/rules/items").await;
        assert_eq!(items["potion"]["name"], "Potion of Healing");
    }
}
