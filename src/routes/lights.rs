use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use irmapper_api::light::{ApplyResponse, LightAction, LightView, TurnOn};

use crate::error::ApiError;
use crate::routes::RouteResult;
use crate::server::appstate::AppState;

async fn get_lights(State(state): State<AppState>) -> Json<Vec<LightView>> {
    let mut res = vec![];
    for light in state.lights() {
        res.push(light.lock().await.view());
    }
    Json(res)
}

async fn get_light(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> RouteResult<Json<LightView>> {
    let light = state.light(&id)?;
    let view = light.lock().await.view();
    Ok(Json(view))
}

async fn apply(state: &AppState, id: &str, action: LightAction) -> RouteResult<Json<ApplyResponse>> {
    let light = state.light(id)?;
    let mut lock = light.lock().await;

    log::info!("[{}] Applying {action:?}", lock.name());
    let report = lock.apply(&action).await;
    if !report.is_clean() {
        log::warn!("[{}] Action completed with issues: {report:?}", lock.name());
    }

    Ok(Json(ApplyResponse {
        state: lock.state().clone(),
        report,
    }))
}

async fn post_turn_on(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> RouteResult<Json<ApplyResponse>> {
    // a bare turn_on may come without any body at all
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        TurnOn::default()
    } else {
        serde_json::from_slice(&body).map_err(ApiError::from)?
    };
    apply(&state, &id, LightAction::TurnOn(req)).await
}

async fn post_turn_off(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> RouteResult<Json<ApplyResponse>> {
    apply(&state, &id, LightAction::TurnOff).await
}

async fn post_apply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(action): Json<LightAction>,
) -> RouteResult<Json<ApplyResponse>> {
    apply(&state, &id, action).await
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_lights))
        .route("/{id}", get(get_light))
        .route("/{id}/apply", post(post_apply))
        .route("/{id}/turn_on", post(post_turn_on))
        .route("/{id}/turn_off", post(post_turn_off))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    use irmapper_api::light::{ApplyResponse, LightView, Rgb};

    use crate::config::parse_str;
    use crate::server::appstate::AppState;
    use crate::transport::Transport;
    use crate::transport::recording::RecordingTransport;

    const CONFIG: &str = r"
lights:
  - name: Strip
    unique_id: strip
    broadlink_remote: remote.rm4
    ir_codes:
      power_on: ON_CODE
      power_off: OFF_CODE
      brightness_down: DOWN_CODE
    colors:
      - { name: white, rgb: [255, 255, 255], ir_code: C1 }
      - { name: red, rgb: [255, 0, 0], ir_code: C2 }
";

    fn app() -> (Router, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let shared: Arc<dyn Transport> = transport.clone();
        let state = AppState::new(&parse_str(CONFIG).unwrap(), &shared);
        (crate::routes::router().with_state(state), transport)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    fn decode<T: DeserializeOwned>(body: &[u8]) -> T {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn lists_lights() {
        let (app, _) = app();
        let (status, body) = call(&app, "GET", "/api/lights", "").await;

        assert_eq!(status, StatusCode::OK);
        let lights: Vec<LightView> = decode(&body);
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].id, "strip");
        assert!(!lights[0].state.is_on);
        assert!(lights[0].supported_features.brightness);
        assert!(!lights[0].supported_features.effect);
    }

    #[tokio::test]
    async fn unknown_light_is_404() {
        let (app, transport) = app();
        let (status, _) = call(&app, "GET", "/api/lights/nope", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, "POST", "/api/lights/nope/turn_off", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(transport.codes().is_empty());
    }

    #[tokio::test]
    async fn turn_on_with_color() {
        let (app, transport) = app();
        let (status, body) = call(
            &app,
            "POST",
            "/api/lights/strip/turn_on",
            r#"{"rgb_color": [200, 10, 10], "brightness": 0}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let res: ApplyResponse = decode(&body);
        assert!(res.state.is_on);
        assert_eq!(res.state.brightness, 0);
        assert_eq!(res.state.rgb_color, Rgb::new(255, 0, 0));
        assert_eq!(res.report.sent(), 12);
        assert_eq!(transport.codes().last().map(String::as_str), Some("C2"));

        let (_, body) = call(&app, "GET", "/api/lights/strip", "").await;
        let view: LightView = decode(&body);
        assert_eq!(view.state, res.state);
    }

    #[tokio::test]
    async fn turn_on_without_body() {
        let (app, transport) = app();
        let (status, _) = call(&app, "POST", "/api/lights/strip/turn_on", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(transport.codes(), ["ON_CODE"]);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let (app, transport) = app();
        let (status, _) = call(
            &app,
            "POST",
            "/api/lights/strip/turn_on",
            r#"{"brightness": 300}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(transport.codes().is_empty());
    }

    #[tokio::test]
    async fn apply_endpoint_takes_tagged_actions() {
        let (app, transport) = app();
        let (status, body) = call(
            &app,
            "POST",
            "/api/lights/strip/apply",
            r#"{"action": "turn_off"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let res: ApplyResponse = decode(&body);
        assert!(!res.state.is_on);
        assert_eq!(transport.codes(), ["OFF_CODE"]);
    }

    #[tokio::test]
    async fn unsupported_effect_shows_in_report() {
        let (app, _) = app();
        let (status, body) = call(
            &app,
            "POST",
            "/api/lights/strip/turn_on",
            r#"{"effect": "flash"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let res: ApplyResponse = decode(&body);
        assert!(!res.report.is_clean());
        assert_eq!(res.state.effect, None);
    }
}
