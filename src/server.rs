//! HTTP surface of the relay.

use actix_web::error::UrlencodedError;
use actix_web::http::{Method, StatusCode};
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::client::http::GENERATE_PATH;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::relay::{GenerationResult, RelayHandler};

/// Largest accepted form body. Product descriptions are far smaller; the
/// cap only bounds memory per request.
pub const MAX_FORM_BYTES: usize = 1024 * 1024;

/// Form body of a generation request.
#[derive(Debug, Deserialize)]
struct GenerateForm {
    #[serde(default)]
    prompt: Option<String>,
}

/// Relays one request. Every method reaches the handler so that the
/// method check produces the uniform JSON failure body.
async fn generate(
    req: HttpRequest,
    form: Result<web::Form<GenerateForm>, actix_web::Error>,
    relay: web::Data<RelayHandler>,
) -> HttpResponse {
    let prompt = match form {
        Ok(form) => form.into_inner().prompt,
        Err(e) if req.method() == Method::POST && is_overflow(&e) => {
            warn!("Rejected oversized form body: {e}");
            return respond(RelayError::PayloadTooLarge.into());
        }
        Err(e) => {
            tracing::debug!("Request body is not a usable form: {e}");
            None
        }
    };

    respond(relay.handle(req.method().as_str(), prompt.as_deref()).await)
}

fn is_overflow(err: &actix_web::Error) -> bool {
    matches!(
        err.as_error::<UrlencodedError>(),
        Some(UrlencodedError::Overflow { .. })
    )
}

fn respond(result: GenerationResult) -> HttpResponse {
    let status =
        StatusCode::from_u16(result.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(result)
}

/// Registers the relay route.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(GENERATE_PATH)
            .app_data(web::FormConfig::default().limit(MAX_FORM_BYTES))
            .route(web::route().to(generate)),
    );
}

/// Binds the configured address and serves until shutdown.
pub async fn run(config: RelayConfig) -> Result<()> {
    let handler = web::Data::new(RelayHandler::from_config(&config)?);

    if config.api_key.is_none() {
        warn!(
            "{} is not set; every generation request will fail until it is configured",
            crate::config::API_KEY_VAR
        );
    }
    info!(
        bind = %config.bind,
        model = %handler.model(),
        api_base = %config.api_base,
        "Starting relay server"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(handler.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(config.bind.as_str())
    .with_context(|| format!("Failed to bind {}", config.bind))?
    .run()
    .await
    .context("Relay server stopped with an error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::test_utils::ConfigurableMockProvider;
    use actix_web::test;
    use serde_json::{json, Value};

    fn app_data(mock: ConfigurableMockProvider) -> web::Data<RelayHandler> {
        web::Data::new(RelayHandler::new(
            Box::new(mock),
            Some("sk-test".to_string()),
        ))
    }

    #[actix_web::test]
    async fn post_form_returns_generated_copy() {
        let app = test::init_service(
            App::new()
                .app_data(app_data(ConfigurableMockProvider::replying(
                    "Great sound, anywhere.",
                )))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_form([("prompt", "wireless headphones")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["generatedText"], json!("Great sound, anywhere."));
        assert_eq!(body["prompt"], json!("wireless headphones"));
        assert_eq!(body["model"], json!("mock-model"));
    }

    #[actix_web::test]
    async fn get_is_method_not_allowed() {
        let mock = ConfigurableMockProvider::replying("unused");
        let calls = mock.request_handle();
        let app = test::init_service(App::new().app_data(app_data(mock)).configure(routes)).await;

        let req = test::TestRequest::get().uri("/api/generate").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "success": false, "error": "Method not allowed" }));
        assert_eq!(calls.request_count(), 0);
    }

    #[actix_web::test]
    async fn non_form_body_is_bad_request() {
        let mock = ConfigurableMockProvider::replying("unused");
        let calls = mock.request_handle();
        let app = test::init_service(App::new().app_data(app_data(mock)).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({ "prompt": "wireless headphones" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], json!("Prompt is required and cannot be empty"));
        assert_eq!(calls.request_count(), 0);
    }

    #[actix_web::test]
    async fn missing_prompt_field_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(app_data(ConfigurableMockProvider::replying("unused")))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_form([("description", "wireless headphones")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn long_prompt_is_relayed_in_full() {
        let mock = ConfigurableMockProvider::replying("Great sound, anywhere.");
        let calls = mock.request_handle();
        let app = test::init_service(App::new().app_data(app_data(mock)).configure(routes)).await;

        let prompt = "a".repeat(20_000);
        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_form([("prompt", prompt.as_str())])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["prompt"], json!(prompt));
        assert_eq!(calls.request_count(), 1);
        assert_eq!(calls.requests()[0].1.user, prompt);
    }

    #[actix_web::test]
    async fn oversized_body_is_payload_too_large() {
        let mock = ConfigurableMockProvider::replying("unused");
        let calls = mock.request_handle();
        let app = test::init_service(App::new().app_data(app_data(mock)).configure(routes)).await;

        let prompt = "a".repeat(MAX_FORM_BYTES + 1);
        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_form([("prompt", prompt.as_str())])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({ "success": false, "error": "Prompt is too large" })
        );
        assert_eq!(calls.request_count(), 0);
    }

    #[actix_web::test]
    async fn missing_credential_is_server_error() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(RelayHandler::new(
                    Box::new(ConfigurableMockProvider::replying("unused")),
                    None,
                )))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_form([("prompt", "wireless headphones")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({ "success": false, "error": "OpenAI API key not configured" })
        );
    }
}
