use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use distrag_core::{Engine, Response, ResponseKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
struct ChatRequest {
    query: Option<String>,
}

#[derive(Serialize)]
struct ChatResponse {
    response: Response,
}

#[derive(Serialize)]
struct HealthInfo {
    status: &'static str,
    records: usize,
    model: String,
    dim: usize,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(engine: Arc<Engine>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .configure(configure(engine.clone()))
        })
        .bind(("127.0.0.1", port))?
        .run()
        .await
    }
}

/// Register the routes; shared by the server and the handler tests
pub fn configure(engine: Arc<Engine>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(engine))
            .route("/chat", web::post().to(chat))
            .route("/health", web::get().to(health));
    }
}

async fn health(engine: web::Data<Arc<Engine>>) -> ActixResult<HttpResponse> {
    let embedder = engine.retriever().embedder();
    Ok(HttpResponse::Ok().json(HealthInfo {
        status: "ok",
        records: engine.store().len(),
        model: embedder.model_name().to_string(),
        dim: embedder.dim(),
    }))
}

async fn chat(
    engine: web::Data<Arc<Engine>>,
    req: web::Json<ChatRequest>,
) -> ActixResult<HttpResponse> {
    let request_id = uuid::Uuid::new_v4();
    let query = req.into_inner().query.unwrap_or_default();
    tracing::debug!(%request_id, "Processing query: {}", query);

    let engine = engine.get_ref().clone();
    // Embedding may block on a model server.
    let response = match web::block(move || engine.handle_query(&query)).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(%request_id, "Query worker failed: {}", e);
            Response::failure()
        }
    };

    let mut builder = match response.kind {
        ResponseKind::Invalid | ResponseKind::Rejected => HttpResponse::BadRequest(),
        ResponseKind::Error => HttpResponse::InternalServerError(),
        _ => HttpResponse::Ok(),
    };
    tracing::debug!(%request_id, "Responding with {:?}", response.kind);
    Ok(builder.json(ChatResponse { response }))
}
