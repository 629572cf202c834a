use crate::cli::Args;
use crate::error::ChatError;
use crate::models::api::{
    CidQuery,
    ConversationStateResponse,
    ErrorResponse,
    HealthResponse,
    MessageRequest,
    MessageResponse,
    MessagesResponse,
    NewConversationResponse,
    SendResponse,
    StatusResponse,
};
use crate::models::chat::{ ChatRecord, Sender };
use crate::models::conversation::ConversationState;
use crate::server::page;
use crate::store::{ ConversationStore, SharedConversation };
use crate::wizard::{ Flow, Outcome, WizardRecord, ALREADY_COMPLETE_MESSAGE };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ rejection::JsonRejection, Path, Query, State },
    response::{ Html, IntoResponse, Response },
    http::StatusCode,
};
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn, debug };

const MAIN_FLOW: &str = "main";
const CHAT_GREETING: &str = "Send a message to start chatting.";

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ConversationStore>,
    args: Args,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match &self {
            ChatError::UnknownConversation(id) => {
                warn!("Rejected request for unknown conversation '{}'", id);
                StatusCode::BAD_REQUEST
            }
            ChatError::UnsupportedOperation { .. }
            | ChatError::UnknownFlow(_)
            | ChatError::InvalidBody(_) => {
                warn!("Rejected request: {}", self);
                StatusCode::BAD_REQUEST
            }
            ChatError::UnsupportedStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

pub fn router(store: Arc<dyn ConversationStore>, args: Args) -> Router {
    let app_state = AppState { store, args };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/new/{flow}", get(new_conversation_handler))
        .route("/new_reset_confirm", get(new_reset_confirm_handler))
        .route("/new_reset_parameters", get(new_reset_parameters_handler))
        .route("/chat", get(chat_page_handler))
        .route("/start", get(start_handler))
        .route("/messages/{id}", get(messages_handler))
        .route("/send", post(send_handler))
        .route("/reply", post(reply_handler))
        .route("/conversation/{id}", get(conversation_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(app_state)
}

pub async fn start_http_server(
    store: Arc<dyn ConversationStore>,
    args: Args,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = args.server_addr.parse::<SocketAddr>()?;
    let tls_paths = args
        .tls_paths()
        .map(|(cert, key)| (cert.to_string(), key.to_string()));
    if args.enable_tls && tls_paths.is_none() {
        return Err("--enable-tls requires both --tls-cert-path and --tls-key-path".into());
    }

    let app = router(store, args);

    if let Some((cert_path, key_path)) = tls_paths {
        info!(
            "TLS enabled. Loading certificate from '{}' and key from '{}'",
            cert_path,
            key_path
        );
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("HTTPS server listening on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e|
            format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e)
        )?;
        info!("HTTP server listening on: http://{}", addr);
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

async fn lookup(state: &AppState, cid: Option<&str>) -> Result<SharedConversation, ChatError> {
    match cid {
        Some(cid) if !cid.is_empty() => state.store.get(cid).await,
        _ => Err(ChatError::UnknownConversation(String::new())),
    }
}

async fn create_wizard(state: &AppState, flow: Flow) -> Result<Json<NewConversationResponse>, ChatError> {
    let conversation_id = state.store.create(ConversationState::Wizard(WizardRecord::new(flow))).await?;
    Ok(Json(NewConversationResponse { conversation_id }))
}

async fn new_conversation_handler(
    State(state): State<AppState>,
    Path(flow): Path<String>,
) -> Result<Json<NewConversationResponse>, ChatError> {
    if flow == MAIN_FLOW {
        let conversation_id = state.store
            .create_fixed(
                &state.args.main_conversation_id,
                ConversationState::Chat(ChatRecord::default())
            ).await?;
        return Ok(Json(NewConversationResponse { conversation_id }));
    }

    create_wizard(&state, flow.parse()?).await
}

async fn new_reset_confirm_handler(
    State(state): State<AppState>,
) -> Result<Json<NewConversationResponse>, ChatError> {
    create_wizard(&state, Flow::ResetConfirm).await
}

async fn new_reset_parameters_handler(
    State(state): State<AppState>,
) -> Result<Json<NewConversationResponse>, ChatError> {
    create_wizard(&state, Flow::ResetParameters).await
}

async fn chat_page_handler(
    State(state): State<AppState>,
    Query(query): Query<CidQuery>,
) -> Result<Html<String>, ChatError> {
    let shared = lookup(&state, query.cid.as_deref()).await?;
    let conversation = shared.lock().await;
    Ok(Html(page::render(&conversation, &state.args)))
}

async fn start_handler(
    State(state): State<AppState>,
    Query(query): Query<CidQuery>,
) -> Result<Json<MessageResponse>, ChatError> {
    let shared = lookup(&state, query.cid.as_deref()).await?;
    let conversation = shared.lock().await;
    let message = match &conversation.state {
        ConversationState::Wizard(record) => record.next_question().to_string(),
        ConversationState::Chat(record) =>
            record
                .last_from(Sender::Bot)
                .map_or_else(|| CHAT_GREETING.to_string(), |m| m.text.clone()),
    };
    Ok(Json(MessageResponse { message }))
}

async fn messages_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessagesResponse>, ChatError> {
    let shared = lookup(&state, Some(id.as_str())).await?;
    let conversation = shared.lock().await;
    let messages = conversation.chat()?.messages.clone();
    Ok(Json(MessagesResponse { messages }))
}

async fn send_handler(
    State(state): State<AppState>,
    Query(query): Query<CidQuery>,
    body: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Response, ChatError> {
    let shared = lookup(&state, query.cid.as_deref()).await?;
    let Json(request) = body.map_err(|e| ChatError::InvalidBody(e.body_text()))?;

    let mut conversation = shared.lock().await;
    let response = match &mut conversation.state {
        ConversationState::Chat(record) => {
            record.push(Sender::User, request.message);
            Json(StatusResponse { status: "Message received" }).into_response()
        }
        ConversationState::Wizard(record) => {
            let outcome = record.answer(&request.message);
            debug!("Wizard {} step {}/{}: {:?}", record.flow(), record.index(), record.steps().len(), outcome);
            let message = match outcome {
                Outcome::AlreadyComplete => ALREADY_COMPLETE_MESSAGE,
                Outcome::Advanced | Outcome::Completed => record.next_question(),
            };
            Json(SendResponse {
                message: message.to_string(),
                finished: record.is_finished(),
            }).into_response()
        }
    };
    conversation.touch();

    Ok(response)
}

async fn reply_handler(
    State(state): State<AppState>,
    Query(query): Query<CidQuery>,
    body: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ChatError> {
    let shared = lookup(&state, query.cid.as_deref()).await?;
    let Json(request) = body.map_err(|e| ChatError::InvalidBody(e.body_text()))?;

    let mut conversation = shared.lock().await;
    conversation.chat_mut()?.push(Sender::Bot, request.message);
    conversation.touch();

    Ok(Json(StatusResponse { status: "Bot reply added" }))
}

async fn conversation_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationStateResponse>, ChatError> {
    let shared = lookup(&state, Some(id.as_str())).await?;
    let conversation = shared.lock().await;
    let record = conversation.wizard()?;
    Ok(Json(ConversationStateResponse {
        finished: record.is_finished(),
        responses: record.responses().clone(),
    }))
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        conversations: state.store.len().await,
    })
}
