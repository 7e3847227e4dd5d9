//! API integration tests
//!
//! Each test drives the real HTTP client against an in-process fake of the
//! Biblioteca backend bound to an ephemeral port.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};

use biblioteca_admin::{
    api::{AuthGateway, HttpAuthGateway, Libros, ResourceClient},
    models::{LibroEstado, LibroForm, LoginRequest},
    notice::NoticeKind,
    services::{BorrowOutcome, IntentOutcome, SaveOutcome},
    session::{FileStorage, SessionState},
    AppConfig, AppError, AppState,
};

const EMAIL: &str = "ana@biblioteca.pe";
const PASSWORD: &str = "secreto";

#[derive(Clone)]
struct Backend {
    token: String,
    libros: Arc<Mutex<Vec<Value>>>,
    prestamos: Arc<Mutex<Vec<Value>>>,
    revoked: Arc<AtomicBool>,
    listing_down: Arc<AtomicBool>,
}

impl Backend {
    fn new() -> Self {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = encode(
            &Header::default(),
            &json!({ "sub": "7", "exp": exp }),
            &EncodingKey::from_secret(b"backend-secret"),
        )
        .unwrap();

        Self {
            token,
            libros: Arc::new(Mutex::new(vec![
                libro(1, "Cien años de soledad", "Gabriel García Márquez", "disponible"),
                libro(2, "Rayuela", "Julio Cortázar", "prestado"),
                libro(3, "Ficciones", "Jorge Luis Borges", "reservado"),
            ])),
            prestamos: Arc::new(Mutex::new(Vec::new())),
            revoked: Arc::new(AtomicBool::new(false)),
            listing_down: Arc::new(AtomicBool::new(false)),
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {}", self.token);
        !self.revoked.load(Ordering::SeqCst)
            && headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some(expected.as_str())
    }
}

fn libro(id: i64, titulo: &str, autor: &str, estado: &str) -> Value {
    json!({
        "id": id,
        "titulo": titulo,
        "autor_id": 1,
        "nombre_autor": autor,
        "genero_id": 1,
        "nombre_genero": "Novela",
        "descripcion": "Clásico latinoamericano",
        "imagen": null,
        "estado": estado
    })
}

async fn login(State(backend): State<Backend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match (body["email"].as_str(), body["password"].as_str()) {
        (Some(EMAIL), Some(PASSWORD)) => (
            StatusCode::OK,
            Json(json!({
                "access_token": backend.token,
                "token_type": "bearer",
                "user": { "id": 7, "nombre": "Ana Torres", "tipo_usuario": "personal", "email": EMAIL }
            })),
        ),
        (Some("caida@biblioteca.pe"), _) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "database unavailable" })),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Credenciales incorrectas" })),
        ),
    }
}

async fn list_libros(State(backend): State<Backend>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    if !backend.authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if backend.listing_down.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(Value::Array(backend.libros.lock().unwrap().clone())))
}

async fn create_libro(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    if !backend.authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    let mut libros = backend.libros.lock().unwrap();
    let mut created = body;
    created["id"] = json!(libros.len() as i64 + 1);
    created["nombre_autor"] = json!("");
    created["nombre_genero"] = json!("");
    libros.push(created);
    StatusCode::CREATED
}

async fn get_libro(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if !backend.authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let libros = backend.libros.lock().unwrap();
    libros
        .iter()
        .find(|l| l["id"].to_string() == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_libro(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    if !backend.authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    let mut libros = backend.libros.lock().unwrap();
    let Some(libro) = libros.iter_mut().find(|l| l["id"].to_string() == id) else {
        return StatusCode::NOT_FOUND;
    };
    if let Some(fields) = body.as_object() {
        for (key, value) in fields {
            libro[key] = value.clone();
        }
    }
    StatusCode::OK
}

async fn delete_libro(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> StatusCode {
    if !backend.authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    backend.libros.lock().unwrap().retain(|l| l["id"].to_string() != id);
    StatusCode::NO_CONTENT
}

async fn list_generos(State(backend): State<Backend>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    if !backend.authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!([{ "id": 1, "nombre": "Novela" }])))
}

async fn create_prestamo(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    if !backend.authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    backend.prestamos.lock().unwrap().push(body);
    StatusCode::CREATED
}

/// Serve the fake backend and return its base URL
async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/libros", get(list_libros).post(create_libro))
        .route("/api/libros/:id", get(get_libro).put(update_libro).delete(delete_libro))
        .route("/api/generos", get(list_generos))
        .route("/api/prestamos", post(create_prestamo))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn app_config(base: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.api.base_url = format!("{}/api", base);
    config.api.auth_base_url = format!("{}/api/auth", base);
    config.api.timeout_secs = 5;
    config
}

struct Harness {
    backend: Backend,
    config: AppConfig,
    state: AppState,
    session_file: std::path::PathBuf,
    _dir: tempfile::TempDir,
}

async fn harness() -> Harness {
    let backend = Backend::new();
    let base = spawn_backend(backend.clone()).await;
    let config = app_config(&base);
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");
    let state = AppState::new(config.clone(), Arc::new(FileStorage::new(session_file.clone()))).unwrap();
    Harness {
        backend,
        config,
        state,
        session_file,
        _dir: dir,
    }
}

async fn signed_in() -> Harness {
    let h = harness().await;
    assert_ok!(h.state.services.auth.login(EMAIL, PASSWORD).await);
    h
}

#[tokio::test]
async fn test_login_persists_session_across_restarts() {
    let h = harness().await;
    assert_eq!(h.state.session.state(), SessionState::Anonymous);

    assert_ok!(h.state.services.auth.login(EMAIL, PASSWORD).await);
    assert!(h.state.session.is_authenticated());
    assert_eq!(h.state.session.user().unwrap().id, "7");

    let restarted = AppState::new(h.config.clone(), Arc::new(FileStorage::new(h.session_file.clone()))).unwrap();
    assert!(restarted.session.is_authenticated());
    assert_eq!(restarted.session.token(), Some(h.backend.token.clone()));

    restarted.services.auth.logout();
    let again = AppState::new(h.config.clone(), Arc::new(FileStorage::new(h.session_file.clone()))).unwrap();
    assert_eq!(again.session.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn test_login_error_mapping() {
    let h = harness().await;
    let gateway = HttpAuthGateway::new(h.state.services.api.clone());

    let err = assert_err!(
        gateway
            .login(&LoginRequest { email: EMAIL.into(), password: "incorrecta".into() })
            .await
    );
    assert!(matches!(err, AppError::InvalidCredentials));

    let err = assert_err!(
        gateway
            .login(&LoginRequest { email: "caida@biblioteca.pe".into(), password: PASSWORD.into() })
            .await
    );
    assert!(matches!(err, AppError::Unexpected(_)));

    assert_eq!(h.state.session.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn test_resource_client_requires_bearer_token() {
    let h = harness().await;
    let client = ResourceClient::<Libros>::new(h.state.services.api.clone());

    let err = assert_err!(client.list().await);
    assert!(matches!(err, AppError::Authentication(_)));

    assert_ok!(h.state.services.auth.login(EMAIL, PASSWORD).await);
    let libros = assert_ok!(client.list().await);
    assert_eq!(libros.len(), 3);
    assert_eq!(libros[1].estado, LibroEstado::Prestado);

    let err = assert_err!(client.get("99").await);
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_list_page_filters_loaded_rows() {
    let h = signed_in().await;
    let mut page = h.state.services.libros();

    assert_ok!(page.load().await);
    let table = page.table_mut();
    assert_eq!(table.filtered_len(), 3);

    table.apply_filter("cien");
    assert_eq!(table.filtered_len(), 1);
    table.apply_filter("");
    table.filter_by_status("prestado");
    assert_eq!(table.filtered_len(), 1);
    table.filter_by_status("all");
    assert_eq!(table.filtered_len(), 3);
}

#[tokio::test]
async fn test_crud_round_through_list_page() {
    let h = signed_in().await;
    let mut page = h.state.services.libros();
    assert_ok!(page.load().await);

    let form = LibroForm {
        titulo: "El túnel".into(),
        autor_id: "5".into(),
        imagen: None,
        genero_id: "1".into(),
        descripcion: "Novela psicológica".into(),
        estado: LibroEstado::Disponible,
    };
    assert_eq!(assert_ok!(page.save(None, form).await), SaveOutcome::Created);
    assert_eq!(page.table().data().len(), 4);

    let mut edit = page.edit_form("2").unwrap();
    edit.estado = LibroEstado::Disponible;
    assert_eq!(assert_ok!(page.save(Some("2"), edit).await), SaveOutcome::Updated);
    assert_eq!(page.entity("2").unwrap().estado, LibroEstado::Disponible);

    // Delete and view go through the row action buttons
    page.table_mut().apply_filter("ficciones");
    assert!(page.table().invoke_action(0, 2));
    assert!(page.table().invoke_action(0, 1));
    let outcomes = page.process_intents().await;
    assert!(matches!(&outcomes[0], Ok(IntentOutcome::Viewed(view)) if view.title == "Detalles del Libro"));
    assert!(matches!(&outcomes[1], Ok(IntentOutcome::Deleted(id)) if id == "3"));
    assert!(page.entity("3").is_none());

    let kinds: Vec<NoticeKind> = page.take_notices().into_iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NoticeKind::Success; 3]);
}

#[tokio::test]
async fn test_write_succeeds_when_refresh_fails() {
    let h = signed_in().await;
    let mut page = h.state.services.libros();
    assert_ok!(page.load().await);

    h.backend.listing_down.store(true, Ordering::SeqCst);
    let form = LibroForm {
        titulo: "Sobre héroes y tumbas".into(),
        autor_id: "5".into(),
        imagen: None,
        genero_id: "1".into(),
        descripcion: "Novela".into(),
        estado: LibroEstado::Disponible,
    };
    assert_eq!(assert_ok!(page.save(None, form).await), SaveOutcome::Created);
    assert_eq!(h.backend.libros.lock().unwrap().len(), 4);
    assert!(page.table().error.is_some());

    assert_ok!(page.delete("1").await);
    assert_eq!(h.backend.libros.lock().unwrap().len(), 3);

    let kinds: Vec<NoticeKind> = page.take_notices().into_iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![NoticeKind::Success, NoticeKind::Error, NoticeKind::Success, NoticeKind::Error]
    );
    assert!(h.state.session.is_authenticated());
}

#[tokio::test]
async fn test_rejected_token_signs_out_and_keeps_rows() {
    let h = signed_in().await;
    let mut page = h.state.services.libros();
    assert_ok!(page.load().await);

    h.backend.revoked.store(true, Ordering::SeqCst);
    let err = assert_err!(page.load().await);

    assert!(err.is_session_rejected());
    assert_eq!(page.table().data().len(), 3);
    assert!(page.table().error.is_some());
    assert_eq!(h.state.session.state(), SessionState::Anonymous);
    assert_eq!(page.take_notices().len(), 1);
}

#[tokio::test]
async fn test_dashboard_borrow() {
    let h = signed_in().await;
    let mut dashboard = h.state.services.dashboard();
    assert_ok!(dashboard.load().await);
    assert_eq!(dashboard.genres().len(), 1);

    assert_eq!(assert_ok!(dashboard.borrow("2").await), BorrowOutcome::AlreadyLent);
    assert!(h.backend.prestamos.lock().unwrap().is_empty());

    assert_eq!(assert_ok!(dashboard.borrow("1").await), BorrowOutcome::Requested);
    let prestamos = h.backend.prestamos.lock().unwrap();
    assert_eq!(prestamos.len(), 1);
    assert_eq!(prestamos[0]["libro_id"], "1");
    assert_eq!(prestamos[0]["usuario_id"], "7");
    assert!(prestamos[0]["fecha_prestamo"].is_string());
}
