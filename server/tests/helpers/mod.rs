//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for sending requests through the full axum router, plus
//! factories for lecturers, programs and users with a given role.
//!
//! ## Cleanup Guards
//!
//! Use [`CleanupGuard`] for RAII-based cleanup that runs even if a test panics.
//!
//! Requires the test database from `Config::default_for_test`.
#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tower::ServiceExt;
use uuid::Uuid;
use studyplan_server::api::{create_router, AppState};
use studyplan_server::auth::{hash_password, jwt};
use studyplan_server::config::Config;
use studyplan_server::db;
use studyplan_server::permissions::Role;

/// Shared config across all tests in the same binary.
static SHARED_CONFIG: OnceCell<Config> = OnceCell::const_new();

/// Get or create a shared config.
pub async fn shared_config() -> &'static Config {
    SHARED_CONFIG
        .get_or_init(|| async { Config::default_for_test() })
        .await
}

// ============================================================================
// Cleanup Guard
// ============================================================================

/// Async cleanup action type.
type CleanupAction = Box<dyn FnOnce(PgPool) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

/// RAII guard that runs cleanup actions on drop, even if the test panics.
///
/// Actions run in registration order, so register dependents (users, modules)
/// before the rows they reference (lecturers, programs).
pub struct CleanupGuard {
    pool: PgPool,
    actions: Vec<CleanupAction>,
}

impl CleanupGuard {
    /// Create a new cleanup guard for the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            actions: Vec::new(),
        }
    }

    /// Register a generic async cleanup action.
    pub fn add<F, Fut>(&mut self, action: F)
    where
        F: FnOnce(PgPool) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.actions
            .push(Box::new(move |pool| Box::pin(action(pool))));
    }

    /// Register cleanup to delete a row of `table` by its `id` column.
    pub fn delete_row(&mut self, table: &'static str, id: Uuid) {
        self.add(move |pool| async move {
            let _ = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
                .bind(id)
                .execute(&pool)
                .await;
        });
    }

    pub fn delete_user(&mut self, user_id: Uuid) {
        self.delete_row("users", user_id);
    }

    pub fn delete_lecturer(&mut self, lecturer_id: Uuid) {
        self.delete_row("lecturers", lecturer_id);
    }

    pub fn delete_program(&mut self, program_id: Uuid) {
        self.delete_row("study_programs", program_id);
    }

    /// Register cleanup to delete a module (cascades to offerings and links).
    pub fn delete_module(&mut self, module_code: impl Into<String>) {
        let module_code = module_code.into();
        self.add(move |pool| async move {
            let _ = sqlx::query("DELETE FROM modules WHERE module_code = $1")
                .bind(module_code)
                .execute(&pool)
                .await;
        });
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let actions = std::mem::take(&mut self.actions);
        if actions.is_empty() {
            return;
        }

        let pool = self.pool.clone();
        let handle = tokio::runtime::Handle::current();

        // Spawn a blocking thread to run async cleanup.
        // This works regardless of tokio runtime flavor.
        std::thread::spawn(move || {
            handle.block_on(async move {
                for action in actions {
                    action(pool.clone()).await;
                }
            });
        })
        .join()
        .expect("Cleanup thread panicked");
    }
}

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// Send an authenticated request with an optional JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let builder = Self::request(method, uri).header("Authorization", format!("Bearer {token}"));
        let req = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.oneshot(req).await
    }

    /// Create a [`CleanupGuard`] for this app's pool.
    pub fn cleanup_guard(&self) -> CleanupGuard {
        CleanupGuard::new(self.pool.clone())
    }
}

/// Build a [`TestApp`] with a fresh pool for one test.
///
/// Migrations are applied on every call; `sqlx::migrate!` skips applied ones.
pub async fn fresh_test_app() -> TestApp {
    let config = shared_config().await.clone();
    let pool = db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to test DB");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let state = AppState::new(pool.clone(), config.clone());
    let router = create_router(state);

    TestApp {
        router,
        pool,
        config: Arc::new(config),
    }
}

// ============================================================================
// Data helpers
// ============================================================================

/// A short random suffix for names that must not collide across tests.
pub fn unique(prefix: &str) -> String {
    format!("{prefix}_{}", &Uuid::new_v4().simple().to_string()[..8])
}

/// Create a lecturer and return its ID.
pub async fn create_lecturer(pool: &PgPool, first_name: &str, last_name: &str) -> Uuid {
    let id = Uuid::now_v7();
    sqlx::query(
        r"
        INSERT INTO lecturers (id, first_name, last_name, title, employment_type)
        VALUES ($1, $2, $3, 'Prof.', 'Full time')
        ",
    )
    .bind(id)
    .bind(first_name)
    .bind(last_name)
    .execute(pool)
    .await
    .expect("Failed to create lecturer");
    id
}

/// Create a study program and return its ID.
pub async fn create_program(
    pool: &PgPool,
    name: &str,
    acronym: &str,
    head_of_program_id: Option<Uuid>,
) -> Uuid {
    let id = Uuid::now_v7();
    sqlx::query(
        r"
        INSERT INTO study_programs (id, name, acronym, start_date, total_ects, head_of_program_id)
        VALUES ($1, $2, $3, '2024-10-01', 180, $4)
        ",
    )
    .bind(id)
    .bind(name)
    .bind(acronym)
    .bind(head_of_program_id)
    .execute(pool)
    .await
    .expect("Failed to create program");
    id
}

/// Create a module and return its code.
pub async fn create_module(pool: &PgPool, name: &str, program_id: Option<Uuid>) -> String {
    let module_code = unique("MOD").to_uppercase();
    sqlx::query(
        r"
        INSERT INTO modules (module_code, name, ects, room_type, semester, program_id)
        VALUES ($1, $2, 5, 'Lecture Hall', 1, $3)
        ",
    )
    .bind(&module_code)
    .bind(name)
    .bind(program_id)
    .execute(pool)
    .await
    .expect("Failed to create module");
    module_code
}

/// Create a user with the given role and password, returning `(user_id, email)`.
pub async fn create_user_with_password(
    pool: &PgPool,
    role: Role,
    lecturer_id: Option<Uuid>,
    password: &str,
) -> (Uuid, String) {
    let email = format!("{}@test.local", unique(role.as_str()));
    let hash = hash_password(password).expect("Failed to hash password");
    let user = db::create_user(pool, &email, &hash, role, lecturer_id)
        .await
        .expect("Failed to create test user");
    (user.id, email)
}

/// Create a user with the given role. The password is not usable for login.
pub async fn create_user_with_role(pool: &PgPool, role: Role, lecturer_id: Option<Uuid>) -> Uuid {
    let email = format!("{}@test.local", unique(role.as_str()));
    db::create_user(pool, &email, "not-a-hash", role, lecturer_id)
        .await
        .expect("Failed to create test user")
        .id
}

/// Generate an access token for the given user.
pub fn generate_access_token(config: &Config, user_id: Uuid, role: Role) -> String {
    jwt::generate_access_token(
        user_id,
        role,
        &config.jwt_private_key,
        config.jwt_access_expiry,
    )
    .expect("Failed to generate access token")
    .token
}

/// A user with the given role and a token for it. Registers the user for cleanup.
pub async fn login_as(
    app: &TestApp,
    guard: &mut CleanupGuard,
    role: Role,
    lecturer_id: Option<Uuid>,
) -> String {
    let user_id = create_user_with_role(&app.pool, role, lecturer_id).await;
    guard.delete_user(user_id);
    generate_access_token(&app.config, user_id, role)
}

/// Collect a response body and parse it as JSON.
pub async fn body_to_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        let preview = String::from_utf8_lossy(&bytes);
        panic!("Failed to parse response as JSON: {e}\nBody: {preview}")
    })
}
