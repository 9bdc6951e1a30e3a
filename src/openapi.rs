//! OpenAPI document served at `GET /api/docs/openapi.json`.
//!
//! Request bodies are validated from raw JSON, so their shapes are described
//! here by doc-only types. Response envelopes likewise mirror
//! [`crate::response::ApiResponse`] and [`crate::error::AppError`].

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};

use crate::auth::dto::{AuthSession, PublicUser};
use crate::todos::{
    dto::{TodoPage, TodoStats},
    repo_types::Todo,
};

#[derive(ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "user@example.com")]
    pub email: String,
    /// At least 6 characters.
    pub password: String,
    /// 2 to 50 characters.
    pub name: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct CreateTodoRequest {
    /// Non-blank, at most 200 characters.
    pub title: String,
    /// At most 1000 characters.
    pub description: Option<String>,
}

/// At least one field must be present; `description: null` clears it.
#[derive(ToSchema)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(ToSchema)]
pub struct AuthEnvelope {
    pub success: bool,
    pub message: String,
    pub data: AuthSession,
}

#[derive(ToSchema)]
pub struct TodoEnvelope {
    pub success: bool,
    pub message: Option<String>,
    pub data: Todo,
}

#[derive(ToSchema)]
pub struct TodoPageEnvelope {
    pub success: bool,
    pub data: TodoPage,
}

#[derive(ToSchema)]
pub struct TodoStatsEnvelope {
    pub success: bool,
    pub data: TodoStats,
}

#[derive(ToSchema)]
pub struct MessageEnvelope {
    pub success: bool,
    pub message: String,
}

#[derive(ToSchema)]
pub struct ErrorEnvelope {
    /// Always `false`.
    pub success: bool,
    pub message: String,
    /// Itemized violations on 400 validation failures.
    pub errors: Option<Vec<String>>,
    /// Underlying cause of a 500, outside production only.
    pub error: Option<String>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Todo API", description = "User registration, login and per-user todo management"),
    paths(
        crate::app::health,
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::todos::handlers::list_todos,
        crate::todos::handlers::create_todo,
        crate::todos::handlers::todo_stats,
        crate::todos::handlers::get_todo,
        crate::todos::handlers::update_todo,
        crate::todos::handlers::delete_todo,
    ),
    components(
        schemas(
            crate::app::Health,
            PublicUser,
            AuthSession,
            Todo,
            TodoPage,
            TodoStats,
            RegisterRequest,
            LoginRequest,
            CreateTodoRequest,
            UpdateTodoRequest,
            AuthEnvelope,
            TodoEnvelope,
            TodoPageEnvelope,
            TodoStatsEnvelope,
            MessageEnvelope,
            ErrorEnvelope,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "todos")
    )
)]
pub struct ApiDoc;
