//! Profile page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tower_sessions::Session;
use tracing::instrument;

use hallowmart_core::rpc::UserView;

use crate::error::{AppError, Result};
use crate::routes::current_user;
use crate::state::AppState;

/// Profile page template: a user and their purchase history.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    /// The signed-in user, if any.
    pub me: Option<UserView>,
    /// The user whose profile is shown. Profiles are public.
    pub user: UserView,
}

/// Display a user's profile and purchase history.
///
/// # Route
///
/// `GET /u/{id}`
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<ProfileTemplate> {
    let me = current_user(&state, &session).await?;

    let response = state.backend().get_user(&id).await?;
    let Some(user) = response.user else {
        return Err(AppError::NotFound(format!("no such user: {id}")));
    };

    Ok(ProfileTemplate { me, user })
}
