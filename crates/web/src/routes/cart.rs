//! Cart and checkout route handlers.
//!
//! Cart mutation is link-driven: `addproduct` and `checkout` are GETs
//! that act and redirect, matching the markup on the catalog pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use hallowmart_core::model::Cart;
use hallowmart_core::rpc::UserView;

use crate::error::{AppError, Result};
use crate::routes::current_user;
use crate::state::AppState;

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    /// The signed-in user, if any.
    pub me: Option<UserView>,
    /// Id of the cart's owner, used to build the checkout link.
    pub user_id: String,
    /// The cart contents.
    pub cart: Cart,
}

/// Display a user's cart.
///
/// # Route
///
/// `GET /cart/u/{id}`
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<CartTemplate> {
    let me = current_user(&state, &session).await?;

    let response = state.backend().get_cart(&id).await?;
    let Some(cart) = response.cart else {
        return Err(AppError::NotFound(format!("no such user: {id}")));
    };

    Ok(CartTemplate {
        me,
        user_id: id,
        cart,
    })
}

/// Add one unit of a product to the signed-in user's cart.
///
/// # Route
///
/// `GET /addproduct/{id}/{pid}`
#[instrument(skip(state, session))]
pub async fn add_product(
    State(state): State<AppState>,
    session: Session,
    Path((id, product_id)): Path<(String, String)>,
) -> Result<Redirect> {
    require_owner(&state, &session, &id).await?;

    let response = state
        .backend()
        .add_product_to_cart(&id, &product_id, 1)
        .await?;
    if !response.success {
        return Err(AppError::NotFound(format!("no such product: {product_id}")));
    }

    Ok(Redirect::to("/"))
}

/// Turn the signed-in user's cart into a purchase.
///
/// # Route
///
/// `GET /checkout/u/{id}`
#[instrument(skip(state, session))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    require_owner(&state, &session, &id).await?;

    let response = state.backend().checkout(&id).await?;
    if !response.success {
        return Err(AppError::NotFound(format!("no such user: {id}")));
    }

    Ok(Redirect::to(&format!("/u/{id}")))
}

/// Require that the visitor is signed in as the user named in the path.
async fn require_owner(state: &AppState, session: &Session, id: &str) -> Result<()> {
    let Some(me) = current_user(state, session).await? else {
        return Err(AppError::Unauthorized("sign in first".to_owned()));
    };
    if me.id != id {
        return Err(AppError::Unauthorized(
            "cannot act on another user's cart".to_owned(),
        ));
    }
    Ok(())
}
