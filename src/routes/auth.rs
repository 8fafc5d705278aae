use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    get, post, web, HttpRequest, HttpResponse, Responder,
};
use validator::Validate;

use crate::{
    auth::{
        authorize_roles, hash_password, verify_password, AuthResponse, CurrentUser, LoginRequest,
        RegisterRequest, TokenIssuer,
    },
    error::AppError,
    models::user::Role,
    store::users::UserStore,
};

/// Name of the HTTP-only cookie carrying the refresh token. The refresh
/// token never travels in a JSON body.
const REFRESH_COOKIE: &str = "refreshToken";

fn refresh_cookie(token: String, issuer: &TokenIssuer) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, token)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .max_age(CookieDuration::seconds(issuer.refresh_ttl().num_seconds()))
        .finish()
}

fn clear_refresh_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(REFRESH_COOKIE, "")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .finish();
    cookie.make_removal();
    cookie
}

/// Register a new account.
///
/// Succeeds with a message only: registration does not log the user in, and
/// new accounts always start as USER.
#[post("/register")]
pub async fn register(
    store: web::Data<UserStore>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();
    if store.email_exists(&email).await? {
        return Err(AppError::Conflict("Email already exists".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    store
        .insert(payload.name.trim(), &email, &password_hash, Role::User)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "User registered successfully"
    })))
}

/// Login with email and password.
///
/// Unknown email and wrong password produce byte-identical responses.
#[post("/login")]
pub async fn login(
    store: web::Data<UserStore>,
    issuer: web::Data<TokenIssuer>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();
    let user = match store.find_active_by_email(&email).await? {
        Some(user) => user,
        None => return Err(AppError::BadRequest("Invalid credentials".into())),
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    let user = user.into_public();
    let access_token = issuer.issue_access_token(&user)?;
    let new_refresh = issuer.issue_refresh_token(&user)?;

    // One active session per account: a new login supersedes the old one
    store.set_refresh_token(user.id, &new_refresh).await?;

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie(new_refresh, &issuer))
        .json(AuthResponse { access_token, user }))
}

/// Exchange the refresh cookie for a fresh access+refresh pair.
///
/// The presented token must verify cryptographically AND equal the value
/// currently stored on the identity. Rotation swaps in the new value
/// atomically, so the old token is single-use: presenting it again fails
/// even though its signature and expiry are still valid.
#[post("/refresh")]
pub async fn refresh(
    store: web::Data<UserStore>,
    issuer: web::Data<TokenIssuer>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let presented = match req.cookie(REFRESH_COOKIE) {
        Some(cookie) => cookie.value().to_owned(),
        None => return Err(AppError::Unauthorized("No refresh token".into())),
    };

    let claims = issuer
        .verify_refresh_token(&presented)
        .map_err(|_| AppError::Forbidden("Invalid or expired token".into()))?;

    let user = match store.find_active_by_id(claims.sub).await? {
        Some(user) => user,
        None => return Err(AppError::Forbidden("Invalid refresh token".into())),
    };

    let access_token = issuer.issue_access_token(&user)?;
    let new_refresh = issuer.issue_refresh_token(&user)?;

    if !store
        .rotate_refresh_token(user.id, &presented, &new_refresh)
        .await?
    {
        // Already rotated away (or revoked): signature validity is not
        // authority
        return Err(AppError::Forbidden("Invalid refresh token".into()));
    }

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie(new_refresh, &issuer))
        .json(AuthResponse { access_token, user }))
}

/// End the session holding the presented refresh token.
///
/// Idempotent: a missing cookie, an unknown token, and a repeat logout all
/// succeed.
#[post("/logout")]
pub async fn logout(
    store: web::Data<UserStore>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let token = match req.cookie(REFRESH_COOKIE) {
        Some(cookie) => cookie.value().to_owned(),
        None => {
            return Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "Logged out"
            })))
        }
    };

    store.clear_refresh_token(&token).await?;

    Ok(HttpResponse::Ok()
        .cookie(clear_refresh_cookie())
        .json(serde_json::json!({
            "message": "Logged out successfully"
        })))
}

/// Current user profile, as resolved by the access middleware.
#[get("/me")]
pub async fn me(user: CurrentUser) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(user.0))
}

/// Active USER accounts for task assignment. ADMIN and MANAGER only.
#[get("/users")]
pub async fn list_users(
    store: web::Data<UserStore>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    authorize_roles(user.0.role, &[Role::Admin, Role::Manager])?;

    let users = store.list_assignable().await?;
    Ok(HttpResponse::Ok().json(users))
}
