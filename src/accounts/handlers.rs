use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    accounts::{
        dto::{
            BookmarksResponse, EmailQuery, LoginRequest, MessageResponse, Preferences,
            PreferencesResponse, RegisterRequest, ToggleBookmarkRequest, UpdatePreferencesRequest,
        },
        password::{hash_password, verify_password},
        session::SessionKeys,
        validate::{is_valid_email, MIN_PASSWORD_CHARS},
    },
    error::ApiError,
    state::AppState,
    users::model::{bookmark_key, User},
};

/// Emails are compared as stored; normalizing here keeps every lookup
/// exact-match while staying case-insensitive for the caller.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn require_email(email: Option<String>) -> Result<String, ApiError> {
    let email = email.as_deref().map(normalize_email).unwrap_or_default();
    if email.is_empty() {
        return Err(ApiError::MissingField);
    }
    Ok(email)
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<MessageResponse>), ApiError> {
    payload.email = normalize_email(&payload.email);
    payload.name = payload.name.trim().to_string();

    if payload.name.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        warn!("registration with missing fields");
        return Err(ApiError::MissingField);
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::InvalidEmail);
    }
    if payload.password.chars().count() < MIN_PASSWORD_CHARS {
        warn!("password too short");
        return Err(ApiError::WeakPassword);
    }
    if state.store.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    let hash = hash_password(&payload.password).map_err(ApiError::Internal)?;
    // A racing registration still trips the store's unique check, which maps
    // back onto DuplicateEmail.
    let user = state
        .store
        .create(User::new(&payload.name, &payload.email, &hash))
        .await?;

    let keys = SessionKeys::from_ref(&state);
    let cookie = keys.issue_cookie(user.id).map_err(ApiError::Internal)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        jar.add(cookie),
        Json(MessageResponse::new("Registration successful")),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    payload.email = normalize_email(&payload.email);

    if payload.email.is_empty() || payload.password.is_empty() {
        warn!("login with missing fields");
        return Err(ApiError::MissingField);
    }

    // Unknown email and wrong password answer identically so callers cannot
    // probe which addresses are registered.
    let Some(user) = state.store.find_by_email(&payload.email).await? else {
        warn!(email = %payload.email, "login unknown email");
        return Err(ApiError::InvalidCredentials);
    };
    let ok = verify_password(&payload.password, &user.password_hash).map_err(ApiError::Internal)?;
    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = SessionKeys::from_ref(&state);
    let cookie = keys.issue_cookie(user.id).map_err(ApiError::Internal)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        jar.add(cookie),
        Json(MessageResponse::new("Login successful")),
    ))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let keys = SessionKeys::from_ref(&state);
    // Idempotent: clearing with no active session is not an error.
    (
        jar.add(keys.clear_cookie()),
        Json(MessageResponse::new("Logged out successfully")),
    )
}

#[instrument(skip(state))]
pub async fn get_preferences(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<PreferencesResponse>, ApiError> {
    let email = require_email(query.email)?;
    let user = state
        .store
        .find_by_email(&email)
        .await?
        .ok_or(ApiError::UserNotFound)?;
    Ok(Json(PreferencesResponse {
        preferences: Preferences {
            categories: user.interests,
            sources: user.notifications,
            country: user.country,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(payload): Json<UpdatePreferencesRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = require_email(payload.email.clone())?;
    let user = state
        .store
        .update(&email, &|u: &mut User| {
            u.apply_preferences(
                payload.categories.as_deref(),
                payload.sources.as_deref(),
                payload.country.as_deref(),
            )
        })
        .await?;
    info!(user_id = %user.id, email = %user.email, "preferences updated");
    Ok(Json(MessageResponse::new("Preferences updated")))
}

#[instrument(skip(state))]
pub async fn get_bookmarks(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<BookmarksResponse>, ApiError> {
    let email = require_email(query.email)?;
    let user = state
        .store
        .find_by_email(&email)
        .await?
        .ok_or(ApiError::UserNotFound)?;
    Ok(Json(BookmarksResponse {
        bookmarks: user.bookmarks,
    }))
}

#[instrument(skip(state, payload))]
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    Json(payload): Json<ToggleBookmarkRequest>,
) -> Result<Json<BookmarksResponse>, ApiError> {
    let email = require_email(payload.email.clone())?;
    let Some(article) = payload.article else {
        warn!("bookmark toggle without article");
        return Err(ApiError::MissingField);
    };
    if bookmark_key(&article).is_none() {
        warn!("bookmark toggle with article lacking url and title");
        return Err(ApiError::MissingField);
    }

    let user = state
        .store
        .update(&email, &|u: &mut User| u.toggle_bookmark(&article))
        .await?;
    info!(user_id = %user.id, count = user.bookmarks.len(), "bookmarks toggled");
    Ok(Json(BookmarksResponse {
        bookmarks: user.bookmarks,
    }))
}
