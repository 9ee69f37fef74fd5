use std::sync::Arc;

use axum::{
    Form,
    extract::{Path, Query, State, rejection::FormRejection},
    http::{StatusCode, header::SET_COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
};
use rand::seq::IndexedRandom;
use roster::Gender;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    database::Person,
    error::AppError,
    pages::{chat_page, login_page, pair_page, ranking_page, room_page},
    session::{Session, expired_cookie, issue_token, password_matches, session_cookie},
    state::AppState,
    utils::{parse_id, room_name},
    vote::record_vote,
};

#[derive(Default, Deserialize)]
pub struct VoteForm {
    winner_id: Option<String>,
    loser_id: Option<String>,
    gender: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    password: Option<String>,
}

#[derive(Deserialize)]
pub struct RoomQuery {
    name: Option<String>,
}

fn parse_gender(raw: &str) -> Result<Gender, AppError> {
    raw.parse()
        .map_err(|_| AppError::UnknownGender(raw.to_string()))
}

fn pick_pair(people: &[Person]) -> Option<(&Person, &Person)> {
    let mut picked = people.choose_multiple(&mut rand::rng(), 2);

    Some((picked.next()?, picked.next()?))
}

async fn render_pair(state: &AppState, gender: Option<Gender>) -> Result<Html<String>, AppError> {
    let people = state.store.list(gender).await?;

    let (a, b) = pick_pair(&people).ok_or(AppError::NotEnoughPeople)?;

    Ok(Html(pair_page(a, b, gender)))
}

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    render_pair(&state, None).await
}

pub async fn vote_page_handler(
    State(state): State<Arc<AppState>>,
    Path(gender): Path<String>,
) -> Result<Html<String>, AppError> {
    render_pair(&state, Some(parse_gender(&gender)?)).await
}

/// Missing or malformed ids are ignored and the visitor just gets a new pair.
/// A body that is not a form at all counts as an empty form.
pub async fn vote_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<VoteForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let form = form
        .map(|Form(form)| form)
        .inspect_err(|e| debug!("Treating vote body as empty: {e}"))
        .unwrap_or_default();

    let winner_id = parse_id(form.winner_id.as_deref());
    let loser_id = parse_id(form.loser_id.as_deref());

    if let (Some(winner_id), Some(loser_id)) = (winner_id, loser_id) {
        record_vote(state.store.as_ref(), winner_id, loser_id).await?;
    }

    let target = form
        .gender
        .as_deref()
        .and_then(|gender| gender.parse::<Gender>().ok())
        .map_or_else(|| "/".to_string(), |gender| format!("/vote/{gender}"));

    Ok(Redirect::to(&target))
}

pub async fn ranking_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, AppError> {
    let people = state.store.ranking(None).await?;

    Ok(Html(ranking_page(&people, None)))
}

pub async fn gender_ranking_handler(
    State(state): State<Arc<AppState>>,
    Path(gender): Path<String>,
) -> Result<Html<String>, AppError> {
    let gender = parse_gender(&gender)?;
    let people = state.store.ranking(Some(gender)).await?;

    Ok(Html(ranking_page(&people, Some(gender))))
}

pub async fn login_page_handler() -> Html<String> {
    Html(login_page(None))
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let password = form.password.unwrap_or_default();

    if !password_matches(&password, &state.config.access_password) {
        warn!("Rejected login attempt");

        return Ok((
            StatusCode::UNAUTHORIZED,
            Html(login_page(Some("Contraseña incorrecta"))),
        )
            .into_response());
    }

    let token = issue_token(&state.config.session_secret, state.config.session_ttl)?;
    info!("New chat session");

    Ok((
        [(SET_COOKIE, session_cookie(&token, state.config.session_ttl))],
        Redirect::to("/chat"),
    )
        .into_response())
}

pub async fn logout_handler() -> impl IntoResponse {
    ([(SET_COOKIE, expired_cookie())], Redirect::to("/login"))
}

pub async fn chat_handler(_session: Session, State(state): State<Arc<AppState>>) -> Html<String> {
    Html(chat_page(&state.firebase_script))
}

pub async fn room_handler(
    _session: Session,
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoomQuery>,
) -> Html<String> {
    let room = room_name(query.name.as_deref());

    Html(room_page(&room, &state.firebase_script))
}
