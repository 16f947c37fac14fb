//! HTTP request handlers.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;
use tower_sessions::Session;

use crate::domain::error::PapertradeError;
use crate::domain::money::usd;
use crate::domain::portfolio::{patrimony, Position, STARTING_CASH};
use crate::domain::trading::{normalize_symbol, parse_share_quantity, trade_value};

use super::auth::{hash_password, AuthSession, Credentials, SessionUser};
use super::error::Apology;
use super::flash::{set_flash, take_flash};
use super::templates::{
    BuyTemplate, HistoryRow, HistoryTemplate, IndexTemplate, LoginTemplate, PositionRow,
    QuoteTemplate, QuotedTemplate, RegisterTemplate, SellTemplate,
};
use super::AppState;

/// The guard layer redirects unauthenticated requests before they reach a
/// protected handler, so a missing user here is a routing bug.
fn current_user(auth_session: &AuthSession) -> Result<SessionUser, Apology> {
    auth_session
        .user
        .clone()
        .ok_or_else(|| Apology::internal("no authenticated user in session"))
}

/// Drop any existing session. axum-login's logout flushes the whole
/// session record, transient flash data included.
async fn clear_session(auth_session: &mut AuthSession) -> Result<(), Apology> {
    auth_session
        .logout()
        .await
        .map_err(|e| Apology::internal(e.to_string()))?;
    Ok(())
}

fn share_count(quantity: f64) -> String {
    format!("{quantity}")
}

pub async fn index(
    auth_session: AuthSession,
    session: Session,
    State(state): State<Arc<AppState>>,
) -> Result<Response, Apology> {
    let user = current_user(&auth_session)?;
    let record = state
        .store
        .user_by_id(user.id)?
        .ok_or_else(|| Apology::internal("account no longer exists"))?;

    let holdings = state.store.holdings(user.id)?;
    let mut positions = Vec::with_capacity(holdings.len());
    for holding in holdings {
        let quote = state.quotes.lookup(&holding.symbol).await?.ok_or_else(|| {
            PapertradeError::QuoteProvider {
                reason: format!("no quote for held symbol {}", holding.symbol),
            }
        })?;
        positions.push(Position {
            value: trade_value(quote.price, holding.quantity),
            symbol: quote.symbol,
            name: quote.name,
            quantity: holding.quantity,
            price: quote.price,
        });
    }

    let total = patrimony(record.cash, &positions);

    let template = IndexTemplate {
        flash: take_flash(&session).await,
        positions: positions
            .into_iter()
            .map(|p| PositionRow {
                quantity: share_count(p.quantity),
                price: usd(p.price),
                value: usd(p.value),
                symbol: p.symbol,
                name: p.name,
            })
            .collect(),
        cash: usd(record.cash),
        patrimony: usd(total),
    };
    Ok(template.into_response())
}

#[derive(Debug, serde::Deserialize)]
pub struct BuyForm {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub shares: String,
}

pub async fn buy_form() -> BuyTemplate {
    BuyTemplate
}

pub async fn buy(
    auth_session: AuthSession,
    session: Session,
    State(state): State<Arc<AppState>>,
    Form(form): Form<BuyForm>,
) -> Result<Response, Apology> {
    let user = current_user(&auth_session)?;

    let symbol = normalize_symbol(&form.symbol);
    if symbol.is_empty() {
        return Err(PapertradeError::MissingField {
            field: "symbol".into(),
        }
        .into());
    }
    let quantity = parse_share_quantity(&form.shares)?;

    let quote = state
        .quotes
        .lookup(&symbol)
        .await?
        .ok_or(PapertradeError::UnknownSymbol { symbol })?;

    let cost = trade_value(quote.price, quantity);
    state
        .store
        .record_buy(user.id, &quote.symbol, quantity, cost)?;

    tracing::info!(
        user = %user.username,
        symbol = %quote.symbol,
        quantity,
        cost,
        "buy executed"
    );
    set_flash(&session, "Purchased!").await;
    Ok(Redirect::to("/").into_response())
}

#[derive(Debug, serde::Deserialize)]
pub struct SellForm {
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub shares: String,
}

pub async fn sell_form(
    auth_session: AuthSession,
    State(state): State<Arc<AppState>>,
) -> Result<Response, Apology> {
    let user = current_user(&auth_session)?;
    let symbols = state
        .store
        .holdings(user.id)?
        .into_iter()
        .map(|h| h.symbol)
        .collect();
    Ok(SellTemplate { symbols }.into_response())
}

pub async fn sell(
    auth_session: AuthSession,
    session: Session,
    State(state): State<Arc<AppState>>,
    Form(form): Form<SellForm>,
) -> Result<Response, Apology> {
    let user = current_user(&auth_session)?;

    let symbol = normalize_symbol(&form.stock);
    if symbol.is_empty() {
        return Err(PapertradeError::MissingField {
            field: "symbol".into(),
        }
        .into());
    }
    let quantity = parse_share_quantity(&form.shares)?;

    let quote = state
        .quotes
        .lookup(&symbol)
        .await?
        .ok_or(PapertradeError::UnknownSymbol { symbol })?;

    let proceeds = trade_value(quote.price, quantity);
    state
        .store
        .record_sell(user.id, &quote.symbol, quantity, proceeds)?;

    tracing::info!(
        user = %user.username,
        symbol = %quote.symbol,
        quantity,
        proceeds,
        "sell executed"
    );
    set_flash(&session, "Sold!").await;
    Ok(Redirect::to("/").into_response())
}

#[derive(Debug, serde::Deserialize)]
pub struct QuoteForm {
    #[serde(default)]
    pub stock: String,
}

pub async fn quote_form() -> QuoteTemplate {
    QuoteTemplate
}

pub async fn quote(
    State(state): State<Arc<AppState>>,
    Form(form): Form<QuoteForm>,
) -> Result<Response, Apology> {
    let symbol = normalize_symbol(&form.stock);
    if symbol.is_empty() {
        return Err(PapertradeError::MissingField {
            field: "symbol".into(),
        }
        .into());
    }

    let quote = state
        .quotes
        .lookup(&symbol)
        .await?
        .ok_or(PapertradeError::UnknownSymbol { symbol })?;

    Ok(QuotedTemplate {
        name: quote.name,
        symbol: quote.symbol,
        price: usd(quote.price),
    }
    .into_response())
}

pub async fn history(
    auth_session: AuthSession,
    session: Session,
    State(state): State<Arc<AppState>>,
) -> Result<Response, Apology> {
    let user = current_user(&auth_session)?;

    let rows = state
        .store
        .transactions(user.id)?
        .into_iter()
        .map(|t| HistoryRow {
            price: usd(t.price_per_share()),
            quantity: share_count(t.quantity),
            executed_at: t.executed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            symbol: t.symbol,
        })
        .collect();

    Ok(HistoryTemplate {
        flash: take_flash(&session).await,
        rows,
    }
    .into_response())
}

#[derive(Debug, serde::Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_form(mut auth_session: AuthSession) -> Result<Response, Apology> {
    clear_session(&mut auth_session).await?;
    Ok(LoginTemplate.into_response())
}

pub async fn login(
    mut auth_session: AuthSession,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, Apology> {
    clear_session(&mut auth_session).await?;

    let username = form.username.trim();
    if username.is_empty() {
        return Err(PapertradeError::MissingField {
            field: "username".into(),
        }
        .into());
    }
    if form.password.is_empty() {
        return Err(PapertradeError::MissingField {
            field: "password".into(),
        }
        .into());
    }

    let creds = Credentials {
        username: username.to_string(),
        password: form.password,
    };
    let user = auth_session
        .authenticate(creds)
        .await
        .map_err(|e| Apology::internal(e.to_string()))?
        .ok_or(PapertradeError::InvalidCredentials)?;

    auth_session
        .login(&user)
        .await
        .map_err(|e| Apology::internal(e.to_string()))?;

    tracing::info!(user = %user.username, "login");
    set_flash(&session, "Logged in!").await;
    Ok(Redirect::to("/").into_response())
}

#[derive(Debug, serde::Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

pub async fn register_form(mut auth_session: AuthSession) -> Result<Response, Apology> {
    clear_session(&mut auth_session).await?;
    Ok(RegisterTemplate.into_response())
}

pub async fn register(
    mut auth_session: AuthSession,
    session: Session,
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, Apology> {
    clear_session(&mut auth_session).await?;

    let username = form.username.trim();
    if username.is_empty() {
        return Err(PapertradeError::MissingField {
            field: "username".into(),
        }
        .into());
    }
    if form.password1.is_empty() {
        return Err(PapertradeError::MissingField {
            field: "password".into(),
        }
        .into());
    }
    if form.password2.is_empty() {
        return Err(PapertradeError::MissingField {
            field: "password confirmation".into(),
        }
        .into());
    }
    if form.password1 != form.password2 {
        return Err(PapertradeError::PasswordMismatch.into());
    }

    let hash = hash_password(&form.password1)?;
    let id = state.store.create_user(username, &hash, STARTING_CASH)?;

    let record = state
        .store
        .user_by_id(id)?
        .ok_or_else(|| Apology::internal("freshly created account missing"))?;
    let user = SessionUser::from(record);

    auth_session
        .login(&user)
        .await
        .map_err(|e| Apology::internal(e.to_string()))?;

    tracing::info!(user = %user.username, "registered");
    set_flash(&session, "Registered!").await;
    Ok(Redirect::to("/").into_response())
}

pub async fn logout(mut auth_session: AuthSession) -> Result<Response, Apology> {
    clear_session(&mut auth_session).await?;
    Ok(Redirect::to("/login").into_response())
}

pub async fn not_found() -> Apology {
    Apology::not_found("page not found")
}
