use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// Character record in the upstream wire format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockCharacter {
    #[serde(rename = "_id")]
    pub id: u64,
    pub name: String,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub films: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub count: usize,
    pub total_pages: u32,
    pub previous_page: Option<String>,
    pub next_page: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CharacterPage {
    pub info: PageInfo,
    pub data: Vec<MockCharacter>,
}

#[derive(Deserialize)]
pub struct ForceFailure {
    pub status: Option<u16>,
}

#[derive(Debug, Default)]
pub struct Catalog {
    pub characters: Vec<MockCharacter>,
    /// When set, `GET /character` answers with this status instead.
    pub failure: Option<StatusCode>,
}

pub type Db = Arc<RwLock<Catalog>>;

pub fn app() -> Router {
    app_with(Vec::new())
}

pub fn app_with(characters: Vec<MockCharacter>) -> Router {
    let db: Db = Arc::new(RwLock::new(Catalog {
        characters,
        failure: None,
    }));
    Router::new()
        .route("/character", get(list_characters))
        .route("/__mock/characters", put(replace_characters))
        .route("/__mock/failure", put(force_failure))
        .with_state(db)
}

pub async fn run_with(listener: TcpListener, characters: Vec<MockCharacter>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(characters)).await
}

/// A handful of well-known characters for manual runs.
pub fn sample_characters() -> Vec<MockCharacter> {
    let films = |titles: &[&str]| titles.iter().map(|t| t.to_string()).collect();
    vec![
        MockCharacter {
            id: 4703,
            name: "Mickey Mouse".to_string(),
            image_url: Some("https://static.wikia.nocookie.net/disney/images/mickey.png".to_string()),
            films: films(&[
                "Steamboat Willie",
                "Fantasia",
                "Fun and Fancy Free",
                "Mickey's Christmas Carol",
                "The Prince and the Pauper",
            ]),
        },
        MockCharacter {
            id: 1947,
            name: "Donald Duck".to_string(),
            image_url: Some("https://static.wikia.nocookie.net/disney/images/donald.png".to_string()),
            films: films(&["The Three Caballeros", "Saludos Amigos"]),
        },
        MockCharacter {
            id: 2099,
            name: "Goofy".to_string(),
            image_url: None,
            films: Vec::new(),
        },
    ]
}

async fn list_characters(State(db): State<Db>) -> Response {
    let catalog = db.read().await;
    if let Some(status) = catalog.failure {
        tracing::debug!(%status, "serving forced failure");
        return (status, "forced failure").into_response();
    }
    let page = CharacterPage {
        info: PageInfo {
            count: catalog.characters.len(),
            total_pages: 1,
            previous_page: None,
            next_page: None,
        },
        data: catalog.characters.clone(),
    };
    Json(page).into_response()
}

async fn replace_characters(
    State(db): State<Db>,
    Json(characters): Json<Vec<MockCharacter>>,
) -> StatusCode {
    tracing::debug!(count = characters.len(), "replacing catalog");
    db.write().await.characters = characters;
    StatusCode::NO_CONTENT
}

async fn force_failure(
    State(db): State<Db>,
    Json(input): Json<ForceFailure>,
) -> Result<StatusCode, StatusCode> {
    let failure = match input.status {
        Some(code) => Some(StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?),
        None => None,
    };
    db.write().await.failure = failure;
    Ok(StatusCode::NO_CONTENT)
}
