//! In-process stand-in for the hosted Contactly API, used by the module
//! tests. One registered account: a@b.com / x, bearer token `t1`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::models::{Contact, ContactInput};

pub const TOKEN: &str = "t1";

#[derive(Default)]
pub struct RemoteState {
    pub contacts: Mutex<Vec<Contact>>,
    pub next_id: AtomicUsize,
    pub list_calls: AtomicUsize,
}

pub struct Remote {
    pub base_url: String,
    pub state: Arc<RemoteState>,
}

impl Remote {
    /// Insert a contact server-side, bypassing the HTTP surface.
    pub fn seed(&self, input: ContactInput) -> Contact {
        self.state.insert(input)
    }
}

impl RemoteState {
    fn insert(&self, input: ContactInput) -> Contact {
        let id = format!("c{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let contact = Contact {
            id,
            name: input.name,
            phone: input.phone,
            email: input.email,
            city: input.city,
            country: input.country,
        };
        self.contacts.lock().unwrap().push(contact.clone());
        contact
    }
}

pub async fn spawn() -> Remote {
    let state = Arc::new(RemoteState::default());
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/contacts", get(list))
        .route("/contacts/create", post(create))
        .route("/contacts/:id", put(update).delete(remove))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Remote { base_url, state }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value == format!("Bearer {TOKEN}"))
        .unwrap_or(false)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Unauthorized"})),
    )
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "a@b.com" && body["password"] == "x" {
        (
            StatusCode::OK,
            Json(json!({
                "token": TOKEN,
                "user": {"_id": "u1", "username": "jo", "email": "a@b.com"}
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid email or password!"})),
        )
    }
}

async fn signup(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "a@b.com" {
        (
            StatusCode::CONFLICT,
            Json(json!({"message": "User already exists"})),
        )
    } else {
        (
            StatusCode::CREATED,
            Json(json!({"message": "User registered successfully"})),
        )
    }
}

async fn list(
    State(state): State<Arc<RemoteState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.list_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    let contacts = state.contacts.lock().unwrap().clone();
    (StatusCode::OK, Json(json!(contacts)))
}

async fn create(
    State(state): State<Arc<RemoteState>>,
    headers: HeaderMap,
    Json(input): Json<ContactInput>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let contact = state.insert(input);
    (StatusCode::CREATED, Json(json!(contact)))
}

async fn update(
    State(state): State<Arc<RemoteState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<ContactInput>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut contacts = state.contacts.lock().unwrap();
    match contacts.iter_mut().find(|contact| contact.id == id) {
        Some(contact) => {
            contact.name = input.name;
            contact.phone = input.phone;
            contact.email = input.email;
            contact.city = input.city;
            contact.country = input.country;
            (StatusCode::OK, Json(json!(contact.clone())))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Contact not found"})),
        ),
    }
}

async fn remove(
    State(state): State<Arc<RemoteState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized().into_response();
    }
    let mut contacts = state.contacts.lock().unwrap();
    let before = contacts.len();
    contacts.retain(|contact| contact.id != id);
    if contacts.len() == before {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Contact not found"})),
        )
            .into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}
