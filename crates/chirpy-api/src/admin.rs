use std::sync::atomic::Ordering;

use axum::{extract::State, response::Html};

use crate::auth::AppState;

pub async fn healthz() -> &'static str {
    "OK"
}

pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    let hits = state.fileserver_hits.load(Ordering::Relaxed);
    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>\n",
        hits
    ))
}
