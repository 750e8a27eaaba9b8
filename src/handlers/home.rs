use crate::{
    models::{slug_path, CreatedLink, LinkRecord},
    AppState,
};
use askama::Template;
use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

// ── Template structs ───────────────────────────────────────────────────────

#[derive(Template, Default)]
#[template(path = "home.html")]
struct HomeTemplate {
    links: Vec<LinkRow>,
    result: Option<ResultView>,
    error: Option<String>,
    flash_success: Option<String>,
    flash_error: Option<String>,
    // Echoed back into the form after a failed submit.
    url_value: String,
    slug_value: String,
}

/// One dashboard row, pre-formatted for display.
struct LinkRow {
    slug: String,
    // Percent-encoded slug for hrefs and form actions.
    path: String,
    short_url: String,
    url: String,
    host: String,
    clicks: u64,
    created_at: String,
    expires_at: String,
    status: &'static str,
    expired: bool,
    last_clicked: String,
}

struct ResultView {
    short_url: String,
    path: String,
    expires_at: String,
}

impl From<CreatedLink> for ResultView {
    fn from(created: CreatedLink) -> Self {
        Self {
            short_url: created.short_url,
            path: slug_path(&created.slug),
            expires_at: fmt_ts(created.expires_at),
        }
    }
}

// ── Form types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct HomeQuery {
    error: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateLinkForm {
    url: String,
    custom_slug: Option<String>,
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// GET /
/// Creation form plus the analytics dashboard. `?error=notfound` is where
/// the redirect view sends visitors for unknown slugs.
pub async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<HomeQuery>,
) -> Response {
    // Read and clear flash cookies
    let flash_success = jar.get("flash_success").map(|c| c.value().to_owned());
    let mut flash_error = jar.get("flash_error").map(|c| c.value().to_owned());
    if query.error.as_deref() == Some("notfound") {
        flash_error = Some("Short link not found.".into());
    }

    let clear_success = Cookie::build(("flash_success", "")).path("/").build();
    let clear_error = Cookie::build(("flash_error", "")).path("/").build();

    let page = HomeTemplate {
        flash_success,
        flash_error,
        ..HomeTemplate::default()
    };

    (jar.remove(clear_success).remove(clear_error), render(&state, page)).into_response()
}

/// POST /links
pub async fn create_link(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CreateLinkForm>,
) -> Response {
    let url = form.url.trim().to_owned();
    // A whitespace-only slug counts as blank; anything else is kept verbatim.
    let custom_slug = form.custom_slug.filter(|s| !s.trim().is_empty());

    match state.registry.create(&url, custom_slug.as_deref()) {
        Ok(record) => {
            let created = CreatedLink::from_record(&record, &state.config.base_url);
            let page = HomeTemplate {
                result: Some(created.into()),
                flash_success: Some("Link created successfully!".into()),
                ..HomeTemplate::default()
            };
            render(&state, page)
        }
        Err(e) if e.is_user_error() => {
            tracing::debug!("Rejected link creation: {}", e);
            let page = HomeTemplate {
                error: Some(e.user_message().into()),
                url_value: url,
                slug_value: custom_slug.unwrap_or_default(),
                ..HomeTemplate::default()
            };
            (e.status(), render(&state, page)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create link: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create link").into_response()
        }
    }
}

/// POST /links/:slug/delete
pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(slug): Path<String>,
) -> Response {
    match state.registry.delete(&slug) {
        Ok(true) => set_flash_and_redirect(jar, Some("Link deleted"), None, "/"),
        Ok(false) => set_flash_and_redirect(jar, None, Some("Link not found."), "/"),
        Err(e) => {
            tracing::error!("Failed to delete link '{}': {:?}", slug, e);
            set_flash_and_redirect(jar, None, Some("Failed to delete link."), "/")
        }
    }
}

// ── Private helpers ────────────────────────────────────────────────────────

/// Fill in the dashboard rows and render the page.
fn render(state: &AppState, mut page: HomeTemplate) -> Response {
    let links = match state.registry.list() {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to load links: {:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load links").into_response();
        }
    };

    let now = state.registry.now();
    page.links = links
        .iter()
        .map(|l| row(l, &state.config.base_url, now))
        .collect();
    page.into_response()
}

fn row(link: &LinkRecord, base_url: &str, now: DateTime<Utc>) -> LinkRow {
    LinkRow {
        slug: link.slug.clone(),
        path: slug_path(&link.slug),
        short_url: format!("{}/{}", base_url, slug_path(&link.slug)),
        url: link.url.clone(),
        host: link.host(),
        clicks: link.clicks,
        created_at: fmt_ts(link.created_at),
        expires_at: fmt_ts(link.expires_at),
        status: link.status(now),
        expired: link.is_expired(now),
        last_clicked: link.last_clicked.map(fmt_ts).unwrap_or_else(|| "-".into()),
    }
}

fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Set a flash cookie and redirect to the given path.
fn set_flash_and_redirect(
    jar: CookieJar,
    success: Option<&str>,
    error: Option<&str>,
    destination: &str,
) -> Response {
    let mut jar = jar;

    for (name, msg) in [("flash_success", success), ("flash_error", error)] {
        if let Some(msg) = msg {
            let c = Cookie::build((name, msg.to_owned()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .max_age(time::Duration::seconds(30))
                .build();
            jar = jar.add(c);
        }
    }

    (jar, Redirect::to(destination)).into_response()
}

#[cfg(test)]
mod tests {
    use crate::handlers::testing::{body_string, form_post, get, test_app};
    use axum::http::{header, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn empty_dashboard() {
        let (app, _) = test_app();

        let resp = app.oneshot(get("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_string(resp).await;
        assert!(body.contains("Create a Short Link"));
        assert!(body.contains("No links yet"));
    }

    #[tokio::test]
    async fn not_found_banner() {
        let (app, _) = test_app();

        let body = body_string(app.oneshot(get("/?error=notfound")).await.unwrap()).await;
        assert!(body.contains("Short link not found."));
    }

    #[tokio::test]
    async fn create_shows_result_and_lists_link() {
        let (app, state) = test_app();

        let resp = app
            .oneshot(form_post("/links", "url=https%3A%2F%2Fexample.com%2Fpage&custom_slug=promo"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_string(resp).await;
        assert!(body.contains("http://short.test/promo"));
        assert!(body.contains("Link created successfully!"));
        assert!(body.contains("example.com"));
        assert!(body.contains("Active"));

        let rec = state.registry.find_by_slug("promo").unwrap().unwrap();
        assert_eq!(rec.url, "https://example.com/page");
    }

    #[tokio::test]
    async fn create_with_blank_slug_generates_one() {
        let (app, state) = test_app();

        let resp = app
            .oneshot(form_post("/links", "url=https%3A%2F%2Fexample.com&custom_slug=+"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let links = state.registry.list().unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].slug.len(), 6);
    }

    #[tokio::test]
    async fn create_invalid_url_shows_error() {
        let (app, state) = test_app();

        let resp = app
            .oneshot(form_post("/links", "url=not-a-url&custom_slug="))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_string(resp).await;
        assert!(body.contains("Invalid URL. Please enter a valid URL!"));
        assert!(body.contains(r#"value="not-a-url""#));
        assert!(state.registry.is_empty().unwrap());
    }

    #[tokio::test]
    async fn create_duplicate_slug_shows_error() {
        let (app, state) = test_app();
        state.registry.create("https://example.com", Some("dup")).unwrap();

        let resp = app
            .oneshot(form_post("/links", "url=https%3A%2F%2Fother.com&custom_slug=dup"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert!(body_string(resp).await.contains("Slug already exists!"));
        assert_eq!(state.registry.list().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_flashes_and_redirects_home() {
        let (app, state) = test_app();
        state.registry.create("https://example.com", Some("bye")).unwrap();

        let resp = app.oneshot(form_post("/links/bye/delete", "")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/");
        let cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash_success="));
        assert!(state.registry.find_by_slug("bye").unwrap().is_none());
    }

    #[tokio::test]
    async fn create_keeps_custom_slug_verbatim() {
        let (app, state) = test_app();

        let resp = app
            .oneshot(form_post("/links", "url=https%3A%2F%2Fexample.com&custom_slug=+promo+"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        assert!(state.registry.find_by_slug(" promo ").unwrap().is_some());
        assert!(state.registry.find_by_slug("promo").unwrap().is_none());
    }

    #[tokio::test]
    async fn result_panel_offers_copy() {
        let (app, _) = test_app();

        let resp = app
            .oneshot(form_post("/links", "url=https%3A%2F%2Fexample.com&custom_slug=cp"))
            .await
            .unwrap();
        let body = body_string(resp).await;
        assert!(body.contains(r#"data-copy="http://short.test/cp""#));
        assert!(body.contains("Link copied!"));
    }

    #[tokio::test]
    async fn slug_with_slash_can_be_followed_and_deleted() {
        let (app, state) = test_app();

        let resp = app
            .clone()
            .oneshot(form_post("/links", "url=https%3A%2F%2Fexample.com&custom_slug=a%2Fb"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_string(resp).await;
        assert!(body.contains(r#"href="/a%2Fb""#));
        assert!(body.contains(r#"action="/links/a%2Fb/delete""#));
        assert!(body.contains("http://short.test/a%2Fb"));
        assert!(!body.contains(r#"href="/a/b""#));

        let resp = app.clone().oneshot(get("/a%2Fb")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(resp.headers()[header::LOCATION], "https://example.com");
        assert_eq!(state.registry.find_by_slug("a/b").unwrap().unwrap().clicks, 1);

        let resp = app
            .oneshot(form_post("/links/a%2Fb/delete", ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash_success="));
        assert!(state.registry.find_by_slug("a/b").unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_unknown_flashes_error() {
        let (app, _) = test_app();

        let resp = app.oneshot(form_post("/links/ghost/delete", "")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash_error="));
    }
}
