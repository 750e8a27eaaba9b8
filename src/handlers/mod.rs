pub mod api;
pub mod home;
pub mod redirect;

#[cfg(test)]
pub(crate) mod testing {
    use crate::{
        config::{AppConfig, StoreBackend},
        registry::Registry,
        resolver::Resolver,
        router,
        store::MemoryStore,
        AppState,
    };
    use axum::{
        body::Body,
        http::{header, Method, Request},
        response::Response,
        Router,
    };
    use std::{path::PathBuf, sync::Arc};

    pub fn test_app() -> (Router, Arc<AppState>) {
        let config = AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            base_url: "http://short.test".into(),
            data_dir: PathBuf::from("unused"),
            store_backend: StoreBackend::Memory,
        };
        let registry = Arc::new(Registry::new(Arc::new(MemoryStore::new())));
        let state = Arc::new(AppState {
            config,
            resolver: Resolver::new(registry.clone()),
            registry,
        });
        (router(state.clone()), state)
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    pub async fn body_string(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}
