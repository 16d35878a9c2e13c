#![allow(dead_code)]

use std::sync::Arc;

use auroom_api::{
    build_router,
    config::AppConfig,
    db,
    entities::{product, MaterialType},
    events::{self, EventSender},
    services::{
        categories::NewCategory,
        factories::{CustomerRegistration, FactoryRegistration, RegisteredFactory, UserView},
        products::NewProduct,
        reference_data::NewMaterial,
    },
    AppState,
};
use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Application wired to a private in-memory SQLite database.
///
/// The pool holds a single connection so every query sees the same schema.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        tweak(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_task = tokio::spawn(events::process_events(event_rx));
        let state = AppState::new(Arc::new(pool), cfg, EventSender::new(event_tx));

        Self {
            router: build_router(state.clone()),
            state,
            _event_task: event_task,
        }
    }

    /// Sends a request, acting as `user` when given.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        user: Option<i32>,
    ) -> Response {
        self.request_with_headers(method, uri, body, user, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        user: Option<i32>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = user {
            builder = builder.header("x-user-id", id.to_string());
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json).expect("serialize request body"))
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("router error during test request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn register_factory(&self, username: &str) -> RegisteredFactory {
        self.state
            .services
            .factories
            .register_factory(FactoryRegistration {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                factory_name: format!("{username} Jewelry Works"),
                address: "1 Goldsmith Lane".to_string(),
                phone: "+70000000000".to_string(),
                description: String::new(),
            })
            .await
            .expect("register factory")
    }

    pub async fn register_customer(&self, username: &str) -> UserView {
        self.state
            .services
            .factories
            .register_customer(CustomerRegistration {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                ..Default::default()
            })
            .await
            .expect("register customer")
    }

    pub async fn material(&self, name: &str) -> i32 {
        self.state
            .services
            .reference
            .add_material(NewMaterial {
                name: name.to_string(),
                material_type: MaterialType::Gold,
            })
            .await
            .expect("add material")
            .id
    }

    pub async fn category(&self, factory_id: i32, name: &str, parent_id: Option<i32>) -> i32 {
        self.state
            .services
            .categories
            .create_category(
                factory_id,
                NewCategory {
                    name: name.to_string(),
                    parent_id,
                    ..Default::default()
                },
            )
            .await
            .expect("create category")
            .id
    }

    pub async fn product(&self, factory_id: i32, input: NewProduct) -> product::Model {
        self.state
            .services
            .products
            .create_product(factory_id, input)
            .await
            .expect("create product")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// A minimal active product with a generated article.
pub fn new_product(name: &str, category_id: i32, material_id: i32, price: Decimal) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        category_id,
        material_id,
        price,
        stock_quantity: 1,
        metal_weight: Decimal::new(350, 2),
        is_active: true,
        ..Default::default()
    }
}

pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is json")
}
