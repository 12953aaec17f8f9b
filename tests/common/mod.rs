//! Shared test fixtures for the catalog console integration tests.
//!
//! Provides [`FakeShop`], an in-memory stand-in for the remote admin API that
//! implements sign-in, session check, and product CRUD, records every request
//! it receives, and can be told to fail specific routes.

#![allow(dead_code)]

use catalog_console::{
    AdminConsole, ApiRequest, ApiResponse, ConsoleError, ConsoleEvent, MemoryTokenStore, Method,
    Result, Transport,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const API_PATH: &str = "shop";
pub const USERNAME: &str = "a@b.com";
pub const PASSWORD: &str = "x";
pub const TOKEN: &str = "T1";

pub const PRODUCTS: &str = "/api/shop/admin/products";
pub const PRODUCT: &str = "/api/shop/admin/product";

pub fn product_item(id: &str) -> String {
    format!("{}/{}", PRODUCT, id)
}

// ---------------------------------------------------------------------------
// FakeShop
// ---------------------------------------------------------------------------

enum Failure {
    Status(u16, Value),
    Network,
}

#[derive(Default)]
struct ShopState {
    products: Vec<Value>,
    valid_tokens: HashSet<String>,
    failures: HashMap<(Method, String), Failure>,
    requests: Vec<ApiRequest>,
    next_id: usize,
}

#[derive(Clone, Default)]
pub struct FakeShop {
    state: Arc<Mutex<ShopState>>,
}

impl FakeShop {
    pub fn new() -> Self {
        Self::default()
    }

    /// A shop seeded with two products, one of them without gallery images.
    pub fn with_sample_products() -> Self {
        let shop = Self::new();
        shop.seed(sample_products());
        shop
    }

    pub fn seed(&self, products: Vec<Value>) {
        self.state.lock().unwrap().products = products;
    }

    /// Accept `token` as a valid session without signing in.
    pub fn accept_token(&self, token: &str) {
        self.state
            .lock()
            .unwrap()
            .valid_tokens
            .insert(token.to_string());
    }

    /// Answer `method path` with `status` and `body` until cleared.
    pub fn fail(&self, method: Method, path: &str, status: u16, body: Value) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((method, path.to_string()), Failure::Status(status, body));
    }

    /// Make `method path` fail at the transport level.
    pub fn fail_network(&self, method: Method, path: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((method, path.to_string()), Failure::Network);
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().failures.clear();
    }

    pub fn products(&self) -> Vec<Value> {
        self.state.lock().unwrap().products.clone()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }
}

impl Transport for FakeShop {
    fn send(&mut self, request: &ApiRequest) -> Result<ApiResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        match state
            .failures
            .get(&(request.method, request.path.clone()))
        {
            Some(Failure::Network) => {
                return Err(ConsoleError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )))
            }
            Some(Failure::Status(status, body)) => {
                return Ok(ApiResponse::new(*status, body.clone()));
            }
            None => {}
        }

        Ok(state.handle(request))
    }
}

impl ShopState {
    fn handle(&mut self, request: &ApiRequest) -> ApiResponse {
        if request.method == Method::Post && request.path == "/admin/signin" {
            return self.signin(request);
        }

        let authorized = request
            .authorization
            .as_ref()
            .is_some_and(|t| self.valid_tokens.contains(t));
        if !authorized {
            return ApiResponse::new(
                401,
                json!({ "success": false, "message": "驗證錯誤, 請重新登入" }),
            );
        }

        let item_prefix = format!("{}/", PRODUCT);
        match (request.method, request.path.as_str()) {
            (Method::Post, "/api/user/check") => {
                ApiResponse::new(200, json!({ "success": true, "uid": "u1" }))
            }
            (Method::Get, PRODUCTS) => ApiResponse::new(
                200,
                json!({
                    "success": true,
                    "products": self.products,
                    "pagination": { "total_pages": 1, "current_page": 1 },
                    "messages": []
                }),
            ),
            (Method::Post, PRODUCT) => self.create(request),
            (Method::Put, path) if path.starts_with(&item_prefix) => {
                let id = path[item_prefix.len()..].to_string();
                self.update(&id, request)
            }
            (Method::Delete, path) if path.starts_with(&item_prefix) => {
                let id = path[item_prefix.len()..].to_string();
                self.delete(&id)
            }
            _ => ApiResponse::new(404, json!({ "success": false, "message": "Not Found" })),
        }
    }

    fn signin(&mut self, request: &ApiRequest) -> ApiResponse {
        let body = request.body.clone().unwrap_or(Value::Null);
        if body["username"] == USERNAME && body["password"] == PASSWORD {
            self.valid_tokens.insert(TOKEN.to_string());
            let expired = (Utc::now() + Duration::days(10)).timestamp_millis();
            ApiResponse::new(
                200,
                json!({
                    "success": true,
                    "message": "登入成功",
                    "uid": "u1",
                    "token": TOKEN,
                    "expired": expired
                }),
            )
        } else {
            ApiResponse::new(
                400,
                json!({
                    "success": false,
                    "message": "登入失敗",
                    "error": { "code": "auth/wrong-password" }
                }),
            )
        }
    }

    fn create(&mut self, request: &ApiRequest) -> ApiResponse {
        let Some(mut data) = request.body.as_ref().and_then(|b| b.get("data")).cloned() else {
            return ApiResponse::new(400, json!({ "success": false, "message": "資料錯誤" }));
        };
        if data["title"].as_str().unwrap_or("").is_empty() {
            return ApiResponse::new(
                400,
                json!({ "success": false, "message": ["title 欄位為必填"] }),
            );
        }
        self.next_id += 1;
        data["id"] = json!(format!("-new{}", self.next_id));
        self.products.push(data);
        ApiResponse::new(200, json!({ "success": true, "message": "已建立產品" }))
    }

    fn update(&mut self, id: &str, request: &ApiRequest) -> ApiResponse {
        let Some(mut data) = request.body.as_ref().and_then(|b| b.get("data")).cloned() else {
            return ApiResponse::new(400, json!({ "success": false, "message": "資料錯誤" }));
        };
        match self.products.iter_mut().find(|p| p["id"] == id) {
            Some(slot) => {
                data["id"] = json!(id);
                *slot = data;
                ApiResponse::new(200, json!({ "success": true, "message": "已更新產品" }))
            }
            None => ApiResponse::new(400, json!({ "success": false, "message": "找不到產品" })),
        }
    }

    fn delete(&mut self, id: &str) -> ApiResponse {
        let before = self.products.len();
        self.products.retain(|p| p["id"] != id);
        if self.products.len() < before {
            ApiResponse::new(200, json!({ "success": true, "message": "已刪除產品" }))
        } else {
            ApiResponse::new(400, json!({ "success": false, "message": "找不到產品" }))
        }
    }
}

pub fn sample_products() -> Vec<Value> {
    vec![
        json!({
            "id": "-p1",
            "title": "Signed Bat",
            "category": "AllStar",
            "content": "Game-used maple bat",
            "description": "Signed at the 2023 all-star game",
            "imageUrl": "https://img.example.com/bat.jpg",
            "imagesUrl": ["https://img.example.com/bat-1.jpg", "https://img.example.com/bat-2.jpg"],
            "price": 1200,
            "origin_price": 1500,
            "unit": "支",
            "is_enabled": 1,
            "storageNum": 3,
            "num": 1
        }),
        json!({
            "id": "-p2",
            "title": "Rookie Card",
            "category": "Rookie",
            "content": "",
            "description": "First season card",
            "imageUrl": "https://img.example.com/card.jpg",
            "price": 300,
            "origin_price": 450,
            "unit": "張",
            "is_enabled": 0
        }),
    ]
}

// ---------------------------------------------------------------------------
// Console helpers
// ---------------------------------------------------------------------------

/// A console over `shop` with an empty in-memory token store.
pub fn console_for(shop: &FakeShop) -> (AdminConsole, MemoryTokenStore) {
    let store = MemoryTokenStore::new();
    let console = AdminConsole::builder()
        .api_path(API_PATH)
        .transport(shop.clone())
        .token_store(store.clone())
        .build()
        .unwrap();
    (console, store)
}

/// A console over `shop` that has already signed in, with the request log
/// cleared afterwards.
pub fn signed_in_console(shop: &FakeShop) -> AdminConsole {
    let (mut console, _store) = console_for(shop);
    console
        .login(&catalog_console::Credential::new(USERNAME, PASSWORD))
        .unwrap();
    shop.clear_requests();
    console
}

/// Record every event the console emits from now on.
pub fn record_events(console: &mut AdminConsole) -> Arc<Mutex<Vec<ConsoleEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    console.subscribe(move |e| sink.lock().unwrap().push(e.clone()));
    events
}

pub fn alerts(events: &Arc<Mutex<Vec<ConsoleEvent>>>) -> Vec<String> {
    events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            ConsoleEvent::Alert(msg) => Some(msg.clone()),
            _ => None,
        })
        .collect()
}
