//! Black-box tests against the full HTTP surface.
//!
//! Each test spawns the production router on an ephemeral port with an
//! isolated in-memory database and drives it with reqwest, exactly as
//! an external client would. Tokens are minted with the shared test
//! secret, standing in for the identity provider.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};

use medimart_api::auth::Claims;
use medimart_api::config::ApiConfig;
use medimart_api::{build_app, AppState};
use medimart_db::{Database, DbConfig};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    db: Database,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let db = Database::new(DbConfig::in_memory())
            .await
            .expect("failed to open in-memory database");

        let config = ApiConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            database_path: ":memory:".to_string(),
            jwt_secret: JWT_SECRET.to_string(),
            strict_transitions: false,
            search_limit: 50,
        };

        let state = AppState::new(db.clone(), &config);
        let app = build_app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            db,
            handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_token(sub: &str, name: &str, email: &str) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: sub.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(10)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

/// Mints an admin token, provisioning the role directly in the
/// database the way production does out of band.
async fn setup_admin(client: &reqwest::Client, srv: &TestServer) -> String {
    let token = mint_token("auth-admin", "Ada Admin", "ada@medimart.example");

    // Touch an authenticated route so the user row exists.
    let res = client
        .get(format!("{}/stores", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    sqlx::query("UPDATE users SET role = 'ADMIN' WHERE auth_id = ?")
        .bind("auth-admin")
        .execute(srv.db.pool())
        .await
        .unwrap();

    token
}

async fn setup_patient(client: &reqwest::Client, srv: &TestServer, auth_id: &str) -> String {
    let token = mint_token(auth_id, "Pat Example", &format!("{}@example.com", auth_id));

    let res = client
        .post(format!("{}/patients", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    token
}

/// Onboards a store and walks it through admin approval. Returns the
/// store's token and user id.
async fn setup_verified_store(
    client: &reqwest::Client,
    srv: &TestServer,
    admin_token: &str,
    auth_id: &str,
    store_name: &str,
) -> (String, String) {
    let token = mint_token(
        auth_id,
        "Dana Whitfield",
        &format!("{}@pharmacy.example", auth_id),
    );

    let res = client
        .post(format!("{}/stores", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "storeName": store_name,
            "storeAddress": "12 Market Street",
            "storePhone": "+1-555-0110",
            "storeLicense": "PH-2291"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let store_id = body["store"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["store"]["storeVerificationStatus"], "PENDING");

    let res = client
        .put(format!(
            "{}/admin/stores/{}/verification",
            srv.base_url, store_id
        ))
        .bearer_auth(admin_token)
        .json(&json!({ "status": "VERIFIED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    (token, store_id)
}

/// Shelves a medicine and returns the inventory entry.
async fn stock_medicine(
    client: &reqwest::Client,
    srv: &TestServer,
    store_token: &str,
    name: &str,
    generic: &str,
    price_cents: i64,
    stock: i64,
) -> Value {
    let res = client
        .post(format!("{}/medicines", srv.base_url))
        .bearer_auth(store_token)
        .json(&json!({
            "medicineName": name,
            "genericName": generic,
            "category": "Analgesics",
            "dosage": "500mg",
            "priceCents": price_cents,
            "stock": stock
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["entry"].clone()
}

async fn store_inventory(
    client: &reqwest::Client,
    srv: &TestServer,
    store_token: &str,
) -> Vec<Value> {
    let res = client
        .get(format!("{}/inventory", srv.base_url))
        .bearer_auth(store_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/inventory", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "UNAUTHORIZED");

    let res = client
        .get(format!("{}/inventory", srv.base_url))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn onboarding_assigns_roles_once() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let token = mint_token("auth-pat", "Pat Example", "pat@example.com");

    let res = client
        .post(format!("{}/patients", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["role"], "PATIENT");

    // Roles are one-way: a second onboarding call conflicts.
    let res = client
        .post(format!("{}/patients", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "ROLE_ALREADY_ASSIGNED");

    // A patient cannot become a store either.
    let res = client
        .post(format!("{}/stores", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "storeName": "Sneaky Pharmacy",
            "storeAddress": "1 Backdoor Lane",
            "storePhone": "+1-555-0199",
            "storeLicense": "PH-0000"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn store_verification_review_flow() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = setup_admin(&client, &srv).await;

    let store_token = mint_token("auth-store", "Dana Whitfield", "dana@citypharmacy.example");
    let res = client
        .post(format!("{}/stores", srv.base_url))
        .bearer_auth(&store_token)
        .json(&json!({
            "storeName": "City Pharmacy",
            "storeAddress": "12 Market Street",
            "storePhone": "+1-555-0110",
            "storeLicense": "PH-2291"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let store_id = body["store"]["id"].as_str().unwrap().to_string();

    // Pending stores are invisible in the public directory.
    let res = client
        .get(format!("{}/stores", srv.base_url))
        .bearer_auth(&store_token)
        .send()
        .await
        .unwrap();
    let directory: Vec<Value> = res.json().await.unwrap();
    assert!(directory.is_empty());

    // The review queue shows it.
    let res = client
        .get(format!("{}/admin/stores?status=PENDING", srv.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let queue: Vec<Value> = res.json().await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0]["id"].as_str().unwrap(), store_id);

    // Only admins see the queue.
    let res = client
        .get(format!("{}/admin/stores", srv.base_url))
        .bearer_auth(&store_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "FORBIDDEN");

    // Approve.
    let res = client
        .put(format!(
            "{}/admin/stores/{}/verification",
            srv.base_url, store_id
        ))
        .bearer_auth(&admin)
        .json(&json!({ "status": "VERIFIED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["store"]["storeVerificationStatus"], "VERIFIED");

    // Now the public directory lists it.
    let res = client
        .get(format!("{}/stores", srv.base_url))
        .bearer_auth(&store_token)
        .send()
        .await
        .unwrap();
    let directory: Vec<Value> = res.json().await.unwrap();
    assert_eq!(directory.len(), 1);
    assert_eq!(directory[0]["storeName"], "City Pharmacy");

    // Resubmission on a verified store conflicts.
    let res = client
        .post(format!("{}/stores/me/verification", srv.base_url))
        .bearer_auth(&store_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "STORE_ALREADY_VERIFIED");

    // Unknown review filter is rejected.
    let res = client
        .get(format!("{}/admin/stores?status=LIMBO", srv.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "INVALID_STATUS");
}

#[tokio::test]
async fn stocking_and_catalog_visibility() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = setup_admin(&client, &srv).await;

    let (verified, _) =
        setup_verified_store(&client, &srv, &admin, "auth-verified", "City Pharmacy").await;
    stock_medicine(&client, &srv, &verified, "Paracetamol", "Acetaminophen", 500, 40).await;

    // A pending store can stock its shelf, but the catalog hides it.
    let pending = mint_token("auth-pending", "Arjun Mehta", "arjun@greenleaf.example");
    let res = client
        .post(format!("{}/stores", srv.base_url))
        .bearer_auth(&pending)
        .json(&json!({
            "storeName": "GreenLeaf Chemist",
            "storeAddress": "4 Garden Row",
            "storePhone": "+1-555-0111",
            "storeLicense": "PH-1083"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    stock_medicine(&client, &srv, &pending, "Ibuprofen", "Ibuprofen", 650, 25).await;

    let patient = setup_patient(&client, &srv, "auth-pat").await;

    let res = client
        .get(format!("{}/medicines", srv.base_url))
        .bearer_auth(&patient)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let catalog: Vec<Value> = res.json().await.unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0]["name"], "Paracetamol");
    assert_eq!(catalog[0]["storeName"], "City Pharmacy");

    // Case-insensitive search on the generic name.
    let res = client
        .get(format!("{}/medicines?search=ACETAMIN", srv.base_url))
        .bearer_auth(&patient)
        .send()
        .await
        .unwrap();
    let hits: Vec<Value> = res.json().await.unwrap();
    assert_eq!(hits.len(), 1);

    // A one-letter query returns an empty list, not an error.
    let res = client
        .get(format!("{}/medicines?search=p", srv.base_url))
        .bearer_auth(&patient)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let hits: Vec<Value> = res.json().await.unwrap();
    assert!(hits.is_empty());

    // Validation rejects nonsense before it reaches the shelf.
    let res = client
        .post(format!("{}/medicines", srv.base_url))
        .bearer_auth(&verified)
        .json(&json!({
            "medicineName": "Freebies",
            "category": "Analgesics",
            "priceCents": 0,
            "stock": 10
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "MUST_BE_POSITIVE");

    // Patients cannot stock medicines.
    let res = client
        .post(format!("{}/medicines", srv.base_url))
        .bearer_auth(&patient)
        .json(&json!({
            "medicineName": "Aspirin",
            "category": "Analgesics",
            "priceCents": 300,
            "stock": 5
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn order_lifecycle_happy_path() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = setup_admin(&client, &srv).await;

    let (store, _) =
        setup_verified_store(&client, &srv, &admin, "auth-store", "City Pharmacy").await;
    let entry =
        stock_medicine(&client, &srv, &store, "Paracetamol", "Acetaminophen", 500, 40).await;
    let patient = setup_patient(&client, &srv, "auth-pat").await;

    // Place.
    let res = client
        .post(format!("{}/orders", srv.base_url))
        .bearer_auth(&patient)
        .json(&json!({
            "inventoryId": entry["id"],
            "quantity": 2,
            "notes": "Ring the bell"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    let order = &body["order"];
    let order_id = order["id"].as_str().unwrap().to_string();
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["unitPriceCents"], 500);
    assert_eq!(order["totalCents"], 1000);

    // Stock was reserved at placement.
    let shelf = store_inventory(&client, &srv, &store).await;
    assert_eq!(shelf[0]["stock"], 38);

    // The store fulfills.
    for status in ["CONFIRMED", "PREPARING", "READY_FOR_PICKUP"] {
        let res = client
            .put(format!("{}/orders/{}", srv.base_url, order_id))
            .bearer_auth(&store)
            .json(&json!({ "status": status }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client
        .put(format!("{}/orders/{}", srv.base_url, order_id))
        .bearer_auth(&store)
        .json(&json!({ "status": "DELIVERED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["order"]["status"], "DELIVERED");
    assert!(body["order"]["deliveryDate"].is_string());

    // The patient sees the delivered order with the store's name.
    let res = client
        .get(format!("{}/orders", srv.base_url))
        .bearer_auth(&patient)
        .send()
        .await
        .unwrap();
    let orders: Vec<Value> = res.json().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["status"], "DELIVERED");
    assert_eq!(orders[0]["storeName"], "City Pharmacy");

    // Revenue lands in the statistics.
    let res = client
        .get(format!("{}/orders/stats", srv.base_url))
        .bearer_auth(&store)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let stats: Value = res.json().await.unwrap();
    assert_eq!(stats["totalRevenueCents"], 1000);
    assert_eq!(stats["recentOrders"], 1);

    // And in the dashboard counters.
    let res = client
        .get(format!("{}/stores/me/stats", srv.base_url))
        .bearer_auth(&store)
        .send()
        .await
        .unwrap();
    let dashboard: Value = res.json().await.unwrap();
    assert_eq!(dashboard["totalMedicines"], 1);
    assert_eq!(dashboard["totalOrders"], 1);
    assert_eq!(dashboard["pendingOrders"], 0);
    assert_eq!(dashboard["totalRevenueCents"], 1000);
}

#[tokio::test]
async fn order_conflicts_and_role_gates() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = setup_admin(&client, &srv).await;

    let (store, _) =
        setup_verified_store(&client, &srv, &admin, "auth-store", "City Pharmacy").await;
    let entry =
        stock_medicine(&client, &srv, &store, "Paracetamol", "Acetaminophen", 500, 40).await;
    let entry_id = entry["id"].as_str().unwrap().to_string();
    let patient = setup_patient(&client, &srv, "auth-pat").await;

    // More than the shelf holds.
    let res = client
        .post(format!("{}/orders", srv.base_url))
        .bearer_auth(&patient)
        .json(&json!({ "inventoryId": entry_id, "quantity": 41 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "INSUFFICIENT_STOCK");

    // A real order to fight over.
    let res = client
        .post(format!("{}/orders", srv.base_url))
        .bearer_auth(&patient)
        .json(&json!({ "inventoryId": entry_id, "quantity": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    let order_id = body["order"]["id"].as_str().unwrap().to_string();

    // Patients may not drive fulfillment.
    let res = client
        .put(format!("{}/orders/{}", srv.base_url, order_id))
        .bearer_auth(&patient)
        .json(&json!({ "status": "CONFIRMED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Stores may not cancel.
    let res = client
        .put(format!("{}/orders/{}", srv.base_url, order_id))
        .bearer_auth(&store)
        .json(&json!({ "status": "CANCELLED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Unknown status names are rejected outright.
    let res = client
        .put(format!("{}/orders/{}", srv.base_url, order_id))
        .bearer_auth(&store)
        .json(&json!({ "status": "TELEPORTED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "INVALID_STATUS");

    // Deactivation is blocked while the order is open.
    let res = client
        .delete(format!("{}/inventory/{}", srv.base_url, entry_id))
        .bearer_auth(&store)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "PENDING_ORDERS_EXIST");

    // The patient cancels; stock goes back on the shelf.
    let res = client
        .delete(format!("{}/orders/{}", srv.base_url, order_id))
        .bearer_auth(&patient)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["order"]["status"], "CANCELLED");

    let shelf = store_inventory(&client, &srv, &store).await;
    assert_eq!(shelf[0]["stock"], 40);

    // Cancelling twice conflicts and must not restock twice.
    let res = client
        .delete(format!("{}/orders/{}", srv.base_url, order_id))
        .bearer_auth(&patient)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "ORDER_NOT_CANCELLABLE");

    let shelf = store_inventory(&client, &srv, &store).await;
    assert_eq!(shelf[0]["stock"], 40);

    // With no open orders the entry can be retired.
    let res = client
        .delete(format!("{}/inventory/{}", srv.base_url, entry_id))
        .bearer_auth(&store)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn inventory_corrections_and_alerts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = setup_admin(&client, &srv).await;

    let (store, _) =
        setup_verified_store(&client, &srv, &admin, "auth-store", "City Pharmacy").await;
    let entry =
        stock_medicine(&client, &srv, &store, "Paracetamol", "Acetaminophen", 500, 30).await;
    let entry_id = entry["id"].as_str().unwrap().to_string();

    // Absolute correction of price and threshold.
    let res = client
        .patch(format!("{}/inventory/{}", srv.base_url, entry_id))
        .bearer_auth(&store)
        .json(&json!({ "priceCents": 550, "minStockLevel": 30 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["entry"]["priceCents"], 550);
    assert_eq!(body["entry"]["stock"], 30);

    // stock == threshold is an alert.
    let res = client
        .get(format!("{}/inventory/alerts", srv.base_url))
        .bearer_auth(&store)
        .send()
        .await
        .unwrap();
    let alerts: Vec<Value> = res.json().await.unwrap();
    assert_eq!(alerts.len(), 1);

    // Raising stock above the threshold clears it.
    let res = client
        .patch(format!("{}/inventory/{}", srv.base_url, entry_id))
        .bearer_auth(&store)
        .json(&json!({ "stock": 31 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/inventory/alerts", srv.base_url))
        .bearer_auth(&store)
        .send()
        .await
        .unwrap();
    let alerts: Vec<Value> = res.json().await.unwrap();
    assert!(alerts.is_empty());

    // Negative corrections are rejected.
    let res = client
        .patch(format!("{}/inventory/{}", srv.base_url, entry_id))
        .bearer_auth(&store)
        .json(&json!({ "stock": -1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "CANNOT_BE_NEGATIVE");

    // Another store's entry id reads as missing, not as theirs.
    let (rival, _) =
        setup_verified_store(&client, &srv, &admin, "auth-rival", "Corner Drugstore").await;
    let res = client
        .patch(format!("{}/inventory/{}", srv.base_url, entry_id))
        .bearer_auth(&rival)
        .json(&json!({ "stock": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "NOT_FOUND");
}
