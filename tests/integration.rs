use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tempfile::TempDir;

fn medifind_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_medifind"))
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

const PHARMACIES: &str = r#"[
  { "id": "p1", "name": "Harbor Pharmacy", "location": "Boston", "address": "18 Atlantic Ave", "distanceKm": 0.9 },
  { "id": "p2", "name": "Elm Street Drugs", "location": "Springfield", "address": "742 Evergreen Ter" }
]"#;

const MEDICINES: &str = r#"[
  { "id": "m1", "name": "Paracetamol", "genericName": "Acetaminophen" },
  { "id": "m2", "name": "XYZ-nonexistent-inventory-med", "genericName": "Placebo" },
  { "id": "m3", "name": "Tylenol", "genericName": "Acetaminophen" },
  { "id": "m4", "name": "Paracetamol Tablet", "genericName": "Acetaminophen" }
]"#;

const INVENTORY: &str = r#"[
  { "pharmacyId": "p1", "medicineId": "m1", "price": 5.50, "availability": "in_stock" },
  { "pharmacyId": "p1", "medicineId": "m4", "price": 6.00, "availability": "low_stock" }
]"#;

/// Write a config and dataset into a temp dir. `inventory` replaces the default rows.
fn setup_env(port: u16, inventory: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("pharmacies.json"), PHARMACIES).unwrap();
    fs::write(data_dir.join("medicines.json"), MEDICINES).unwrap();
    fs::write(data_dir.join("inventory.json"), inventory).unwrap();

    let config_content = format!(
        r#"[server]
bind = "127.0.0.1:{}"
cors_origin = "*"

[data]
dir = "{}"
"#,
        port,
        data_dir.display()
    );
    let config_path = root.join("medifind.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn command(config_path: &Path) -> Command {
    let mut cmd = Command::new(medifind_binary());
    cmd.arg("--config")
        .arg(config_path.to_str().unwrap())
        .env_remove("PORT")
        .env_remove("CORS_ORIGIN");
    cmd
}

fn run_medifind(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let output = command(config_path)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run medifind: {}", e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Kills the server process when dropped, so a failed assertion never leaks it.
struct Server(Child);

impl Drop for Server {
    fn drop(&mut self) {
        self.0.kill().ok();
        self.0.wait().ok();
    }
}

fn start_server(config_path: &Path, port: u16) -> Server {
    let child = command(config_path)
        .arg("serve")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap_or_else(|e| panic!("Failed to start server: {}", e));
    let server = Server(child);

    let url = format!("http://127.0.0.1:{}/api/health", port);
    for _ in 0..50 {
        std::thread::sleep(std::time::Duration::from_millis(100));
        if let Ok(resp) = reqwest::blocking::get(&url) {
            if resp.status().is_success() {
                return server;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

fn get(port: u16, path: &str, query: &[(&str, &str)]) -> (u16, serde_json::Value) {
    let client = reqwest::blocking::Client::new();
    let resp = client
        .get(format!("http://127.0.0.1:{}{}", port, path))
        .query(query)
        .send()
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().unwrap())
}

// ============ HTTP API ============

#[test]
fn test_server_health() {
    let port = find_free_port();
    let (_tmp, config_path) = setup_env(port, INVENTORY);
    let _server = start_server(&config_path, port);

    let (status, body) = get(port, "/api/health", &[]);
    assert_eq!(status, 200);
    assert_eq!(body, serde_json::json!({ "ok": true, "service": "MediFind Backend" }));
}

#[test]
fn test_server_pharmacies() {
    let port = find_free_port();
    let (_tmp, config_path) = setup_env(port, INVENTORY);
    let _server = start_server(&config_path, port);

    let (status, body) = get(port, "/api/pharmacies", &[]);
    assert_eq!(status, 200);
    let all = body.as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["id"], "p1");
    assert_eq!(all[0]["distanceKm"], 0.9);
    assert!(all[1].get("distanceKm").is_none());

    let (_, body) = get(port, "/api/pharmacies", &[("location", " SPRING ")]);
    let filtered = body.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["name"], "Elm Street Drugs");
}

#[test]
fn test_server_search_example_row() {
    let port = find_free_port();
    let (_tmp, config_path) = setup_env(port, INVENTORY);
    let _server = start_server(&config_path, port);

    let (status, body) = get(
        port,
        "/api/medicines/search",
        &[("q", "paracetamol"), ("location", "boston"), ("unused", "x")],
    );
    assert_eq!(status, 200);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        serde_json::json!({
            "medicineId": "m1",
            "medicineName": "Paracetamol",
            "genericName": "Acetaminophen",
            "pharmacyId": "p1",
            "pharmacyName": "Harbor Pharmacy",
            "location": "Boston",
            "price": 5.5,
            "availability": "in_stock"
        })
    );
    assert_eq!(rows[1]["medicineId"], "m4");
    assert_eq!(rows[1]["availability"], "low_stock");
}

#[test]
fn test_server_search_tokenized_query() {
    let port = find_free_port();
    let (_tmp, config_path) = setup_env(port, INVENTORY);
    let _server = start_server(&config_path, port);

    let (status, body) = get(port, "/api/medicines/search", &[("q", "para tab")]);
    assert_eq!(status, 200);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["medicineName"], "Paracetamol Tablet");
}

#[test]
fn test_server_search_missing_query() {
    let port = find_free_port();
    let (_tmp, config_path) = setup_env(port, INVENTORY);
    let _server = start_server(&config_path, port);

    let (status, body) = get(port, "/api/medicines/search", &[]);
    assert_eq!(status, 400);
    assert_eq!(body, serde_json::json!({ "error": "Missing query parameter q" }));

    let (status, body) = get(port, "/api/medicines/search", &[("q", "   ")]);
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Missing query parameter q");
}

#[test]
fn test_server_repeated_parameters_use_first_value() {
    let port = find_free_port();
    let (_tmp, config_path) = setup_env(port, INVENTORY);
    let _server = start_server(&config_path, port);

    let client = reqwest::blocking::Client::new();
    let resp = client
        .get(format!(
            "http://127.0.0.1:{}/api/medicines/search?q=paracetamol&q=tylenol&location=boston",
            port
        ))
        .send()
        .unwrap();
    assert_eq!(resp.status(), 200);
    let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("application/json"), "{}", content_type);
    let body: serde_json::Value = resp.json().unwrap();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["medicineName"], "Paracetamol");

    let (status, body) = get(
        port,
        "/api/ai/alternatives",
        &[("name", "tylenol"), ("name", "paracetamol")],
    );
    assert_eq!(status, 200);
    assert_eq!(body[0]["name"], "Paracetamol");

    let (status, body) = get(
        port,
        "/api/pharmacies",
        &[("location", "springfield"), ("location", "boston")],
    );
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "p2");
}

#[test]
fn test_server_cors_any_origin() {
    let port = find_free_port();
    let (_tmp, config_path) = setup_env(port, INVENTORY);
    let _server = start_server(&config_path, port);

    let client = reqwest::blocking::Client::new();
    let resp = client
        .get(format!("http://127.0.0.1:{}/api/health", port))
        .header("Origin", "http://localhost:5173")
        .send()
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}

#[test]
fn test_server_cors_configured_origin() {
    let port = find_free_port();
    let (_tmp, config_path) = setup_env(port, INVENTORY);
    let config = fs::read_to_string(&config_path)
        .unwrap()
        .replace(r#"cors_origin = "*""#, r#"cors_origin = "http://localhost:5173""#);
    fs::write(&config_path, config).unwrap();
    let _server = start_server(&config_path, port);

    let client = reqwest::blocking::Client::new();
    let resp = client
        .get(format!("http://127.0.0.1:{}/api/pharmacies", port))
        .header("Origin", "http://localhost:5173")
        .send()
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );

    let resp = client
        .get(format!("http://127.0.0.1:{}/api/pharmacies", port))
        .header("Origin", "http://evil.example")
        .send()
        .unwrap();
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

#[test]
fn test_server_search_no_match_is_empty() {
    let port = find_free_port();
    let (_tmp, config_path) = setup_env(port, INVENTORY);
    let _server = start_server(&config_path, port);

    let (status, body) = get(port, "/api/medicines/search", &[("q", "unobtainium")]);
    assert_eq!(status, 200);
    assert_eq!(body, serde_json::json!([]));
}

#[test]
fn test_server_search_synthetic_fallback() {
    let port = find_free_port();
    let (_tmp, config_path) = setup_env(port, INVENTORY);
    let _server = start_server(&config_path, port);

    let query = [
        ("q", "XYZ-nonexistent-inventory-med"),
        ("location", "Springfield"),
    ];
    let (status, body) = get(port, "/api/medicines/search", &query);
    assert_eq!(status, 200);
    let rows = body.as_array().unwrap();
    assert!(!rows.is_empty());
    for row in rows {
        assert_eq!(row["pharmacyId"], "p2");
        let availability = row["availability"].as_str().unwrap();
        assert!(availability == "in_stock" || availability == "low_stock");
    }

    // Hash-based, so a repeat request returns the same rows.
    let (_, again) = get(port, "/api/medicines/search", &query);
    assert_eq!(body, again);
}

#[test]
fn test_server_search_sorted_by_price() {
    let port = find_free_port();
    let (_tmp, config_path) = setup_env(port, INVENTORY);
    let _server = start_server(&config_path, port);

    for (q, location) in [("acetaminophen", ""), ("paracetamol", "springfield")] {
        let (_, body) = get(
            port,
            "/api/medicines/search",
            &[("q", q), ("location", location)],
        );
        let prices: Vec<f64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["price"].as_f64().unwrap())
            .collect();
        assert!(!prices.is_empty(), "no rows for {}", q);
        assert!(prices.windows(2).all(|w| w[0] <= w[1]), "unsorted: {:?}", prices);
    }
}

#[test]
fn test_server_search_dangling_reference_is_internal_error() {
    let port = find_free_port();
    let inventory = r#"[
  { "pharmacyId": "p9", "medicineId": "m1", "price": 1.0, "availability": "in_stock" }
]"#;
    let (_tmp, config_path) = setup_env(port, inventory);
    let _server = start_server(&config_path, port);

    let (status, body) = get(port, "/api/medicines/search", &[("q", "paracetamol")]);
    assert_eq!(status, 500);
    assert!(body["error"].as_str().unwrap().contains("p9"));
}

#[test]
fn test_server_alternatives() {
    let port = find_free_port();
    let (_tmp, config_path) = setup_env(port, INVENTORY);
    let _server = start_server(&config_path, port);

    let (status, body) = get(port, "/api/ai/alternatives", &[("name", "Paracetamol")]);
    assert_eq!(status, 200);
    let suggestions = body.as_array().unwrap();
    let names: Vec<&str> = suggestions
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Tylenol", "Paracetamol Tablet"]);
    for s in suggestions {
        assert_eq!(s["reason"], "Shares generic Acetaminophen.");
        let pct = s["estimatedSavingsPercent"].as_u64().unwrap();
        assert!((10..=34).contains(&pct));
    }
}

#[test]
fn test_server_alternatives_no_match_and_missing_name() {
    let port = find_free_port();
    let (_tmp, config_path) = setup_env(port, INVENTORY);
    let _server = start_server(&config_path, port);

    let (status, body) = get(port, "/api/ai/alternatives", &[("name", "unobtainium")]);
    assert_eq!(status, 200);
    assert_eq!(body, serde_json::json!([]));

    let (status, body) = get(port, "/api/ai/alternatives", &[]);
    assert_eq!(status, 400);
    assert_eq!(body, serde_json::json!({ "error": "Missing name parameter" }));
}

// ============ CLI ============

#[test]
fn test_cli_search_json() {
    let (_tmp, config_path) = setup_env(find_free_port(), INVENTORY);

    let (stdout, stderr, success) =
        run_medifind(&config_path, &["search", "paracetamol", "--json"]);
    assert!(success, "search failed: stdout={}, stderr={}", stdout, stderr);
    let rows: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[0]["price"], 5.5);
}

#[test]
fn test_cli_search_table() {
    let (_tmp, config_path) = setup_env(find_free_port(), INVENTORY);

    let (stdout, _, success) = run_medifind(&config_path, &["search", "tylenol"]);
    assert!(success);
    assert!(stdout.contains("No results."));

    let (stdout, _, success) =
        run_medifind(&config_path, &["search", "para", "--location", "boston"]);
    assert!(success);
    assert!(stdout.contains("Harbor Pharmacy"));
    assert!(stdout.contains("5.50"));
}

#[test]
fn test_cli_search_blank_query_fails() {
    let (_tmp, config_path) = setup_env(find_free_port(), INVENTORY);

    let (_, stderr, success) = run_medifind(&config_path, &["search", "  "]);
    assert!(!success);
    assert!(stderr.contains("Missing query parameter q"));
}

#[test]
fn test_cli_pharmacies() {
    let (_tmp, config_path) = setup_env(find_free_port(), INVENTORY);

    let (stdout, _, success) =
        run_medifind(&config_path, &["pharmacies", "--location", "boston", "--json"]);
    assert!(success);
    let found: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["id"], "p1");
}

#[test]
fn test_cli_alternatives() {
    let (_tmp, config_path) = setup_env(find_free_port(), INVENTORY);

    let (stdout, _, success) = run_medifind(&config_path, &["alternatives", "tylenol"]);
    assert!(success);
    assert!(stdout.contains("1. Paracetamol"));
    assert!(stdout.contains("Shares generic Acetaminophen."));
}

#[test]
fn test_cli_check() {
    let (_tmp, config_path) = setup_env(find_free_port(), INVENTORY);
    let (stdout, _, success) = run_medifind(&config_path, &["check"]);
    assert!(success);
    assert!(stdout.contains("pharmacies: 2"));
    assert!(stdout.contains("ok"));

    let dangling = r#"[
  { "pharmacyId": "p1", "medicineId": "m77", "price": 1.0, "availability": "in_stock" }
]"#;
    let (_tmp, config_path) = setup_env(find_free_port(), dangling);
    let (stdout, stderr, success) = run_medifind(&config_path, &["check"]);
    assert!(!success);
    assert!(stdout.contains("m77"));
    assert!(stderr.contains("1 dangling inventory reference(s)"));
}

#[test]
fn test_cli_explicit_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.toml");
    let (_, stderr, success) = run_medifind(&missing, &["check"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}
