use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct CountEntry {
    value: String,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct MoodLogResponse {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    mood_counts: Vec<CountEntry>,
    average_focus: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TotalEntry {
    student: String,
    points: i64,
}

#[derive(Debug, Deserialize)]
struct LeaderboardResponse {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    totals: Vec<TotalEntry>,
}

#[derive(Debug, Deserialize)]
struct BookingsResponse {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_dir() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut dir = std::env::temp_dir();
    dir.push(format!("edutransform_http_{}_{}", std::process::id(), nanos));
    dir.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/leaderboard")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_dir = unique_data_dir();
    let child = Command::new(env!("CARGO_BIN_EXE_edutransform"))
        .env("PORT", port.to_string())
        .env("EDUTRANSFORM_DATA_DIR", data_dir)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

#[tokio::test]
async fn http_mood_log_appends_and_aggregates() {
    let _guard = TEST_LOCK.lock().await;
    // own server: the scenario asserts the exact table contents
    let server = spawn_server().await;
    let client = Client::new();

    for entry in [
        serde_json::json!({ "date": "2024-01-01", "mood": "Happy", "focus": 5 }),
        serde_json::json!({ "date": "2024-01-02", "mood": "Sad", "focus": 2 }),
    ] {
        let response = client
            .post(format!("{}/api/mood-log", server.base_url))
            .json(&entry)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let log: MoodLogResponse = client
        .get(format!("{}/api/mood-log", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(log.columns, vec!["Date", "Mood", "Focus"]);
    assert_eq!(log.rows.len(), 2);
    assert_eq!(log.rows[0], vec!["2024-01-01", "Happy", "5"]);
    assert_eq!(log.rows[1], vec!["2024-01-02", "Sad", "2"]);

    let total: u64 = log.mood_counts.iter().map(|entry| entry.count).sum();
    assert_eq!(total, 2);
    for mood in ["Happy", "Sad"] {
        let entry = log
            .mood_counts
            .iter()
            .find(|entry| entry.value == mood)
            .expect("missing mood count");
        assert_eq!(entry.count, 1);
    }

    assert_eq!(log.average_focus, Some(3.5));
}

#[tokio::test]
async fn http_leaderboard_sorts_raw_rows_and_totals() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for (student, points) in [("Ann", 10), ("Bob", 20), ("Ann", 5)] {
        let response = client
            .post(format!("{}/api/leaderboard", server.base_url))
            .json(&serde_json::json!({ "student": student, "points": points }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let board: LeaderboardResponse = client
        .get(format!("{}/api/leaderboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(board.columns, vec!["Student", "Points"]);

    // raw award rows stay unaggregated; other tests may add their own rows,
    // so check the relative order of ours
    let ours: Vec<(&str, &str)> = board
        .rows
        .iter()
        .filter(|row| row[0] == "Ann" || row[0] == "Bob")
        .map(|row| (row[0].as_str(), row[1].as_str()))
        .collect();
    assert_eq!(ours, vec![("Bob", "20"), ("Ann", "10"), ("Ann", "5")]);

    let ann = board.totals.iter().find(|t| t.student == "Ann").unwrap();
    assert_eq!(ann.points, 15);
    let bob = board.totals.iter().find(|t| t.student == "Bob").unwrap();
    assert_eq!(bob.points, 20);
}

#[tokio::test]
async fn http_bookings_unify_on_superset_schema() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: BookingsResponse = client
        .get(format!("{}/api/bookings", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let student_booking =
        serde_json::json!({ "name": "Riley", "date": "2024-03-01", "reason": "Anxiety" });
    let parent_booking = serde_json::json!({
        "name": "Sam", "child": "Pat", "date": "2024-03-02", "reason": "Academic"
    });
    for booking in [student_booking, parent_booking] {
        let response = client
            .post(format!("{}/api/bookings", server.base_url))
            .json(&booking)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let after: BookingsResponse = client
        .get(format!("{}/api/bookings", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(after.columns, vec!["Name", "Child", "Date", "Reason"]);
    assert_eq!(after.rows.len(), before.rows.len() + 2);
    let last_two = &after.rows[after.rows.len() - 2..];
    assert_eq!(last_two[0], vec!["Riley", "", "2024-03-01", "Anxiety"]);
    assert_eq!(last_two[1], vec!["Sam", "Pat", "2024-03-02", "Academic"]);
}

#[tokio::test]
async fn http_validation_rejects_bad_input_without_writing() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: LeaderboardResponse = client
        .get(format!("{}/api/leaderboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    for payload in [
        serde_json::json!({ "student": "   ", "points": 5 }),
        serde_json::json!({ "student": "Ann", "points": 0 }),
    ] {
        let response = client
            .post(format!("{}/api/leaderboard", server.base_url))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    let response = client
        .post(format!("{}/api/mood-log", server.base_url))
        .json(&serde_json::json!({ "mood": "Ecstatic", "focus": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/api/bookings", server.base_url))
        .json(&serde_json::json!({
            "name": "Riley", "date": "2024-03-01", "reason": "Family"
        }))
        .send()
        .await
        .unwrap();
    // "Family" is a parent-only reason; this booking has no child
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let after: LeaderboardResponse = client
        .get(format!("{}/api/leaderboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after.rows.len(), before.rows.len());
}

#[tokio::test]
async fn http_student_mood_form_redirects_with_notice() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/student/mood", server.base_url))
        .form(&[("mood", "Neutral"), ("focus", "3")])
        .send()
        .await
        .unwrap();

    // the redirect lands back on the dashboard with a success notice
    assert!(response.status().is_success());
    assert!(response.url().path().ends_with("/student"));
    let body = response.text().await.unwrap();
    assert!(body.contains("Entry logged"));
    assert!(body.contains("Student Dashboard"));
}

#[tokio::test]
async fn http_concurrent_appends_all_survive() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: LeaderboardResponse = client
        .get(format!("{}/api/leaderboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for i in 0..8 {
        let client = client.clone();
        let url = format!("{}/api/leaderboard", server.base_url);
        tasks.push(tokio::spawn(async move {
            let response = client
                .post(url)
                .json(&serde_json::json!({ "student": format!("racer-{i}"), "points": 1 }))
                .send()
                .await
                .unwrap();
            assert!(response.status().is_success());
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let after: LeaderboardResponse = client
        .get(format!("{}/api/leaderboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(after.rows.len(), before.rows.len() + 8);
    for i in 0..8 {
        let name = format!("racer-{i}");
        assert!(after.totals.iter().any(|t| t.student == name));
    }
}
