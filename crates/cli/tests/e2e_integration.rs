//! End-to-end tests for SmallTalk.
//!
//! These run whole conversations through the assembled stack: config file,
//! generator factories, bot, LRU store and the HTTP gateway.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use smalltalk_bot::{ChatBot, HELP_TEXT};
use smalltalk_config::AppConfig;
use smalltalk_core::{Dialog, DialogStorage, Error, ProfileError, ProfileGenerator, UserId};
use smalltalk_gateway::{GatewayState, build_bot, build_router};
use smalltalk_memory::LruDialogStorage;
use smalltalk_providers::{EchoReply, OpenAiCompatReply, ProfilePool, StaticProfiles};

// ── Helpers ──────────────────────────────────────────────────────────────

fn uid(s: &str) -> UserId {
    UserId::new(s).unwrap()
}

fn echo(text: &str) -> String {
    format!("Thank you for sending me this message: {text}")
}

/// Write `profiles` into a fresh directory plus a config pointing at it.
fn write_config(max_context_len: usize, profiles: &[&str]) -> (tempfile::TempDir, AppConfig) {
    let tmp = tempfile::tempdir().unwrap();
    let profiles_dir = tmp.path().join("profiles");
    std::fs::create_dir(&profiles_dir).unwrap();
    for (i, profile) in profiles.iter().enumerate() {
        std::fs::write(profiles_dir.join(format!("{i:02}.txt")), profile).unwrap();
    }

    let config_path = tmp.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
max_context_len = {max_context_len}

[storage]
max_dialogs = 3

[reply]
backend = "echo"

[profiles]
source = "static"
dir = "{}"

[gateway]
secure_cookie = false
"#,
            profiles_dir.display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();

    let config = AppConfig::load_from(&config_path).unwrap();
    (tmp, config)
}

fn chat(text: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header(header::COOKIE, format!("user_id={user}"));
    }
    builder
        .body(Body::from(serde_json::json!({ "text": text }).to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_of(app: &axum::Router, text: &str, user: &str) -> String {
    let response = app.clone().oneshot(chat(text, Some(user))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "{text} as {user}");
    body_json(response).await["text"]
        .as_str()
        .unwrap()
        .to_string()
}

// ── Config → bot ─────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_config_file_drives_bot_assembly() {
    let (_tmp, config) = write_config(2, &["only persona"]);
    assert_eq!(config.max_context_len, 2);

    let (bot, storage) = build_bot(&config).unwrap();
    assert_eq!(bot.max_context_len(), 2);
    assert_eq!(storage.capacity(), 3);

    let id = uid("terminal-user");
    assert_eq!(bot.respond(&id, "/profile").await.unwrap(), "only persona");
    assert_eq!(bot.respond(&id, "hello").await.unwrap(), echo("hello"));
    bot.respond(&id, "again").await.unwrap();

    assert_eq!(
        bot.respond(&id, "/context").await.unwrap(),
        format!("again\n{}", echo("again"))
    );
}

#[tokio::test]
async fn e2e_missing_profiles_dir_fails_assembly() {
    let (tmp, mut config) = write_config(5, &[]);
    config.profiles.dir = tmp.path().join("does-not-exist");
    assert!(build_bot(&config).is_err());
}

// ── Full conversation over HTTP ──────────────────────────────────────────

#[tokio::test]
async fn e2e_browser_session_over_http() {
    let (_tmp, config) = write_config(3, &["persona one"]);
    let (bot, storage) = build_bot(&config).unwrap();
    let app = build_router(Arc::new(GatewayState::new(
        bot,
        storage.clone(),
        config.gateway.clone(),
    )));

    // Greeting.
    let greeting = app
        .clone()
        .oneshot(Request::builder().uri("/startchat").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(greeting).await["text"], HELP_TEXT);

    // First message mints an id.
    let first = app.clone().oneshot(chat("hi", None)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let cookie = first
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(!cookie.contains("Secure"));
    let user = cookie
        .strip_prefix("user_id=")
        .and_then(|rest| rest.split(';').next())
        .unwrap()
        .to_string();
    assert_eq!(body_json(first).await["text"], echo("hi"));

    // The browser replays the cookie from now on.
    assert_eq!(text_of(&app, "second", &user).await, echo("second"));
    assert_eq!(
        text_of(&app, "/context", &user).await,
        format!("{}\nsecond\n{}", echo("hi"), echo("second"))
    );
    assert_eq!(text_of(&app, "/profile", &user).await, "persona one");

    assert_eq!(text_of(&app, "/clear", &user).await, "Do we know each other?");
    assert_eq!(text_of(&app, "/context", &user).await, "Context is empty.");

    let bad = app.clone().oneshot(chat("/nope", Some(&user))).await.unwrap();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(bad).await["error"], "Command /nope is not supported");

    assert_eq!(
        text_of(&app, "/new", &user).await,
        "Goodbye forever my dear friend :("
    );
    assert_eq!(storage.len().await, 1);
}

#[tokio::test]
async fn e2e_capacity_evicts_oldest_browser() {
    let (_tmp, config) = write_config(5, &["p"]);
    let (bot, storage) = build_bot(&config).unwrap();
    let app = build_router(Arc::new(GatewayState::new(
        bot,
        storage.clone(),
        config.gateway.clone(),
    )));

    for user in ["u1", "u2", "u3"] {
        text_of(&app, &format!("I am {user}"), user).await;
    }
    // Refresh u1 so u2 becomes the oldest.
    text_of(&app, "/profile", "u1").await;
    text_of(&app, "I am u4", "u4").await;

    assert_eq!(storage.len().await, 3);
    assert_eq!(storage.evictions(), 1);
    assert_eq!(text_of(&app, "/context", "u2").await, "Context is empty.");
    assert_eq!(
        text_of(&app, "/context", "u1").await,
        format!("I am u1\n{}", echo("I am u1"))
    );
}

// ── Shared store, several bots ───────────────────────────────────────────

struct Counting(AtomicUsize);

impl ProfileGenerator for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn generate(&self) -> Result<String, ProfileError> {
        Ok(format!("persona {}", self.0.fetch_add(1, Ordering::SeqCst)))
    }
}

#[tokio::test]
async fn e2e_terminal_and_http_share_one_store() {
    let storage = Arc::new(LruDialogStorage::with_capacity(10).unwrap());
    let bot = Arc::new(ChatBot::new(
        Arc::new(EchoReply),
        Arc::new(Counting(AtomicUsize::new(0))),
        storage.clone(),
    ));
    let app = build_router(Arc::new(GatewayState::new(
        bot.clone(),
        storage.clone(),
        Default::default(),
    )));

    bot.respond(&uid("shared"), "from terminal").await.unwrap();
    assert_eq!(
        text_of(&app, "/context", "shared").await,
        format!("from terminal\n{}", echo("from terminal"))
    );

    // What the store hands out is a copy.
    let unused = || -> smalltalk_core::Result<Dialog> { Ok(Dialog::default()) };
    let mut copy = storage.get(&uid("shared"), &unused).await.unwrap();
    copy.messages.clear();
    assert_eq!(text_of(&app, "/profile", "shared").await, "persona 0");
    assert_ne!(text_of(&app, "/context", "shared").await, "Context is empty.");
}

// ── OpenAI-compatible backend ────────────────────────────────────────────

/// Minimal `/chat/completions` server answering with the message count.
async fn spawn_completions_server() -> String {
    use axum::{Json, Router, routing::post};

    async fn completions(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
        let count = body["messages"].as_array().map(|m| m.len()).unwrap_or(0);
        Json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": format!(" saw {count} \n") } }]
        }))
    }

    let app = Router::new().route("/v1/chat/completions", post(completions));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

#[tokio::test]
async fn e2e_openai_compatible_backend_sees_bounded_context() {
    let base_url = spawn_completions_server().await;
    let reply = OpenAiCompatReply::new(
        &base_url,
        "sk-test",
        "test-model",
        std::time::Duration::from_secs(5),
    );
    let profiles = StaticProfiles::new(Arc::new(
        ProfilePool::from_profiles(vec!["likes tea".into()]).unwrap(),
    ));
    let storage = Arc::new(LruDialogStorage::with_capacity(4).unwrap());
    let bot = ChatBot::new(Arc::new(reply), Arc::new(profiles), storage).with_max_context_len(3);

    let id = uid("api-user");
    // System message plus one user message.
    assert_eq!(bot.respond(&id, "one").await.unwrap(), "saw 2");
    // System plus [one, saw 2, two].
    assert_eq!(bot.respond(&id, "two").await.unwrap(), "saw 4");
    // The window stays at three, so the request size stops growing.
    assert_eq!(bot.respond(&id, "three").await.unwrap(), "saw 4");
}

#[tokio::test]
async fn e2e_unreachable_backend_keeps_dialog() {
    // Nothing listens on this port once the listener is dropped.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let reply = OpenAiCompatReply::new(
        format!("http://{addr}/v1"),
        "sk-test",
        "test-model",
        std::time::Duration::from_secs(5),
    );
    let storage = Arc::new(LruDialogStorage::with_capacity(4).unwrap());
    let bot = ChatBot::new(
        Arc::new(reply),
        Arc::new(Counting(AtomicUsize::new(0))),
        storage.clone(),
    );

    let id = uid("offline");
    let err = bot.respond(&id, "hello?").await.unwrap_err();
    assert!(matches!(err, Error::Reply(_)));
    assert!(!err.is_user_error());

    // The profile was created on fetch; the message was not kept.
    assert_eq!(bot.respond(&id, "/context").await.unwrap(), "Context is empty.");
    assert_eq!(bot.respond(&id, "/profile").await.unwrap(), "persona 0");
}
