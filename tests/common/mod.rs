use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// The server refuses to start without a reachable database, so every
/// integration test bails out early when DATABASE_URL is not set.
pub fn database_available() -> bool {
    if std::env::var("DATABASE_URL").is_ok() {
        return true;
    }
    eprintln!("skipping: DATABASE_URL is not set");
    false
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/storefront-api");
        cmd.env("PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit the environment so the server sees DATABASE_URL and JWT_SECRET
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// Register a throwaway user and return its bearer token.
#[allow(dead_code)]
pub async fn register_user(base_url: &str) -> Result<(String, String)> {
    let (_, email, token) = register_user_details(base_url).await?;
    Ok((email, token))
}

/// Same as `register_user` but also returns the new account id.
#[allow(dead_code)]
pub async fn register_user_details(base_url: &str) -> Result<(i64, String, String)> {
    let client = reqwest::Client::new();
    let email = format!(
        "user-{}@test.example",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_nanos()
    );

    let res = client
        .post(format!("{}/api/v1/register", base_url))
        .json(&serde_json::json!({
            "name": "Test User",
            "email": email,
            "password": "test-password",
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration failed with {}",
        res.status()
    );

    let body = res.json::<serde_json::Value>().await?;
    let id = body["user"]["id"]
        .as_i64()
        .context("registration response missing user id")?;
    let token = body["token"]
        .as_str()
        .context("registration response missing token")?
        .to_string();
    Ok((id, email, token))
}

/// Log in as the seeded bootstrap admin and return (id, token).
#[allow(dead_code)]
pub async fn admin_login(base_url: &str) -> Result<(i64, String)> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/v1/login", base_url))
        .json(&serde_json::json!({
            "email": "admin@storefront.local",
            "password": "admin123",
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "admin login failed with {}",
        res.status()
    );

    let body = res.json::<serde_json::Value>().await?;
    let id = body["user"]["id"]
        .as_i64()
        .context("login response missing admin id")?;
    let token = body["token"]
        .as_str()
        .context("login response missing token")?
        .to_string();
    Ok((id, token))
}
