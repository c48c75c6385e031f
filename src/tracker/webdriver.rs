//! Minimal W3C WebDriver client: just enough to open a page in a headless
//! browser, look elements up by XPath and read their rendered text.

use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::time::{sleep, Duration};

use crate::error::{Error, Result};

/// Key under which W3C drivers return element references.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

#[derive(Deserialize)]
struct Envelope<T> {
    value: T,
}

#[derive(Deserialize)]
struct NewSession {
    #[serde(rename = "sessionId")]
    session_id: String,
}

#[derive(Deserialize)]
struct Failure {
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct Status {
    ready: bool,
}

pub fn chrome_capabilities(headless: bool) -> Value {
    let mut args = vec!["--disable-gpu", "--no-sandbox"];
    if headless {
        args.insert(0, "--headless");
    }
    json!({
        "capabilities": {
            "alwaysMatch": {
                "browserName": "chrome",
                "goog:chromeOptions": { "args": args }
            }
        }
    })
}

/// Pull element ids out of a `find elements` response value.
pub fn element_ids(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|elements| {
            elements
                .iter()
                .filter_map(|element| element.get(ELEMENT_KEY).and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// One browser session. Call [`WebDriverSession::close`] when done; the
/// browser stays open otherwise.
pub struct WebDriverSession {
    client: Client,
    endpoint: String,
    session_id: String,
}

impl WebDriverSession {
    pub async fn start(client: &Client, endpoint: &str, capabilities: Value) -> Result<Self> {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        let created: NewSession =
            send(client, Method::POST, &format!("{}/session", endpoint), Some(capabilities)).await?;
        tracing::debug!("Opened WebDriver session {}", created.session_id);

        Ok(Self {
            client: client.clone(),
            endpoint,
            session_id: created.session_id,
        })
    }

    pub fn id(&self) -> &str {
        &self.session_id
    }

    /// How long element lookups keep polling for a match.
    pub async fn set_implicit_wait(&self, wait: Duration) -> Result<()> {
        let _: Value = self
            .command(
                Method::POST,
                "timeouts",
                Some(json!({ "implicit": wait.as_millis() as u64 })),
            )
            .await?;
        Ok(())
    }

    pub async fn navigate(&self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        let _: Value = self
            .command(Method::POST, "url", Some(json!({ "url": url })))
            .await?;
        Ok(())
    }

    pub async fn find_elements_by_xpath(&self, xpath: &str) -> Result<Vec<String>> {
        let found: Value = self
            .command(
                Method::POST,
                "elements",
                Some(json!({ "using": "xpath", "value": xpath })),
            )
            .await?;
        Ok(element_ids(&found))
    }

    pub async fn element_text(&self, element_id: &str) -> Result<String> {
        self.command(Method::GET, &format!("element/{}/text", element_id), None)
            .await
    }

    pub async fn close(self) -> Result<()> {
        let url = format!("{}/session/{}", self.endpoint, self.session_id);
        let _: Value = send(&self.client, Method::DELETE, &url, None).await?;
        tracing::debug!("Closed WebDriver session {}", self.session_id);
        Ok(())
    }

    async fn command<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let url = format!("{}/session/{}/{}", self.endpoint, self.session_id, path);
        send(&self.client, method, &url, body).await
    }
}

async fn send<T: DeserializeOwned>(
    client: &Client,
    method: Method,
    url: &str,
    body: Option<Value>,
) -> Result<T> {
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let detail = serde_json::from_str::<Envelope<Failure>>(&text)
            .map(|failure| format!("{}: {}", failure.value.error, failure.value.message))
            .unwrap_or(text);
        return Err(Error::WebDriver(format!("{} {} - {}", url, status, detail)));
    }

    let envelope: Envelope<T> = serde_json::from_str(&text)?;
    Ok(envelope.value)
}

/// A chromedriver child process serving the WebDriver endpoint. Killed on drop.
pub struct ChromeDriverProcess {
    child: Child,
    endpoint: String,
}

impl ChromeDriverProcess {
    pub async fn spawn(client: &Client, program: &Path, endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint)
            .map_err(|e| Error::Config(format!("invalid WebDriver URL `{}`: {}", endpoint, e)))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::Config(format!("WebDriver URL `{}` has no port", endpoint)))?;

        tracing::info!("Starting {} on port {}", program.display(), port);
        let child = Command::new(program)
            .arg(format!("--port={}", port))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let driver = Self {
            child,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        };
        driver.wait_until_ready(client).await?;
        Ok(driver)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    async fn wait_until_ready(&self, client: &Client) -> Result<()> {
        let url = format!("{}/status", self.endpoint);
        for _ in 0..50 {
            if let Ok(status) = send::<Status>(client, Method::GET, &url, None).await {
                if status.ready {
                    return Ok(());
                }
            }
            sleep(Duration::from_millis(100)).await;
        }
        Err(Error::WebDriver(format!(
            "chromedriver at {} did not become ready",
            self.endpoint
        )))
    }
}
