//! Where glyph and background bytes come from.
//!
//! A [ResourceSource] hands back an owned future per locator so that callers
//! can start every fetch at once and still consume the results in sequence
//! order (see [fetch_all]).

use crate::RenderError;
use std::collections::HashMap;
use std::future::Future;
use std::io::Read;
use std::sync::Arc;

/// Anything that can turn a locator into the raw bytes it points at
pub trait ResourceSource {
    /// Start fetching `locator`. The returned future owns everything it needs
    /// so it can be spawned onto the runtime.
    fn fetch(
        &self,
        locator: &str,
    ) -> impl Future<Output = Result<Vec<u8>, RenderError>> + Send + 'static;
}

/// Fetch every locator concurrently, returning the bodies in the same order
/// as `locators` regardless of which request finished first. The first
/// failure (in sequence order) aborts the whole gather, cancelling every
/// fetch that is still outstanding.
///
/// Must be called from within a tokio runtime.
pub async fn fetch_all<S: ResourceSource>(
    source: &S,
    locators: &[String],
) -> Result<Vec<Vec<u8>>, RenderError> {
    let mut pending = locators
        .iter()
        .map(|locator| (locator, tokio::spawn(source.fetch(locator))))
        .collect::<Vec<_>>()
        .into_iter();

    let mut bodies = Vec::with_capacity(locators.len());
    while let Some((locator, handle)) = pending.next() {
        let failure = match handle.await {
            Ok(Ok(body)) => {
                bodies.push(body);
                continue;
            }
            Ok(Err(e)) => e,
            Err(e) => RenderError::fetch(locator, e),
        };
        for (_, rest) in pending.by_ref() {
            rest.abort();
        }
        return Err(failure);
    }
    Ok(bodies)
}

/// The default source: `http://` and `https://` locators are fetched with a
/// blocking HTTP GET on tokio's blocking pool, everything else is read from
/// the filesystem.
#[derive(Clone)]
pub struct ResourceLoader {
    agent: ureq::Agent,
}

impl Default for ResourceLoader {
    fn default() -> Self {
        ResourceLoader {
            agent: ureq::AgentBuilder::new()
                .user_agent(concat!(
                    env!("CARGO_PKG_NAME"),
                    "/",
                    env!("CARGO_PKG_VERSION")
                ))
                .build(),
        }
    }
}

impl ResourceLoader {
    pub fn new() -> ResourceLoader {
        ResourceLoader::default()
    }

    pub fn is_remote(locator: &str) -> bool {
        locator.starts_with("http://") || locator.starts_with("https://")
    }
}

fn http_get(agent: &ureq::Agent, url: &str) -> Result<Vec<u8>, RenderError> {
    let response = agent.get(url).call().map_err(|e| match e {
        ureq::Error::Status(code, _) => RenderError::fetch(url, format!("HTTP status {code}")),
        ureq::Error::Transport(transport) => RenderError::fetch(url, transport),
    })?;

    let mut body = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut body)
        .map_err(|e| RenderError::fetch(url, e))?;
    Ok(body)
}

impl ResourceSource for ResourceLoader {
    fn fetch(
        &self,
        locator: &str,
    ) -> impl Future<Output = Result<Vec<u8>, RenderError>> + Send + 'static {
        let agent = self.agent.clone();
        let locator = locator.to_string();
        async move {
            if ResourceLoader::is_remote(&locator) {
                log::debug!("fetching {locator}");
                let url = locator.clone();
                tokio::task::spawn_blocking(move || http_get(&agent, &url))
                    .await
                    .map_err(|e| RenderError::fetch(&locator, e))?
            } else {
                log::debug!("reading {locator}");
                tokio::fs::read(&locator)
                    .await
                    .map_err(|e| RenderError::fetch(&locator, e))
            }
        }
    }
}

/// An in-memory set of resources keyed by locator. Looking up a locator that
/// was never inserted fails the same way an HTTP 404 does.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    resources: Arc<HashMap<String, Arc<[u8]>>>,
}

impl MemorySource {
    pub fn new() -> MemorySource {
        MemorySource::default()
    }

    /// Add (or replace) a resource, modifying `self`
    pub fn insert<L: ToString, B: Into<Vec<u8>>>(&mut self, locator: L, bytes: B) -> &mut Self {
        let bytes: Vec<u8> = bytes.into();
        Arc::make_mut(&mut self.resources).insert(locator.to_string(), Arc::from(bytes));
        self
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl ResourceSource for MemorySource {
    fn fetch(
        &self,
        locator: &str,
    ) -> impl Future<Output = Result<Vec<u8>, RenderError>> + Send + 'static {
        let found = self
            .resources
            .get(locator)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| RenderError::fetch(locator, "HTTP status 404"));
        async move { found }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::time::Duration;
    use tokio::sync::oneshot;

    /// Answer one request on a local port, returning the server's base URL
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("can bind");
        let addr = listener.local_addr().expect("bound address");
        std::thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let mut stream = reader.into_inner();
            let _ = write!(
                stream,
                "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
        });
        format!("http://{addr}")
    }

    /// Fails `bad` at once and never finishes `slow`, holding `slow_alive`
    /// until its fetch is dropped
    struct StallingSource {
        slow_alive: std::sync::Mutex<Option<oneshot::Sender<()>>>,
    }

    impl ResourceSource for StallingSource {
        fn fetch(
            &self,
            locator: &str,
        ) -> impl Future<Output = Result<Vec<u8>, RenderError>> + Send + 'static {
            let locator = locator.to_string();
            let held = match locator.as_str() {
                "slow" => self.slow_alive.lock().expect("not poisoned").take(),
                _ => None,
            };
            async move {
                match held {
                    Some(_alive) => {
                        std::future::pending::<()>().await;
                        Ok(Vec::new())
                    }
                    None => Err(RenderError::fetch(locator, "HTTP status 404")),
                }
            }
        }
    }

    #[tokio::test]
    async fn gather_preserves_sequence_order() {
        let mut source = MemorySource::new();
        source.insert("a", "first").insert("b", "second").insert("c", "third");

        let locators: Vec<String> = ["c", "a", "b", "a"].iter().map(|s| s.to_string()).collect();
        let bodies = fetch_all(&source, &locators).await.expect("all present");
        assert_eq!(
            bodies,
            vec![
                b"third".to_vec(),
                b"first".to_vec(),
                b"second".to_vec(),
                b"first".to_vec()
            ]
        );
    }

    #[tokio::test]
    async fn missing_resource_is_a_fetch_error() {
        let mut source = MemorySource::new();
        source.insert("a", "first");

        let locators = vec!["a".to_string(), "missing".to_string()];
        match fetch_all(&source, &locators).await {
            Err(RenderError::ResourceFetch { locator, reason }) => {
                assert_eq!(locator, "missing");
                assert!(reason.contains("404"));
            }
            other => panic!("expected a fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn loader_reads_local_files() {
        let mut file = tempfile::NamedTempFile::new().expect("can create temp file");
        file.write_all(b"<svg/>").expect("can write temp file");
        let path = file.path().to_string_lossy().to_string();

        let loader = ResourceLoader::new();
        let bytes = loader.fetch(&path).await.expect("file is readable");
        assert_eq!(bytes, b"<svg/>");

        let missing = loader.fetch("/definitely/not/here.svg").await;
        assert!(matches!(missing, Err(RenderError::ResourceFetch { .. })));
    }

    #[test]
    fn remote_locators_are_detected() {
        assert!(ResourceLoader::is_remote("https://example.com/A.svg"));
        assert!(ResourceLoader::is_remote("http://example.com/A.svg"));
        assert!(!ResourceLoader::is_remote("glyphs/A.svg"));
    }

    #[tokio::test]
    async fn failed_gather_cancels_outstanding_fetches() {
        let (alive, dropped) = oneshot::channel();
        let source = StallingSource {
            slow_alive: std::sync::Mutex::new(Some(alive)),
        };

        let locators = vec!["bad".to_string(), "slow".to_string()];
        let result = fetch_all(&source, &locators).await;
        assert!(matches!(result, Err(RenderError::ResourceFetch { .. })));

        // the sender is only dropped once the stalled fetch is cancelled
        let cancelled = tokio::time::timeout(Duration::from_secs(5), dropped).await;
        assert!(matches!(cancelled, Ok(Err(_))));
    }

    #[tokio::test]
    async fn http_error_status_is_a_fetch_error() {
        let base = serve_once("HTTP/1.1 404 Not Found", "");
        let locator = format!("{base}/A.svg");

        match ResourceLoader::new().fetch(&locator).await {
            Err(RenderError::ResourceFetch {
                locator: failed,
                reason,
            }) => {
                assert_eq!(failed, locator);
                assert_eq!(reason, "HTTP status 404");
            }
            other => panic!("expected a fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_success_returns_the_body() {
        let base = serve_once("HTTP/1.1 200 OK", "<svg/>");
        let bytes = ResourceLoader::new()
            .fetch(&format!("{base}/A.svg"))
            .await
            .expect("server answers 200");
        assert_eq!(bytes, b"<svg/>");
    }

    #[tokio::test]
    async fn refused_connection_is_a_fetch_error() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("can bind");
        let addr = listener.local_addr().expect("bound address");
        drop(listener);

        match ResourceLoader::new()
            .fetch(&format!("http://{addr}/A.svg"))
            .await
        {
            Err(RenderError::ResourceFetch { reason, .. }) => {
                assert!(!reason.starts_with("HTTP status"));
            }
            other => panic!("expected a fetch error, got {other:?}"),
        }
    }
}
