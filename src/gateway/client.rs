use super::error::FetchError;
use crate::model::{Algorithm, SessionConfig, SortResponse};
use reqwest::Url;
use tracing::debug;

/// HTTP client for the sorting service: one GET per sort request.
#[derive(Clone)]
pub(crate) struct SortClient {
    http: reqwest::Client,
    base_url: Url,
}

fn parse_base_url(raw: &str) -> Result<Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".into()));
    }
    Ok(url)
}

impl SortClient {
    pub fn new(cfg: &SessionConfig) -> Result<Self, FetchError> {
        let base_url = parse_base_url(&cfg.base_url)?;
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.request_timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    /// `{base}/{slug}?numbers=a,b,c`. Commas are left unescaped.
    pub fn endpoint(&self, algorithm: Algorithm, input: &[i64]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(algorithm.slug());
        }
        let numbers: Vec<String> = input.iter().map(|n| n.to_string()).collect();
        url.set_query(Some(&format!("numbers={}", numbers.join(","))));
        url
    }

    /// Request the steps for sorting `input` with `algorithm`.
    ///
    /// An absent or empty `steps` list is a successful "no data" answer.
    /// Snapshots that do not match the input length are rejected.
    pub async fn fetch(
        &self,
        algorithm: Algorithm,
        input: &[i64],
    ) -> Result<SortResponse, FetchError> {
        let url = self.endpoint(algorithm, input);
        debug!(%url, "requesting sort steps");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = resp.bytes().await?;
        let parsed: SortResponse = serde_json::from_slice(&body)?;

        if let Some((step, state)) = parsed
            .steps
            .iter()
            .enumerate()
            .find(|(_, s)| s.len() != input.len())
        {
            return Err(FetchError::Malformed {
                step,
                got: state.len(),
                expected: input.len(),
            });
        }

        debug!(
            steps = parsed.steps.len(),
            time_taken_ms = parsed.time_taken_ms,
            "sort steps received"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, http::Uri, routing::get, Router};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::net::TcpListener;

    #[derive(Clone)]
    struct MockState {
        status: StatusCode,
        body: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
    }

    async fn handler(State(state): State<MockState>, uri: Uri) -> (StatusCode, &'static str) {
        state.seen.lock().unwrap().push(uri.to_string());
        (state.status, state.body)
    }

    async fn serve(status: StatusCode, body: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/:algorithm", get(handler))
            .with_state(MockState {
                status,
                body,
                seen: seen.clone(),
            });
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), seen)
    }

    fn config(base_url: &str) -> SessionConfig {
        SessionConfig {
            base_url: base_url.to_string(),
            algorithm: Algorithm::BubbleSort,
            input: vec![5, 3, 4, 1],
            max_value: 100,
            speed: 100,
            request_timeout: Duration::from_secs(5),
            user_agent: "sort-visualizer-cli/test".into(),
            start_on_launch: false,
            export_json: None,
        }
    }

    #[test]
    fn endpoint_joins_slug_and_numbers() {
        let client = SortClient::new(&config("http://localhost:8080/")).unwrap();
        let url = client.endpoint(Algorithm::QuickSort, &[5, 3, 4, 1]);
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/quick-sort?numbers=5,3,4,1"
        );

        let client = SortClient::new(&config("http://localhost:8080/api")).unwrap();
        let url = client.endpoint(Algorithm::HeapSort, &[-2, 7]);
        assert_eq!(url.as_str(), "http://localhost:8080/api/heap-sort?numbers=-2,7");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            SortClient::new(&config("not a url")),
            Err(FetchError::InvalidUrl { .. })
        ));
        assert!(matches!(
            SortClient::new(&config("ftp://example.com")),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn fetch_decodes_steps_and_time() {
        let (base, seen) = serve(
            StatusCode::OK,
            r#"{"steps":[[5,3,4,1],[3,5,4,1],[1,3,4,5]],"timeTaken":2.5}"#,
        )
        .await;
        let client = SortClient::new(&config(&base)).unwrap();

        let resp = client
            .fetch(Algorithm::BubbleSort, &[5, 3, 4, 1])
            .await
            .unwrap();
        assert_eq!(resp.steps.len(), 3);
        assert_eq!(resp.steps[2], vec![1, 3, 4, 5]);
        assert_eq!(resp.time_taken_ms, 2.5);
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            ["/bubble-sort?numbers=5,3,4,1".to_string()]
        );
    }

    #[tokio::test]
    async fn empty_or_missing_steps_mean_no_data() {
        let (base, _) = serve(StatusCode::OK, r#"{"steps":[],"timeTaken":0.1}"#).await;
        let client = SortClient::new(&config(&base)).unwrap();
        let resp = client.fetch(Algorithm::ShellSort, &[1, 2]).await.unwrap();
        assert!(resp.steps.is_empty());

        let (base, _) = serve(StatusCode::OK, "{}").await;
        let client = SortClient::new(&config(&base)).unwrap();
        let resp = client.fetch(Algorithm::ShellSort, &[1, 2]).await.unwrap();
        assert!(resp.steps.is_empty());
        assert_eq!(resp.time_taken_ms, 0.0);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (base, _) = serve(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
        let client = SortClient::new(&config(&base)).unwrap();
        let err = client
            .fetch(Algorithm::MergeSort, &[2, 1])
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn garbage_body_is_a_decode_error() {
        let (base, _) = serve(StatusCode::OK, "<html>not json</html>").await;
        let client = SortClient::new(&config(&base)).unwrap();
        let err = client
            .fetch(Algorithm::MergeSort, &[2, 1])
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn snapshot_length_must_match_input() {
        let (base, _) = serve(StatusCode::OK, r#"{"steps":[[2,1],[1]],"timeTaken":1}"#).await;
        let client = SortClient::new(&config(&base)).unwrap();
        let err = client
            .fetch(Algorithm::RadixSort, &[2, 1])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::Malformed {
                step: 1,
                got: 1,
                expected: 2
            }
        ));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SortClient::new(&config(&format!("http://{addr}"))).unwrap();
        let err = client
            .fetch(Algorithm::BubbleSort, &[1])
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
