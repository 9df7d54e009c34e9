#[cfg(test)]
mod tests {
    use crate::config::LLMConfig;
    use crate::llm::client::{
        CompletionError, CompletionRequest, CompletionService, LLMClient, TokenUsage,
        backoff_delay, parse_completion,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// 本地HTTP桩服务，依次返回预设的原始响应
    struct StubServer {
        base_url: String,
        hits: Arc<AtomicUsize>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl StubServer {
        fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }

        fn first_request(&self) -> String {
            self.requests.lock().unwrap()[0].clone()
        }
    }

    fn http_response(status: u16, reason: &str, extra_headers: &[(&str, &str)], body: &str) -> String {
        let mut response = format!("HTTP/1.1 {} {}\r\n", status, reason);
        response.push_str("Content-Type: application/json\r\n");
        response.push_str(&format!("Content-Length: {}\r\n", body.len()));
        response.push_str("Connection: close\r\n");
        for (name, value) in extra_headers {
            response.push_str(&format!("{}: {}\r\n", name, value));
        }
        response.push_str("\r\n");
        response.push_str(body);
        response
    }

    fn completion_body(content: &str) -> String {
        serde_json::json!({
            "id": "chatcmpl-test",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": content } }
            ],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        })
        .to_string()
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    async fn spawn_stub(responses: Vec<String>) -> StubServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let (server_hits, server_requests) = (hits.clone(), requests.clone());
        tokio::spawn(async move {
            let mut responses = responses.into_iter();
            while let Ok((mut socket, _)) = listener.accept().await {
                let request = read_request(&mut socket).await;
                server_hits.fetch_add(1, Ordering::SeqCst);
                server_requests.lock().unwrap().push(request);
                let Some(response) = responses.next() else {
                    break;
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        StubServer {
            base_url: format!("http://{}/v1", addr),
            hits,
            requests,
        }
    }

    fn test_config(base_url: &str) -> LLMConfig {
        LLMConfig {
            api_key: "test-key".to_string(),
            api_base_url: base_url.to_string(),
            model: "test-model".to_string(),
            retry_attempts: 3,
            retry_delay_ms: 1,
            timeout_seconds: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_requires_configuration() {
        let mut config = test_config("http://127.0.0.1:1/v1");
        config.api_key = String::new();
        assert_eq!(
            LLMClient::new(&config).err(),
            Some(CompletionError::Configuration("api_key".to_string()))
        );

        let mut config = test_config("");
        config.api_key = "k".to_string();
        assert_eq!(
            LLMClient::new(&config).err(),
            Some(CompletionError::Configuration("api_base_url".to_string()))
        );

        let mut config = test_config("http://127.0.0.1:1/v1");
        config.model = "  ".to_string();
        assert_eq!(
            LLMClient::new(&config).err(),
            Some(CompletionError::Configuration("model".to_string()))
        );
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = LLMClient::new(&test_config("https://llm.example.com/v1/")).unwrap();
        assert_eq!(client.endpoint(), "https://llm.example.com/v1/chat/completions");
    }

    #[test]
    fn test_backoff_delay_grows_exponentially() {
        let first = backoff_delay(100, 1, None).as_millis();
        assert!((100..=150).contains(&first));

        let third = backoff_delay(100, 3, None).as_millis();
        assert!((400..=450).contains(&third));

        assert_eq!(backoff_delay(100, 1, Some(2)), Duration::from_millis(2000));
        assert_eq!(backoff_delay(100, 30, None), Duration::from_millis(60_000));
        assert_eq!(backoff_delay(1, 1, Some(0)), Duration::from_millis(1));
    }

    #[tokio::test]
    async fn test_complete_success_sends_authenticated_request() {
        let server = spawn_stub(vec![http_response(
            200,
            "OK",
            &[],
            &completion_body("需求分析: demand text"),
        )])
        .await;
        let client = LLMClient::new(&test_config(&server.base_url)).unwrap();

        let request = CompletionRequest::new("分析这个项目").with_system_prompt("你是创业导师");
        let text = client.complete(&request).await.unwrap();

        assert_eq!(text, "需求分析: demand text");
        assert_eq!(server.hits(), 1);

        let raw = server.first_request();
        assert!(raw.starts_with("POST /v1/chat/completions"));
        assert!(raw.to_lowercase().contains("authorization: bearer test-key"));
        assert!(raw.contains("\"model\":\"test-model\""));
        assert!(raw.contains("\"max_tokens\":4096"));
        assert!(raw.contains("\"role\":\"system\""));
    }

    #[tokio::test]
    async fn test_authentication_error_fails_fast() {
        let server = spawn_stub(vec![http_response(
            401,
            "Unauthorized",
            &[],
            r#"{"error":{"message":"invalid api key"}}"#,
        )])
        .await;
        let client = LLMClient::new(&test_config(&server.base_url)).unwrap();

        let err = client
            .complete(&CompletionRequest::new("hi"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CompletionError::Authentication {
                status: 401,
                message: "invalid api key".to_string()
            }
        );
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let server = spawn_stub(vec![
            http_response(429, "Too Many Requests", &[("Retry-After", "0")], "{}"),
            http_response(200, "OK", &[], &completion_body("ok")),
        ])
        .await;
        let client = LLMClient::new(&test_config(&server.base_url)).unwrap();

        let text = client.complete(&CompletionRequest::new("hi")).await.unwrap();

        assert_eq!(text, "ok");
        assert_eq!(server.hits(), 2);
    }

    #[tokio::test]
    async fn test_rate_limit_beyond_backoff_cap_is_not_retried() {
        let server = spawn_stub(vec![
            http_response(429, "Too Many Requests", &[("Retry-After", "120")], "{}"),
            http_response(200, "OK", &[], &completion_body("ok")),
        ])
        .await;
        let client = LLMClient::new(&test_config(&server.base_url)).unwrap();

        let err = client
            .complete(&CompletionRequest::new("hi"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CompletionError::RateLimited {
                retry_after: Some(120)
            }
        );
        assert_eq!(server.hits(), 1);
    }

    #[test]
    fn test_parse_completion_keeps_token_usage() {
        let (content, usage) = parse_completion(&completion_body("  需求分析: x  ")).unwrap();

        assert_eq!(content, "需求分析: x");
        assert_eq!(
            usage,
            Some(TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15
            })
        );

        let (_, usage) = parse_completion(
            r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}]}"#,
        )
        .unwrap();
        assert!(usage.is_none());
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_retries() {
        let server = spawn_stub(vec![
            http_response(500, "Internal Server Error", &[], "boom"),
            http_response(502, "Bad Gateway", &[], "boom"),
            http_response(503, "Service Unavailable", &[], "still down"),
        ])
        .await;
        let client = LLMClient::new(&test_config(&server.base_url)).unwrap();

        let err = client
            .complete(&CompletionRequest::new("hi"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CompletionError::Api {
                status: 503,
                message: "still down".to_string()
            }
        );
        assert_eq!(server.hits(), 3);
    }

    #[tokio::test]
    async fn test_malformed_response_is_not_retried() {
        let server = spawn_stub(vec![http_response(200, "OK", &[], "<html>oops</html>")]).await;
        let client = LLMClient::new(&test_config(&server.base_url)).unwrap();

        let err = client
            .complete(&CompletionRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::MalformedResponse { .. }));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_empty_content_is_malformed() {
        let server = spawn_stub(vec![http_response(200, "OK", &[], &completion_body("   "))]).await;
        let client = LLMClient::new(&test_config(&server.base_url)).unwrap();

        let err = client
            .complete(&CompletionRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // 绑定后立即释放端口，保证该端口上没有监听者
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = test_config(&format!("http://{}/v1", addr));
        config.retry_attempts = 1;
        let client = LLMClient::new(&config).unwrap();

        let err = client
            .complete(&CompletionRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::Network { .. }));
    }

    #[tokio::test]
    async fn test_hung_request_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((socket, _)) = listener.accept().await {
                // 持有连接但从不响应
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(socket);
            }
        });

        let mut config = test_config(&format!("http://{}/v1", addr));
        config.retry_attempts = 1;
        config.timeout_seconds = 1;
        let client = LLMClient::new(&config).unwrap();

        let err = client
            .complete(&CompletionRequest::new("hi"))
            .await
            .unwrap_err();

        assert_eq!(err, CompletionError::Timeout { seconds: 1 });
    }
}
