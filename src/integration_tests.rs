//! End-to-end tests for the query pipeline
//!
//! The real provider adapters run against local mock servers, so these tests
//! cover the HTTP encoding, provider parsing, aggregation, normalization and
//! caching together.
//!
//! # Running the live tests
//!
//! ```bash
//! export INSPR_BAIDU_APPID=... INSPR_BAIDU_SECRET_KEY=...
//! export INSPR_YOUDAO_KEY=... INSPR_YOUDAO_KEY_FROM=...
//! cargo test --lib integration_tests -- --ignored --nocapture
//! ```

#[cfg(test)]
mod tests {
    use crate::engine::Engine;
    use crate::mt::{
        BaiduTranslator, Fetcher, MicrosoftTranslator, ProviderId, ProviderRegistry,
        YoudaoTranslator,
    };
    use crate::{CaseStyle, Settings, Status};
    use mockito::Matcher;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tokio::net::TcpListener;

    const YOUDAO_APPLE: &str = r#"{
        "translation": ["apple"],
        "basic": {"explains": ["n. 苹果"]},
        "query": "苹果",
        "errorCode": 0,
        "web": [
            {"value": ["Apple Inc.", "apple"], "key": "苹果"},
            {"value": ["apple juice"], "key": "苹果汁"}
        ]
    }"#;

    const BAIDU_APPLE: &str =
        r#"{"from":"zh","to":"en","trans_result":[{"src":"苹果","dst":"Apple"}]}"#;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn settings(sources: &[ProviderId]) -> Settings {
        Settings {
            dictionary_source: sources.to_vec(),
            ignore_words: Vec::new(),
            ..Settings::default()
        }
    }

    fn fetcher(timeout: Duration) -> Fetcher {
        Fetcher::new(timeout, None).unwrap()
    }

    fn youdao(base: &str, fetcher: Fetcher) -> YoudaoTranslator {
        YoudaoTranslator::new("test-key".to_string(), "test-client".to_string(), false, fetcher)
            .with_endpoint(format!("{}/openapi.do", base))
    }

    fn baidu(base: &str, fetcher: Fetcher) -> BaiduTranslator {
        BaiduTranslator::new("2015063000000001".to_string(), "12345678".to_string(), fetcher)
            .with_endpoint(format!("{}/api/trans/vip/translate", base))
    }

    /// Accepts connections and never answers
    async fn silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });
        format!("http://{}", addr)
    }

    async fn youdao_mock(server: &mut mockito::ServerGuard, body: &str) -> mockito::Mock {
        server
            .mock("GET", Matcher::Regex(r"^/openapi\.do".to_string()))
            .match_query(Matcher::UrlEncoded("q".into(), "苹果".into()))
            .with_body(body)
            .create_async()
            .await
    }

    async fn baidu_mock(server: &mut mockito::ServerGuard, body: &str) -> mockito::Mock {
        server
            .mock("GET", Matcher::Regex(r"^/api/trans/vip/translate".to_string()))
            .with_body(body)
            .create_async()
            .await
    }

    // ========================================================================
    // Single provider
    // ========================================================================

    #[tokio::test]
    async fn test_baidu_apple_lower_camel_case() {
        let mut server = mockito::Server::new_async().await;
        let mock = baidu_mock(
            &mut server,
            r#"{"from":"zh","to":"en","trans_result":[{"src":"苹果","dst":"apple"},{"src":"苹果","dst":"Apple Inc."}]}"#,
        )
        .await;

        let registry = ProviderRegistry::new().with(
            ProviderId::Baidu,
            Arc::new(baidu(&server.url(), fetcher(Fetcher::DEFAULT_TIMEOUT))),
        );
        let engine = Engine::with_registry(settings(&[ProviderId::Baidu]), registry);

        let result = engine.inspire("苹果", CaseStyle::LowerCamelCase).await;
        assert_eq!(result, Ok(words(&["apple", "appleInc"])));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_youdao_strict_web_entries() {
        let mut server = mockito::Server::new_async().await;
        let _mock = youdao_mock(&mut server, YOUDAO_APPLE).await;

        let registry = ProviderRegistry::new().with(
            ProviderId::Youdao,
            Arc::new(youdao(&server.url(), fetcher(Fetcher::DEFAULT_TIMEOUT))),
        );
        let engine = Engine::with_registry(settings(&[ProviderId::Youdao]), registry);

        // "apple juice" belongs to another key and is left out
        let result = engine.inspire("苹果", CaseStyle::UpperUnderscores).await;
        assert_eq!(result, Ok(words(&["APPLE", "APPLE_INC"])));
    }

    #[tokio::test]
    async fn test_youdao_error_code_surfaces_as_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = youdao_mock(&mut server, r#"{"errorCode": 50}"#).await;

        let registry = ProviderRegistry::new().with(
            ProviderId::Youdao,
            Arc::new(youdao(&server.url(), fetcher(Fetcher::DEFAULT_TIMEOUT))),
        );
        let engine = Engine::with_registry(settings(&[ProviderId::Youdao]), registry);

        let status = engine
            .inspire("苹果", CaseStyle::LowerCamelCase)
            .await
            .unwrap_err();
        assert_eq!(
            status,
            Status::ProviderError {
                provider: ProviderId::Youdao,
                code: 50
            }
        );
        assert_eq!(status.message(), "Youdao: invalid key");
    }

    #[tokio::test]
    async fn test_microsoft_token_then_translate() {
        let mut server = mockito::Server::new_async().await;
        let oauth = server
            .mock("POST", "/oauth")
            .with_body(r#"{"access_token":"tok","token_type":"bearer","expires_in":"600"}"#)
            .expect(1)
            .create_async()
            .await;
        let translate = server
            .mock("GET", Matcher::Regex(r"^/translate".to_string()))
            .match_query(Matcher::UrlEncoded("appId".into(), "Bearer tok".into()))
            .with_body(
                r#"<string xmlns="http://schemas.microsoft.com/2003/10/Serialization/">Apple &amp; Pear</string>"#,
            )
            .expect(2)
            .create_async()
            .await;

        let microsoft = MicrosoftTranslator::new(
            "inspr".to_string(),
            "secret".to_string(),
            fetcher(Fetcher::DEFAULT_TIMEOUT),
        )
        .with_endpoints(
            format!("{}/oauth", server.url()),
            format!("{}/translate", server.url()),
        );
        let registry = ProviderRegistry::new().with(ProviderId::Microsoft, Arc::new(microsoft));
        let engine = Engine::with_registry(settings(&[ProviderId::Microsoft]), registry);

        let result = engine.inspire("苹果和梨", CaseStyle::UpperCamelCase).await;
        assert_eq!(result, Ok(words(&["AppleAndPear"])));
        let result = engine.inspire("苹果和梨", CaseStyle::LowerUnderscores).await;
        assert_eq!(result, Ok(words(&["apple_and_pear"])));

        oauth.assert_async().await;
        translate.assert_async().await;
    }

    // ========================================================================
    // Several providers
    // ========================================================================

    #[tokio::test]
    async fn test_candidates_from_all_providers_are_merged() {
        let mut server = mockito::Server::new_async().await;
        let _youdao = youdao_mock(&mut server, YOUDAO_APPLE).await;
        let _baidu = baidu_mock(&mut server, BAIDU_APPLE).await;

        let shared = fetcher(Fetcher::DEFAULT_TIMEOUT);
        let registry = ProviderRegistry::new()
            .with(ProviderId::Youdao, Arc::new(youdao(&server.url(), shared.clone())))
            .with(ProviderId::Baidu, Arc::new(baidu(&server.url(), shared)));
        let engine = Engine::with_registry(
            settings(&[ProviderId::Baidu, ProviderId::Youdao]),
            registry,
        );

        let result = engine.inspire("苹果", CaseStyle::UpperCamelCase).await;
        assert_eq!(result, Ok(words(&["Apple", "AppleInc"])));
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successful_candidates() {
        let mut server = mockito::Server::new_async().await;
        let _youdao = youdao_mock(&mut server, YOUDAO_APPLE).await;
        let _baidu = baidu_mock(
            &mut server,
            r#"{"error_code":"54003","error_msg":"Invalid Access Limit"}"#,
        )
        .await;

        let shared = fetcher(Fetcher::DEFAULT_TIMEOUT);
        let registry = ProviderRegistry::new()
            .with(ProviderId::Youdao, Arc::new(youdao(&server.url(), shared.clone())))
            .with(ProviderId::Baidu, Arc::new(baidu(&server.url(), shared)));
        let engine = Engine::with_registry(
            settings(&[ProviderId::Baidu, ProviderId::Youdao]),
            registry,
        );

        let result = engine.inspire("苹果", CaseStyle::LowerCamelCase).await;
        assert_eq!(result, Ok(words(&["apple", "appleInc"])));
        assert_eq!(engine.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_all_failed_reports_first_configured_provider() {
        let mut server = mockito::Server::new_async().await;
        let _youdao = youdao_mock(&mut server, r#"{"errorCode": 40}"#).await;
        let _baidu = baidu_mock(
            &mut server,
            r#"{"error_code":"52003","error_msg":"UNAUTHORIZED USER"}"#,
        )
        .await;

        let shared = fetcher(Fetcher::DEFAULT_TIMEOUT);
        let registry = ProviderRegistry::new()
            .with(ProviderId::Youdao, Arc::new(youdao(&server.url(), shared.clone())))
            .with(ProviderId::Baidu, Arc::new(baidu(&server.url(), shared)));
        let engine = Engine::with_registry(
            settings(&[ProviderId::Baidu, ProviderId::Youdao]),
            registry,
        );

        let result = engine.inspire("苹果", CaseStyle::LowerCamelCase).await;
        assert_eq!(
            result,
            Err(Status::ProviderError {
                provider: ProviderId::Baidu,
                code: 52003
            })
        );
        assert!(engine.cache().is_empty());
    }

    // ========================================================================
    // Timeouts
    // ========================================================================

    #[tokio::test]
    async fn test_unresponsive_provider_times_out() {
        let url = silent_server().await;
        let registry = ProviderRegistry::new().with(
            ProviderId::Youdao,
            Arc::new(youdao(&url, fetcher(Duration::from_millis(200)))),
        );
        let engine = Engine::with_registry(settings(&[ProviderId::Youdao]), registry);

        let started = Instant::now();
        let result = engine.inspire("苹果", CaseStyle::LowerCamelCase).await;

        assert_eq!(result, Err(Status::NetworkTimeout));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(engine.cache().is_empty());
    }

    #[tokio::test]
    async fn test_slow_provider_does_not_hide_fast_one() {
        let url = silent_server().await;
        let mut server = mockito::Server::new_async().await;
        let _baidu = baidu_mock(&mut server, BAIDU_APPLE).await;

        let shared = fetcher(Duration::from_millis(300));
        let registry = ProviderRegistry::new()
            .with(ProviderId::Youdao, Arc::new(youdao(&url, shared.clone())))
            .with(ProviderId::Baidu, Arc::new(baidu(&server.url(), shared)));
        let engine = Engine::with_registry(
            settings(&[ProviderId::Youdao, ProviderId::Baidu]),
            registry,
        );

        let result = engine.inspire("苹果", CaseStyle::LowerCamelCase).await;
        assert_eq!(result, Ok(words(&["apple"])));
    }

    // ========================================================================
    // Cache
    // ========================================================================

    #[tokio::test]
    async fn test_repeated_query_is_served_from_cache() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/api/trans/vip/translate".to_string()))
            .with_body(BAIDU_APPLE)
            .expect(1)
            .create_async()
            .await;

        let registry = ProviderRegistry::new().with(
            ProviderId::Baidu,
            Arc::new(baidu(&server.url(), fetcher(Fetcher::DEFAULT_TIMEOUT))),
        );
        let engine = Engine::with_registry(settings(&[ProviderId::Baidu]), registry);

        for _ in 0..3 {
            let result = engine.inspire("苹果", CaseStyle::LowerCamelCase).await;
            assert_eq!(result, Ok(words(&["apple"])));
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ignore_words_change_refetches() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/api/trans/vip/translate".to_string()))
            .with_body(r#"{"trans_result":[{"src":"快狐","dst":"the quick fox"}]}"#)
            .expect(2)
            .create_async()
            .await;

        let registry = ProviderRegistry::new().with(
            ProviderId::Baidu,
            Arc::new(baidu(&server.url(), fetcher(Fetcher::DEFAULT_TIMEOUT))),
        );
        let engine = Engine::with_registry(settings(&[ProviderId::Baidu]), registry);

        let before = engine.inspire("快狐", CaseStyle::LowerUnderscores).await;
        assert_eq!(before, Ok(words(&["the_quick_fox"])));

        engine
            .update_settings(Settings {
                ignore_words: words(&["the"]),
                ..settings(&[ProviderId::Baidu])
            })
            .unwrap();

        let after = engine.inspire("快狐", CaseStyle::LowerUnderscores).await;
        assert_eq!(after, Ok(words(&["quick_fox"])));
        mock.assert_async().await;
    }

    // ========================================================================
    // Live providers (need credentials, run with --ignored)
    // ========================================================================

    fn live_settings(source: ProviderId) -> Option<Settings> {
        let settings = Settings {
            dictionary_source: vec![source],
            ..Settings::default()
        }
        .with_env_overrides();

        let configured = match source {
            ProviderId::Youdao => !settings.youdao_key.is_empty(),
            ProviderId::Baidu => {
                !settings.baidu_appid.is_empty() && !settings.baidu_secret_key.is_empty()
            }
            ProviderId::Microsoft => !settings.microsoft_client_id.is_empty(),
        };
        configured.then_some(settings)
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_baidu() {
        let Some(settings) = live_settings(ProviderId::Baidu) else {
            eprintln!("Skipping: INSPR_BAIDU_APPID / INSPR_BAIDU_SECRET_KEY not set");
            return;
        };

        let engine = Engine::new(settings).unwrap();
        let result = engine.inspire("苹果", CaseStyle::LowerCamelCase).await;
        println!("Baidu: {:?}", result);
        assert!(result.unwrap().contains(&"apple".to_string()));
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_youdao() {
        let Some(settings) = live_settings(ProviderId::Youdao) else {
            eprintln!("Skipping: INSPR_YOUDAO_KEY not set");
            return;
        };

        let engine = Engine::new(settings).unwrap();
        let result = engine.inspire("苹果", CaseStyle::LowerCamelCase).await;
        println!("Youdao: {:?}", result);
        assert!(result.is_ok());
    }
}
