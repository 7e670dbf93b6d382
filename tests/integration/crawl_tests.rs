//! Integration tests for the crawl-service pipeline
//!
//! A single wiremock server plays both the crawling service and the content
//! store.

use site_ingest::config::{
    Config, CrawlServiceConfig, CrawlServiceSettings, ScrapeSettings, SitemapSettings,
    StoreConfig,
};
use site_ingest::crawl_service::{run_crawl_ingest, CrawlIngest};
use site_ingest::storage::RestStore;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config(base_url: &str) -> (Config, CrawlServiceConfig) {
    let config = Config {
        store: StoreConfig {
            base_url: base_url.to_string(),
            service_key: "service-key".to_string(),
            table: "content".to_string(),
        },
        scrape: ScrapeSettings::default(),
        sitemap: SitemapSettings::default(),
        crawl_service: CrawlServiceSettings::default(),
    };
    let service = CrawlServiceConfig {
        api_key: "fc-test".to_string(),
        base_url: base_url.to_string(),
        poll_interval_ms: 1,
    };
    (config, service)
}

async fn mount_crawl_job(server: &MockServer, id: &str, status_body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/v1/crawl"))
        .and(header("authorization", "Bearer fc-test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "success": true, "id": id })),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/crawl/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_documents_become_rows() {
    let server = MockServer::start().await;

    mount_crawl_job(
        &server,
        "job-1",
        serde_json::json!({
            "status": "completed",
            "total": 3,
            "completed": 3,
            "creditsUsed": 3,
            "data": [
                { "markdown": "# One", "metadata": { "title": "One", "sourceURL": "https://docs.example.com/1", "statusCode": 200, "language": "en" } },
                { "markdown": "# Two", "metadata": { "title": "Two", "sourceURL": "https://docs.example.com/2" } },
                { "markdown": "# Three", "metadata": { "sourceURL": "https://docs.example.com/3" } }
            ]
        }),
    )
    .await;

    // Record 2 of 3 is refused by the store
    Mock::given(method("POST"))
        .and(path("/rest/v1/content"))
        .and(body_partial_json(
            serde_json::json!({ "url": "https://docs.example.com/2" }),
        ))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad row"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/content"))
        .and(body_partial_json(serde_json::json!({
            "org_id": "org-1",
            "content_type": "webpage",
            "metadata": { "source": "firecrawl", "scrape_type": "full_crawl" }
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;

    let (config, service) = create_test_config(&server.uri());
    let report = run_crawl_ingest(&config, &service, "https://docs.example.com", "org-1", 3)
        .await
        .expect("run");

    assert_eq!(report.urls_discovered, 3);
    assert_eq!(report.pages_extracted, 3);
    assert_eq!(report.credits_used, Some(3));
    assert_eq!(report.persist.attempted, 3);
    assert_eq!(report.rows_inserted(), 2);
    assert_eq!(report.persist.failures.len(), 1);
    assert_eq!(report.persist.failures[0].label, "https://docs.example.com/2");
}

#[tokio::test]
async fn test_untitled_document_uses_source_url_as_title() {
    let server = MockServer::start().await;

    mount_crawl_job(
        &server,
        "job-2",
        serde_json::json!({
            "status": "completed", "total": 1, "completed": 1, "creditsUsed": 1,
            "data": [ { "markdown": "body", "metadata": { "sourceURL": "https://docs.example.com/x" } } ]
        }),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/content"))
        .and(body_partial_json(serde_json::json!({
            "title": "https://docs.example.com/x",
            "url": "https://docs.example.com/x",
            "raw_content": "body"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (config, service) = create_test_config(&server.uri());
    let report = run_crawl_ingest(&config, &service, "https://docs.example.com", "org", 1)
        .await
        .expect("run");

    assert_eq!(report.rows_inserted(), 1);
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_document_without_metadata_still_saved() {
    let server = MockServer::start().await;

    mount_crawl_job(
        &server,
        "job-5",
        serde_json::json!({
            "status": "completed", "total": 2, "completed": 2, "creditsUsed": 2,
            "data": [
                { "markdown": "fine", "metadata": { "title": "Ok", "sourceURL": "https://docs.example.com/ok" } },
                { "markdown": "bare", "metadata": null }
            ]
        }),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/content"))
        .and(body_partial_json(serde_json::json!({ "title": "Ok" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/content"))
        .and(body_partial_json(
            serde_json::json!({ "title": "Untitled", "raw_content": "bare" }),
        ))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (config, service) = create_test_config(&server.uri());
    let report = run_crawl_ingest(&config, &service, "https://docs.example.com", "org", 2)
        .await
        .expect("run");

    assert!(report.aborted.is_none());
    assert_eq!(report.rows_inserted(), 2);
}

#[tokio::test]
async fn test_paged_crawl_results_are_all_saved() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("POST"))
        .and(path("/v1/crawl"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "success": true, "id": "job-6" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/crawl/job-6"))
        .and(query_param("skip", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "completed", "total": 2, "completed": 2, "creditsUsed": 2,
            "data": [ { "markdown": "# Two", "metadata": { "title": "Two", "sourceURL": "https://docs.example.com/2" } } ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/crawl/job-6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "completed", "total": 2, "completed": 2, "creditsUsed": 2,
            "data": [ { "markdown": "# One", "metadata": { "title": "One", "sourceURL": "https://docs.example.com/1" } } ],
            "next": format!("{}/v1/crawl/job-6?skip=1", base)
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/content"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;

    let (config, service) = create_test_config(&base);
    let report = run_crawl_ingest(&config, &service, "https://docs.example.com", "org", 2)
        .await
        .expect("run");

    assert_eq!(report.urls_discovered, 2);
    assert_eq!(report.rows_inserted(), 2);
}

#[tokio::test]
async fn test_rejected_crawl_inserts_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/crawl"))
        .respond_with(ResponseTemplate::new(401).set_body_json(
            serde_json::json!({ "success": false, "error": "Unauthorized: Invalid token" }),
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/content"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let (config, service) = create_test_config(&server.uri());
    let report = run_crawl_ingest(&config, &service, "https://docs.example.com", "org", 10)
        .await
        .expect("run");

    assert_eq!(report.rows_inserted(), 0);
    let reason = report.aborted.expect("aborted");
    assert!(reason.contains("Invalid token"));
}

#[tokio::test]
async fn test_empty_crawl_inserts_nothing() {
    let server = MockServer::start().await;

    mount_crawl_job(
        &server,
        "job-3",
        serde_json::json!({
            "status": "completed", "total": 0, "completed": 0, "creditsUsed": 0, "data": []
        }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/content"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let (config, service) = create_test_config(&server.uri());
    let store = RestStore::new(&config.store).expect("store");
    let ingest = CrawlIngest::new(&config, &service, Arc::new(store)).expect("ingest");
    let report = ingest.run("https://docs.example.com", "org", 10).await;

    assert_eq!(report.urls_discovered, 0);
    assert_eq!(report.credits_used, Some(0));
    assert!(report.aborted.is_some());
}

#[tokio::test]
async fn test_failed_crawl_job_inserts_nothing() {
    let server = MockServer::start().await;

    mount_crawl_job(
        &server,
        "job-4",
        serde_json::json!({ "status": "failed", "error": "Site unreachable" }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/content"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let (config, service) = create_test_config(&server.uri());
    let report = run_crawl_ingest(&config, &service, "https://docs.example.com", "org", 10)
        .await
        .expect("run");

    assert_eq!(report.rows_inserted(), 0);
    assert!(report
        .aborted
        .as_deref()
        .unwrap_or_default()
        .contains("Site unreachable"));
}
