//! Integration tests for the crawler
//!
//! These tests use wiremock to serve search and detail pages and run the
//! full crawl cycle end-to-end through the real HTTP fetcher.

use async_trait::async_trait;
use job_sift::config::{Config, CrawlerConfig, NotificationConfig, SinkKind, UserAgentConfig};
use job_sift::crawler::{run_crawl, Coordinator, CrawlOutcome, HttpFetcher};
use job_sift::output::NotificationSink;
use job_sift::query::normalize;
use job_sift::{NotificationError, RunState};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            search_url: format!("{}/jobs?sort=i", base_url),
            max_concurrent_pages_open: 4,
            request_timeout_secs: 5,
            max_retries: 2,
            retry_delay_ms: 10, // Very short for testing
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        notification: NotificationConfig {
            send_to: "some-name@email.com".to_string(),
            sink: SinkKind::Stdout,
            ..Default::default()
        },
    }
}

/// Captures every message instead of delivering it
#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingSink {
    fn messages(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

fn search_page(links: &[&str]) -> String {
    let items: String = links
        .iter()
        .map(|href| {
            format!(
                r#"<div class="-job js-result">
                    <div class="job-details__spaced"><a class="job-link" href="{}">Job</a></div>
                </div>"#,
                href
            )
        })
        .collect();

    format!(
        r#"<html><head><title>Jobs</title></head><body>
        <div class="js-search-results"><div class="listResults">{}</div></div>
        </body></html>"#,
        items
    )
}

fn detail_page(position: &str, company: &str, tags: &[&str]) -> String {
    let tag_links: String = tags
        .iter()
        .map(|t| format!(r#"<a class="post-tag job-link no-tag-menu" href="/jobs?tl={0}">{0}</a>"#, t))
        .collect();

    format!(
        r#"<html><body>
        <header>
            <h1><a href="/jobs/view">{}</a></h1>
            <div><a href="/jobs/companies/x">{}</a> <span>Remote</span></div>
        </header>
        <section><h2>Technologies</h2><div>{}</div></section>
        <section><h2>Job description</h2><div><p>We are hiring.</p></div></section>
        </body></html>"#,
        position, company, tag_links
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn crawl(server: &MockServer, tags: &str, sink: Arc<RecordingSink>) -> CrawlOutcome {
    let config = create_test_config(&server.uri());
    let fetcher = HttpFetcher::new(&config.crawler, &config.user_agent).expect("Failed to build fetcher");
    let query = normalize(Some(tags)).expect("Invalid tags");

    Coordinator::new(&config, query, Arc::new(fetcher), sink)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed")
}

#[tokio::test]
async fn test_single_match_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(query_param("q", "python django"))
        .respond_with(html(search_page(&["/jobs/1/backend", "/jobs/2/rails"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/jobs/1/backend",
        detail_page("Backend Engineer", "Acme", &["python", "flask"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/jobs/2/rails",
        detail_page("Rails Developer", "Globex", &["ruby", "rails"]),
    )
    .await;

    let sink = Arc::new(RecordingSink::default());
    let outcome = crawl(&mock_server, "python+django", sink.clone()).await;

    assert_eq!(outcome.state, RunState::Notified);
    assert_eq!(outcome.records.len(), 1);

    let record = &outcome.records[0];
    assert_eq!(record.company(), "Acme");
    assert_eq!(record.position(), "Backend Engineer");
    assert_eq!(record.matched_tags(), ["python"]);
    assert_eq!(record.all_tags(), ["python", "flask"]);
    assert_eq!(record.description(), "We are hiring.");
    assert_eq!(record.source_url(), format!("{}/jobs/1/backend", mock_server.uri()));

    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    let (to, subject, body) = &messages[0];
    assert_eq!(to, "some-name@email.com");
    assert!(subject.contains("query tags: python, django"));
    assert!(body.contains("Company: Acme\t\n\t\n"));
    assert!(body.contains("Tags: python, flask\t\n\t\n"));
    assert!(body.contains(&":".repeat(100)));
    assert!(!body.contains("Globex"));
}

#[tokio::test]
async fn test_no_matches_skips_notification() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/jobs", search_page(&["/jobs/1", "/jobs/2"])).await;
    mount_page(&mock_server, "/jobs/1", detail_page("Dev", "Acme", &["java"])).await;
    mount_page(&mock_server, "/jobs/2", detail_page("Dev", "Globex", &["ruby", "rails"])).await;

    let sink = Arc::new(RecordingSink::default());
    let outcome = crawl(&mock_server, "python+django", sink.clone()).await;

    assert_eq!(outcome.state, RunState::Skipped);
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.statistics.pages_fetched, 2);
    assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn test_malformed_page_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/jobs",
        search_page(&["/jobs/broken", "/jobs/good"]),
    )
    .await;

    // Matching tags, but no description block
    let broken = detail_page("Dev", "Acme", &["rust"]).replace("Job description", "Benefits");
    mount_page(&mock_server, "/jobs/broken", broken).await;
    mount_page(&mock_server, "/jobs/good", detail_page("Dev", "Globex", &["rust"])).await;

    let sink = Arc::new(RecordingSink::default());
    let outcome = crawl(&mock_server, "rust", sink.clone()).await;

    assert_eq!(outcome.state, RunState::Notified);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].company(), "Globex");
    assert_eq!(outcome.statistics.parse_failures, 1);
    assert_eq!(sink.messages().len(), 1);
}

#[tokio::test]
async fn test_unreachable_detail_page_counts_as_no_match() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/jobs", search_page(&["/jobs/gone", "/jobs/ok"])).await;
    Mock::given(method("GET"))
        .and(path("/jobs/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/jobs/ok", detail_page("Dev", "Acme", &["go"])).await;

    let sink = Arc::new(RecordingSink::default());
    let outcome = crawl(&mock_server, "go", sink.clone()).await;

    assert_eq!(outcome.state, RunState::Notified);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.statistics.fetch_failures, 1);
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/jobs", search_page(&["/jobs/flaky"])).await;

    // First attempt fails, the retry is served by the second mock
    Mock::given(method("GET"))
        .and(path("/jobs/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/jobs/flaky", detail_page("Dev", "Acme", &["rust"])).await;

    let sink = Arc::new(RecordingSink::default());
    let outcome = crawl(&mock_server, "rust", sink.clone()).await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.statistics.fetch_failures, 0);
}

#[tokio::test]
async fn test_non_html_detail_page_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/jobs", search_page(&["/jobs/pdf"])).await;
    Mock::given(method("GET"))
        .and(path("/jobs/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"))
        .mount(&mock_server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let outcome = crawl(&mock_server, "rust", sink.clone()).await;

    assert_eq!(outcome.state, RunState::Skipped);
    assert_eq!(outcome.statistics.fetch_failures, 1);
}

#[tokio::test]
async fn test_empty_search_results() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/jobs", search_page(&[])).await;

    let sink = Arc::new(RecordingSink::default());
    let outcome = crawl(&mock_server, "rust", sink.clone()).await;

    assert_eq!(outcome.state, RunState::Skipped);
    assert_eq!(outcome.statistics.job_links_found, 0);
    assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn test_run_crawl_writes_to_mailbox() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/jobs", search_page(&["/jobs/1"])).await;
    mount_page(&mock_server, "/jobs/1", detail_page("Dev", "Acme", &["rust", "tokio"])).await;

    let outbox = tempfile::TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(&mock_server.uri());
    config.notification.sink = SinkKind::Mailbox;
    config.notification.mailbox_dir = Some(outbox.path().to_string_lossy().into_owned());

    let query = normalize(Some("tokio")).expect("Invalid tags");
    let outcome = run_crawl(&config, query, None, std::future::pending::<()>())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.state, RunState::Notified);
    assert!(outcome.delivered);

    let messages: Vec<String> = std::fs::read_dir(outbox.path())
        .expect("Failed to read outbox")
        .map(|entry| std::fs::read_to_string(entry.unwrap().path()).unwrap())
        .collect();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("To: some-name@email.com"));
    assert!(messages[0].contains("query tags: tokio"));
    assert!(messages[0].contains("Tags: rust, tokio"));
}
