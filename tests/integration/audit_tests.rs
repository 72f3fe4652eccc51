//! Integration tests for the audit pipeline
//!
//! These tests use wiremock to serve the audited page and its site files,
//! and run complete audits end-to-end.

use seo_audit::audit::{run_network_checks, run_page_checks, AuditContext, Status, Tier};
use seo_audit::config::Config;
use seo_audit::document::Document;
use seo_audit::fetch::build_http_client;
use seo_audit::history::{HistoryRepository, SqliteHistory};
use seo_audit::{AuditReport, AuditRequest, Auditor};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Well-formed page without a viewport meta tag
const PAGE_WITHOUT_VIEWPORT: &str = r#"<html><head>
    <title>Hello World SEO</title>
    <meta name="description" content="A page about search engine optimization.">
    <link rel="canonical" href="/">
</head><body>
    <h1>Hello</h1>
    <h2>Section</h2>
    <img src="/a.png" alt="A">
    <img src="/b.png" alt="B">
</body></html>"#;

/// Page missing title, description and h1, with two images lacking alt text
const NEGLECTED_PAGE: &str = r#"<html><head>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <link rel="canonical" href="/">
</head><body>
    <h2>Section</h2>
    <img src="/a.png">
    <img src="/b.png" alt="">
</body></html>"#;

async fn mount_page(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_site_files(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "User-agent: *\nAllow: /\nSitemap: https://example.com/sitemap.xml\n",
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<urlset></urlset>"))
        .mount(server)
        .await;
}

fn auditor(config: Config) -> Auditor {
    Auditor::new(config).expect("Failed to build auditor")
}

fn assert_score_invariants(report: &AuditReport) {
    let summary = report.summary;
    let expected = (100 - 15 * summary.critical as i64 - 5 * summary.warning as i64).max(0);

    assert_eq!(report.score as i64, expected);
    assert_eq!(summary.total() as usize, report.findings.len());
}

fn status_of(report: &AuditReport, title: &str) -> Status {
    report
        .finding(title)
        .unwrap_or_else(|| panic!("missing finding {}", title))
        .status
}

#[tokio::test]
async fn test_well_formed_page_without_viewport() {
    let server = MockServer::start().await;
    mount_page(&server, PAGE_WITHOUT_VIEWPORT).await;
    mount_site_files(&server).await;

    let report = auditor(Config::default())
        .analyze(&server.uri())
        .await
        .expect("audit should succeed");

    assert_eq!(report.score, 85);
    assert_eq!(report.summary.critical, 1);
    assert_eq!(report.summary.warning, 0);
    assert_eq!(status_of(&report, "Mobile viewport"), Status::Critical);
    assert!(report
        .findings_in(Tier::Standard)
        .filter(|f| f.title != "Mobile viewport")
        .all(|f| f.status == Status::Passed));
    assert_eq!(report.findings.len(), 12);
    assert_score_invariants(&report);
}

#[tokio::test]
async fn test_neglected_slow_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(NEGLECTED_PAGE)
                .set_delay(Duration::from_millis(2500)),
        )
        .mount(&server)
        .await;
    mount_site_files(&server).await;

    let report = auditor(Config::default())
        .analyze(&server.uri())
        .await
        .expect("audit should succeed");

    assert_eq!(status_of(&report, "Title tag"), Status::Critical);
    assert_eq!(status_of(&report, "Meta description"), Status::Critical);
    assert_eq!(status_of(&report, "H1 heading"), Status::Critical);
    assert_eq!(status_of(&report, "Image alt text"), Status::Warning);
    assert_eq!(status_of(&report, "Response speed"), Status::Warning);
    assert!(report.latency_ms > 2000);

    assert_eq!(report.summary.critical, 3);
    assert_eq!(report.summary.warning, 2);
    assert_eq!(report.score, 45);
    assert_score_invariants(&report);
}

#[tokio::test]
async fn test_primary_timeout_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PAGE_WITHOUT_VIEWPORT)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.fetch.page_timeout_secs = 1;

    let failure = auditor(config)
        .analyze(&server.uri())
        .await
        .expect_err("audit should fail");

    assert!(failure.error);
    assert_eq!(
        failure.message,
        "Could not reach the website or the request was blocked."
    );
    assert!(failure.detail.unwrap().contains("timeout"));
}

#[tokio::test]
async fn test_primary_error_status_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let failure = auditor(Config::default())
        .analyze(&server.uri())
        .await
        .expect_err("audit should fail");

    assert!(failure.error);
    assert!(failure.detail.unwrap().contains("503"));
}

#[tokio::test]
async fn test_unsupported_scheme_is_fatal() {
    let failure = auditor(Config::default())
        .analyze("ftp://example.com")
        .await
        .expect_err("audit should fail");

    assert!(failure.error);
    assert!(failure.detail.is_some());
}

#[tokio::test]
async fn test_missing_site_files_degrade_to_warnings() {
    let server = MockServer::start().await;
    mount_page(&server, PAGE_WITHOUT_VIEWPORT).await;

    let report = auditor(Config::default())
        .analyze(&server.uri())
        .await
        .expect("audit should succeed");

    let robots = report.finding("robots.txt").unwrap();
    assert_eq!(robots.status, Status::Warning);
    assert_eq!(robots.detail.as_deref(), Some("HTTP 404"));
    assert_eq!(status_of(&report, "sitemap.xml"), Status::Warning);

    assert_eq!(report.score, 75);
    assert_score_invariants(&report);
}

/// Origin on a local port with nothing listening
fn refused_origin() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

#[tokio::test]
async fn test_refused_site_files_still_yield_a_full_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fine"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.fetch.probe_timeout_secs = 1;
    let client = build_http_client(&config.fetch).unwrap();

    // The page was served, but its origin refuses connections for site files
    let request = AuditRequest::new(&refused_origin()).unwrap();
    let base_url = Url::parse(&server.uri()).unwrap();
    let page = PAGE_WITHOUT_VIEWPORT.replace("</body>", r#"<a href="/fine">Fine</a></body>"#);
    let document = Document::parse(&page);
    let context = AuditContext {
        url: request.as_str().to_string(),
        latency_ms: 120,
    };

    let mut findings = run_page_checks(&document, &context);
    findings.extend(run_network_checks(&client, &config, &request, &base_url, &document).await);
    let report = AuditReport::assemble(request.as_str(), findings, context.latency_ms);

    let robots = report.finding("robots.txt").unwrap();
    assert_eq!(robots.status, Status::Warning);
    assert_eq!(robots.message, "robots.txt not found.");
    assert!(robots
        .detail
        .as_deref()
        .unwrap()
        .starts_with("connection error"));

    let sitemap = report.finding("sitemap.xml").unwrap();
    assert_eq!(sitemap.status, Status::Warning);
    assert!(sitemap
        .detail
        .as_deref()
        .unwrap()
        .starts_with("connection error"));

    assert_eq!(status_of(&report, "Broken links"), Status::Passed);
    assert_eq!(report.findings.len(), 12);
    // viewport critical, robots and sitemap warnings
    assert_eq!(report.score, 75);
    assert_score_invariants(&report);
}

#[tokio::test]
async fn test_only_error_responses_count_as_broken_links() {
    let server = MockServer::start().await;
    let page = r#"<html><head><title>Links everywhere</title></head><body>
        <a href="/missing">Missing</a>
        <a href="/slow">Slow</a>
        <a href="/fine">Fine</a>
        <a href="mailto:hi@example.com">Mail</a>
    </body></html>"#;
    mount_page(&server, page).await;
    mount_site_files(&server).await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fine"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.fetch.probe_timeout_secs = 1;

    let report = auditor(config)
        .analyze(&server.uri())
        .await
        .expect("audit should succeed");

    let links = report.finding("Broken links").unwrap();
    let missing = format!("{}/missing", server.uri());

    assert_eq!(links.status, Status::Warning);
    assert_eq!(links.tier, Tier::Premium);
    assert_eq!(
        links.message,
        format!("1 of 3 checked link(s) are broken: {}", missing)
    );
    assert!(!links.message.contains("/slow"));
    assert_score_invariants(&report);
}

#[tokio::test]
async fn test_performance_probe_with_api_key() {
    let server = MockServer::start().await;
    mount_page(&server, PAGE_WITHOUT_VIEWPORT).await;
    mount_site_files(&server).await;

    Mock::given(method("GET"))
        .and(path("/pagespeed"))
        .and(query_param("key", "test-key"))
        .and(query_param("strategy", "mobile"))
        .and(query_param("category", "performance"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"lighthouseResult": {
                "categories": { "performance": { "score": 95 } },
                "audits": {
                    "first-contentful-paint": { "score": 0.6, "displayValue": "2.4 s" },
                    "largest-contentful-paint": { "score": 0.2, "displayValue": "6.0 s" }
                }
            }}"#,
        ))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.performance.endpoint = format!("{}/pagespeed", server.uri());
    config.performance.api_key = Some("test-key".to_string());

    let report = auditor(config)
        .analyze(&server.uri())
        .await
        .expect("audit should succeed");

    let titles: Vec<&str> = report.findings[9..].iter().map(|f| f.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "robots.txt",
            "sitemap.xml",
            "Broken links",
            "Performance score (mobile)",
            "First Contentful Paint",
            "Largest Contentful Paint",
        ]
    );
    assert_eq!(status_of(&report, "Performance score (mobile)"), Status::Passed);
    assert_eq!(status_of(&report, "First Contentful Paint"), Status::Warning);
    assert_eq!(status_of(&report, "Largest Contentful Paint"), Status::Critical);

    // viewport critical, FCP warning, LCP critical
    assert_eq!(report.score, 65);
    assert_score_invariants(&report);
}

#[tokio::test]
async fn test_performance_failure_is_a_single_warning() {
    let server = MockServer::start().await;
    mount_page(&server, PAGE_WITHOUT_VIEWPORT).await;
    mount_site_files(&server).await;

    Mock::given(method("GET"))
        .and(path("/pagespeed"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.performance.endpoint = format!("{}/pagespeed", server.uri());
    config.performance.api_key = Some("test-key".to_string());

    let report = auditor(config)
        .analyze(&server.uri())
        .await
        .expect("audit should succeed");

    let performance = report.finding("Performance (PageSpeed)").unwrap();
    assert_eq!(performance.status, Status::Warning);
    assert_eq!(performance.message, "Performance data unavailable.");
    assert_eq!(performance.detail.as_deref(), Some("HTTP 429"));
    assert_eq!(report.findings.len(), 13);
    assert_eq!(report.score, 80);
}

#[tokio::test]
async fn test_default_analyze_entry_point() {
    let server = MockServer::start().await;
    mount_page(&server, PAGE_WITHOUT_VIEWPORT).await;
    mount_site_files(&server).await;

    let report = seo_audit::analyze(&server.uri())
        .await
        .expect("audit should succeed");

    assert_eq!(report.url, server.uri());
    assert_eq!(report.score, 85);
}

#[tokio::test]
async fn test_reports_are_recorded_per_identity() {
    let server = MockServer::start().await;
    mount_page(&server, PAGE_WITHOUT_VIEWPORT).await;
    mount_site_files(&server).await;

    let dir = TempDir::new().unwrap();
    let mut history = SqliteHistory::new(&dir.path().join("audits.db")).unwrap();
    let auditor = auditor(Config::default());

    for _ in 0..2 {
        let report = auditor.analyze(&server.uri()).await.unwrap();
        history.save("owner@example.com", &report).unwrap();
    }

    let records = history.find_history("owner@example.com").unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].id > records[1].id);
    assert_eq!(records[0].score, 85);
    assert_eq!(records[0].findings.len(), 12);
    assert!(history.find_history("someone@example.com").unwrap().is_empty());
}
