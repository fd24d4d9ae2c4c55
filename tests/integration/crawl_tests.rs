//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use contact_ripple::config::Config;
use contact_ripple::crawler::{run_batch, Coordinator};
use contact_ripple::state::{CompletionReason, CrawlOutcome, StopSignal};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no delay between requests
fn create_test_config(max_depth: u32, max_pages: usize) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.max_pages = max_pages;
    config.crawler.request_delay_ms = 0;
    config.crawler.request_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Cloudflare-style payload: key byte followed by the XOR-ed address
fn cloudflare(email: &str, key: u8) -> String {
    let mut bytes = vec![key];
    bytes.extend(email.bytes().map(|b| b ^ key));
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

async fn portfolio_site() -> MockServer {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><head><title>Jane Doe | Portfolio</title></head><body>
            <a href="/about">About</a>
            <a href="/contact">Contact</a>
            <a href="/files/jane-cv.pdf">Download CV</a>
            <a href="https://elsewhere.example.org/">Elsewhere</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        &server,
        "/about",
        r#"<html><body>
            <p>Call +977 9860463471 or the office on +977-XXXXXXXXXX.</p>
            <a href="/missing">Old page</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        &server,
        "/contact",
        format!(
            r#"<html><body>
            <a href="mailto:info@example.com?subject=Hello">Email</a>
            <span class="__cf_email__" data-cfemail="{}">[email protected]</span>
            <script type="application/ld+json">{{"@type": "Person", "email": "info@example.com"}}</script>
            </body></html>"#,
            cloudflare("jane@example.com", 0x5a)
        ),
    )
    .await;

    server
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = portfolio_site().await;
    let coordinator = Coordinator::from_config(&create_test_config(3, 50)).unwrap();

    let result = coordinator.crawl(&server.uri()).await;
    let base = server.uri();

    assert_eq!(
        result.outcome,
        CrawlOutcome::Completed(CompletionReason::FrontierExhausted)
    );
    assert_eq!(
        result.pages_crawled,
        vec![
            format!("{}/", base),
            format!("{}/about", base),
            format!("{}/contact", base),
        ]
    );
    assert_eq!(result.skipped_pages.len(), 1);
    assert_eq!(result.skipped_pages[0].url, format!("{}/missing", base));

    let emails: Vec<&str> = result.emails.iter().map(String::as_str).collect();
    assert_eq!(emails, vec!["info@example.com", "jane@example.com"]);
    let phones: Vec<&str> = result.phones.iter().map(String::as_str).collect();
    assert_eq!(phones, vec!["+977 9860463471"]);
    assert!(result.masked_phones.contains("+977-XXXXXXXXXX"));
    assert!(result.synthetic_emails.is_empty());

    assert_eq!(result.name.as_deref(), Some("Jane Doe"));
    assert_eq!(
        result.resume_links,
        vec![format!("{}/files/jane-cv.pdf", base)]
    );
}

#[tokio::test]
async fn test_document_seed_crawls_homepage() {
    let server = portfolio_site().await;
    let coordinator = Coordinator::from_config(&create_test_config(1, 50)).unwrap();

    let result = coordinator
        .crawl(&format!("{}/files/jane-cv.pdf", server.uri()))
        .await;

    assert_eq!(result.root, Some(format!("{}/", server.uri())));
    assert!(!result.pages_crawled.is_empty());
    assert_eq!(result.pages_crawled[0], format!("{}/", server.uri()));
    assert_eq!(
        result.resume_links,
        vec![format!("{}/files/jane-cv.pdf", server.uri())]
    );
}

#[tokio::test]
async fn test_unreachable_seed() {
    let coordinator = Coordinator::from_config(&create_test_config(3, 50)).unwrap();

    let result = coordinator.crawl("http://127.0.0.1:1/").await;

    assert!(matches!(result.outcome, CrawlOutcome::FetchFailure(_)));
    assert!(result.pages_crawled.is_empty());
    assert!(result.emails.is_empty());
    assert!(result.phones.is_empty());
}

#[tokio::test]
async fn test_root_error_status_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let coordinator = Coordinator::from_config(&create_test_config(3, 50)).unwrap();
    let result = coordinator.crawl(&server.uri()).await;

    assert_eq!(
        result.outcome,
        CrawlOutcome::FetchFailure("HTTP status 503".to_string())
    );
    assert!(result.pages_crawled.is_empty());
}

#[tokio::test]
async fn test_non_html_root_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"ok":true}"#, "application/json"))
        .mount(&server)
        .await;

    let coordinator = Coordinator::from_config(&create_test_config(3, 50)).unwrap();
    let result = coordinator.crawl(&server.uri()).await;

    assert!(matches!(result.outcome, CrawlOutcome::ParseFailure(_)));
    assert!(result.pages_crawled.is_empty());
}

#[tokio::test]
async fn test_timeout_is_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>slow</p>").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut config = create_test_config(3, 50);
    config.crawler.request_timeout_secs = 1;
    let coordinator = Coordinator::from_config(&config).unwrap();
    let result = coordinator.crawl(&server.uri()).await;

    assert_eq!(
        result.outcome,
        CrawlOutcome::FetchFailure("request timeout".to_string())
    );
}

#[tokio::test]
async fn test_slow_inner_page_is_skipped() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/slow">Slow</a><a href="/contact">Contact</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<p>late@example.com</p>").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    mount_page(&server, "/contact", "<p>jane@example.com</p>").await;

    let mut config = create_test_config(3, 50);
    config.crawler.request_timeout_secs = 1;
    let coordinator = Coordinator::from_config(&config).unwrap();
    let result = coordinator.crawl(&server.uri()).await;
    let base = server.uri();

    assert_eq!(
        result.outcome,
        CrawlOutcome::Completed(CompletionReason::FrontierExhausted)
    );
    assert_eq!(result.skipped_pages.len(), 1);
    assert_eq!(result.skipped_pages[0].url, format!("{}/slow", base));
    assert_eq!(result.skipped_pages[0].reason, "request timeout");
    assert_eq!(
        result.pages_crawled,
        vec![format!("{}/", base), format!("{}/contact", base)]
    );
    assert!(result.emails.contains("jane@example.com"));
    assert!(!result.emails.contains("late@example.com"));
}

#[tokio::test]
async fn test_off_site_redirect_not_merged() {
    let social = MockServer::start().await;
    mount_page(
        &social,
        "/help",
        "<p>support@bigsocial.com</p><p>+1 650 555 0199</p>",
    )
    .await;
    // Same loopback address under another host name
    let social_url = format!("http://localhost:{}/help", social.address().port());

    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<p>jane@example.com</p><a href="/go/social">Social</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/go/social"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", social_url.as_str()))
        .mount(&server)
        .await;

    let coordinator = Coordinator::from_config(&create_test_config(3, 50)).unwrap();
    let result = coordinator.crawl(&server.uri()).await;

    assert_eq!(result.pages_crawled, vec![format!("{}/", server.uri())]);
    assert_eq!(result.skipped_pages.len(), 1);
    assert!(result.skipped_pages[0].reason.starts_with("off-site redirect"));
    let emails: Vec<&str> = result.emails.iter().map(String::as_str).collect();
    assert_eq!(emails, vec!["jane@example.com"]);
    assert!(result.phones.is_empty());
}

#[tokio::test]
async fn test_max_pages_respected() {
    let server = MockServer::start().await;
    let links: String = (0..30)
        .map(|i| format!(r#"<a href="/p{i}">Page {i}</a>"#))
        .collect();
    mount_page(&server, "/", format!("<html><body>{}</body></html>", links)).await;
    for i in 0..30 {
        mount_page(&server, &format!("/p{}", i), "<p>nothing here</p>").await;
    }

    let coordinator = Coordinator::from_config(&create_test_config(5, 5)).unwrap();
    let result = coordinator.crawl(&server.uri()).await;

    assert_eq!(result.pages_crawled.len(), 5);
    assert_eq!(
        result.outcome,
        CrawlOutcome::Completed(CompletionReason::PageLimit)
    );
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 5);
}

#[tokio::test]
async fn test_depth_respected() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/a">A</a>"#).await;
    mount_page(&server, "/a", r#"<a href="/b">B</a>"#).await;
    mount_page(&server, "/b", r#"<a href="/c">C</a>"#).await;
    mount_page(&server, "/c", "<p>deep@example.com</p>").await;

    let coordinator = Coordinator::from_config(&create_test_config(2, 50)).unwrap();
    let result = coordinator.crawl(&server.uri()).await;

    assert_eq!(result.pages_crawled.len(), 3);
    assert!(!result.pages_crawled.contains(&format!("{}/c", server.uri())));
    assert!(result.emails.is_empty());
}

#[tokio::test]
async fn test_rerun_gives_identical_contacts() {
    let server = portfolio_site().await;
    let coordinator = Coordinator::from_config(&create_test_config(3, 50)).unwrap();

    let first = coordinator.crawl(&server.uri()).await;
    let second = coordinator.crawl(&server.uri()).await;

    assert_eq!(first.emails, second.emails);
    assert_eq!(first.phones, second.phones);
    assert_eq!(first.masked_phones, second.masked_phones);
    assert_eq!(first.pages_crawled, second.pages_crawled);
}

#[tokio::test]
async fn test_stop_signal_returns_partial_result() {
    let server = portfolio_site().await;
    let coordinator = Coordinator::from_config(&create_test_config(3, 50)).unwrap();
    let stop = StopSignal::new();
    stop.stop();

    let result = coordinator.crawl_with_stop(&server.uri(), &stop).await;

    assert_eq!(
        result.outcome,
        CrawlOutcome::Completed(CompletionReason::Stopped)
    );
    assert!(result.pages_crawled.is_empty());
}

#[tokio::test]
async fn test_batch_keeps_seed_order() {
    let server = portfolio_site().await;
    let coordinator = Arc::new(Coordinator::from_config(&create_test_config(1, 50)).unwrap());
    let seeds = vec![
        server.uri(),
        "not a url at all://".to_string(),
        format!("{}/about", server.uri()),
    ];

    let results = run_batch(coordinator, seeds.clone(), 2, StopSignal::new()).await;

    assert_eq!(results.len(), 3);
    for (result, seed) in results.iter().zip(&seeds) {
        assert_eq!(&result.seed, seed);
    }
    assert!(!results[0].is_aborted());
    assert!(matches!(results[1].outcome, CrawlOutcome::InvalidUrl(_)));
    assert!(results[2].phones.contains("+977 9860463471"));
}
