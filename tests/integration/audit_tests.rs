//! Integration tests for the sitemap audit
//!
//! These tests use wiremock to serve sitemaps and pages and run the whole
//! discovery, checking and aggregation cycle end-to-end.

use std::time::Duration;
use sitemap_audit::audit::NO_SITEMAP_MESSAGE;
use sitemap_audit::config::{Config, LinkMethod};
use sitemap_audit::{RunOutcome, SiteTarget, SitemapAudit, Verdict};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.http.timeout_seconds = 1;
    config.http.connect_timeout_seconds = 1;
    config.checker.concurrency = 4;
    config
}

fn site(server: &MockServer) -> SiteTarget {
    SiteTarget {
        base_uri: server.uri(),
        search_root: None,
    }
}

fn urlset(locs: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
    );
    for loc in locs {
        xml.push_str(&format!("<url><loc>{}</loc></url>", loc));
    }
    xml.push_str("</urlset>");
    xml
}

fn sitemapindex(locs: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
    );
    for loc in locs {
        xml.push_str(&format!("<sitemap><loc>{}</loc></sitemap>", loc));
    }
    xml.push_str("</sitemapindex>");
    xml
}

async fn mount_document(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, at: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_missing_sitemap_is_warning() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "/sitemap.xml", 404).await;

    let audit = SitemapAudit::new(&create_test_config()).expect("Failed to build audit");
    let outcome = audit.run(&site(&mock_server)).await.expect("Audit failed");

    assert_eq!(outcome.verdict, Verdict::Warning);
    assert_eq!(outcome.report.outcome, RunOutcome::NoSitemapFound);
    assert_eq!(outcome.warning_message.as_deref(), Some(NO_SITEMAP_MESSAGE));
    assert_eq!(outcome.report.total_links_checked, 0);
}

#[tokio::test]
async fn test_all_links_healthy() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: Vec<String> = (1..=3).map(|i| format!("{}/page{}", base_url, i)).collect();
    mount_document(&mock_server, "/sitemap.xml", urlset(&links)).await;
    for i in 1..=3 {
        mount_status(&mock_server, &format!("/page{}", i), 200).await;
    }

    let audit = SitemapAudit::new(&create_test_config()).expect("Failed to build audit");
    let outcome = audit.run(&site(&mock_server)).await.expect("Audit failed");

    assert_eq!(outcome.verdict, Verdict::Success);
    assert_eq!(outcome.report.total_links_checked, 3);
    assert!(outcome.report.broken_links.is_empty());
    assert!(outcome.warning_message.is_none());
    assert!(outcome.status.contains("Total number of links checked: 3"));
}

#[tokio::test]
async fn test_mixed_results_keep_document_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: Vec<String> = ["ok-1", "missing", "ok-2", "broken"]
        .iter()
        .map(|p| format!("{}/{}", base_url, p))
        .collect();
    mount_document(&mock_server, "/sitemap.xml", urlset(&links)).await;
    mount_status(&mock_server, "/ok-1", 200).await;
    mount_status(&mock_server, "/ok-2", 200).await;
    mount_status(&mock_server, "/broken", 500).await;

    // The first broken link finishes last
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_delay(Duration::from_millis(300)))
        .mount(&mock_server)
        .await;

    let audit = SitemapAudit::new(&create_test_config()).expect("Failed to build audit");
    let outcome = audit.run(&site(&mock_server)).await.expect("Audit failed");

    let report = &outcome.report;
    assert_eq!(outcome.verdict, Verdict::Failure);
    assert_eq!(report.total_links_checked, 4);
    assert_eq!(report.broken_links.len(), 2);
    assert_eq!(report.broken_links[0].status, Some(404));
    assert_eq!(report.broken_links[0].uri, format!("{}/missing", base_url));
    assert_eq!(report.broken_links[1].status, Some(500));
    assert!(report.broken_links.iter().all(|link| link.is_broken));
    assert!(outcome
        .status
        .contains(&format!("1. {}/missing (STATUS: 404)", base_url)));
    assert!(outcome
        .status
        .contains(&format!("2. {}/broken (STATUS: 500)", base_url)));
}

#[tokio::test]
async fn test_index_expansion() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_document(
        &mock_server,
        "/sitemap.xml",
        sitemapindex(&[
            format!("{}/sitemap-1.xml", base_url),
            format!("{}/sitemap-2.xml", base_url),
        ]),
    )
    .await;
    mount_document(
        &mock_server,
        "/sitemap-1.xml",
        urlset(&[format!("{}/a", base_url), format!("{}/b", base_url)]),
    )
    .await;
    mount_document(
        &mock_server,
        "/sitemap-2.xml",
        urlset(&[
            format!("{}/c", base_url),
            format!("{}/d", base_url),
            format!("{}/gone", base_url),
        ]),
    )
    .await;
    for p in ["/a", "/b", "/c", "/d"] {
        mount_status(&mock_server, p, 200).await;
    }
    mount_status(&mock_server, "/gone", 410).await;

    let audit = SitemapAudit::new(&create_test_config()).expect("Failed to build audit");
    let outcome = audit.run(&site(&mock_server)).await.expect("Audit failed");

    assert_eq!(outcome.verdict, Verdict::Failure);
    assert_eq!(outcome.report.sitemaps_checked, 3);
    assert_eq!(outcome.report.total_links_checked, 5);
    assert_eq!(outcome.report.broken_links.len(), 1);
    assert_eq!(outcome.report.broken_links[0].status, Some(410));
}

#[tokio::test]
async fn test_transport_failure_counts_as_broken() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_document(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/fast", base_url), format!("{}/slow", base_url)]),
    )
    .await;
    mount_status(&mock_server, "/fast", 200).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let audit = SitemapAudit::new(&create_test_config()).expect("Failed to build audit");
    let outcome = audit.run(&site(&mock_server)).await.expect("Audit failed");

    assert_eq!(outcome.verdict, Verdict::Failure);
    assert_eq!(outcome.report.total_links_checked, 2);
    assert_eq!(outcome.report.broken_links.len(), 1);

    let timed_out = &outcome.report.broken_links[0];
    assert_eq!(timed_out.uri, format!("{}/slow", base_url));
    assert_eq!(timed_out.status, None);
    assert!(timed_out.is_broken);
    assert_eq!(outcome.report.breakdown.transport_error, 1);
    assert!(outcome.status.contains("(STATUS: ERROR)"));
}

#[tokio::test]
async fn test_bad_sitemaps_are_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_document(
        &mock_server,
        "/sitemap.xml",
        sitemapindex(&[
            format!("{}/malformed.xml", base_url),
            format!("{}/missing.xml", base_url),
            format!("{}/good.xml", base_url),
        ]),
    )
    .await;
    mount_document(
        &mock_server,
        "/malformed.xml",
        "<urlset><url><loc>oops</url>".to_string(),
    )
    .await;
    mount_status(&mock_server, "/missing.xml", 404).await;
    mount_document(
        &mock_server,
        "/good.xml",
        urlset(&[format!("{}/page", base_url)]),
    )
    .await;
    mount_status(&mock_server, "/page", 200).await;

    let audit = SitemapAudit::new(&create_test_config()).expect("Failed to build audit");
    let outcome = audit.run(&site(&mock_server)).await.expect("Audit failed");

    assert_eq!(outcome.verdict, Verdict::Success);
    assert_eq!(outcome.report.sitemaps_checked, 4);
    assert_eq!(outcome.report.total_links_checked, 1);
}

#[tokio::test]
async fn test_duplicate_links_are_checked_each_time() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_document(
        &mock_server,
        "/sitemap.xml",
        sitemapindex(&[
            format!("{}/one.xml", base_url),
            format!("{}/two.xml", base_url),
        ]),
    )
    .await;
    let shared = vec![format!("{}/shared", base_url)];
    mount_document(&mock_server, "/one.xml", urlset(&shared)).await;
    mount_document(&mock_server, "/two.xml", urlset(&shared)).await;
    mount_status(&mock_server, "/shared", 404).await;

    let audit = SitemapAudit::new(&create_test_config()).expect("Failed to build audit");
    let outcome = audit.run(&site(&mock_server)).await.expect("Audit failed");

    assert_eq!(outcome.report.total_links_checked, 2);
    assert_eq!(outcome.report.broken_links.len(), 2);
}

#[tokio::test]
async fn test_oversized_sitemap_contributes_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: Vec<String> = (0..50).map(|i| format!("{}/p{}", base_url, i)).collect();
    mount_document(&mock_server, "/sitemap.xml", urlset(&links)).await;

    let mut config = create_test_config();
    config.checker.max_sitemap_bytes = 256;

    let audit = SitemapAudit::new(&config).expect("Failed to build audit");
    let outcome = audit.run(&site(&mock_server)).await.expect("Audit failed");

    // The root is still found, it just yields no links
    assert_eq!(outcome.report.outcome, RunOutcome::AllLinksValid);
    assert_eq!(outcome.report.sitemaps_checked, 1);
    assert_eq!(outcome.report.total_links_checked, 0);
}

#[tokio::test]
async fn test_head_link_method() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_document(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/page", base_url)]),
    )
    .await;
    Mock::given(method("HEAD"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config();
    config.http.link_method = LinkMethod::Head;

    let audit = SitemapAudit::new(&config).expect("Failed to build audit");
    let outcome = audit.run(&site(&mock_server)).await.expect("Audit failed");

    assert_eq!(outcome.verdict, Verdict::Success);
    assert_eq!(outcome.report.total_links_checked, 1);
}

#[tokio::test]
async fn test_unresolvable_links_are_broken() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_document(
        &mock_server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/ok", base_url),
            "http://exa mple.com/page".to_string(),
            "http://[::1/x".to_string(),
        ]),
    )
    .await;
    mount_status(&mock_server, "/ok", 200).await;

    let audit = SitemapAudit::new(&create_test_config()).expect("Failed to build audit");
    let outcome = audit.run(&site(&mock_server)).await.expect("Audit failed");

    let report = &outcome.report;
    assert_eq!(outcome.verdict, Verdict::Failure);
    assert_eq!(report.total_links_checked, 3);
    assert_eq!(report.broken_links.len(), 2);
    assert_eq!(report.broken_links[0].uri, "http://exa mple.com/page");
    assert_eq!(report.broken_links[1].uri, "http://[::1/x");
    assert!(report.broken_links.iter().all(|link| link.status.is_none()));
    assert!(outcome
        .status
        .contains("1. http://exa mple.com/page (STATUS: ERROR)"));
    assert!(outcome.status.contains("2. http://[::1/x (STATUS: ERROR)"));
}

#[tokio::test]
async fn test_entry_cap_limits_links_checked() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: Vec<String> = (0..5).map(|i| format!("{}/p{}", base_url, i)).collect();
    mount_document(&mock_server, "/sitemap.xml", urlset(&links)).await;
    // Only the first two pages exist; fetching any other would report a 404
    mount_status(&mock_server, "/p0", 200).await;
    mount_status(&mock_server, "/p1", 200).await;

    let mut config = create_test_config();
    config.checker.max_sitemap_entries = 2;

    let audit = SitemapAudit::new(&config).expect("Failed to build audit");
    let outcome = audit.run(&site(&mock_server)).await.expect("Audit failed");

    assert_eq!(outcome.verdict, Verdict::Success);
    assert_eq!(outcome.report.total_links_checked, 2);
    assert!(outcome.report.broken_links.is_empty());
}

#[tokio::test]
async fn test_relative_locs_resolve_against_their_sitemap() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_document(
        &mock_server,
        "/sitemap.xml",
        sitemapindex(&[format!("{}/section/sitemap.xml", base_url)]),
    )
    .await;
    mount_document(
        &mock_server,
        "/section/sitemap.xml",
        urlset(&["/top".to_string(), "child".to_string()]),
    )
    .await;
    mount_status(&mock_server, "/top", 200).await;
    mount_status(&mock_server, "/section/child", 404).await;

    let audit = SitemapAudit::new(&create_test_config()).expect("Failed to build audit");
    let outcome = audit.run(&site(&mock_server)).await.expect("Audit failed");

    assert_eq!(outcome.report.total_links_checked, 2);
    assert_eq!(outcome.report.broken_links.len(), 1);
    assert_eq!(
        outcome.report.broken_links[0].uri,
        format!("{}/section/child", base_url)
    );
    assert_eq!(outcome.report.broken_links[0].status, Some(404));
}
