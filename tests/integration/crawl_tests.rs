//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use crawl_o_matic::config::UserAgentConfig;
use crawl_o_matic::crawler::{
    build_http_client, start_crawl, start_crawl_with, CrawlOptions, DispatchPolicy, Page,
    PageStream,
};
use crawl_o_matic::CrawlError;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const TICK: Duration = Duration::from_millis(1);

/// Drains a page stream, failing the test if the crawl never terminates
async fn collect_pages(stream: PageStream) -> Vec<Page> {
    tokio::time::timeout(Duration::from_secs(10), stream.collect())
        .await
        .expect("crawl did not terminate")
}

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Counts the requests a server received for `route`
async fn hits(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == route)
        .count()
}

fn find_page<'a>(pages: &'a [Page], route: &str) -> Option<&'a Page> {
    pages.iter().find(|page| page.url.path() == route)
}

#[tokio::test]
async fn test_start_crawl_rejects_invalid_seeds() {
    let cases = [
        ("empty", ""),
        ("relative", "/foo"),
        ("mailto", "mailto:someone@example.com"),
        ("ftp", "ftp://host/file.txt"),
        ("malformed", "seriously@malformed://url"),
    ];

    for (name, seed) in cases {
        let result = start_crawl(seed, TICK, 10).await;
        assert!(result.is_err(), "{} seed should be rejected", name);
    }
}

#[tokio::test]
async fn test_start_crawl_seed_error_kinds() {
    assert!(matches!(
        start_crawl("/foo", TICK, 10).await,
        Err(CrawlError::NotAbsolute(_))
    ));
    assert!(matches!(
        start_crawl("ftp://host/file.txt", TICK, 10).await,
        Err(CrawlError::UnsupportedScheme { .. })
    ));
    assert!(matches!(
        start_crawl("seriously@malformed://url", TICK, 10).await,
        Err(CrawlError::MalformedUrl { .. })
    ));
}

#[tokio::test]
async fn test_invalid_options_make_no_requests() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<a href='/a'>a</a>").await;

    let zero_interval = start_crawl(&server.uri(), Duration::ZERO, 10).await;
    assert!(matches!(zero_interval, Err(CrawlError::InvalidInterval)));

    let zero_concurrency = start_crawl(&server.uri(), TICK, 0).await;
    assert!(matches!(
        zero_concurrency,
        Err(CrawlError::InvalidConcurrency(0))
    ));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(hits(&server, "/").await, 0);
}

#[tokio::test]
async fn test_full_crawl_scenario() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/foo", "<a href='/bar'>A link</a>").await;
    mount_page(
        &server,
        "/bar",
        "<a href='/baz'>Another link</a><a href='/qux'>Yet another link</a>",
    )
    .await;
    mount_page(
        &server,
        "/baz",
        "<a href='https://wwww.google.com'>An external link</a>",
    )
    .await;
    mount_page(
        &server,
        "/qux",
        "<a href='/foo'>A link</a><a href='/foo'>A duplicated link</a>",
    )
    .await;

    let stream = start_crawl(&format!("{}/foo", base), TICK, 10)
        .await
        .expect("crawl should start");
    let pages = collect_pages(stream).await;

    assert_eq!(pages.len(), 4, "got pages: {:?}", pages);

    let expected: [(&str, Vec<String>); 4] = [
        ("/foo", vec![format!("{}/bar", base)]),
        ("/bar", vec![format!("{}/baz", base), format!("{}/qux", base)]),
        ("/baz", vec!["https://wwww.google.com/".to_string()]),
        ("/qux", vec![format!("{}/foo", base)]),
    ];

    for (route, links) in expected {
        let page = find_page(&pages, route)
            .unwrap_or_else(|| panic!("{} was expected to be returned as a page", route));

        assert_eq!(page.address(), format!("{}{}", base, route));
        assert_eq!(
            page.links.len(),
            links.len(),
            "unexpected links on {}: {:?}",
            route,
            page.links
        );
        for link in &links {
            assert!(page.has_link(link), "{} should link to {}", route, link);
        }
    }

    for route in ["/foo", "/bar", "/baz", "/qux"] {
        assert_eq!(hits(&server, route).await, 1, "{} fetched more than once", route);
    }
}

#[tokio::test]
async fn test_crawl_visits_pages_only_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<a href='/foo'>A self link</a><a href='/foo'>Another self link</a>",
        ))
        .mount(&server)
        .await;

    let stream = start_crawl(&format!("{}/foo", server.uri()), TICK, 10)
        .await
        .unwrap();
    let pages = collect_pages(stream).await;

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].links.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_page_reachable_from_two_referrers_is_fetched_once() {
    let server = MockServer::start().await;

    mount_page(&server, "/", "<a href='/a'>a</a><a href='/b'>b</a>").await;
    mount_page(&server, "/a", "<a href='/shared'>shared</a>").await;
    mount_page(&server, "/b", "<a href='/shared'>shared</a>").await;
    mount_page(&server, "/shared", "<p>leaf</p>").await;

    let stream = start_crawl(&server.uri(), TICK, 4).await.unwrap();
    let pages = collect_pages(stream).await;

    assert_eq!(pages.len(), 4);
    assert_eq!(
        pages
            .iter()
            .filter(|page| page.url.path() == "/shared")
            .count(),
        1
    );
    assert_eq!(hits(&server, "/shared").await, 1);
}

#[tokio::test]
async fn test_crawl_does_not_follow_external_links() {
    let external = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&external)
        .await;

    let server = MockServer::start().await;
    let external_link = format!("{}/foo", external.uri());
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("<a href='{}'>An external link</a>", external_link)),
        )
        .mount(&server)
        .await;

    let stream = start_crawl(&server.uri(), TICK, 10).await.unwrap();
    let pages = collect_pages(stream).await;

    assert_eq!(pages.len(), 1);
    assert!(pages[0].has_link(&external_link));
    assert!(external.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_crawl_ignores_malformed_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<a href='seriously@malformed://url'>An external link</a>"),
        )
        .mount(&server)
        .await;

    let mut stream = start_crawl(&server.uri(), TICK, 10).await.unwrap();
    let page = tokio::time::timeout(Duration::from_secs(10), stream.next())
        .await
        .expect("crawl did not produce a page")
        .expect("page should be emitted even without valid links");

    assert!(page.links.is_empty());
    assert!(collect_pages(stream).await.is_empty());
}

#[tokio::test]
async fn test_crawl_ignores_redirect_loops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(308).insert_header("location", "/"))
        .mount(&server)
        .await;

    let stream = start_crawl(&server.uri(), TICK, 10).await.unwrap();
    let pages = collect_pages(stream).await;

    assert!(
        pages.is_empty(),
        "redirect loops should be ignored but {} pages were returned",
        pages.len()
    );
}

#[tokio::test]
async fn test_unreachable_seed_terminates_without_pages() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let stream = start_crawl(&format!("http://127.0.0.1:{}/", port), TICK, 2)
        .await
        .unwrap();

    assert!(collect_pages(stream).await.is_empty());
}

#[tokio::test]
async fn test_failed_page_does_not_stop_the_crawl() {
    let server = MockServer::start().await;

    mount_page(&server, "/", "<a href='/loop'>loop</a><a href='/ok'>ok</a>").await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(308).insert_header("location", "/loop"))
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<p>fine</p>").await;

    let stream = start_crawl(&server.uri(), TICK, 4).await.unwrap();
    let pages = collect_pages(stream).await;

    assert_eq!(pages.len(), 2);
    assert!(find_page(&pages, "/").is_some());
    assert!(find_page(&pages, "/ok").is_some());
    assert!(find_page(&pages, "/loop").is_none());
}

#[tokio::test]
async fn test_error_status_pages_are_still_parsed() {
    let server = MockServer::start().await;

    mount_page(&server, "/", "<a href='/gone'>gone</a>").await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<a href='/home'>home</a>"))
        .mount(&server)
        .await;
    mount_page(&server, "/home", "").await;

    let stream = start_crawl(&server.uri(), TICK, 4).await.unwrap();
    let pages = collect_pages(stream).await;

    let gone = find_page(&pages, "/gone").expect("404 page should still be emitted");
    assert!(gone.has_link(&format!("{}/home", server.uri())));
    assert!(find_page(&pages, "/home").is_some());
}

#[tokio::test]
async fn test_backpressure_with_single_slot_queue() {
    let server = MockServer::start().await;

    let links: String = (0..12)
        .map(|i| format!("<a href='/p{}'>{}</a>", i, i))
        .collect();
    mount_page(&server, "/", &links).await;
    for i in 0..12 {
        mount_page(&server, &format!("/p{}", i), "<a href='/'>home</a>").await;
    }

    let stream = start_crawl(&server.uri(), TICK, 1).await.unwrap();
    let pages = collect_pages(stream).await;

    assert_eq!(pages.len(), 13);
    assert_eq!(find_page(&pages, "/").unwrap().links.len(), 12);
}

#[tokio::test]
async fn test_fill_headroom_policy_crawls_everything() {
    let server = MockServer::start().await;

    mount_page(&server, "/", "<a href='/a'>a</a><a href='/b'>b</a><a href='/c'>c</a>").await;
    for route in ["/a", "/b", "/c"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<a href='/'>home</a><a href='/d'>d</a>")
                    .set_delay(Duration::from_millis(20)),
            )
            .mount(&server)
            .await;
    }
    mount_page(&server, "/d", "").await;

    let options = CrawlOptions::new(TICK, 2).with_dispatch(DispatchPolicy::FillHeadroom);
    let client = build_http_client(&UserAgentConfig::default()).unwrap();
    let stream = start_crawl_with(&server.uri(), options, client)
        .await
        .unwrap();
    let pages = collect_pages(stream).await;

    assert_eq!(pages.len(), 5);
    for route in ["/", "/a", "/b", "/c", "/d"] {
        assert_eq!(hits(&server, route).await, 1, "{} fetched more than once", route);
    }
}

/// Starts a crawl that fills up to `max_concurrency` fetches per tick
async fn start_fill_headroom(seed: &str, max_concurrency: usize) -> PageStream {
    let options =
        CrawlOptions::new(TICK, max_concurrency).with_dispatch(DispatchPolicy::FillHeadroom);
    let client = build_http_client(&UserAgentConfig::default()).unwrap();
    start_crawl_with(seed, options, client).await.unwrap()
}

/// Mounts `/` linking to `count` leaf pages `/p0`, `/p1`, ...
async fn mount_wide_site(server: &MockServer, count: usize) {
    let links: String = (0..count)
        .map(|i| format!("<a href='/p{}'>{}</a>", i, i))
        .collect();
    mount_page(server, "/", &links).await;
    for i in 0..count {
        mount_page(server, &format!("/p{}", i), "<p>leaf</p>").await;
    }
}

#[tokio::test]
async fn test_fill_headroom_single_slot_with_two_links() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<a href='/a'>a</a><a href='/b'>b</a>").await;
    mount_page(&server, "/a", "").await;
    mount_page(&server, "/b", "").await;

    let stream = start_fill_headroom(&server.uri(), 1).await;
    let pages = collect_pages(stream).await;

    assert_eq!(pages.len(), 3);
    for route in ["/", "/a", "/b"] {
        assert!(find_page(&pages, route).is_some(), "{} was not crawled", route);
    }
}

#[tokio::test]
async fn test_fill_headroom_terminates_when_links_outnumber_slots() {
    for max_concurrency in [1, 2] {
        let server = MockServer::start().await;
        mount_wide_site(&server, 8).await;

        let stream = start_fill_headroom(&server.uri(), max_concurrency).await;
        let pages = collect_pages(stream).await;

        assert_eq!(
            pages.len(),
            9,
            "max_concurrency {} crawled {} pages",
            max_concurrency,
            pages.len()
        );
        assert_eq!(find_page(&pages, "/").unwrap().links.len(), 8);
    }
}

/// Records when each request reached the server, then answers after `delay`
struct ArrivalRecorder {
    arrivals: Arc<Mutex<Vec<Instant>>>,
    delay: Duration,
    root_body: String,
}

impl Respond for ArrivalRecorder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());

        let body = if request.url.path() == "/" {
            self.root_body.clone()
        } else {
            String::new()
        };
        ResponseTemplate::new(200)
            .set_body_string(body)
            .set_delay(self.delay)
    }
}

/// Largest number of requests that arrived within `window` of each other
fn peak_overlap(arrivals: &[Instant], window: Duration) -> usize {
    let mut sorted = arrivals.to_vec();
    sorted.sort();

    (0..sorted.len())
        .map(|i| {
            sorted[i..]
                .iter()
                .take_while(|arrival| arrival.duration_since(sorted[i]) < window)
                .count()
        })
        .max()
        .unwrap_or(0)
}

#[tokio::test]
async fn test_fill_headroom_never_exceeds_fetch_ceiling() {
    // A fetch holds its slot for at least `delay`, so more than
    // `max_concurrency` arrivals inside a shorter window means overlap.
    let delay = Duration::from_millis(200);
    let window = Duration::from_millis(150);
    let max_concurrency = 2;

    let server = MockServer::start().await;
    let arrivals = Arc::new(Mutex::new(Vec::new()));
    let root_body: String = (0..6)
        .map(|i| format!("<a href='/p{}'>{}</a>", i, i))
        .collect();
    Mock::given(method("GET"))
        .respond_with(ArrivalRecorder {
            arrivals: Arc::clone(&arrivals),
            delay,
            root_body,
        })
        .mount(&server)
        .await;

    let stream = start_fill_headroom(&server.uri(), max_concurrency).await;
    let pages = collect_pages(stream).await;
    assert_eq!(pages.len(), 7);

    let arrivals = arrivals.lock().unwrap().clone();
    assert_eq!(arrivals.len(), 7);

    let peak = peak_overlap(&arrivals, window);
    assert!(
        peak <= max_concurrency,
        "{} fetches overlapped with a ceiling of {}",
        peak,
        max_concurrency
    );
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "TestBot/1.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    let user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: None,
    };
    let client = build_http_client(&user_agent).unwrap();
    let stream = start_crawl_with(&server.uri(), CrawlOptions::new(TICK, 1), client)
        .await
        .unwrap();
    let pages = collect_pages(stream).await;

    assert_eq!(pages.len(), 1);
    server.verify().await;
}
