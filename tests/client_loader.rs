//! Loader tests: drive the SPA page client against a live server and
//! verify frame composition, asset extraction and derive chains.

mod common;

use std::net::SocketAddr;

use serde_json::json;
use url::Url;

use pageserve::client::{ClientError, PageClient};
use pageserve::routing::RouteTable;
use pageserve::template::ParamMap;

async fn setup() -> (tempfile::TempDir, SocketAddr, PageClient) {
    let dir = tempfile::tempdir().unwrap();
    common::build_site(dir.path());
    let addr = common::spawn_server(common::fixture_config(dir.path())).await;

    let base = Url::parse(&format!("http://{}/", addr)).unwrap();
    let routes = RouteTable::compile(&common::fixture_routes()).unwrap();
    (dir, addr, PageClient::new(base, routes))
}

#[tokio::test]
async fn test_load_simple_page_extracts_assets() {
    let (_dir, _addr, client) = setup().await;

    let page = client.load("/home").await.unwrap();
    assert_eq!(page.frames.len(), 1);

    let frame = page.leaf();
    assert!(frame.success);
    assert_eq!(frame.container, "app");
    // The script block is lifted out of the installable HTML.
    assert_eq!(frame.html, "<h1>Welcome</h1><span>badge</span>");
    assert_eq!(frame.scripts, vec![r#"console.log("home")"#.to_string()]);
    assert!(frame.styles.is_empty());
    assert_eq!(frame.config["title"], "Home");
}

#[tokio::test]
async fn test_raw_interpolation_uses_route_bindings() {
    let (_dir, _addr, client) = setup().await;

    let page = client.load("/route/42").await.unwrap();
    let frame = page.leaf();
    assert!(frame.success);
    // Server filled the block, the loader fills the {{query}} span.
    assert!(frame.html.contains("q=42"));
    assert!(frame.html.contains(r#"data-q="42""#));
    assert!(!frame.html.contains("{{query}}"));
}

#[tokio::test]
async fn test_derive_chain_composes_ancestor_first() {
    let (_dir, _addr, client) = setup().await;

    let page = client.load("/dash/stats").await.unwrap();
    assert_eq!(page.frames.len(), 2);

    assert_eq!(page.frames[0].path, "/dash");
    assert_eq!(page.frames[0].container, "app");
    assert!(page.frames[0].html.contains("id=\"panel\""));

    assert_eq!(page.frames[1].path, "/dash/stats");
    assert_eq!(page.frames[1].container, "panel");
    assert_eq!(page.frames[1].html, "<ul>stats</ul>");
}

#[tokio::test]
async fn test_derive_skips_ancestor_already_on_screen() {
    let (_dir, _addr, client) = setup().await;

    let page = client.load_from("/dash/stats", Some("/dash")).await.unwrap();
    assert_eq!(page.frames.len(), 1);
    assert_eq!(page.frames[0].container, "panel");
}

#[tokio::test]
async fn test_derive_cycle_fails_at_the_depth_bound() {
    let (_dir, _addr, client) = setup().await;

    // /loop declares itself as its own derive ancestor.
    let err = client.load("/loop").await.unwrap_err();
    assert!(matches!(err, ClientError::DeriveTooDeep));
}

#[tokio::test]
async fn test_missing_page_still_composes_a_frame() {
    let (_dir, _addr, client) = setup().await;

    let page = client.load("/no/such/page").await.unwrap();
    let frame = page.leaf();
    assert!(!frame.success);
    assert_eq!(frame.error.as_deref(), Some("PageNotFound"));
    assert_eq!(frame.html, "<h1>custom 404</h1>");
}

#[tokio::test]
async fn test_navigation_is_conditionally_rendered() {
    let (_dir, _addr, client) = setup().await;

    let mut params = ParamMap::new();
    params.insert("homeActive".to_string(), json!(true));
    let (nav, menu) = client.navigation(&params).await.unwrap();
    assert_eq!(nav, "<nav>active</nav>");
    assert_eq!(menu, "<menu>items</menu>");

    let (nav, _) = client.navigation(&ParamMap::new()).await.unwrap();
    assert_eq!(nav, "<nav></nav>");
}

#[tokio::test]
async fn test_templates_are_memoized_by_the_loader() {
    let (dir, _addr, client) = setup().await;

    let first = client.fetch_template("badge.html").await.unwrap();
    assert_eq!(first.as_deref(), Some("<span>badge</span>"));

    // Rewriting the file does not affect an already-memoized template.
    std::fs::write(dir.path().join("templates/badge.html"), "changed").unwrap();
    let second = client.fetch_template("badge.html").await.unwrap();
    assert_eq!(second.as_deref(), Some("<span>badge</span>"));

    assert_eq!(client.fetch_template("ghost.html").await.unwrap(), None);
}
