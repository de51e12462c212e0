//! Shared fixtures for integration testing.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use pageserve::config::ServerConfig;
use pageserve::http::HttpServer;
use pageserve::routing::{RouteSpec, TemplateBinding};

/// Write a complete site tree into `root`.
pub fn build_site(root: &Path) {
    let page = |rel: &str, html: &str, config: Option<&str>| {
        let dir = root.join("pages").join(rel);
        fs::create_dir_all(&dir).unwrap();
        let flat = rel.replace('/', "_");
        fs::write(dir.join(format!("{}.html", flat)), html).unwrap();
        if let Some(config) = config {
            fs::write(dir.join(format!("{}.json", flat)), config).unwrap();
        }
    };

    page(
        "home",
        r#"<h1>{title}Welcome{/title}</h1><template include="badge.html"></template><script>console.log("home")</script>"#,
        Some(r#"{"title":"Home","navbar":{"page":"home"}}"#),
    );
    fs::write(root.join("pages/home/home.js"), "export default {};").unwrap();

    page(
        "route",
        r#"<p>q={query}none{/query}</p><div data-q="{{query}}"></div>"#,
        None,
    );

    page("dash", r#"<div id="panel"></div>"#, Some("{}"));
    page(
        "dash/stats",
        "<ul>stats</ul>",
        Some(r#"{"loadData":{"method":"derive","super":"/dash","deriveContainer":"panel"}}"#),
    );

    // Derives from itself; loading it must hit the depth bound.
    page(
        "loop",
        "<p>again</p>",
        Some(r#"{"loadData":{"method":"derive","super":"/loop","deriveContainer":"panel"}}"#),
    );

    page("error/404", "<h1>custom 404</h1>", None);
    page("error/500", "<h1>custom 500</h1>", None);

    let templates = root.join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(
        templates.join("nav.html"),
        "<nav>{homeActive}active{/homeActive}</nav>",
    )
    .unwrap();
    fs::write(templates.join("menu.html"), "<menu>items</menu>").unwrap();
    fs::write(templates.join("badge.html"), "<span>badge</span>").unwrap();

    fs::create_dir_all(root.join("static/js")).unwrap();
    fs::write(root.join("static/js/app.js"), "window.app = {};").unwrap();

    fs::write(root.join("index.html"), "<html><body id=\"app\"></body></html>").unwrap();
}

/// Route declarations matching the fixture site.
pub fn fixture_routes() -> Vec<RouteSpec> {
    vec![RouteSpec {
        path: "/route/:q<int>".to_string(),
        template: TemplateBinding {
            path: "/route".to_string(),
            params: [("query".to_string(), "q".to_string())]
                .into_iter()
                .collect(),
        },
    }]
}

/// Server config pointing at the fixture site.
pub fn fixture_config(root: &Path) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.content.root = root.to_string_lossy().into_owned();
    config.routes = fixture_routes();
    config
}

/// Spawn the server on an ephemeral port and return its address.
pub async fn spawn_server(config: ServerConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    addr
}

/// Start a simple mock backend that returns a fixed response.
#[allow(dead_code)]
pub async fn start_mock_backend(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let response_str = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            response.len(),
                            response
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
