//! End-to-end redirect resolution through the HTTP server.

use reqwest::StatusCode;
use urlshort::config::{LayerConfig, SourceConfig};
use urlshort::source::Format;
use urlshort::ShortenerConfig;

mod common;

fn hello_config(layers: Vec<LayerConfig>) -> ShortenerConfig {
    let mut config = ShortenerConfig::default();
    config.layers = layers;
    config.fallback.status = 200;
    config.fallback.body = "Hello, world!\n".into();
    config
}

#[tokio::test]
async fn test_known_path_redirects() {
    let server = common::start_server(hello_config(vec![common::inline_layer(
        "builtin",
        &[("/urlshort-godoc", "https://example.org/docs")],
    )]))
    .await;

    let res = common::client().get(server.url("/urlshort-godoc")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(res.headers()["location"], "https://example.org/docs");
}

#[tokio::test]
async fn test_unknown_path_reaches_fallback() {
    let server = common::start_server(hello_config(vec![common::inline_layer("empty", &[])])).await;

    let res = common::client().get(server.url("/anything")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("location").is_none());
    assert_eq!(res.text().await.unwrap(), "Hello, world!\n");
}

#[tokio::test]
async fn test_later_layer_shadows_earlier_one() {
    let server = common::start_server(hello_config(vec![
        common::inline_layer("r2", &[("/a", "https://y.example"), ("/b", "https://z.example")]),
        common::inline_layer("r1", &[("/a", "https://x.example")]),
    ]))
    .await;
    let client = common::client();

    let a = client.get(server.url("/a")).send().await.unwrap();
    assert_eq!(a.headers()["location"], "https://x.example");

    let b = client.get(server.url("/b")).send().await.unwrap();
    assert_eq!(b.headers()["location"], "https://z.example");
}

#[tokio::test]
async fn test_file_layers_in_every_format() {
    let yaml = common::temp_file("map.yaml", "- path: /y\n  url: https://yaml.example\n- path: /shared\n  url: https://yaml.example/shared\n");
    let json = common::temp_file("map.json", r#"[{"path": "/j", "url": "https://json.example"}, {"path": "/shared", "url": "https://json.example/shared"}]"#);
    let rows = common::temp_file("map.txt", "# rows\n/r https://rows.example\n");

    let files = LayerConfig {
        name: "files".into(),
        sources: vec![
            SourceConfig::File { path: yaml.clone(), format: Some(Format::Yaml), required: true },
            SourceConfig::File { path: json.clone(), format: Some(Format::Json), required: true },
            SourceConfig::File { path: rows.clone(), format: None, required: true },
        ],
    };
    let server = common::start_server(hello_config(vec![files])).await;
    let client = common::client();

    for (path, expected) in [
        ("/y", "https://yaml.example"),
        ("/j", "https://json.example"),
        ("/r", "https://rows.example"),
        // The JSON source comes after the YAML one in the same layer.
        ("/shared", "https://json.example/shared"),
    ] {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.headers()["location"], expected, "path {path}");
    }

    for file in [yaml, json, rows] {
        std::fs::remove_file(file).ok();
    }
}

#[tokio::test]
async fn test_paths_match_exactly() {
    let server = common::start_server(hello_config(vec![common::inline_layer(
        "exact",
        &[("/foo", "https://lower.example"), ("/Foo", "https://upper.example")],
    )]))
    .await;
    let client = common::client();

    let upper = client.get(server.url("/Foo")).send().await.unwrap();
    assert_eq!(upper.headers()["location"], "https://upper.example");

    for path in ["/foo/", "/FOO", "/foo/bar"] {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "path {path} should fall back");
    }
}

#[tokio::test]
async fn test_config_update_swaps_chain() {
    let server = common::start_server(hello_config(vec![common::inline_layer("v1", &[("/a", "https://v1.example")])])).await;
    let client = common::client();

    let mut next = hello_config(vec![common::inline_layer("v2", &[("/a", "https://v2.example")])]);
    next.redirect.status = 302;
    server.config_updates.send(next).unwrap();

    let url = server.url("/a");
    let swapped = common::eventually(|| {
        let client = client.clone();
        let url = url.clone();
        async move {
            let res = client.get(&url).send().await.unwrap();
            res.headers()["location"] == "https://v2.example"
        }
    })
    .await;
    assert!(swapped, "chain was not swapped");

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_concurrent_requests() {
    let server = common::start_server(hello_config(vec![
        common::inline_layer("inner", &[("/b", "https://b.example")]),
        common::inline_layer("outer", &[("/a", "https://a.example")]),
    ]))
    .await;
    let client = common::client();

    let mut tasks = Vec::new();
    for i in 0..50 {
        let client = client.clone();
        let (path, expected) = match i % 3 {
            0 => ("/a", Some("https://a.example")),
            1 => ("/b", Some("https://b.example")),
            _ => ("/c", None),
        };
        let url = server.url(path);
        tasks.push(tokio::spawn(async move {
            let res = client.get(url).send().await.unwrap();
            let location = res.headers().get("location").map(|v| v.to_str().unwrap().to_string());
            assert_eq!(location.as_deref(), expected);
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }
}

#[tokio::test]
async fn test_shipped_config() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("urlshort.toml");
    let mut config = urlshort::config::load_config(&path).unwrap();
    config.listener.bind_address = "127.0.0.1:0".into();
    // Ships with the placeholder key, so the admin API must be off.
    assert!(!config.admin.enabled);

    let server = common::start_server(config).await;
    let client = common::client();

    for (path, expected) in [
        // "files" is registered after "yaml", so it is checked first.
        ("/urlshort", "https://github.com/gophercises/urlshort#readme"),
        ("/urlshort-final", "https://github.com/gophercises/urlshort/tree/solution"),
        ("/urlshort-godoc", "https://godoc.org/github.com/gophercises/urlshort"),
        ("/tokio", "https://tokio.rs"),
        ("/store-seeded", "https://example.org/from-store"),
    ] {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.headers()["location"], expected, "path {path}");
    }
}
