use std::fs;

use studio_engine::{
    DirectStrategy, Downloader, ServiceConfig, StudioClient, StudioError, DOWNLOAD_SUFFIX_LEN,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn saved_files(dir: &TempDir) -> Vec<String> {
    let mut names = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    names
}

#[tokio::test]
async fn proxy_success_names_file_from_content_type() {
    let server = MockServer::start().await;
    let target = "https://cdn.example/output/result";
    Mock::given(method("GET"))
        .and(path("/download-proxy"))
        .and(query_param("url", target))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"webp-bytes".to_vec(), "image/webp"))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let client = StudioClient::new(ServiceConfig::with_base_url(&server.uri())).unwrap();
    let saved = Downloader::new(temp.path().to_path_buf(), "simpsons")
        .download(&client, target)
        .await
        .unwrap();

    assert_eq!(saved.strategy, "proxy");
    assert_eq!(saved.extension, "webp");
    assert_eq!(saved.bytes_written, 10);
    assert_eq!(fs::read(&saved.path).unwrap(), b"webp-bytes");

    let name = saved.path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("simpsons_"), "{name}");
    assert_eq!(name.len(), "simpsons_".len() + DOWNLOAD_SUFFIX_LEN + ".webp".len());
}

#[tokio::test]
async fn falls_back_to_direct_when_proxy_fails() {
    let server = MockServer::start().await;
    let target = format!("{}/media/result.png", server.uri());
    Mock::given(method("GET"))
        .and(path("/download-proxy"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/media/result.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"png-bytes".to_vec(), "application/octet-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let client = StudioClient::new(ServiceConfig::with_base_url(&server.uri())).unwrap();
    let saved = Downloader::new(temp.path().to_path_buf(), "simpsons")
        .download(&client, &target)
        .await
        .unwrap();

    assert_eq!(saved.strategy, "direct");
    assert_eq!(saved.extension, "png");
    assert_eq!(fs::read(&saved.path).unwrap(), b"png-bytes");

    let requests = server.received_requests().await.unwrap();
    let direct = requests
        .iter()
        .find(|request| request.url.path() == "/media/result.png")
        .unwrap();
    assert!(direct.url.query_pairs().any(|(key, _)| key == "t"));
}

#[tokio::test]
async fn every_strategy_failing_leaves_no_file() {
    let server = MockServer::start().await;
    let target = format!("{}/media/gone.jpg", server.uri());
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let client = StudioClient::new(ServiceConfig::with_base_url(&server.uri())).unwrap();
    let err = Downloader::new(temp.path().to_path_buf(), "simpsons")
        .download(&client, &target)
        .await
        .unwrap_err();

    match &err {
        StudioError::Download { url, attempts } => {
            assert_eq!(url, &target);
            assert_eq!(attempts.len(), 2);
            assert!(attempts[0].starts_with("proxy: "), "{attempts:?}");
            assert!(attempts[1].starts_with("direct: "), "{attempts:?}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains(&target), "{message}");
    assert!(message.contains("Save Image As"), "{message}");
    assert!(saved_files(&temp).is_empty());
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let server = MockServer::start().await;
    let target = format!("{}/media/big.mp4", server.uri());
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 64], "video/mp4"))
        .mount(&server)
        .await;

    let config = ServiceConfig {
        max_download_bytes: 16,
        ..ServiceConfig::with_base_url(&server.uri())
    };
    let temp = TempDir::new().unwrap();
    let client = StudioClient::new(config).unwrap();
    let err = Downloader::new(temp.path().to_path_buf(), "simpsons")
        .download(&client, &target)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("too large"), "{err}");
    assert!(saved_files(&temp).is_empty());
}

#[tokio::test]
async fn custom_strategy_list_skips_proxy() {
    let server = MockServer::start().await;
    let target = format!("{}/media/clip.webm", server.uri());
    Mock::given(method("GET"))
        .and(path("/download-proxy"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/media/clip.webm"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"webm".to_vec(), "video/webm"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let client = StudioClient::new(ServiceConfig::with_base_url(&server.uri())).unwrap();
    let saved = Downloader::new(temp.path().to_path_buf(), "clip")
        .with_strategies(vec![Box::new(DirectStrategy)])
        .download(&client, &target)
        .await
        .unwrap();

    assert_eq!(saved.strategy, "direct");
    assert_eq!(saved.extension, "webm");
    assert_eq!(saved_files(&temp).len(), 1);
}

#[tokio::test]
async fn local_save_failure_falls_through_to_manual_save_message() {
    let server = MockServer::start().await;
    let target = format!("{}/media/result.png", server.uri());
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"png".to_vec(), "image/png"))
        .expect(2)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let not_a_dir = temp.path().join("occupied");
    fs::write(&not_a_dir, "x").unwrap();

    let client = StudioClient::new(ServiceConfig::with_base_url(&server.uri())).unwrap();
    let err = Downloader::new(not_a_dir, "simpsons")
        .download(&client, &target)
        .await
        .unwrap_err();

    match &err {
        StudioError::Download { attempts, .. } => {
            assert_eq!(attempts.len(), 2);
            assert!(attempts[0].starts_with("proxy: "), "{attempts:?}");
            assert!(attempts[1].contains("not a directory"), "{attempts:?}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("Save Image As"), "{err}");
    assert_eq!(saved_files(&temp), vec!["occupied".to_string()]);
}
