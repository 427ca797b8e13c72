//! HTTP-level tests for the package service client against a local mock server

use std::path::PathBuf;

use pkgcloud_core::{Distribution, PublishResult};
use pkgcloud_repo::{
    Credentials, PackagecloudClient, RepoError, UploadOutcome, delete_versions, publish_package,
};
use regex::Regex;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUTH: &str = "Basic dmFsaWRfa2V5Og==";
const PACKAGES: &str = "/api/v1/repos/test_username/test_repo/packages.json";

fn client(server: &MockServer) -> PackagecloudClient {
    PackagecloudClient::new(&server.uri(), Credentials::new("test_username", "valid_key")).unwrap()
}

fn jessie() -> Distribution {
    Distribution::parse("debian/jessie").unwrap()
}

fn artifact(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, b"!<arch>\n").unwrap();
    (dir, path)
}

async fn mount_distributions(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/distributions.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deb": [{
                "display_name": "Debian",
                "index_name": "debian",
                "versions": [
                    {"id": 23, "display_name": "8.0 Jessie", "index_name": "jessie"},
                    {"id": 149, "display_name": "9.0 Stretch", "index_name": "stretch"}
                ]
            }]
        })))
        .mount(server)
        .await;
}

fn listing_entry(filename: &str, distro_version: &str, version: &str) -> serde_json::Value {
    json!({
        "name": "some",
        "distro_version": distro_version,
        "version": version,
        "release": "1",
        "type": "deb",
        "filename": filename,
    })
}

#[tokio::test]
async fn test_upload_sends_distro_version_id() {
    let server = MockServer::start().await;
    mount_distributions(&server).await;

    Mock::given(method("POST"))
        .and(path(PACKAGES))
        .and(header("Authorization", AUTH))
        .and(body_string_contains("name=\"package[distro_version_id]\""))
        .and(body_string_contains("23"))
        .and(body_string_contains("filename=\"some_1.0_all.deb\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"filename": "some_1.0_all.deb"})))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, path) = artifact("some_1.0_all.deb");
    let outcome = client(&server)
        .upload_package("test_repo", &path, &jessie())
        .await
        .unwrap();

    assert_eq!(outcome, UploadOutcome::Uploaded);
}

#[tokio::test]
async fn test_distributions_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/distributions.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deb": [{"index_name": "debian", "versions": [{"id": 23, "index_name": "jessie"}]}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PACKAGES))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;

    let (_dir, path) = artifact("some_1.0_all.deb");
    let client = client(&server);
    client.upload_package("test_repo", &path, &jessie()).await.unwrap();
    client.upload_package("test_repo", &path, &jessie()).await.unwrap();
}

#[tokio::test]
async fn test_upload_conflict_is_classified() {
    let server = MockServer::start().await;
    mount_distributions(&server).await;
    Mock::given(method("POST"))
        .and(path(PACKAGES))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"filename": ["has already been taken"]})),
        )
        .mount(&server)
        .await;

    let (_dir, path) = artifact("some_1.0_all.deb");
    let outcome = client(&server)
        .upload_package("test_repo", &path, &jessie())
        .await
        .unwrap();

    assert_eq!(outcome, UploadOutcome::Conflict);
}

#[tokio::test]
async fn test_unknown_distribution_id() {
    let server = MockServer::start().await;
    mount_distributions(&server).await;

    let (_dir, path) = artifact("some_1.0_all.deb");
    let buster = Distribution::parse("debian/buster").unwrap();
    let err = client(&server)
        .upload_package("test_repo", &path, &buster)
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::UnknownDistribution { distribution } if distribution == "debian/buster"));
}

#[tokio::test]
async fn test_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("HTTP Basic: Access denied.\n"))
        .mount(&server)
        .await;

    let client =
        PackagecloudClient::new(&server.uri(), Credentials::new("test_username", "invalid_key"))
            .unwrap();
    let err = client.list_packages("test_repo", &jessie()).await.unwrap_err();

    match err {
        RepoError::AuthFailed { message } => {
            assert!(message.contains("test_username"));
            assert!(!message.contains("invalid_key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_listing_walks_pages_in_order() {
    let server = MockServer::start().await;
    let pages = [
        vec![
            listing_entry("a_1.deb", "debian/jessie", "1"),
            listing_entry("b_1.deb", "debian/stretch", "1"),
        ],
        vec![
            listing_entry("c_2.deb", "debian/jessie", "2"),
            listing_entry("d_2.deb", "debian/jessie", "2"),
        ],
        vec![listing_entry("e_3.deb", "debian/jessie", "3")],
    ];
    for (i, entries) in pages.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(PACKAGES))
            .and(query_param("page", (i + 1).to_string()))
            .and(query_param("per_page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Total", "5")
                    .insert_header("Per-Page", "2")
                    .set_body_json(entries),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let packages = client(&server)
        .with_per_page(2)
        .list_packages("test_repo", &jessie())
        .await
        .unwrap();

    let names: Vec<_> = packages.iter().map(|p| p.filename.as_str()).collect();
    assert_eq!(names, vec!["a_1.deb", "c_2.deb", "d_2.deb", "e_3.deb"]);
}

#[tokio::test]
async fn test_listing_error_discards_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PACKAGES))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Total", "4")
                .insert_header("Per-Page", "2")
                .set_body_json(vec![
                    listing_entry("a_1.deb", "debian/jessie", "1"),
                    listing_entry("b_1.deb", "debian/jessie", "1"),
                ]),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PACKAGES))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server)
        .with_per_page(2)
        .list_packages("test_repo", &jessie())
        .await
        .unwrap_err();

    match err {
        RepoError::Remote { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_by_version_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PACKAGES))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Total", "2")
                .set_body_json(vec![
                    listing_entry(
                        "some_3.6.13~alpha.39-1_all.deb",
                        "debian/jessie",
                        "3.6.13~alpha.39-1_all",
                    ),
                    listing_entry(
                        "some_3.6.14~alpha.39-1_all.deb",
                        "debian/jessie",
                        "3.6.14~alpha.39-1_all",
                    ),
                ]),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(
            "/api/v1/repos/test_username/test_repo/debian/jessie/some_3.6.14~alpha.39-1_all.deb",
        ))
        .and(header("Authorization", AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let pattern = Regex::new(r"^3\.6\.14").unwrap();
    let result = delete_versions(&client(&server), "test_repo", &jessie(), &pattern)
        .await
        .unwrap();

    assert_eq!(result, PublishResult::deleted());
}

#[tokio::test]
async fn test_publish_override_over_http() {
    let server = MockServer::start().await;
    mount_distributions(&server).await;

    // First upload conflicts, the retry goes through
    Mock::given(method("POST"))
        .and(path(PACKAGES))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"filename": ["has already been taken"]})),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PACKAGES))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(
            "/api/v1/repos/test_username/test_repo/debian/jessie/some_1.0_all.deb",
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, path) = artifact("some_1.0_all.deb");
    let result = publish_package(&client(&server), "test_repo", &path, &jessie(), true, 10)
        .await
        .unwrap();

    assert_eq!(
        result.package_link(),
        Some(format!(
            "{}/test_username/test_repo/packages/debian/jessie/some_1.0_all.deb",
            server.uri()
        ))
        .as_deref()
    );
}
