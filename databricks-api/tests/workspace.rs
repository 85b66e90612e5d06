use databricks_api::{
    ApiClient, ApiError, ObjectInfo, ObjectType, WorkspaceClient, WorkspaceFormat,
    WorkspaceLanguage,
};
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> WorkspaceClient {
    WorkspaceClient::new(ApiClient::new(&server.uri(), "test-token").unwrap())
}

#[tokio::test]
async fn list_parses_directories_and_notebooks() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/2.0/workspace/list"))
        .and(query_param("path", "/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [
                { "path": "/a/b", "object_type": "NOTEBOOK", "language": "SCALA" },
                { "path": "/a/sub", "object_type": "DIRECTORY" },
                { "path": "/a/lib", "object_type": "LIBRARY" }
            ]
        })))
        .mount(&server)
        .await;

    let objects = client(&server).list("/a").await.unwrap();

    assert_eq!(
        objects[0],
        ObjectInfo::notebook("/a/b", WorkspaceLanguage::Scala)
    );
    assert_eq!(objects[1], ObjectInfo::directory("/a/sub"));
    assert_eq!(objects[1].basename(), "sub");
    assert_eq!(objects[2].object_type, ObjectType::Library);
    assert_eq!(objects[2].language, None);
}

#[tokio::test]
async fn list_keeps_objects_of_unknown_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/2.0/workspace/list"))
        .and(query_param("path", "/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [
                { "path": "/a/nb", "object_type": "NOTEBOOK", "language": "PYTHON" },
                { "path": "/a/repo", "object_type": "REPO" }
            ]
        })))
        .mount(&server)
        .await;

    let objects = client(&server).list("/a").await.unwrap();

    assert_eq!(
        objects,
        vec![
            ObjectInfo::notebook("/a/nb", WorkspaceLanguage::Python),
            ObjectInfo {
                path: "/a/repo".to_string(),
                object_type: ObjectType::Other,
                language: None,
            },
        ]
    );
    assert!(!objects[1].is_dir());
    assert!(!objects[1].is_notebook());
}

#[tokio::test]
async fn list_of_empty_directory_has_no_objects_field() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/2.0/workspace/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert!(client(&server).list("/f/g").await.unwrap().is_empty());
}

#[tokio::test]
async fn export_workspace_writes_decoded_source() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/2.0/workspace/export"))
        .and(query_param("path", "/a/c"))
        .and(query_param("format", "SOURCE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": "cHJpbnQoMSArIDEp"
        })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let target = dir.path().join("c.py");
    client(&server)
        .export_workspace("/a/c", &target, WorkspaceFormat::Source, false)
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&target).unwrap(), "print(1 + 1)");
}

#[tokio::test]
async fn export_workspace_keeps_existing_file_without_overwrite() {
    let server = MockServer::start().await;

    let dir = tempdir().unwrap();
    let target = dir.path().join("c.py");
    std::fs::write(&target, "old").unwrap();

    let err = client(&server)
        .export_workspace("/a/c", &target, WorkspaceFormat::Source, false)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::LocalFileExists(_)));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "old");
}

#[tokio::test]
async fn import_workspace_posts_language_and_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/2.0/workspace/import"))
        .and(body_json(json!({
            "path": "/a/e",
            "format": "SOURCE",
            "language": "SQL",
            "content": "c2VsZWN0IDE=",
            "overwrite": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let source = dir.path().join("e.sql");
    std::fs::write(&source, "select 1").unwrap();

    client(&server)
        .import_workspace(
            &source,
            "/a/e",
            WorkspaceLanguage::Sql,
            WorkspaceFormat::Source,
            false,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn mkdirs_and_delete_post_paths() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/2.0/workspace/mkdirs"))
        .and(body_json(json!({ "path": "/f/g" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/2.0/workspace/delete"))
        .and(body_json(json!({ "path": "/f", "recursive": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let workspace = client(&server);
    workspace.mkdirs("/f/g").await.unwrap();
    workspace.delete("/f", true).await.unwrap();
}

#[tokio::test]
async fn get_status_error_keeps_other_codes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/2.0/workspace/get-status"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error_code": "PERMISSION_DENIED",
            "message": "no access"
        })))
        .mount(&server)
        .await;

    let err = client(&server).get_status("/secret").await.unwrap_err();

    assert!(!err.is_resource_does_not_exist());
    assert_eq!(err.error_code().map(|c| c.as_str()), Some("PERMISSION_DENIED"));
}
