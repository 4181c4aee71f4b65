//! # General Endpoint Tests

mod common;

use anyhow::Result;
use common::TestApp;

#[tokio::test]
async fn test_root_endpoint() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.client.get(&app.address).send().await?;

    assert!(response.status().is_success());
    assert_eq!(response.text().await?, "spotter server is running.");
    Ok(())
}

#[tokio::test]
async fn test_health_check_endpoint() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await?;

    assert!(response.status().is_success());
    assert_eq!(response.text().await?, "OK");
    Ok(())
}

#[tokio::test]
async fn test_upload_directory_is_created_on_startup() -> Result<()> {
    let app = TestApp::spawn().await?;
    assert!(app.upload_dir.is_dir());
    Ok(())
}
