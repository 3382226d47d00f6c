use crate::config::{StoreBackend, VidgateConfig};
use pretty_assertions::assert_eq;
use std::io::Write;

fn parse(raw: &str) -> anyhow::Result<VidgateConfig> {
    let config: VidgateConfig = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}

const VALID: &str = r#"
[server]
listen = "0.0.0.0:8080"

[store]
backend = "s3"
bucket = "video-storage"
region = "ap-southeast-1"

[video]
key = "SampleVideo_1280x720_1mb.mp4"
"#;

#[test]
fn parses_minimal_s3_config() {
    let config = parse(VALID).expect("valid config");

    assert_eq!(config.server.listen, "0.0.0.0:8080");
    assert_eq!(config.store.backend, StoreBackend::S3);
    assert_eq!(config.store.bucket.as_deref(), Some("video-storage"));
    assert_eq!(config.video.key, "SampleVideo_1280x720_1mb.mp4");
}

#[test]
fn route_and_content_type_have_defaults() {
    let config = parse(VALID).expect("valid config");

    assert_eq!(config.video.route, "/video");
    assert_eq!(config.video.content_type, "video/mp4");
}

#[test]
fn s3_backend_requires_bucket() {
    let raw = r#"
[server]
listen = "127.0.0.1:8080"

[store]
backend = "s3"

[video]
key = "a.mp4"
"#;
    assert!(parse(raw).is_err());
}

#[test]
fn filesystem_backend_requires_root() {
    let raw = r#"
[server]
listen = "127.0.0.1:8080"

[store]
backend = "filesystem"

[video]
key = "a.mp4"
"#;
    assert!(parse(raw).is_err());
}

#[test]
fn memory_backend_needs_no_bucket() {
    let raw = r#"
[server]
listen = "127.0.0.1:8080"

[store]
backend = "memory"

[video]
key = "a.mp4"
"#;
    assert!(parse(raw).is_ok());
}

#[test]
fn route_must_be_absolute() {
    let raw = r#"
[server]
listen = "127.0.0.1:8080"

[store]
backend = "memory"

[video]
key = "a.mp4"
route = "video"
"#;
    assert!(parse(raw).is_err());
}

#[test]
fn empty_key_is_rejected() {
    let raw = r#"
[server]
listen = "127.0.0.1:8080"

[store]
backend = "memory"

[video]
key = ""
"#;
    assert!(parse(raw).is_err());
}

#[test]
fn invalid_content_type_is_rejected() {
    let raw = r#"
[server]
listen = "127.0.0.1:8080"

[store]
backend = "memory"

[video]
key = "a.mp4"
content_type = "video/mp4\n"
"#;
    assert!(parse(raw).is_err());
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(VALID.as_bytes()).expect("write config");

    let config =
        VidgateConfig::from_file(file.path().to_str().unwrap()).expect("load config file");

    assert_eq!(config.video.route, "/video");
}

#[test]
fn missing_file_is_an_error() {
    assert!(VidgateConfig::from_file("/nonexistent/vidgate.toml").is_err());
}
