use super::*;

#[test]
fn empty_file_gives_defaults() {
    let config: FilehubConfig = toml::from_str("").unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.shutdown_timeout_seconds, 30);
    assert_eq!(config.server.mode, Mode::Development);
    assert_eq!(config.upload.max_size_bytes, 100 * 1024);
    assert_eq!(
        config.upload.allowed_content_types,
        vec!["image/jpeg", "image/jpg", "image/png"]
    );
    assert_eq!(config.storage.mock_base_url, "http://localhost:9000/filehub-mock");
    assert_eq!(config.cache.backend, "memory");
    assert_eq!(config.cache.ttl_seconds, 3600);
    assert_eq!(config.repository.backend, "memory");
    assert_eq!(config.repository.table_prefix, "filehub_");
}

#[test]
fn full_config() {
    let toml = r#"
        [server]
        host = "0.0.0.0"
        port = 9090
        shutdown_timeout_seconds = 5
        mode = "production"

        [upload]
        max_size_bytes = 2048
        allowed_content_types = ["image/png", "application/pdf"]

        [storage]
        bucket = "media"
        region = "eu-west-1"
        endpoint_url = "http://localhost:4566"
        prefix = "uploads/"
        thumbnail_prefix = "thumbs/"

        [cache]
        backend = "redis"
        url = "redis://cache:6379"
        prefix = "media"
        ttl_seconds = 60

        [repository]
        backend = "postgres"
        url = "postgres://filehub@db/filehub"
        schema = "files"
        pool_size = 4
    "#;

    let config: FilehubConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9090);
    assert!(config.server.mode.is_production());

    let policy = config.upload.policy();
    assert_eq!(policy.max_size_bytes, 2048);
    assert!(policy.allows("application/pdf"));
    assert!(!policy.allows("image/jpeg"));

    assert_eq!(config.storage.bucket.as_deref(), Some("media"));
    assert_eq!(config.storage.region, "eu-west-1");
    assert_eq!(config.storage.prefix, "uploads/");
    assert_eq!(config.storage.thumbnail_prefix.as_deref(), Some("thumbs/"));

    assert_eq!(config.cache.backend, "redis");
    assert_eq!(config.cache.ttl(), std::time::Duration::from_secs(60));
    assert_eq!(config.cache.pool_size, 10);

    assert_eq!(config.repository.schema, "files");
    assert_eq!(config.repository.pool_size, 4);
    assert_eq!(config.repository.table_prefix, "filehub_");
}

#[test]
fn mode_parses_aliases() {
    assert_eq!("production".parse::<Mode>().unwrap(), Mode::Production);
    assert_eq!(" PROD ".parse::<Mode>().unwrap(), Mode::Production);
    assert_eq!("dev".parse::<Mode>().unwrap(), Mode::Development);
    assert!("staging".parse::<Mode>().is_err());
}

#[test]
fn unknown_mode_in_file_is_rejected() {
    let result: Result<FilehubConfig, _> = toml::from_str("[server]\nmode = \"staging\"\n");
    assert!(result.is_err());
}
