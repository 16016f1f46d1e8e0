use tracing::debug;

use crate::config::S3StoreConfig;

/// Build an AWS SDK configuration from the given [`S3StoreConfig`].
///
/// Uses the standard AWS SDK environment credential chain and optionally
/// overrides the endpoint URL for S3-compatible services.
pub async fn build_sdk_config(config: &S3StoreConfig) -> aws_config::SdkConfig {
    let mut loader = aws_config::from_env().region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        debug!(endpoint = %endpoint, "using custom S3 endpoint");
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}

/// Build an S3 client, applying path-style addressing when configured.
pub async fn build_client(config: &S3StoreConfig) -> aws_sdk_s3::Client {
    let sdk_config = build_sdk_config(config).await;
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.force_path_style)
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}

#[cfg(all(test, feature = "integration"))]
mod integration_tests {
    use super::*;

    // The AWS SDK needs system root certificates to load; only run with
    // `--features integration`.

    #[tokio::test]
    async fn build_sdk_config_sets_region() {
        let config = S3StoreConfig::new("ap-northeast-1", "uploads");
        let sdk_config = build_sdk_config(&config).await;
        assert_eq!(
            sdk_config.region().map(|r| r.as_ref()),
            Some("ap-northeast-1")
        );
    }
}
