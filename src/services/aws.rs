//! Utility functions for dealing with AWS

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Loads the shared SDK config. An explicit region wins over everything; an
/// explicit profile replaces `AWS_PROFILE`, so the region then comes from that
/// profile unless `AWS_REGION` is set.
pub async fn load_sdk_config(region: Option<String>, profile: Option<String>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }

    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }

    loader.load().await
}

#[cfg(test)]
mod tests {
    use std::{env, io::Write};

    use super::*;

    // The only test in this crate that touches the AWS environment variables,
    // so it owns them for its whole run.
    #[tokio::test]
    async fn region_follows_profile_unless_given() {
        let mut config_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            config_file,
            "[default]\nregion = eu-west-1\n\n[profile prod]\nregion = us-east-2"
        )
        .unwrap();
        let credentials_file = tempfile::NamedTempFile::new().unwrap();

        for var in ["AWS_REGION", "AWS_DEFAULT_REGION", "AWS_PROFILE"] {
            env::remove_var(var);
        }
        env::set_var("AWS_CONFIG_FILE", config_file.path());
        env::set_var("AWS_SHARED_CREDENTIALS_FILE", credentials_file.path());
        env::set_var("AWS_EC2_METADATA_DISABLED", "true");

        let region = |config: SdkConfig| config.region().map(|r| r.as_ref().to_owned());

        assert_eq!(
            region(load_sdk_config(None, Some("prod".into())).await).as_deref(),
            Some("us-east-2")
        );
        assert_eq!(
            region(load_sdk_config(None, None).await).as_deref(),
            Some("eu-west-1")
        );
        assert_eq!(
            region(load_sdk_config(Some("ap-south-1".into()), Some("prod".into())).await)
                .as_deref(),
            Some("ap-south-1")
        );
    }
}
