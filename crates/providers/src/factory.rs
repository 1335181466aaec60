//! Build the configured reply and profile generators.

use std::sync::Arc;
use std::time::Duration;

use smalltalk_config::{ProfileConfig, ProfileSource, ReplyBackend, ReplyConfig};
use smalltalk_core::error::{ProfileError, ReplyError};
use smalltalk_core::profile::ProfileGenerator;
use smalltalk_core::reply::ReplyGenerator;

use crate::echo::EchoReply;
use crate::openai_compat::OpenAiCompatReply;
use crate::random_profile::RandomProfile;
use crate::static_profiles::{ProfilePool, StaticProfiles};

/// Build the reply generator selected by `config.backend`.
///
/// The OpenAI-compatible backend requires an API key; local servers that
/// ignore it can be given any placeholder.
pub fn build_reply_generator(config: &ReplyConfig) -> Result<Arc<dyn ReplyGenerator>, ReplyError> {
    let generator: Arc<dyn ReplyGenerator> = match config.backend {
        ReplyBackend::Echo => Arc::new(EchoReply),
        ReplyBackend::OpenaiCompat => {
            let api_key = config.api_key.as_deref().ok_or_else(|| {
                ReplyError::NotConfigured(
                    "openai_compat backend needs reply.api_key or SMALLTALK_API_KEY".into(),
                )
            })?;
            Arc::new(
                OpenAiCompatReply::new(
                    &config.api_url,
                    api_key,
                    &config.model,
                    Duration::from_secs(config.timeout_secs),
                )
                .with_instruction(&config.instruction)
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_tokens),
            )
        }
    };
    Ok(generator)
}

/// Build the profile generator selected by `config.source`. A static source
/// reads its directory here, once.
pub fn build_profile_generator(
    config: &ProfileConfig,
) -> Result<Arc<dyn ProfileGenerator>, ProfileError> {
    let generator: Arc<dyn ProfileGenerator> = match config.source {
        ProfileSource::Random => Arc::new(RandomProfile),
        ProfileSource::Static => {
            let pool = ProfilePool::load(&config.dir)?;
            Arc::new(StaticProfiles::new(Arc::new(pool)))
        }
    };
    Ok(generator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_echo_and_random() {
        let reply = build_reply_generator(&ReplyConfig::default()).unwrap();
        assert_eq!(reply.name(), "echo");

        let profiles = build_profile_generator(&ProfileConfig::default()).unwrap();
        assert_eq!(profiles.name(), "random");
    }

    #[test]
    fn openai_backend_needs_key() {
        let mut config = ReplyConfig {
            backend: ReplyBackend::OpenaiCompat,
            ..ReplyConfig::default()
        };
        let err = build_reply_generator(&config).err().unwrap();
        assert!(matches!(err, ReplyError::NotConfigured(_)));

        config.api_key = Some("sk-test".into());
        let reply = build_reply_generator(&config).unwrap();
        assert_eq!(reply.name(), "openai_compat");
    }

    #[test]
    fn static_source_loads_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("p1"), "name Ada").unwrap();

        let config = ProfileConfig {
            source: ProfileSource::Static,
            dir: dir.path().to_path_buf(),
        };
        let profiles = build_profile_generator(&config).unwrap();
        assert_eq!(profiles.name(), "static");
        assert_eq!(profiles.generate().unwrap(), "name Ada");
    }

    #[test]
    fn static_source_with_missing_directory_fails() {
        let config = ProfileConfig {
            source: ProfileSource::Static,
            dir: "/nonexistent/profiles".into(),
        };
        assert!(build_profile_generator(&config).is_err());
    }
}
