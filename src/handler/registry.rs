use std::sync::Arc;
use std::time::Duration;

use crate::config::HandlerConfig;
use crate::host::HostError;

use super::mock::MockTextHandler;
use super::{Handler, HandlerDescriptor};

/// Registry mapping a configuration key to a statically compiled handler
/// factory. Resolution instantiates the handler but never calls `load()`;
/// that stays the runtime host's job.
pub fn resolve(
    descriptor: &HandlerDescriptor,
    cfg: &HandlerConfig,
) -> Result<Arc<dyn Handler>, HostError> {
    match descriptor.name.as_str() {
        "alpha" => Ok(Arc::new(MockTextHandler::new(
            load_delay(cfg, 4_000),
            generate_delay(cfg, 750),
            "buy ice cream",
        ))),
        "beta" => Ok(Arc::new(MockTextHandler::new(
            load_delay(cfg, 2_400),
            generate_delay(cfg, 1_750),
            "get a hamburger",
        ))),
        other => Err(HostError::LoadResolution(other.to_string())),
    }
}

fn load_delay(cfg: &HandlerConfig, default_ms: u64) -> Duration {
    Duration::from_millis(cfg.load_delay_ms.unwrap_or(default_ms))
}

fn generate_delay(cfg: &HandlerConfig, default_ms: u64) -> Duration {
    Duration::from_millis(cfg.generate_delay_ms.unwrap_or(default_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config(name: &str) -> (HandlerDescriptor, HandlerConfig) {
        (
            HandlerDescriptor::new(name),
            HandlerConfig {
                name: name.to_string(),
                invoke_timeout_secs: 30,
                load_delay_ms: Some(0),
                generate_delay_ms: Some(0),
            },
        )
    }

    #[test]
    fn test_resolve_known_handlers() {
        for name in ["alpha", "beta"] {
            let (descriptor, cfg) = fast_config(name);
            assert!(resolve(&descriptor, &cfg).is_ok(), "{name} should resolve");
        }
    }

    #[test]
    fn test_resolve_unknown_handler_is_fatal() {
        let (descriptor, cfg) = fast_config("gamma");
        let err = resolve(&descriptor, &cfg)
            .err()
            .expect("unknown handler must not resolve");
        assert!(matches!(err, HostError::LoadResolution(ref name) if name == "gamma"));
    }
}
