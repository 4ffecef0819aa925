use tracing_subscriber::EnvFilter;

/// Target prefix shared by the binary and every `tlaloc_*` library crate.
/// `EnvFilter` matches targets by prefix, so one directive covers them all.
const TARGET_PREFIX: &str = env!("CARGO_CRATE_NAME");

/// Level name for a `-v` count: none -> warn, `-v` -> info, `-vv` -> debug,
/// more -> trace.
fn level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn default_directive(verbosity: u8) -> String {
    format!("{TARGET_PREFIX}={}", level(verbosity))
}

/// Initialize tracing to stderr. `RUST_LOG` overrides the CLI verbosity if
/// set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_names_binary_prefix() {
        assert_eq!(TARGET_PREFIX, "tlaloc");
        assert_eq!(default_directive(0), "tlaloc=warn");
        assert_eq!(default_directive(2), "tlaloc=debug");
        assert_eq!(default_directive(9), "tlaloc=trace");
    }

    #[test]
    fn workspace_crates_share_prefix() {
        let manifest: toml::Table = toml::from_str(include_str!("../Cargo.toml")).unwrap();
        let deps = manifest["workspace"]["dependencies"].as_table().unwrap();
        let local: Vec<String> = deps
            .iter()
            .filter(|(_, spec)| spec.get("path").is_some())
            .map(|(name, _)| name.replace('-', "_"))
            .collect();
        assert!(!local.is_empty());
        for target in local {
            assert!(target.starts_with(TARGET_PREFIX), "{target}");
        }
    }
}
