//! Tracing setup for the command-line tools.
//!
//! Records always go to stderr; stdout is reserved for command output.
//! No key material or plaintext may appear in any span or event field.

use anyhow::Result;
use tracing::{error_span, field, Span};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, Settings};

/// Field naming the application that emitted a record (see [`source_span`]).
pub const SOURCE_KEY: &str = "_source";

/// Field naming a sub-area within a source (see [`domain_span`]).
pub const DOMAIN_KEY: &str = "_domain";

/// Field holding the machine hostname, when known.
pub const HOST_KEY: &str = "_host";

/// Initialise the global tracing subscriber.
///
/// [`LogFormat::Json`] emits one JSON object per record; [`LogFormat::Pretty`]
/// emits human-readable lines. `RUST_LOG` overrides the configured level.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init(settings: &Settings) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    let installed = match settings.format() {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}

/// Root span tagging every record with the application name and hostname.
///
/// Created at `ERROR` so that it is enabled whenever any record is.
pub fn source_span(source: &str) -> Span {
    let span = error_span!("source", _source = source, _host = field::Empty);
    if let Some(host) = hostname() {
        span.record(HOST_KEY, host.as_str());
    }
    span
}

/// Child of the current span, tagging records with a domain within the source.
pub fn domain_span(domain: &str) -> Span {
    error_span!("domain", _domain = domain)
}

fn hostname() -> Option<String> {
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .map(|h| h.trim().to_owned())
        .filter(|h| !h.is_empty())
        .or_else(|| std::env::var("HOSTNAME").ok().filter(|h| !h.is_empty()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// JSON subscriber filtered at the default settings' level.
    fn json_subscriber(out: &Captured) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::new(&Settings::default().log_level))
            .with_writer(out.clone())
            .finish()
    }

    fn has_field(span: &Span, name: &str) -> bool {
        span.metadata()
            .map(|m| m.fields().field(name).is_some())
            .unwrap_or(false)
    }

    #[test]
    fn source_span_declares_source_and_host() {
        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            let span = source_span("string-crypto");
            assert!(has_field(&span, SOURCE_KEY));
            assert!(has_field(&span, HOST_KEY));
            assert!(!has_field(&span, DOMAIN_KEY));
        });
    }

    #[test]
    fn domain_span_declares_domain() {
        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            let root = source_span("file-crypto");
            let _entered = root.enter();
            let span = domain_span("io");
            assert!(has_field(&span, DOMAIN_KEY));
            assert_eq!(span.metadata().map(|m| m.name()), Some("domain"));
        });
    }

    #[test]
    fn records_carry_source_at_default_level() {
        let out = Captured::default();
        tracing::subscriber::with_default(json_subscriber(&out), || {
            let root = source_span("file-crypto");
            let _entered = root.enter();
            tracing::warn!("input file is empty");
        });

        let logged = out.contents();
        assert!(logged.contains("input file is empty"));
        assert!(logged.contains(r#""_source":"file-crypto""#));
    }

    #[test]
    fn error_records_carry_domain() {
        let out = Captured::default();
        tracing::subscriber::with_default(json_subscriber(&out), || {
            let root = source_span("file-crypto");
            let _root = root.enter();
            let _io = domain_span("io").entered();
            tracing::error!("write failed");
        });

        let logged = out.contents();
        assert!(logged.contains(r#""_domain":"io""#));
        assert!(logged.contains(r#""_source":"file-crypto""#));
    }

    #[test]
    fn debug_records_are_filtered_at_default_level() {
        let out = Captured::default();
        tracing::subscriber::with_default(json_subscriber(&out), || {
            let _root = source_span("string-crypto").entered();
            tracing::debug!("transforming text");
        });
        assert!(out.contents().is_empty());
    }

    #[test]
    fn second_init_is_an_error() {
        let settings = Settings::default();
        // The first call may lose to another test that installed a subscriber.
        let _ = init(&settings);
        let err = init(&settings).unwrap_err();
        assert!(err.to_string().contains("failed to initialise tracing subscriber"));
    }

    #[test]
    fn hostname_is_trimmed_when_known() {
        if let Some(host) = hostname() {
            assert!(!host.is_empty());
            assert_eq!(host, host.trim());
        }
    }
}
