use crate::error::{LambdaError, Result};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{format::FmtSpan, Layer as FmtLayer},
    layer::SubscriberExt as _,
    Registry,
};

pub struct Options {
    pub verbose: bool,
    pub color: bool,
}

/// Installs the global subscriber. Diagnostics go to stderr so stdout only
/// carries demo output.
pub fn init(options: &Options) -> Result<()> {
    let level = if options.verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::INFO
    };

    let fmt_layer = FmtLayer::new()
        .with_writer(std::io::stderr)
        .with_span_events(span_events(options.verbose))
        .with_thread_names(true)
        .with_ansi(options.color);
    let subscriber = Registry::default().with(level).with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LambdaError::Logging(e.to_string()))
}

/// Task spans are only reported when verbose; a normal run logs events only.
fn span_events(verbose: bool) -> FmtSpan {
    if verbose {
        FmtSpan::FULL
    } else {
        FmtSpan::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        let options = Options {
            verbose: false,
            color: false,
        };
        // The first call may already have happened in another test.
        let _ = init(&options);
        assert!(matches!(init(&options), Err(LambdaError::Logging(_))));
    }

    #[test]
    fn test_span_events_only_when_verbose() {
        assert_eq!(span_events(false), FmtSpan::NONE);
        assert_eq!(span_events(true), FmtSpan::FULL);
    }
}
