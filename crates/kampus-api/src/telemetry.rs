use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{
        self,
        format::{Compact, DefaultFields, Format},
        MakeWriter,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Install the global tracing subscriber: `RUST_LOG` filter, compact timestamped console output.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kampus=debug,tower_http=debug".into()),
        )
        .with(console_layer(std::io::stdout))
        .try_init()?;

    tracing::debug!("Tracing initialized");
    Ok(())
}

fn console_layer<S, W>(make_writer: W) -> fmt::Layer<S, DefaultFields, Format<Compact>, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fmt::layer()
        .event_format(Format::default().compact().with_target(false))
        .with_writer(make_writer)
}
