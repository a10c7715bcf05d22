//! Plain-text event format for the log file, with span ids so one request's lines can be grepped.
//!
//! Line shape: `TIMESTAMP LEVEL target [root=R span=S name]: fields`. The bracket is omitted
//! for events outside any span.

use std::fmt;

use tracing_core::Subscriber;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// Formatter used by `logging::init` for the rolling file.
#[derive(Default)]
pub struct TextWithSpanIds {
    timer: SystemTime,
}

impl TextWithSpanIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S, N> FormatEvent<S, N> for TextWithSpanIds
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing_core::Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        self.timer.format_time(&mut writer)?;
        write!(writer, " {:>5} {}", meta.level(), meta.target())?;
        if let Some(span) = ctx.parent_span() {
            let span_id = span.id().into_u64();
            let root_id = span
                .scope()
                .from_root()
                .next()
                .map(|root| root.id().into_u64())
                .unwrap_or(span_id);
            write!(writer, " [root={} span={} {}]", root_id, span_id, span.name())?;
        }
        write!(writer, ": ")?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
