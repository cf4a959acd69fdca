//! Subscriber setup for the command-line binary
//!
//! The library itself only emits `tracing` events; whoever embeds it owns the
//! subscriber. The binary calls [`init_logger`] once at startup.

use std::io;

use time::format_description;
use tracing::{subscriber::set_global_default, Level};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, FmtSubscriber};

/// Installs a stderr subscriber. `verbosity` 0 shows info, 1 debug, 2+ trace.
///
/// Quietly does nothing when a global subscriber is already set, so tests and
/// embedders that bring their own are unaffected.
pub fn init_logger(verbosity: u8) {
    let max_level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let local_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = tracing_subscriber::fmt::time::OffsetTime::new(
        local_offset,
        format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")
            .expect("static time format"),
    );

    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_ansi(false)
        .with_timer(timer)
        .with_writer(BoxMakeWriter::new(io::stderr))
        .finish();

    let _ = set_global_default(subscriber);
}
