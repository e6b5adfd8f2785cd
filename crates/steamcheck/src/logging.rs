use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// Stderr-only logging so stdout stays clean for scripts; exit codes carry
/// the verdict, the log carries the diagnostics.
pub fn init_logging(verbose: bool) {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("steamcheck")
        .build();

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}
