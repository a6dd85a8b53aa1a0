use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// ログ出力を初期化する
///
/// `RUST_LOG` が設定されていればそれを使い、なければ警告以上
/// （`--verbose` 指定時はdebug）を標準エラーに出す。
pub fn configure_logging(verbose: bool) {
    let default_directive = if verbose {
        "allergen_scan=debug,allergen_scan_common=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let stderr_log = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    // テストなどで二重初期化された場合は無視
    let _ = tracing_subscriber::registry().with(stderr_log).try_init();
}
