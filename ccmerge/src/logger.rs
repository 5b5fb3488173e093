use chrono::Local;
use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use std::io::Write;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn bullet(level: Level) -> &'static str {
    match level {
        Level::Error => "[-]",
        Level::Warn => "[!]",
        Level::Info => "[*]",
        Level::Debug | Level::Trace => "[+]",
    }
}

/// Builds the console logger: `[*] message`, optionally prefixed by a local
/// timestamp.
pub fn builder(debug: bool, timestamps: bool) -> Builder {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .target(Target::Stdout)
        .format(move |buf, record| {
            if timestamps {
                writeln!(
                    buf,
                    "[{}] {} {}",
                    Local::now().format(TIMESTAMP_FORMAT),
                    bullet(record.level()),
                    record.args()
                )
            } else {
                writeln!(buf, "{} {}", bullet(record.level()), record.args())
            }
        });
    builder
}

pub fn init(debug: bool, timestamps: bool) {
    // Another logger may already be installed.
    let _ = builder(debug, timestamps).try_init();
}
