use ccmerge::{
    logger,
    merge::{self, LogSink, TicketSet},
    prefix_progname_to_error_if_needed, CredentialCache,
};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use once_cell::sync::Lazy;
use std::{env, ffi::OsString, path::PathBuf, process::ExitCode};

const PROGNAME: &str = "merge_ticket";

static ARGS: Lazy<Args> = Lazy::new(|| Args::parse_from(normalize_args(env::args_os())));

#[derive(Parser)]
#[command(
    name = PROGNAME,
    version,
    about = "Merge several tickets for one user together and save them in one ccache file."
)]
struct Args {
    /// List of tickets to be merged
    tickets: Vec<String>,
    /// Name of ticket output file
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
    /// Turn DEBUG output ON
    #[arg(long = "debug", default_value_t = false)]
    debug: bool,
    /// Adds timestamp to every logging output
    #[arg(long = "ts", default_value_t = false)]
    ts: bool,
}

// `-debug` and `-ts` are single-dash long flags.
fn normalize_args(args: impl Iterator<Item = OsString>) -> Vec<OsString> {
    let mut options_done = false;
    args.map(|arg| {
        if options_done {
            return arg;
        }
        match arg.to_str() {
            Some("--") => {
                options_done = true;
                arg
            }
            Some("-debug") => OsString::from("--debug"),
            Some("-ts") => OsString::from("--ts"),
            _ => arg,
        }
    })
    .collect()
}

fn main() -> ExitCode {
    println!(
        "{} v{} - Kerberos credential cache merger\n",
        PROGNAME,
        env!("CARGO_PKG_VERSION")
    );
    if env::args_os().len() == 1 {
        let _ = Args::command().print_help();
        return ExitCode::FAILURE;
    }
    prefix_progname_to_error_if_needed(PROGNAME, run())
}

fn run() -> anyhow::Result<()> {
    if ARGS.tickets.len() < 2 {
        return usage("Please specify at least two tickets.");
    }
    let output = match &ARGS.output {
        Some(output) => output,
        None => return usage("No output file was given."),
    };

    logger::init(ARGS.debug, ARGS.ts);

    let mut caches = vec![];
    for name in &ARGS.tickets {
        let path = CredentialCache::resolve(name)
            .map_err(|e| anyhow::anyhow!("{} while resolving ccache {}", e, name))?;
        let cache = CredentialCache::load(&path)
            .map_err(|e| anyhow::anyhow!("{} while reading {}", e, path.display()))?;
        caches.push(cache);
    }
    debug!("Number of tickets: {}", caches.len());

    let tickets = TicketSet::new(caches)?;
    let mut sink = LogSink;
    let header_len = merge::validate(&tickets, &mut sink)?;

    info!("Writing to output file: {}", output.display());
    let count = merge::write_merged(&tickets, header_len, output, &mut sink)?;
    debug!("{} holds {} credentials", output.display(), count);
    info!("Done!");
    Ok(())
}

fn usage(message: &str) -> anyhow::Result<()> {
    Err(anyhow::anyhow!(
        "{}\n{}: error: {}",
        Args::command().render_usage(),
        PROGNAME,
        message
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn single_dash_flags_become_long_flags() {
        let args =
            normalize_args(os_args(&["merge_ticket", "-debug", "-ts", "a", "b"]).into_iter());
        assert_eq!(args, os_args(&["merge_ticket", "--debug", "--ts", "a", "b"]));
    }

    #[test]
    fn arguments_after_separator_are_kept() {
        let args = normalize_args(os_args(&["merge_ticket", "--", "-ts"]).into_iter());
        assert_eq!(args, os_args(&["merge_ticket", "--", "-ts"]));
    }

    #[test]
    fn parses_tickets_and_output() {
        let args = Args::parse_from(normalize_args(
            os_args(&["merge_ticket", "a.ccache", "b.ccache", "-o", "out.ccache", "-debug"])
                .into_iter(),
        ));
        assert_eq!(args.tickets, vec!["a.ccache", "b.ccache"]);
        assert_eq!(args.output, Some(PathBuf::from("out.ccache")));
        assert!(args.debug);
        assert!(!args.ts);
    }

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }
}
