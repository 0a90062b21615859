include!(concat!(env!("OUT_DIR"), "/sentry_dsn.rs"));

use env_logger::{Builder, Env};
use releasy::cli::commands::release::ReleaseCommand;
use releasy::cli::CliCommand;
use sentry::ClientInitGuard;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(
    name = env!("CARGO_PKG_NAME"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    version = env!("CARGO_PKG_VERSION")
)]
struct Opt {
    #[structopt(subcommand)]
    cmd: Option<CliCommand>,

    #[structopt(
        long = "non-interactive",
        help = "Fail instead of prompting for missing input"
    )]
    non_interactive: bool,

    #[structopt(short = "q", long = "quiet", help = "Only log errors")]
    quiet: bool,

    #[structopt(short = "v", long = "verbose", help = "Enable debug logging")]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let opt = Opt::from_args();

    let default_filter = if opt.quiet {
        "error"
    } else if opt.verbose {
        "debug"
    } else {
        "info"
    };
    Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let mut _guard: ClientInitGuard;
    if SENTRY_DSN != "undefined" {
        _guard = sentry::init((
            SENTRY_DSN,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ));
    }

    let result = match &opt.cmd {
        Some(cmd) => cmd.execute(opt.non_interactive).await,
        None => {
            CliCommand::Release(ReleaseCommand::default())
                .execute(opt.non_interactive)
                .await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
