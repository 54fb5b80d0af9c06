use clap::Parser;
use tale_cli::{cli::Cli, commands, logging, styles};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = commands::dispatch(cli).await {
		let report = anyhow::Error::new(err);
		eprintln!("{} {report:#}", styles::error("error:"));
		std::process::exit(1);
	}
}
