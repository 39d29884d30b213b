use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = helpdesk_sweeper::Args::parse();

	helpdesk_sweeper::run(args).await
}
