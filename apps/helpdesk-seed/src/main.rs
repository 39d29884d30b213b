use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = helpdesk_seed::Args::parse();

	helpdesk_seed::run(args).await
}
