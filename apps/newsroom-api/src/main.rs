use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = newsroom_api::Args::parse();

	newsroom_api::run(args).await
}
