use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = codeintel_api::Args::parse();
	codeintel_api::run(args).await
}
