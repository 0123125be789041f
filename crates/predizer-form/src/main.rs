use clap::Parser;
use predizer_form::Cli;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    predizer_form::try_main(Cli::parse()).await
}
