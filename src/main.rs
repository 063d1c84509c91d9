use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    text_utils_lib::run(text_utils_lib::cli::Cli::parse()).await
}
