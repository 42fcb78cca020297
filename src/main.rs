use std::path::PathBuf;

use color_eyre::Result;
use passkey_wallet::config::get_data_dir;

mod app;
mod cli;
mod errors;
mod logging;

#[tokio::main]
async fn main() -> Result<()> {
    errors::install_hooks()?;

    let args = cli::Args::parse_args();

    let data_dir = args
        .data_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(get_data_dir);

    logging::init(&data_dir)?;

    let mut app = app::App::new(&args, &data_dir)?;

    app.run(&args.command).await?;

    Ok(())
}
