use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = filesense_applier::cli::parse();
    app::run(args)
}
