use clap::Parser;

mod platform;

fn main() -> anyhow::Result<()> {
    let args = platform::Args::parse();
    platform::run_app(args)
}
