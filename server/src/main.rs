use clap::Parser;
use sus_server::{config::Config, systems::network};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    network::run(&config)
}
