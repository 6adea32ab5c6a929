mod command;
mod sink;
mod tabular;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
