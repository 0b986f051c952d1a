mod batch;
mod convert;
mod interactive;

pub use batch::Batch;
pub use convert::Convert;
pub use interactive::Interactive;

pub trait Command {
    fn name(&self) -> &'static str;
    fn register(&self) -> clap::App<'static>;
    fn run(&self, args: &clap::ArgMatches) -> anyhow::Result<()>;
}
