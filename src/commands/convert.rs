use clap::{arg, App};
use std::path::Path;
use std::time::Instant;

use crate::commands::Command;
use crate::converter::convert;

pub struct Convert {}

impl Command for Convert {
    fn name(&self) -> &'static str {
        "convert"
    }

    fn register(&self) -> App<'static> {
        App::new(self.name())
            .about("Convert a single 16 bit ASCII PGM heightmap into a red/green PNG.")
            .arg(arg!(-s --source <SOURCE> "The input heightmap (.pgm or .pgm.gz)"))
            .arg(arg!(-d --destination <DESTINATION> "The output PNG (overwritten if it already exists)"))
    }

    fn run(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
        let start = Instant::now();

        let source = Path::new(args.value_of("source").unwrap_or_default());
        let destination = Path::new(args.value_of("destination").unwrap_or_default());

        println!(
            "▶️  Converting {} to {}",
            source.display(),
            destination.display()
        );
        convert(source, destination)?;
        println!("✔️  Converted heightmap in {}ms", start.elapsed().as_millis());

        Ok(())
    }
}

#[cfg(test)]
#[allow(unused_must_use)]
mod tests {
    use clap::ArgMatches;

    use super::Convert;
    use crate::commands::Command;
    use crate::test::with_temp_dir;

    fn convert_with_params(args: Vec<String>) -> anyhow::Result<()> {
        let cmd = Convert {};
        let matches: ArgMatches = cmd.register().get_matches_from(args);

        cmd.run(&matches)
    }

    #[test]
    fn converts_source_to_destination() {
        with_temp_dir(|dir| {
            let destination = dir.join("square.png");
            let res = convert_with_params(vec![
                "convert".to_string(),
                "--source".to_string(),
                "./resources/test/heightmaps/square.pgm".to_string(),
                "--destination".to_string(),
                destination.to_str().unwrap_or("").to_string(),
            ]);

            assert!(res.is_ok());
            assert!(destination.is_file());
        });
    }

    #[test]
    fn bails_on_empty_source() {
        with_temp_dir(|dir| {
            let res = convert_with_params(vec![
                "convert".to_string(),
                "-s".to_string(),
                "".to_string(),
                "-d".to_string(),
                dir.join("out.png").to_str().unwrap_or("").to_string(),
            ]);

            assert!(res.is_err());
        });
    }

    #[test]
    fn bails_on_output_dir_not_existing() {
        let res = convert_with_params(vec![
            "convert".to_string(),
            "-s".to_string(),
            "./resources/test/heightmaps/square.pgm".to_string(),
            "-d".to_string(),
            "/bar/baz/out.png".to_string(),
        ]);

        assert!(res.is_err());
    }
}
