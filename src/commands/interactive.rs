use clap::App;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::commands::Command;
use crate::converter::{convert, ConvertError};

pub struct Interactive {}

impl Command for Interactive {
    fn name(&self) -> &'static str {
        "interactive"
    }

    fn register(&self) -> App<'static> {
        App::new(self.name()).about("Prompt for heightmaps to convert until told to stop.")
    }

    fn run(&self, _args: &clap::ArgMatches) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();

        let converted = run_session(&mut stdin.lock(), &mut stdout.lock(), convert)?;
        println!("ℹ️  Converted {} heightmap(s)", converted);

        Ok(())
    }
}

/// Prints `text` and reads one line. `None` once the input is exhausted.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> io::Result<Option<String>> {
    writeln!(output, "{}:", text)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim().to_string()))
}

fn ask_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> io::Result<Option<bool>> {
    loop {
        let answer = match prompt(input, output, &format!("{} (yes/no)", text))? {
            Some(answer) => answer,
            None => return Ok(None),
        };

        match answer.to_lowercase().as_str() {
            "yes" | "y" => return Ok(Some(true)),
            "no" | "n" => return Ok(Some(false)),
            _ => writeln!(output, "Your input ('{}') must either be 'yes' or 'no'", answer)?,
        }
    }
}

/// Asks for source and destination, converts, and repeats while the user
/// wants to continue. A failed conversion is reported and does not end the
/// session. Returns the number of successful conversions.
pub fn run_session<R, W, F>(input: &mut R, output: &mut W, convert: F) -> io::Result<usize>
where
    R: BufRead,
    W: Write,
    F: Fn(&Path, &Path) -> Result<(), ConvertError>,
{
    let mut converted = 0;

    loop {
        let source = match prompt(input, output, "Enter path to source-file")? {
            Some(source) => source,
            None => return Ok(converted),
        };
        let destination = match prompt(input, output, "Enter path to destination-file")? {
            Some(destination) => destination,
            None => return Ok(converted),
        };

        match convert(Path::new(&source), Path::new(&destination)) {
            Ok(()) => {
                converted += 1;
                writeln!(output, "✔️  Conversion successful")?;
            }
            Err(e) => writeln!(output, "❌  Error: {}", e)?,
        }

        if ask_yes_no(input, output, "Continue?")? != Some(true) {
            return Ok(converted);
        }
    }
}
