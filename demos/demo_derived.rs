use combarg::derive::*;
use combarg::prelude::*;
use combarg::CommandLineParser;

#[derive(Args)]
#[allow(dead_code)]
struct Settings {
    #[combarg(help = "Describe the work as it happens.", default = false)]
    verbose: bool,
    #[combarg(help = "How many workers.", default = 4)]
    jobs: u32,
    #[combarg(help = "Run the tests afterwards.", default = true)]
    tests: bool,
    #[combarg(help = "Where to write the report.")]
    report: Option<String>,
    #[combarg(positional, help = "The project to build.")]
    project: String,
}

fn main() {
    let parser = match Settings::parser() {
        Ok(parser) => parser,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };
    let parser = CommandLineParser::new("builder", parser)
        .about("Build a project.")
        .build();

    for (key, value) in parser.parse().flatten() {
        println!("{key}: {value}");
    }
}
