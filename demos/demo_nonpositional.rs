use combarg::prelude::*;
use combarg::{CommandLineParser, Flag, Opt};

fn main() {
    let parser = nonpositional([
        Flag::new("verbose")
            .default(false)
            .help("Describe each greeting.")
            .build(),
        Opt::new("count", Converter::parse::<u32>())
            .default(1)
            .help("How many greetings.")
            .build(),
        Opt::new("style", Converter::text())
            .choices(["plain", "loud"])
            .default("plain")
            .build(),
        argument("name", Converter::text()),
    ]);
    let parser = CommandLineParser::new("greeter", parser)
        .about("Greet someone; the parameters may come in any order.")
        .build();

    let mapping = parser.parse();
    let name = mapping.get("name").and_then(Value::as_text).unwrap_or("nobody");
    let count = mapping.get("count").and_then(Value::as_int).unwrap_or(1);
    let loud = mapping.get("style").and_then(Value::as_text) == Some("loud");
    let verbose = mapping.get("verbose").and_then(Value::as_bool).unwrap_or(false);

    for i in 0..count {
        if verbose {
            print!("[{}/{count}] ", i + 1);
        }

        if loud {
            println!("HELLO {}!", name.to_uppercase());
        } else {
            println!("Hello {name}.");
        }
    }
}
