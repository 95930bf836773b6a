use combarg::prelude::*;
use combarg::{Argument, CommandLineParser};

fn main() {
    let items = Argument::new("item", Converter::parse::<i64>())
        .help("The items to sum.")
        .build();
    let parser = CommandLineParser::new("summer", items.many1())
        .about("Sum a sequence of integers.")
        .build();

    let mapping = parser.parse();
    let sum: i64 = match mapping.get("item") {
        Some(Value::List(items)) => items.iter().filter_map(Value::as_int).sum(),
        Some(item) => item.as_int().unwrap_or_default(),
        None => 0,
    };
    println!("Sum: {sum}");
}
