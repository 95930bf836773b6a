use combarg::prelude::*;
use combarg::{Command, CommandTree, Mapping};

type Handler = fn(Mapping) -> String;

fn list(mapping: Mapping) -> String {
    match mapping.get("all").and_then(Value::as_bool) {
        Some(true) => "Listing every item.".to_string(),
        _ => "Listing the open items.".to_string(),
    }
}

fn add(mapping: Mapping) -> String {
    let item = mapping.get("item").and_then(Value::as_text).unwrap_or_default();
    format!("Added '{item}'.")
}

fn complete(mapping: Mapping) -> String {
    let index = mapping.get("index").and_then(Value::as_int).unwrap_or_default();
    format!("Completed item #{index}.")
}

fn main() {
    let dispatcher = CommandTree::new("todo")
        .about("Track the things to do.")
        .add(
            Command::command(
                "todo",
                flag("all").defaults([("all", false)]),
                list as Handler,
            )
            .child(
                Command::subcommand("add", argument("item", Converter::text()), add as Handler)
                    .help("Add an item."),
            )
            .child(
                Command::subcommand(
                    "done",
                    argument("index", Converter::parse::<u32>()),
                    complete as Handler,
                )
                .help("Complete an item."),
            ),
        )
        .build();

    println!("{}", dispatcher.run());
}
