mod args;
mod field;
