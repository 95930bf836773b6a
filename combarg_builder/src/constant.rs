pub(crate) const HELP_LONG: &str = "--help";
pub(crate) const HELP_SHORT: &str = "-h";
pub(crate) const HELP_MESSAGE: &str = "Show this help message and exit.";
pub(crate) const NESTING_DELIMITER: char = '.';
