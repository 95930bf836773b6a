use terminal_size::{terminal_size, Width};

use crate::constant::*;
use crate::parser::base::ParseError;
use crate::parser::interface::{
    ColumnRenderer, LeftWidth, MiddleWidth, PaddingWidth, TotalWidth, UserInterface,
};
use crate::parser::usage::{Helps, Usage};

// Assuming an average word length of 5, 17 allows precisely 3 words with a space between them.
const DEFAULT_MIDDLE_WIDTH: usize = 17;
const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 1;
const USAGE_PREFIX: &str = "usage: ";

/// Renders the help and error messages of a program.
pub(crate) struct Printer {
    program: String,
    about: Option<String>,
    help_tokens: Vec<String>,
    terminal_width: Option<usize>,
}

impl Printer {
    pub(crate) fn terminal(
        program: impl Into<String>,
        about: Option<String>,
        help_tokens: Vec<String>,
    ) -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::new(program, about, help_tokens, terminal_width)
    }

    pub(crate) fn new(
        program: impl Into<String>,
        about: Option<String>,
        help_tokens: Vec<String>,
        terminal_width: Option<usize>,
    ) -> Self {
        Self {
            program: program.into(),
            about,
            help_tokens,
            terminal_width,
        }
    }

    fn usage_line(&self, usage: &Usage) -> String {
        let rendered = usage.to_string();

        if rendered.is_empty() {
            format!("{USAGE_PREFIX}{p}", p = self.program)
        } else if rendered.contains('\n') {
            // One member per line, aligned beneath the program name.
            let indent = " ".repeat(USAGE_PREFIX.len());
            let lines: Vec<String> = rendered.lines().map(|line| format!("{indent}{line}")).collect();
            format!("{USAGE_PREFIX}{p}\n{}", lines.join("\n"), p = self.program)
        } else {
            format!("{USAGE_PREFIX}{p} {rendered}", p = self.program)
        }
    }

    pub(crate) fn print_help(
        &self,
        usage: &Usage,
        helps: &Helps,
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        let help_flags = self.help_tokens.join(", ");
        let (arguments, options): (Vec<(&str, &str)>, Vec<(&str, &str)>) =
            helps.iter().partition(|(key, _)| !key.starts_with('-'));
        let mut left_column_width = std::cmp::max(help_flags.chars().count(), 1);
        let mut middle_column_width = HELP_MESSAGE.len() + MAIN_INDENT;

        for (key, help) in arguments.iter().chain(options.iter()) {
            left_column_width = std::cmp::max(left_column_width, key.chars().count());
            middle_column_width = std::cmp::max(middle_column_width, help.chars().count() + MAIN_INDENT);
        }

        let padding = PaddingWidth::new(PADDING_WIDTH);
        let left = LeftWidth::new(left_column_width);
        let column_renderer = match (padding, left, &self.terminal_width) {
            (Some(padding), Some(left), Some(tw)) => MiddleWidth::new(middle_column_width)
                .map(|middle| ColumnRenderer::guided(padding, left, middle, TotalWidth(*tw))),
            (Some(padding), Some(left), None) => {
                MiddleWidth::new(std::cmp::min(middle_column_width, DEFAULT_MIDDLE_WIDTH))
                    .map(|middle| ColumnRenderer::new(padding, left, middle))
            }
            _ => None,
        };
        let column_renderer = match column_renderer {
            Some(column_renderer) => column_renderer,
            None => unreachable!("internal error - the printer widths must be valid"),
        };

        user_interface.print(self.usage_line(usage));

        if let Some(about) = &self.about {
            user_interface.print("".to_string());
            user_interface.print(about.clone());
        }

        if !arguments.is_empty() {
            user_interface.print("".to_string());
            user_interface.print("positional arguments:".to_string());

            for (key, help) in &arguments {
                for line in column_renderer.render(MAIN_INDENT, key, help) {
                    user_interface.print(line);
                }
            }
        }

        user_interface.print("".to_string());
        user_interface.print("options:".to_string());

        for line in column_renderer.render(MAIN_INDENT, &help_flags, HELP_MESSAGE) {
            user_interface.print(line);
        }

        for (key, help) in &options {
            for line in column_renderer.render(MAIN_INDENT, key, help) {
                user_interface.print(line);
            }
        }
    }

    pub(crate) fn print_error(
        &self,
        usage: &Usage,
        error: ParseError,
        tokens: &[&str],
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        let position = error.position().unwrap_or(tokens.len());
        user_interface.print(self.usage_line(usage));
        user_interface.print_error(error);
        user_interface.print_error_context(ErrorContext::new(position, tokens));
    }
}

/// The input tokens, with a caret pointing at the token in error.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ErrorContext {
    position: usize,
    tokens: Vec<String>,
}

impl ErrorContext {
    pub(crate) fn new(position: usize, tokens: &[&str]) -> Self {
        Self {
            position,
            tokens: tokens.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Each preceding token contributes its width plus a separating space.
        // A position past the end points one space beyond the final token.
        let offset: usize = self
            .tokens
            .iter()
            .take(self.position)
            .map(|token| token.chars().count() + 1)
            .sum();

        write!(f, "{}\n{:offset$}^", self.tokens.join(" "), "")
    }
}
