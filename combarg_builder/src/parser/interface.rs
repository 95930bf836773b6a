use crate::parser::base::ParseError;
use crate::parser::printer::ErrorContext;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub(crate) struct PaddingWidth(usize);

impl PaddingWidth {
    pub(crate) fn new(width: usize) -> Option<Self> {
        // padding must be at least 1
        (width >= 1).then_some(PaddingWidth(width))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LeftWidth(usize);

impl LeftWidth {
    pub(crate) fn new(width: usize) -> Option<Self> {
        // left must be at least 1
        (width >= 1).then_some(LeftWidth(width))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct MiddleWidth(usize);

impl MiddleWidth {
    pub(crate) fn new(width: usize) -> Option<Self> {
        // middle must be at least 2 (so we can hyphenate)
        (width >= 2).then_some(MiddleWidth(width))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TotalWidth(pub(crate) usize);

/// Renders a left column (ex: the spelling of an option) beside a word-wrapped middle column (ex: its help).
#[derive(Debug)]
pub(crate) struct ColumnRenderer {
    padding: PaddingWidth,
    left: LeftWidth,
    middle: MiddleWidth,
}

// Target 95% of the total width, so the renderer doesn't literally use the full space.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// Assuming an average word length of 5, 17 allows precisely 3 words with a space between them.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

impl ColumnRenderer {
    /// Produce a renderer based off the provided widths, choosing the middle width to fit within `total_width`.
    pub(crate) fn guided(
        padding: PaddingWidth,
        left: LeftWidth,
        middle: MiddleWidth,
        total_width: TotalWidth,
    ) -> Self {
        let non_middle = left.0 + padding.0;
        let target_total_width = (total_width.0 as f64 * TARGET_TOTAL_FACTOR) as usize;
        let guided_middle = std::cmp::max(middle.0, MINIMUM_MIDDLE_WIDTH);

        let selected = if guided_middle + non_middle <= target_total_width {
            guided_middle
        } else if non_middle < total_width.0 {
            std::cmp::max(total_width.0 - non_middle, MINIMUM_MIDDLE_WIDTH)
        } else {
            MINIMUM_MIDDLE_WIDTH
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Columns {non_middle} within total {}; selecting middle: {selected}.",
                total_width.0
            );
        }

        Self::new(padding, left, MiddleWidth(selected))
    }

    pub(crate) fn new(padding: PaddingWidth, left: LeftWidth, middle: MiddleWidth) -> Self {
        Self {
            padding,
            left,
            middle,
        }
    }

    pub(crate) fn render(&self, indent: usize, left: &str, middle: &str) -> Vec<String> {
        let padding = format!("{:width$}", "", width = self.padding.0);
        let left_column_width = self.left.0;
        let middle_column_width = std::cmp::max(self.middle.0.saturating_sub(indent), 2);
        let mut out = Vec::default();

        for (i, part) in chunk(middle, middle_column_width).iter().enumerate() {
            let left = if i == 0 { left } else { "" };
            out.push(format!(
                "{:indent$}{:left_column_width$}{padding}{part}",
                "", left
            ));
        }

        if out.is_empty() {
            out.push(format!("{:indent$}{left}", ""));
        }

        out
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.chars().count() + word.chars().count() < width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut left = 0;

    while left + increment + 1 < characters.len() {
        let piece: String = characters[left..left + increment].iter().collect();
        lines.push(format!("{piece}-"));
        left += increment;
    }

    current.extend(&characters[left..]);
}

/// Where user facing output is written.
pub(crate) trait UserInterface {
    fn print(&self, message: String);
    fn print_error(&self, error: ParseError);
    fn print_error_context(&self, error_context: ErrorContext);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: ParseError) {
        eprintln!("{error}");
    }

    fn print_error_context(&self, error_context: ErrorContext) {
        eprintln!("{error_context}");
    }
}

#[cfg(test)]
pub(crate) mod util {
    use crate::parser::base::ParseError;
    use crate::parser::interface::UserInterface;
    use crate::parser::printer::ErrorContext;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Captures output in memory.
    /// Clones share the same buffers, so a test may keep one while the parser owns the other.
    #[derive(Clone, Default)]
    pub(crate) struct InMemoryInterface {
        message: Rc<RefCell<Vec<String>>>,
        error: Rc<RefCell<Option<String>>>,
        error_context: Rc<RefCell<Option<ErrorContext>>>,
    }

    impl UserInterface for InMemoryInterface {
        fn print(&self, message: String) {
            // Allows for print() to be called many times, concatenating the messages.
            self.message.borrow_mut().push(message);
        }

        fn print_error(&self, error: ParseError) {
            // Assumes print_error() is only ever called once.
            self.error.borrow_mut().replace(error.to_string());
        }

        fn print_error_context(&self, error_context: ErrorContext) {
            // Assumes print_error_context() is only ever called once.
            self.error_context.borrow_mut().replace(error_context);
        }
    }

    impl InMemoryInterface {
        pub(crate) fn consume(&self) -> (Option<String>, Option<String>, Option<ErrorContext>) {
            let messages = self.message.take();
            let message = if messages.is_empty() {
                None
            } else {
                Some(messages.join("\n"))
            };

            (message, self.error.take(), self.error_context.take())
        }

        pub(crate) fn consume_message(&self) -> String {
            let (message, error, error_context) = self.consume();
            assert_eq!(error, None);
            assert_eq!(error_context, None);
            message.unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn renderer(middle: usize) -> ColumnRenderer {
        ColumnRenderer::new(
            PaddingWidth::new(4).unwrap(),
            LeftWidth::new(5).unwrap(),
            MiddleWidth::new(middle).unwrap(),
        )
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn widths_reject_zero(#[case] width: usize) {
        assert!(MiddleWidth::new(width).is_none());
        assert_eq!(PaddingWidth::new(width).is_some(), width == 1);
        assert_eq!(LeftWidth::new(width).is_some(), width == 1);
    }

    #[test]
    fn column_renderer_simple() {
        let cr = renderer(23);

        assert_eq!(
            cr.render(0, "abc", "something"),
            vec!["abc      something".to_string()]
        );
        assert_eq!(
            cr.render(0, "abc", "  something  "),
            vec!["abc      something".to_string()]
        );
        assert_eq!(
            cr.render(0, "abc12", "something pieces full"),
            vec!["abc12    something pieces full".to_string()]
        );
        assert_eq!(
            cr.render(0, "abc", "something pieces full more stuff"),
            vec![
                "abc      something pieces full".to_string(),
                "         more stuff".to_string(),
            ]
        );
        assert_eq!(
            cr.render(0, "abc", "something pieces fullest more stuff extra     "),
            vec![
                "abc      something pieces".to_string(),
                "         fullest more stuff".to_string(),
                "         extra".to_string(),
            ]
        );
    }

    #[test]
    fn column_renderer_middle_overflow() {
        let cr = renderer(23);

        assert_eq!(
            cr.render(0, "abc", "somethingxpiecesxfuller"),
            vec!["abc      somethingxpiecesxfuller".to_string()]
        );
        assert_eq!(
            cr.render(0, "abc", "somethingxpiecesxfullerandthenwecontinueforalongtime"),
            vec![
                "abc      somethingxpiecesxfulle-".to_string(),
                "         randthenwecontinuefora-".to_string(),
                "         longtime".to_string(),
            ]
        );
    }

    #[test]
    fn column_renderer_middle_empty() {
        let cr = renderer(8);
        assert_eq!(cr.render(0, "abc", ""), vec!["abc".to_string()]);
        assert_eq!(cr.render(2, "abc", ""), vec!["  abc".to_string()]);
    }

    #[test]
    fn column_renderer_indent() {
        let cr = renderer(12);

        assert_eq!(
            cr.render(1, "abc", "my stuff and some"),
            vec![
                " abc      my stuff".to_string(),
                "          and some".to_string(),
            ]
        );
    }

    #[test]
    fn column_renderer_multibyte() {
        let cr = renderer(4);

        assert_eq!(
            cr.render(0, "a", "ééééé"),
            vec![
                "a        ééé-".to_string(),
                "         éé".to_string(),
            ]
        );
    }

    #[rstest]
    #[case(5, 20, 100, 20)]
    #[case(5, 5, 100, MINIMUM_MIDDLE_WIDTH)]
    #[case(5, 90, 100, 91)]
    #[case(5, 20, 25, MINIMUM_MIDDLE_WIDTH)]
    #[case(99, 20, 100, MINIMUM_MIDDLE_WIDTH)]
    fn column_renderer_guided(
        #[case] left: usize,
        #[case] middle: usize,
        #[case] total: usize,
        #[case] expected: usize,
    ) {
        // Execute
        let cr = ColumnRenderer::guided(
            PaddingWidth::new(4).unwrap(),
            LeftWidth::new(left).unwrap(),
            MiddleWidth::new(middle).unwrap(),
            TotalWidth(total),
        );

        // Verify
        assert_eq!(cr.middle.0, expected);
    }
}
