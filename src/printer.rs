// Prefixed diagnostics printer.

use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

const PREFIX: &str = "[SCUDA]";

// Ignore output error for now.
macro_rules! ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(_) => {}
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    fn color(&self) -> ColorSpec {
        let mut color = ColorSpec::new();
        match self {
            Level::Info => color.set_fg(Some(Color::Cyan)),
            Level::Warning => color.set_fg(Some(Color::Yellow)),
            Level::Error => color.set_fg(Some(Color::Red)).set_bold(true),
        };
        color
    }
}

pub struct Printer {
    choice: ColorChoice,
}

impl Printer {
    pub fn new(choice: ColorChoice) -> Self {
        Self { choice }
    }

    fn write_colorized<S: Into<String>>(
        &self,
        buffer: &mut termcolor::Buffer,
        color: &ColorSpec,
        content: S,
    ) {
        ok!(buffer.set_color(color));
        ok!(buffer.write_all(content.into().as_bytes()));
        ok!(buffer.reset());
    }

    fn print_line(&self, level: Level, message: &str) {
        let writer = BufferWriter::stdout(self.choice);
        let mut buffer = writer.buffer();

        self.write_colorized(&mut buffer, &level.color(), PREFIX);
        ok!(writeln!(buffer, " {}", message));
        ok!(writer.print(&buffer));
    }

    pub fn info<S: AsRef<str>>(&self, message: S) {
        self.print_line(Level::Info, message.as_ref())
    }

    pub fn warning<S: AsRef<str>>(&self, message: S) {
        self.print_line(Level::Warning, message.as_ref())
    }

    pub fn error<S: AsRef<str>>(&self, message: S) {
        self.print_line(Level::Error, message.as_ref())
    }

    // Continuation line aligned under the text following the prefix.
    pub fn detail<S: AsRef<str>>(&self, name: &str, value: S) {
        let writer = BufferWriter::stdout(self.choice);
        let mut buffer = writer.buffer();

        ok!(write!(buffer, "{:>width$}{}=", "", name, width = PREFIX.len() + 1));
        self.write_colorized(
            &mut buffer,
            ColorSpec::new().set_fg(Some(Color::Magenta)),
            format!("{}\n", value.as_ref()),
        );
        ok!(writer.print(&buffer));
    }
}

pub fn create() -> Printer {
    Printer::new(ColorChoice::Auto)
}
