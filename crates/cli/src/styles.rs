//! Terminal styling for help output and the play screen.

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use colored::{ColoredString, Colorize};

/// Help output in cargo's colors: green bold headers, cyan literals.
pub fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default().bold())
		.usage(AnsiColor::Green.on_default().bold())
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::Cyan.on_default())
		.valid(AnsiColor::Cyan.on_default())
}

pub fn story(text: &str) -> ColoredString {
	text.bright_white()
}

pub fn author(name: &str) -> ColoredString {
	name.cyan().bold()
}

pub fn system(text: &str) -> ColoredString {
	text.yellow().italic()
}

pub fn label(text: &str) -> ColoredString {
	text.green().bold()
}

pub fn dim(text: &str) -> ColoredString {
	text.dimmed()
}

pub fn error(text: &str) -> ColoredString {
	text.red().bold()
}
