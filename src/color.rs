//! Color utilities for terminal output.
//!
//! Only human-facing output (the `check` summary and startup errors) is
//! colored; protocol traffic on stdout never is.

use std::fmt::Display;

use owo_colors::{OwoColorize, Style};

use crate::cli::ColorOption;

/// Semantic styles for terminal output, disabled when the target is not a
/// terminal or the user asked for no color.
pub struct ColorScheme {
  enabled: bool,
}

impl ColorScheme {
  /// Create a color scheme from the user's preference; `auto` colors only
  /// when stdout is a terminal.
  pub fn new(color_option: ColorOption) -> Self {
    let enabled = match color_option {
      ColorOption::Always => true,
      ColorOption::Never => false,
      ColorOption::Auto => {
        use std::io::IsTerminal;
        std::io::stdout().is_terminal()
      }
    };

    Self { enabled }
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  fn paint<T: Display>(&self, text: T, style: Style) -> String {
    if self.enabled {
      format!("{}", text.style(style))
    } else {
      text.to_string()
    }
  }

  /// Green.
  pub fn success<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().green())
  }

  /// Bright red, bold.
  pub fn error<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().bright_red().bold())
  }

  /// Labels and headings.
  pub fn emphasis<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().bright_white().bold())
  }

  /// URLs.
  pub fn link<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().blue().underline())
  }

  pub fn number<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().bright_blue())
  }

  /// Secondary text such as masked secrets.
  pub fn dimmed<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().dimmed())
  }
}
