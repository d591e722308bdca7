use clap::ValueEnum;
use color_eyre::eyre::Result;

/// When to use colored output.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Color {
    No,
    Yes,
    Auto,
}

impl Color {
    /// Whether color should be used, detecting terminal support for [`Color::Auto`].
    pub fn is_enabled(self) -> bool {
        match self {
            Color::No => false,
            Color::Yes => true,
            Color::Auto => supports_color::on(supports_color::Stream::Stdout).is_some(),
        }
    }
}

/// Install color_eyre's panic and error report handlers, honoring the color setting.
pub fn install_color_eyre(color: Color) -> Result<()> {
    if color.is_enabled() {
        color_eyre::install()
    } else {
        color_eyre::config::HookBuilder::new()
            .theme(color_eyre::config::Theme::new())
            .install()
    }
}
