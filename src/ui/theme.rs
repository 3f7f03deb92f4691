use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub error: Style,
    pub warn: Style,
}

impl Theme {
    /// Colors only when the stream is a terminal
    pub fn detect() -> Self {
        if !console::Term::stderr().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
        }
    }

    pub fn plain() -> Self {
        Self {
            error: Style::new(),
            warn: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
