//! Semantic styling for terminal output

use console::Style;

/// Style manager holding one style per semantic intent
pub struct StyleManager {
    success: Style,
    error: Style,
    warning: Style,
    info: Style,
    emphasis: Style,
    subtle: Style,
    unicode: bool,
}

impl StyleManager {
    pub fn new(color: bool) -> Self {
        let unicode = console::Term::stdout().features().wants_emoji();
        Self {
            success: Style::new().green().force_styling(color),
            error: Style::new().red().force_styling(color),
            warning: Style::new().yellow().force_styling(color),
            info: Style::new().cyan().force_styling(color),
            emphasis: Style::new().bold().force_styling(color),
            subtle: Style::new().dim().force_styling(color),
            unicode,
        }
    }

    fn symbol(&self, fancy: &'static str, plain: &'static str) -> &'static str {
        if self.unicode { fancy } else { plain }
    }

    pub fn format_success(&self, message: &str) -> String {
        format!("{} {}", self.success.apply_to(self.symbol("✓", "+")), message)
    }

    pub fn format_error(&self, message: &str) -> String {
        format!("{} {}", self.error.apply_to(self.symbol("✗", "x")), message)
    }

    pub fn format_warning(&self, message: &str) -> String {
        format!("{} {}", self.warning.apply_to("!"), message)
    }

    pub fn format_info(&self, message: &str) -> String {
        format!("{} {}", self.info.apply_to(self.symbol("·", "-")), message)
    }

    pub fn style_emphasis(&self, text: &str) -> String {
        self.emphasis.apply_to(text).to_string()
    }

    pub fn style_subtle(&self, text: &str) -> String {
        self.subtle.apply_to(text).to_string()
    }

    pub fn bullet(&self) -> &'static str {
        self.symbol("•", "*")
    }
}
