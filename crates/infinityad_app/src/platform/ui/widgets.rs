//! Terminal renditions of the Button, Input and Card primitives.

use infinityad_core::Tone;
use owo_colors::{AnsiColors, OwoColorize};

use super::constants::CARD_WIDTH;

/// Applies colors when enabled, passes text through otherwise.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn paint(&self, text: &str, color: AnsiColors) -> String {
        if self.enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.enabled {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn tone(&self, text: &str, tone: Tone) -> String {
        self.paint(text, tone_color(tone))
    }
}

pub fn tone_color(tone: Tone) -> AnsiColors {
    match tone {
        Tone::Green => AnsiColors::Green,
        Tone::Red => AnsiColors::Red,
        Tone::Gray => AnsiColors::BrightBlack,
        Tone::Yellow => AnsiColors::Yellow,
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
    Ghost,
    Danger,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonSize {
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
}

impl ButtonSize {
    fn padding(self) -> usize {
        match self {
            ButtonSize::Sm => 1,
            ButtonSize::Md => 2,
            ButtonSize::Lg => 3,
            ButtonSize::Xl => 4,
        }
    }
}

const SPINNER: &str = "⟳";

#[derive(Debug, Clone, Default)]
pub struct Button {
    label: String,
    variant: ButtonVariant,
    size: ButtonSize,
    disabled: bool,
    loading: bool,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn size(mut self, size: ButtonSize) -> Self {
        self.size = size;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// A loading button shows a spinner and is always disabled.
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled || self.loading
    }

    pub fn render(&self, palette: &Palette) -> String {
        let pad = " ".repeat(self.size.padding());
        let label = if self.loading {
            format!("{SPINNER} {}", self.label)
        } else {
            self.label.clone()
        };
        let face = match self.variant {
            ButtonVariant::Outline => format!("({pad}{label}{pad})"),
            ButtonVariant::Ghost => format!("{pad}{label}{pad}"),
            _ => format!("[{pad}{label}{pad}]"),
        };

        if self.is_disabled() {
            return palette.dim(&face);
        }
        match self.variant {
            ButtonVariant::Primary => palette.bold(&palette.paint(&face, AnsiColors::Blue)),
            ButtonVariant::Secondary => palette.paint(&face, AnsiColors::White),
            ButtonVariant::Outline => face,
            ButtonVariant::Ghost => palette.paint(&face, AnsiColors::Blue),
            ButtonVariant::Danger => palette.bold(&palette.paint(&face, AnsiColors::Red)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Input {
    label: Option<String>,
    value: String,
    placeholder: Option<String>,
    required: bool,
    disabled: bool,
    error: Option<String>,
    helper: Option<String>,
}

impl Input {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    pub fn helper(mut self, helper: impl Into<String>) -> Self {
        self.helper = Some(helper.into());
        self
    }

    /// Label line, value line, then the error or (only without an error) the helper.
    pub fn render(&self, palette: &Palette) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(label) = &self.label {
            let mut line = palette.bold(label);
            if self.required {
                line.push(' ');
                line.push_str(&palette.paint("*", AnsiColors::Red));
            }
            lines.push(line);
        }

        let shown = if self.value.is_empty() {
            palette.dim(self.placeholder.as_deref().unwrap_or(""))
        } else if self.disabled {
            palette.dim(&self.value)
        } else {
            self.value.clone()
        };
        let marker = if self.error.is_some() {
            palette.paint(">", AnsiColors::Red)
        } else {
            ">".to_string()
        };
        lines.push(format!("{marker} {shown}"));

        match (&self.error, &self.helper) {
            (Some(error), _) => lines.push(palette.paint(error, AnsiColors::Red)),
            (None, Some(helper)) => lines.push(palette.dim(helper)),
            (None, None) => {}
        }
        lines
    }
}

#[derive(Debug, Clone, Default)]
pub struct Card {
    title: Option<String>,
    subtitle: Option<String>,
    body: Vec<String>,
    footer: Vec<String>,
    boxed: bool,
}

impl Card {
    pub fn new() -> Self {
        Self {
            boxed: true,
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn boxed(mut self, boxed: bool) -> Self {
        self.boxed = boxed;
        self
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    pub fn lines(mut self, lines: impl IntoIterator<Item = String>) -> Self {
        self.body.extend(lines);
        self
    }

    pub fn footer(mut self, line: impl Into<String>) -> Self {
        self.footer.push(line.into());
        self
    }

    pub fn render(&self, palette: &Palette) -> String {
        let mut header = Vec::new();
        if let Some(title) = &self.title {
            header.push(palette.bold(title));
        }
        if let Some(subtitle) = &self.subtitle {
            header.push(palette.dim(subtitle));
        }

        if !self.boxed {
            let mut out: Vec<String> = header;
            out.extend(self.body.iter().cloned());
            out.extend(self.footer.iter().cloned());
            return out.join("\n");
        }

        let rule = "─".repeat(CARD_WIDTH);
        let mut out = vec![format!("┌{rule}")];
        let boxed_line = |line: &String| format!("│ {line}");
        out.extend(header.iter().map(boxed_line));
        if !header.is_empty() && !self.body.is_empty() {
            out.push(format!("├{rule}"));
        }
        out.extend(self.body.iter().map(boxed_line));
        if !self.footer.is_empty() {
            out.push(format!("├{rule}"));
            out.extend(self.footer.iter().map(boxed_line));
        }
        out.push(format!("└{rule}"));
        out.join("\n")
    }
}
