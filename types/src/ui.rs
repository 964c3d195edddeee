/// Rendering preferences resolved from `[app]` config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    /// Use ASCII-only glyphs for icons and spinners.
    pub ascii_only: bool,
    /// Use the high-contrast palette.
    pub high_contrast: bool,
}
