// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pass-through styling.
//!
//! None of these values influence drag resolution or transitions; the host's
//! renderer reads them when it draws the top bar and scrim.

use alloc::string::String;

use peniko::Color;

/// Text, colors and labels for the sheet's chrome.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetStyle {
    /// Title shown in the top bar.
    pub title_text: Option<String>,
    /// Subtitle shown under the title.
    pub subtitle_text: Option<String>,
    /// Point size of the (bold) title.
    pub title_font_size: f32,
    /// Point size of the (bold) subtitle.
    pub subtitle_font_size: f32,
    /// Title color.
    pub title_color: Color,
    /// Subtitle color.
    pub subtitle_color: Color,
    /// Background of the top bar.
    pub top_bar_color: Color,
    /// Scrim color in a light appearance.
    pub scrim_color_light: Color,
    /// Scrim color in a dark appearance.
    pub scrim_color_dark: Color,
    /// Hides the drag handle.
    pub handle_hidden: bool,
    /// Accessibility label of the close button.
    pub close_button_accessibility_label: String,
    /// Accessibility label of the scrim, which dismisses the sheet when
    /// activated.
    pub scrim_accessibility_label: String,
}

impl SheetStyle {
    /// Creates the default style with a title and an empty subtitle.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title_text: Some(title.into()),
            subtitle_text: Some(String::new()),
            ..Self::default()
        }
    }

    /// Sets the subtitle.
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle_text = Some(subtitle.into());
        self
    }

    /// Scrim color for the current appearance.
    #[must_use]
    pub fn scrim_color(&self, dark: bool) -> Color {
        if dark {
            self.scrim_color_dark
        } else {
            self.scrim_color_light
        }
    }
}

impl Default for SheetStyle {
    fn default() -> Self {
        let dismiss = String::from("Dismiss Sheet");
        Self {
            title_text: None,
            subtitle_text: None,
            title_font_size: 20.0,
            subtitle_font_size: 14.0,
            title_color: Color::BLACK,
            subtitle_color: Color::from_rgba8(60, 60, 67, 153),
            top_bar_color: Color::WHITE,
            // 12% and 29% black.
            scrim_color_light: Color::from_rgba8(0, 0, 0, 31),
            scrim_color_dark: Color::from_rgba8(0, 0, 0, 74),
            handle_hidden: false,
            close_button_accessibility_label: dismiss.clone(),
            scrim_accessibility_label: dismiss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_constructor_sets_empty_subtitle() {
        let style = SheetStyle::new("Places");
        assert_eq!(style.title_text.as_deref(), Some("Places"));
        assert_eq!(style.subtitle_text.as_deref(), Some(""));
        assert!(!style.handle_hidden);
        assert_eq!(style.close_button_accessibility_label, "Dismiss Sheet");
    }

    #[test]
    fn scrim_color_follows_appearance() {
        let style = SheetStyle::default();
        assert_eq!(style.scrim_color(false), Color::from_rgba8(0, 0, 0, 31));
        assert_eq!(style.scrim_color(true), Color::from_rgba8(0, 0, 0, 74));
    }
}
