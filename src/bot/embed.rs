use serde::Serialize;

use super::image::is_valid_image_url;

pub const TITLE_MAX: usize = 256;
pub const DESCRIPTION_MAX: usize = 4096;
pub const FIELD_NAME_MAX: usize = 256;
pub const FIELD_VALUE_MAX: usize = 1024;
pub const FIELDS_MAX: usize = 25;

pub mod color {
    pub const GREEN: u32 = 0x4CAF50;
    pub const BLUE: u32 = 0x2196F3;
    pub const PURPLE: u32 = 0x9C27B0;
    pub const DEEP_PURPLE: u32 = 0x673AB7;
    pub const ORANGE: u32 = 0xFF9800;
    pub const DEEP_ORANGE: u32 = 0xFF5722;
    pub const PINK: u32 = 0xE91E63;
    pub const CYAN: u32 = 0x00BCD4;
    pub const RED: u32 = 0xF44336;
    pub const GREY: u32 = 0x607D8B;
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Footer {
    pub text: String,
}

/// A chat embed, clamped to the platform's size limits as it is built.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<Footer>,
}

impl Embed {
    pub fn new(title: impl AsRef<str>, color: u32) -> Self {
        Self {
            title: truncate(title.as_ref(), TITLE_MAX),
            description: None,
            color,
            fields: vec![],
            thumbnail: None,
            footer: None,
        }
    }

    pub fn description(mut self, description: impl AsRef<str>) -> Self {
        let description = description.as_ref().trim();
        self.description =
            (!description.is_empty()).then(|| truncate(description, DESCRIPTION_MAX));
        self
    }

    /// Extra fields past the limit are dropped.
    pub fn field(mut self, name: impl AsRef<str>, value: impl AsRef<str>, inline: bool) -> Self {
        if self.fields.len() >= FIELDS_MAX {
            return self;
        }

        let value = match value.as_ref().trim() {
            "" => "\u{200b}".to_owned(),
            value => truncate(value, FIELD_VALUE_MAX),
        };

        self.fields.push(Field {
            name: truncate(name.as_ref(), FIELD_NAME_MAX),
            value,
            inline,
        });
        self
    }

    /// Only URLs that pass [`is_valid_image_url`] become a thumbnail.
    pub fn thumbnail(mut self, url: Option<&str>) -> Self {
        if let Some(url) = url.filter(|url| is_valid_image_url(url)) {
            self.thumbnail = Some(Thumbnail {
                url: url.trim().to_owned(),
            });
        }
        self
    }

    pub fn footer(mut self, text: impl AsRef<str>) -> Self {
        self.footer = Some(Footer {
            text: truncate(text.as_ref(), 2048),
        });
        self
    }

    /// Plain text rendering used by the CLI.
    pub fn to_text(&self) -> String {
        let mut out = format!("== {} ==\n", self.title);

        if let Some(description) = &self.description {
            out.push_str(description);
            out.push('\n');
        }

        for field in &self.fields {
            out.push_str(&format!("\n[{}]\n{}\n", field.name, field.value));
        }

        if let Some(thumbnail) = &self.thumbnail {
            out.push_str(&format!("\nimage: {}\n", thumbnail.url));
        }

        if let Some(footer) = &self.footer {
            out.push_str(&format!("\n{}\n", footer.text));
        }

        out
    }
}

/// What a command answers with.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub embeds: Vec<Embed>,
    /// Only shown to the user who ran the command.
    pub ephemeral: bool,
}

impl Reply {
    pub fn public(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ephemeral: false,
        }
    }

    pub fn private(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ephemeral: true,
        }
    }

    pub fn warning(message: impl AsRef<str>) -> Self {
        Self::private(Embed::new("⚠️ Heads up", color::ORANGE).description(message))
    }

    pub fn error() -> Self {
        Self::private(
            Embed::new("❌ Something went wrong", color::RED)
                .description("Please try again in a moment."),
        )
    }

    pub fn to_text(&self) -> String {
        self.embeds
            .iter()
            .map(Embed::to_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Cuts `value` to at most `max` characters, ending with `...` when cut.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_owned();
    }

    let mut out = value
        .chars()
        .take(max.saturating_sub(3))
        .collect::<String>()
        .trim_end()
        .to_owned();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("🌿🌿🌿🌿🌿🌿", 5), "🌿🌿...");
        assert_eq!(truncate("a".repeat(300).as_str(), TITLE_MAX).chars().count(), TITLE_MAX);
    }

    #[test]
    fn thumbnail_requires_valid_url() {
        let embed = Embed::new("Blue Dream", color::GREEN).thumbnail(Some("nan"));
        assert!(embed.thumbnail.is_none());

        let embed = Embed::new("Blue Dream", color::GREEN)
            .thumbnail(Some("https://images.leafly.com/flower-images/blue-dream.png"));
        assert!(embed.thumbnail.is_some());
    }

    #[test]
    fn fields_are_capped() {
        let embed = (0..30).fold(Embed::new("many", color::GREY), |embed, i| {
            embed.field(i.to_string(), "value", true)
        });

        assert_eq!(embed.fields.len(), FIELDS_MAX);
    }

    #[test]
    fn serializes_without_empty_parts() {
        let value = serde_json::to_value(Embed::new("Title", color::BLUE)).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"title": "Title", "color": color::BLUE})
        );
    }
}
