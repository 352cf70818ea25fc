//! Command templates with `{{.Field}}` placeholders.
//!
//! Supported fields are `Path`, `Name`, `Event`, `Ext`, `Dir` and `BaseName`.
//! Whitespace is allowed inside the braces (`{{ .Path }}`); field names are
//! case-sensitive.

use crate::{
    error::{Error, Result},
    events::EnrichedEvent,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap());

/// A field of [`EnrichedEvent`] that can appear in a command template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Path as reported by the backend.
    Path,
    /// Base file name.
    Name,
    /// Event label, e.g. `WRITE`.
    Event,
    /// Extension including the leading dot.
    Ext,
    /// Containing directory.
    Dir,
    /// File name without extension.
    BaseName,
}

impl Placeholder {
    /// Every placeholder, in documentation order.
    pub const ALL: [Placeholder; 6] = [
        Placeholder::Path,
        Placeholder::Name,
        Placeholder::Event,
        Placeholder::Ext,
        Placeholder::Dir,
        Placeholder::BaseName,
    ];

    /// Field name as written in templates.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "Path",
            Self::Name => "Name",
            Self::Event => "Event",
            Self::Ext => "Ext",
            Self::Dir => "Dir",
            Self::BaseName => "BaseName",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    fn value(self, event: &EnrichedEvent) -> Cow<'_, str> {
        match self {
            Self::Path => event.path.to_string_lossy(),
            Self::Name => Cow::Borrowed(event.name.as_str()),
            Self::Event => Cow::Borrowed(event.event.as_str()),
            Self::Ext => Cow::Borrowed(event.ext.as_str()),
            Self::Dir => event.dir.to_string_lossy(),
            Self::BaseName => Cow::Borrowed(event.base_name.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Placeholder),
}

/// A parsed command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    segments: Vec<Segment>,
}

impl CommandTemplate {
    /// Parse `text`, rejecting unknown fields and unterminated actions.
    pub fn parse(text: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER_RE.captures_iter(text) {
            let (Some(whole), Some(field)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_literal(&mut segments, &text[last..whole.start()])?;
            let placeholder = Placeholder::from_name(field.as_str()).ok_or_else(|| {
                Error::Template(format!(
                    "unknown field '{}' at offset {}",
                    field.as_str(),
                    whole.start()
                ))
            })?;
            segments.push(Segment::Field(placeholder));
            last = whole.end();
        }
        push_literal(&mut segments, &text[last..])?;

        Ok(Self { segments })
    }

    /// Render the template; `None` renders every field as empty.
    pub fn render(&self, event: Option<&EnrichedEvent>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match (segment, event) {
                (Segment::Literal(text), _) => out.push_str(text),
                (Segment::Field(p), Some(event)) => out.push_str(&p.value(event)),
                (Segment::Field(_), None) => {}
            }
        }
        out
    }

    /// Placeholders used by this template, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(p) => Some(*p),
            Segment::Literal(_) => None,
        })
    }
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) -> Result<()> {
    if let Some(pos) = text.find("{{") {
        return Err(Error::Template(format!(
            "unsupported or unterminated action near '{}'",
            &text[pos..]
        )));
    }
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> EnrichedEvent {
        EnrichedEvent::new("/videos/in/sample.mkv", "CREATE")
    }

    #[test]
    fn renders_every_field() {
        let tmpl = CommandTemplate::parse(
            "echo {{.Path}} {{.Name}} {{.Event}} {{.Ext}} {{.Dir}} {{.BaseName}}",
        )
        .unwrap();
        assert_eq!(
            tmpl.render(Some(&event())),
            "echo /videos/in/sample.mkv sample.mkv CREATE .mkv /videos/in sample"
        );
    }

    #[test]
    fn whitespace_inside_braces() {
        let tmpl = CommandTemplate::parse("ffmpeg -i {{ .Path }} out/{{  .BaseName}}.mp4").unwrap();
        assert_eq!(
            tmpl.render(Some(&event())),
            "ffmpeg -i /videos/in/sample.mkv out/sample.mp4"
        );
        assert_eq!(
            tmpl.placeholders().collect::<Vec<_>>(),
            vec![Placeholder::Path, Placeholder::BaseName]
        );
    }

    #[test]
    fn plain_command_renders_verbatim() {
        let tmpl = CommandTemplate::parse("make test").unwrap();
        assert_eq!(tmpl.render(Some(&event())), "make test");
        assert_eq!(tmpl.render(None), "make test");
    }

    #[test]
    fn missing_event_renders_empty_fields() {
        let tmpl = CommandTemplate::parse("run [{{.Name}}]").unwrap();
        assert_eq!(tmpl.render(None), "run []");
    }

    #[test]
    fn unknown_field_is_an_error() {
        let err = CommandTemplate::parse("echo {{.File}}").unwrap_err();
        assert!(matches!(err, Error::Template(msg) if msg.contains("File")));
    }

    #[test]
    fn field_names_are_case_sensitive() {
        assert!(CommandTemplate::parse("echo {{.path}}").is_err());
    }

    #[test]
    fn unterminated_action_is_an_error() {
        assert!(CommandTemplate::parse("echo {{.Path").is_err());
        assert!(CommandTemplate::parse("echo {{ if .Path }}").is_err());
    }
}
