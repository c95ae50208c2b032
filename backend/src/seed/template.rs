//! Field templates for synthetic data
//!
//! A template is literal text mixed with `{{namespace.method(args)}}` tags,
//! e.g. `"{{name.firstName}} from {{random.arrayElement(Madrid|Lima)}}"`.
//! Templates are parsed once and rendered per record.

use fake::faker::filesystem::en::FileName;
use fake::faker::internet::en::{Password, SafeEmail, Username};
use fake::faker::lorem::en::{Paragraph, Sentence, Word, Words};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::Fake;
use once_cell::sync::Lazy;
use rand::Rng;
use regex_lite::Regex;
use thiserror::Error;
use uuid::Uuid;

static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z]+)\.([A-Za-z]+)(?:\(([^)]*)\))?\s*\}\}")
        .expect("tag pattern is valid")
});

/// Largest word count `lorem.words(n)` accepts
const MAX_WORDS: usize = 200;

/// Template parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown template primitive `{0}`")]
    UnknownPrimitive(String),

    #[error("invalid arguments for `{primitive}`: `{args}`")]
    InvalidArguments { primitive: String, args: String },

    #[error("unterminated or malformed tag in `{0}`")]
    Unterminated(String),
}

/// A fake-data generator a tag resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    LoremWord,
    LoremWords(usize),
    LoremSentence,
    LoremParagraph,
    FirstName,
    LastName,
    FullName,
    Email,
    UserName,
    Password,
    Number { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    Boolean,
    Uuid,
    ArrayElement(Vec<String>),
    FileName,
}

impl Primitive {
    fn parse(namespace: &str, method: &str, args: Option<&str>) -> Result<Self, TemplateError> {
        let id = format!("{}.{}", namespace, method);
        let args = args.map(str::trim).filter(|a| !a.is_empty());
        let invalid = |raw: &str| TemplateError::InvalidArguments {
            primitive: id.clone(),
            args: raw.to_string(),
        };

        let primitive = match (id.as_str(), args) {
            ("lorem.word", None) => Primitive::LoremWord,
            ("lorem.words", None) => Primitive::LoremWords(3),
            ("lorem.words", Some(raw)) => match raw.parse::<usize>() {
                Ok(count) if (1..=MAX_WORDS).contains(&count) => Primitive::LoremWords(count),
                _ => return Err(invalid(raw)),
            },
            ("lorem.sentence", None) => Primitive::LoremSentence,
            ("lorem.paragraph", None) => Primitive::LoremParagraph,
            ("name.firstName", None) => Primitive::FirstName,
            ("name.lastName", None) => Primitive::LastName,
            ("name.findName", None) => Primitive::FullName,
            ("internet.email", None) => Primitive::Email,
            ("internet.userName", None) => Primitive::UserName,
            ("internet.password", None) => Primitive::Password,
            ("random.number", None) => Primitive::Number { min: 0, max: 99_999 },
            ("random.number", Some(raw)) => {
                let bounds: Vec<i64> = raw
                    .split(',')
                    .map(|part| part.trim().parse::<i64>())
                    .collect::<Result<_, _>>()
                    .map_err(|_| invalid(raw))?;
                match bounds.as_slice() {
                    [max] if *max >= 0 => Primitive::Number { min: 0, max: *max },
                    [min, max] if min <= max => Primitive::Number {
                        min: *min,
                        max: *max,
                    },
                    _ => return Err(invalid(raw)),
                }
            }
            ("random.float", Some(raw)) => {
                let bounds: Vec<f64> = raw
                    .split(',')
                    .map(|part| part.trim().parse::<f64>())
                    .collect::<Result<_, _>>()
                    .map_err(|_| invalid(raw))?;
                match bounds.as_slice() {
                    // the span must be finite too, or uniform sampling overflows
                    [min, max] if min < max && (max - min).is_finite() => {
                        Primitive::Float {
                            min: *min,
                            max: *max,
                        }
                    }
                    _ => return Err(invalid(raw)),
                }
            }
            ("random.boolean", None) => Primitive::Boolean,
            ("random.uuid", None) => Primitive::Uuid,
            ("random.arrayElement", Some(raw)) => {
                let options: Vec<String> = raw
                    .split('|')
                    .map(|option| option.trim().to_string())
                    .filter(|option| !option.is_empty())
                    .collect();
                if options.is_empty() {
                    return Err(invalid(raw));
                }
                Primitive::ArrayElement(options)
            }
            ("system.fileName", None) => Primitive::FileName,
            (_, Some(raw)) if is_known(&id) => return Err(invalid(raw)),
            ("random.float", None) | ("random.arrayElement", None) => {
                return Err(invalid(""));
            }
            _ => return Err(TemplateError::UnknownPrimitive(id.clone())),
        };

        Ok(primitive)
    }

    fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match self {
            Primitive::LoremWord => Word().fake_with_rng(rng),
            Primitive::LoremWords(count) => {
                let words: Vec<String> = Words(*count..*count + 1).fake_with_rng(rng);
                words.join(" ")
            }
            Primitive::LoremSentence => Sentence(4..10).fake_with_rng(rng),
            Primitive::LoremParagraph => Paragraph(3..6).fake_with_rng(rng),
            Primitive::FirstName => FirstName().fake_with_rng(rng),
            Primitive::LastName => LastName().fake_with_rng(rng),
            Primitive::FullName => Name().fake_with_rng(rng),
            Primitive::Email => SafeEmail().fake_with_rng(rng),
            Primitive::UserName => Username().fake_with_rng(rng),
            Primitive::Password => Password(10..20).fake_with_rng(rng),
            Primitive::Number { min, max } => rng.gen_range(*min..=*max).to_string(),
            Primitive::Float { min, max } => format!("{:.2}", rng.gen_range(*min..*max)),
            Primitive::Boolean => rng.gen_bool(0.5).to_string(),
            Primitive::Uuid => Uuid::from_bytes(rng.gen()).to_string(),
            Primitive::ArrayElement(options) => options[rng.gen_range(0..options.len())].clone(),
            Primitive::FileName => FileName().fake_with_rng(rng),
        }
    }
}

fn is_known(id: &str) -> bool {
    matches!(
        id,
        "lorem.word"
            | "lorem.sentence"
            | "lorem.paragraph"
            | "name.firstName"
            | "name.lastName"
            | "name.findName"
            | "internet.email"
            | "internet.userName"
            | "internet.password"
            | "random.boolean"
            | "random.uuid"
            | "system.fileName"
    )
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Tag(Primitive),
}

/// A parsed field template
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for captures in TAG.captures_iter(source) {
            let Some(whole) = captures.get(0) else { continue };
            push_literal(&mut segments, &source[cursor..whole.start()], source)?;

            let namespace = &captures[1];
            let method = &captures[2];
            let args = captures.get(3).map(|m| m.as_str());
            segments.push(Segment::Tag(Primitive::parse(namespace, method, args)?));

            cursor = whole.end();
        }
        push_literal(&mut segments, &source[cursor..], source)?;

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the template is a single tag with no surrounding text
    pub fn is_single_tag(&self) -> bool {
        matches!(self.segments.as_slice(), [Segment::Tag(_)])
    }

    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Tag(primitive) => out.push_str(&primitive.render(rng)),
            }
        }
        out
    }
}

fn push_literal(segments: &mut Vec<Segment>, text: &str, source: &str) -> Result<(), TemplateError> {
    if text.contains("{{") || text.contains("}}") {
        return Err(TemplateError::Unterminated(source.to_string()));
    }
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
    Ok(())
}
