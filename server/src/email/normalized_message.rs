use mail_parser::{MessageParser, PartType};
use regex::Regex;

use crate::error::{AppError, AppResult};

lazy_static::lazy_static!(
    static ref RE_WHITESPACE: Regex = Regex::new(r"[\r\t\n]+").unwrap();
    static ref RE_LONG_SPACE: Regex = Regex::new(r" {2,}").unwrap();
);

const HTML_RENDER_WIDTH: usize = 400;

/// Headers plus flattened plain-text body of one raw message. Ephemeral:
/// built, handed to the extractors and the prompt, then dropped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NormalizedMessage {
    pub subject: String,
    pub from: String,
    pub to: String,
    pub date: String,
    pub body: String,
}

impl NormalizedMessage {
    /// Parse raw RFC-822 bytes. Text parts are concatenated verbatim; HTML
    /// parts are rendered to plain text (scripts and styles dropped) and
    /// appended. The body is whitespace-collapsed and capped at `body_limit`
    /// characters.
    pub fn parse(raw: &[u8], body_limit: usize) -> AppResult<Self> {
        let msg = MessageParser::default()
            .parse(raw)
            .ok_or_else(|| AppError::ParseFailure("not a decodable RFC-822 message".to_string()))?;

        let subject = msg.subject().unwrap_or_default().to_string();
        let from = msg
            .from()
            .and_then(|f| f.first().and_then(|x| x.address().map(|a| a.to_string())))
            .unwrap_or_default();
        let to = msg
            .to()
            .and_then(|t| t.first().and_then(|x| x.address().map(|a| a.to_string())))
            .unwrap_or_default();
        let date = msg.date().map(|d| d.to_rfc3339()).unwrap_or_default();

        let mut body = String::new();
        for part in &msg.parts {
            match &part.body {
                PartType::Text(text) => {
                    body.push_str(text);
                    body.push(' ');
                }
                PartType::Html(html) => {
                    body.push_str(&html2text::from_read(html.as_bytes(), HTML_RENDER_WIDTH));
                    body.push(' ');
                }
                _ => {}
            }
        }

        let body = RE_WHITESPACE.replace_all(&body, " ");
        let body = RE_LONG_SPACE.replace_all(&body, " ");
        let body: String = body.trim().chars().take(body_limit).collect();

        Ok(NormalizedMessage {
            subject,
            from,
            to,
            date,
            body,
        })
    }
}
