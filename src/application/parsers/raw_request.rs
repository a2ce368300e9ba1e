use crate::application::builders::request_builder::RequestBuilder;
use crate::domain::entities::{Method, Request};
use crate::domain::errors::ParseError;
use crate::domain::value_objects::Body;

/// Minimal reader for hand-written HTTP/1.1 requests
///
/// Accepts `METHOD target version`, then `Name: value` lines up to the first
/// blank line, then the body. CRLF line endings are treated as LF. There is
/// no header folding, no chunked decoding and no HTTP/0.9 support.
pub struct RawRequestParser;

impl RawRequestParser {
    pub fn parse(input: &str) -> Result<Request, ParseError> {
        let text = input.replace("\r\n", "\n");

        let method = Self::method(&text)?;
        let rest = skip_char(&text[method.as_str().len()..]);
        let builder = RequestBuilder::new().method(method);

        let (target, rest) = match rest.find(' ') {
            Some(space) => (&rest[..space], Some(&rest[space + 1..])),
            None => (rest, None),
        };
        let builder = builder.url(target).map_err(|_| ParseError::EmptyTarget)?;

        let Some(rest) = rest else {
            return Self::finish(builder);
        };

        let (version, rest) = match rest.find('\n') {
            Some(newline) => (&rest[..newline], Some(&rest[newline + 1..])),
            None => (rest, None),
        };
        tracing::debug!("raw request {} {} version '{}'", method, target, version);

        let Some(rest) = rest else {
            return Self::finish(builder);
        };

        let (head, body) = split_head(rest);
        let builder = Self::headers(builder, head)?;
        Self::finish(builder.body(body.map(Body::from)))
    }

    /// Longest standard method that prefixes the input
    fn method(input: &str) -> Result<Method, ParseError> {
        Method::ALL
            .into_iter()
            .filter(|m| input.starts_with(m.as_str()))
            .max_by_key(|m| m.as_str().len())
            .ok_or(ParseError::NoValidMethod)
    }

    fn headers(mut builder: RequestBuilder, head: &str) -> Result<RequestBuilder, ParseError> {
        for line in head.split('\n') {
            if line.is_empty() {
                break;
            }
            let parts: Vec<&str> = line.split(':').collect();
            if parts.len() != 2 {
                return Err(ParseError::InvalidHeaders {
                    line: line.to_string(),
                });
            }
            builder = builder.header(parts[0], parts[1].trim());
        }
        Ok(builder)
    }

    fn finish(builder: RequestBuilder) -> Result<Request, ParseError> {
        builder.build().map_err(|_| ParseError::EmptyTarget)
    }
}

fn skip_char(input: &str) -> &str {
    let mut chars = input.chars();
    chars.next();
    chars.as_str()
}

/// Splits header lines from the body at the first blank line
fn split_head(input: &str) -> (&str, Option<&str>) {
    if let Some(body) = input.strip_prefix('\n') {
        return ("", Some(body));
    }
    match input.find("\n\n") {
        Some(blank) => (&input[..blank], Some(&input[blank + 2..])),
        None => (input, None),
    }
}
