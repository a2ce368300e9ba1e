use crate::domain::entities::{Request, Response};
use crate::domain::value_objects::{Body, HeaderList};
use anyhow::{Result, anyhow};
use colored::Colorize;
use serde_json::Value;
use std::io::Write;

/// `METHOD url` followed by one `name: value` line per header value
pub fn format_request(request: &Request) -> String {
    let mut out = format!("{} {}", request.method, request.url.as_str());
    push_headers(&mut out, &request.headers);
    out
}

/// Status line followed by one `name: value` line per header value
pub fn format_response(response: &Response) -> String {
    let status = response.status;
    let mut out = match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    };
    push_headers(&mut out, &response.headers);
    out
}

fn push_headers(out: &mut String, headers: &HeaderList) {
    for (name, value) in headers.iter() {
        out.push('\n');
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
    }
}

pub fn print_request_log(request: &Request) {
    eprintln!("{}", format_request(request).cyan());
    eprintln!("{}", "----------------------------".dimmed());
}

pub fn print_response_log(response: &Response) {
    eprintln!("{}", "++++++++++++++++++++++++++".dimmed());
    eprintln!("{}", format_response(response).cyan());
}

pub fn print_response_body(body: &Body, pretty: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_response_body(&mut out, body, pretty)?;
    out.flush()?;
    Ok(())
}

/// Writes the body verbatim, or as colored indented JSON when `pretty` is set
pub fn write_response_body<W: Write>(out: &mut W, body: &Body, pretty: bool) -> Result<()> {
    if pretty {
        if let Ok(json) = serde_json::from_slice::<Value>(body.as_bytes()) {
            let pretty = serde_json::to_string_pretty(&json)
                .map_err(|e| anyhow!("Failed to format JSON: {}", e))?;
            writeln!(out, "{}", pretty.green())?;
            return Ok(());
        }
    }
    out.write_all(body.as_bytes())?;
    Ok(())
}
