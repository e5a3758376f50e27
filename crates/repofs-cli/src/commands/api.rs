//! `repofs api` command - Raw request against the repository API URL.

use anyhow::{Context, Result};
use repofs::Method;
use serde_json::Value;

use super::utils::Session;
use crate::output;

/// Run the api command.
pub fn run(session: &Session, method: &str, path: &str, data: Option<&str>) -> Result<()> {
    let method = parse_method(method)?;
    let body = data
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("--data must be valid JSON")?;

    let response: Value = session
        .rt
        .block_on(session.client.request(method, path, body.as_ref()))?;

    if !response.is_null() {
        output::json(&response)?;
    }
    Ok(())
}

fn parse_method(method: &str) -> Result<Method> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method: {method}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("get").unwrap(), Method::GET);
        assert_eq!(parse_method("Delete").unwrap(), Method::DELETE);
        assert!(parse_method("NOT A METHOD").is_err());
    }
}
