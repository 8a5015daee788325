//! SVG badge rendering.

use chrono::{DateTime, Utc};
use sigbadge_core::types::VerificationOutcome;
use thiserror::Error;

/// Built-in badge template.
pub const DEFAULT_TEMPLATE: &str = include_str!("../assets/badge.svg");

/// Fill color for a valid signature.
pub const SUCCESS_COLOR: &str = "#4c1";
/// Fill color for invalid or errored verifications.
pub const FAILURE_COLOR: &str = "#e05d44";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Errors raised while filling the badge template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The template references a placeholder that has no value.
    #[error("unknown placeholder '{{{{{0}}}}}' in badge template")]
    UnknownPlaceholder(String),
    /// A `{{` was never closed.
    #[error("unterminated placeholder at byte {0} of badge template")]
    Unterminated(usize),
}

/// Everything shown on one badge.
#[derive(Debug, Clone, Copy)]
pub struct BadgeRenderInput<'a> {
    /// Name of the verified file.
    pub filename: &'a str,
    /// When verification finished.
    pub checked_at: DateTime<Utc>,
    /// Verification outcome.
    pub outcome: VerificationOutcome,
    /// Signer key identifier, shown only for valid signatures.
    pub signer: Option<&'a str>,
}

impl BadgeRenderInput<'_> {
    /// Fill color for the outcome.
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self.outcome {
            VerificationOutcome::Valid => SUCCESS_COLOR,
            VerificationOutcome::Invalid | VerificationOutcome::Errored => FAILURE_COLOR,
        }
    }

    /// Status text for the outcome.
    #[must_use]
    pub fn result_text(&self) -> String {
        match self.outcome {
            VerificationOutcome::Valid => {
                format!("Success, signed by {}", self.signer.unwrap_or_default())
            }
            VerificationOutcome::Invalid => "Invalid".to_owned(),
            VerificationOutcome::Errored => "Errored".to_owned(),
        }
    }
}

/// Fill `template` with `input`.
///
/// Placeholders are `{{filename}}`, `{{result}}`, `{{date}}` and `{{color}}`;
/// substituted values are XML-escaped.
///
/// # Errors
///
/// Returns [`RenderError`] if the template contains an unknown or unclosed
/// placeholder.
pub fn render(template: &str, input: &BadgeRenderInput<'_>) -> Result<Vec<u8>, RenderError> {
    let result = input.result_text();
    let date = input.checked_at.format(DATE_FORMAT).to_string();

    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let close = after
            .find("}}")
            .ok_or(RenderError::Unterminated(template.len() - rest.len() + open))?;
        let value = match after[..close].trim() {
            "filename" => input.filename,
            "result" => result.as_str(),
            "date" => date.as_str(),
            "color" => input.color(),
            other => return Err(RenderError::UnknownPlaceholder(other.to_owned())),
        };
        push_escaped(&mut out, value);
        rest = &after[close + 2..];
    }
    out.push_str(rest);

    Ok(out.into_bytes())
}

fn push_escaped(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn input(outcome: VerificationOutcome, signer: Option<&str>) -> BadgeRenderInput<'_> {
        BadgeRenderInput {
            filename: "doc.txt",
            checked_at: Utc.with_ymd_and_hms(2026, 10, 17, 9, 5, 0).unwrap(),
            outcome,
            signer,
        }
    }

    fn rendered(input: &BadgeRenderInput<'_>) -> String {
        String::from_utf8(render(DEFAULT_TEMPLATE, input).unwrap()).unwrap()
    }

    #[test]
    fn valid_badge_names_signer_in_success_color() {
        let svg = rendered(&input(VerificationOutcome::Valid, Some("0123456789ABCDEF")));
        assert!(svg.contains("Success, signed by 0123456789ABCDEF"));
        assert!(svg.contains(SUCCESS_COLOR));
        assert!(!svg.contains(FAILURE_COLOR));
        assert!(svg.contains("doc.txt"));
        assert!(svg.contains("2026-10-17 09:05"));
    }

    #[test]
    fn failed_badges_use_failure_color() {
        let svg = rendered(&input(VerificationOutcome::Invalid, None));
        assert!(svg.contains(">Invalid<"));
        assert!(svg.contains(FAILURE_COLOR));

        let svg = rendered(&input(VerificationOutcome::Errored, None));
        assert!(svg.contains(">Errored<"));
        assert!(svg.contains(FAILURE_COLOR));
    }

    #[test]
    fn rendering_is_deterministic() {
        let badge = input(VerificationOutcome::Valid, Some("ABCD"));
        assert_eq!(
            render(DEFAULT_TEMPLATE, &badge).unwrap(),
            render(DEFAULT_TEMPLATE, &badge).unwrap()
        );
    }

    #[test]
    fn values_are_xml_escaped() {
        let svg = rendered(&input(VerificationOutcome::Valid, Some("<alice@example.com>")));
        assert!(svg.contains("Success, signed by &lt;alice@example.com&gt;"));
        assert!(!svg.contains("<alice@example.com>"));
    }

    #[test]
    fn placeholders_tolerate_inner_spaces() {
        let out = render("[{{ color }}]", &input(VerificationOutcome::Errored, None)).unwrap();
        assert_eq!(out, b"[#e05d44]");
    }

    #[test]
    fn unknown_placeholder_fails() {
        let err = render("<svg>{{reason}}</svg>", &input(VerificationOutcome::Errored, None))
            .unwrap_err();
        assert_eq!(err, RenderError::UnknownPlaceholder("reason".to_owned()));
        assert_eq!(err.to_string(), "unknown placeholder '{{reason}}' in badge template");
    }

    #[test]
    fn unterminated_placeholder_fails() {
        let err = render("<svg>{{color</svg>", &input(VerificationOutcome::Errored, None))
            .unwrap_err();
        assert_eq!(err, RenderError::Unterminated(5));
    }
}
