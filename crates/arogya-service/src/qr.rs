//! QR rendering for credential tokens

use arogya_core::CredentialToken;
use qrcode::render::{svg, unicode};
use qrcode::{EcLevel, QrCode};

use crate::services::error::{ServiceError, ServiceResult};

/// Minimum edge length of the SVG image in pixels
pub const SVG_MIN_SIZE: u32 = 200;

fn encode(token: &CredentialToken) -> ServiceResult<QrCode> {
    QrCode::with_error_correction_level(token.as_str().as_bytes(), EcLevel::M)
        .map_err(|e| ServiceError::internal(format!("QR encoding failed: {e}")))
}

/// Render a token as a standalone SVG document
///
/// # Errors
/// Returns an internal error if the token does not fit in a QR code
pub fn render_svg(token: &CredentialToken) -> ServiceResult<String> {
    Ok(encode(token)?
        .render::<svg::Color<'_>>()
        .min_dimensions(SVG_MIN_SIZE, SVG_MIN_SIZE)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

/// Render a token with half-height block characters for terminals
///
/// # Errors
/// Returns an internal error if the token does not fit in a QR code
pub fn render_unicode(token: &CredentialToken) -> ServiceResult<String> {
    Ok(encode(token)?
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_document() {
        let svg = render_svg(&CredentialToken::generate()).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#000000"));
    }

    #[test]
    fn test_unicode_rendering_is_square_ish() {
        let text = render_unicode(&CredentialToken::generate()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.len() > 10);
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|line| line.chars().count() == width));
    }

    #[test]
    fn test_distinct_tokens_render_differently() {
        let first = render_svg(&CredentialToken::generate()).unwrap();
        let second = render_svg(&CredentialToken::generate()).unwrap();
        assert_ne!(first, second);
    }
}
