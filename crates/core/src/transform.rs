//! Per-type value transformers: color, typography, box-shadow.

use crate::build::Builder;
use crate::color::{self, parse_hex, parse_hex_pair, Rgb};
use crate::error::BuildError;
use crate::naming::{add_px_suffix, css_property, css_var_ref, digits_path};
use crate::resolve::{whole_reference, Chain};
use crate::stylesheet::INDENT;
use crate::tree::{ShadowLayer, TokenValue, TypographyValue};
use crate::types::{COLOR, EXCLUDED_TYPOGRAPHY_FIELDS, TYPOGRAPHY};
use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

/// `{path}` optionally followed by a two-digit hex alpha, and nothing else.
static COLOR_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{([^{}]+)\}([0-9A-Fa-f]{2})?$").expect("color reference pattern is valid")
});

const OPAQUE: u8 = 0xff;

impl<'a> Builder<'a> {
    /// Transform a color value that is not part of the tree.
    pub fn parse_color(&mut self, raw: &str) -> Result<String, BuildError> {
        let mut chain = Chain::detached(raw, self.config.max_reference_depth);
        self.color_in(raw, &mut chain)
    }

    /// Transform a typography value into a class body.
    pub fn parse_typography(&mut self, value: &TypographyValue) -> Result<String, BuildError> {
        let mut chain = Chain::detached(TYPOGRAPHY, self.config.max_reference_depth);
        self.typography_in(value, &mut chain)
    }

    /// Transform shadow layers into one `box-shadow` value.
    pub fn parse_shadow(&mut self, layers: &[ShadowLayer]) -> Result<String, BuildError> {
        let mut chain = Chain::detached("boxShadow", self.config.max_reference_depth);
        self.shadow_in(layers, &mut chain)
    }

    // ── Color ───────────────────────────────────────────────────────

    pub(crate) fn color_in(&mut self, raw: &str, chain: &mut Chain) -> Result<String, BuildError> {
        let raw = raw.trim();
        if let Some(rgba) = color::hex_to_rgba(raw) {
            return Ok(rgba);
        }

        let caps = COLOR_REFERENCE
            .captures(raw)
            .ok_or_else(|| invalid_color(chain, raw))?;
        let reference = caps.get(1).map_or("", |m| m.as_str().trim());
        let alpha = match caps.get(2) {
            Some(m) => parse_hex_pair(m.as_str()).ok_or_else(|| invalid_color(chain, raw))?,
            None => OPAQUE,
        };

        if !self.config.is_paste_as_var(reference) {
            let rgb = self.channels_of(reference, chain)?;
            return Ok(color::rgba_with_alpha(&rgb.channels(), alpha));
        }

        let digits = digits_path(reference, &self.config.digits_suffix);
        if !self.digits_emitted.contains(reference) {
            let rgb = self.channels_of(reference, chain)?;
            self.digits_emitted.insert(reference.to_owned());
            debug!("channel variable '{}' = {}", digits, rgb.channels());
            self.sheet.add_variable(&digits, rgb.channels());
        }
        Ok(color::rgba_with_alpha(&css_var_ref(&digits), alpha))
    }

    /// RGB channels of the color at `reference`, following references.
    /// The referenced color's own alpha is dropped; the consumer supplies
    /// its own.
    fn channels_of(&mut self, reference: &str, chain: &mut Chain) -> Result<Rgb, BuildError> {
        let leaf = self.lookup(reference, chain)?;
        let raw = match &leaf.value {
            TokenValue::Color(raw) | TokenValue::Scalar(raw) => raw.trim(),
            _ => {
                return Err(BuildError::TypeMismatch {
                    path: chain.root().to_owned(),
                    reference: reference.to_owned(),
                    expected: COLOR,
                })
            }
        };

        chain.enter(reference)?;
        let result = if let Some(hex) = parse_hex(raw) {
            Ok(hex.rgb)
        } else if let Some(inner) = COLOR_REFERENCE
            .captures(raw)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
        {
            self.channels_of(inner, chain)
        } else {
            Err(invalid_color(chain, raw))
        };
        chain.leave();
        result
    }

    // ── Typography ──────────────────────────────────────────────────

    pub(crate) fn typography_in(
        &mut self,
        value: &TypographyValue,
        chain: &mut Chain,
    ) -> Result<String, BuildError> {
        let fields = self.typography_fields(value, chain)?;
        let mut lines = Vec::with_capacity(fields.len());
        for (name, raw) in &fields {
            if EXCLUDED_TYPOGRAPHY_FIELDS.contains(&name.as_str()) {
                continue;
            }
            let resolved = self.resolve_text(raw, chain)?;
            lines.push(css_property(name, &resolved));
        }
        Ok(lines.join(&format!("\n{}", INDENT)))
    }

    /// The field map of a typography value, following a whole-value
    /// reference to another typography token.
    fn typography_fields(
        &mut self,
        value: &TypographyValue,
        chain: &mut Chain,
    ) -> Result<IndexMap<String, String>, BuildError> {
        let raw = match value {
            TypographyValue::Fields(fields) => return Ok(fields.clone()),
            TypographyValue::Reference(raw) => raw,
        };
        let reference = whole_reference(raw).ok_or_else(|| BuildError::TypeMismatch {
            path: chain.root().to_owned(),
            reference: raw.clone(),
            expected: TYPOGRAPHY,
        })?;
        let leaf = self.lookup(reference, chain)?;
        let TokenValue::Typography(target) = &leaf.value else {
            return Err(BuildError::TypeMismatch {
                path: chain.root().to_owned(),
                reference: reference.to_owned(),
                expected: TYPOGRAPHY,
            });
        };
        chain.enter(reference)?;
        let fields = self.typography_fields(target, chain);
        chain.leave();
        fields
    }

    // ── Box shadow ──────────────────────────────────────────────────

    pub(crate) fn shadow_in(
        &mut self,
        layers: &[ShadowLayer],
        chain: &mut Chain,
    ) -> Result<String, BuildError> {
        let mut out = Vec::with_capacity(layers.len());
        for layer in layers {
            let mut parts = Vec::with_capacity(6);
            if layer.inner {
                parts.push("inset".to_string());
            }
            for length in [&layer.x, &layer.y, &layer.blur, &layer.spread] {
                parts.push(add_px_suffix(&self.resolve_text(length, chain)?));
            }
            parts.push(self.color_in(&layer.color, chain)?);
            out.push(parts.join(" "));
        }
        Ok(out.join(", "))
    }
}

fn invalid_color(chain: &Chain, raw: &str) -> BuildError {
    BuildError::InvalidColorFormat {
        path: chain.root().to_owned(),
        value: raw.to_owned(),
    }
}
