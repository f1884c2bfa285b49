use serde::Deserialize;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{ReelError, ReelResult};

/// Parse `"r,g,b"` into an opaque colour.
pub fn parse_rgb(s: &str) -> ReelResult<Rgba8> {
    match parse_components(s)?.as_slice() {
        &[r, g, b] => Ok(Rgba8::rgb(r, g, b)),
        other => Err(ReelError::validation(format!(
            "rgb colour must have 3 components (r,g,b), got {}",
            other.len()
        ))),
    }
}

/// Parse `"r,g,b,a"` into a colour with alpha.
pub fn parse_rgba(s: &str) -> ReelResult<Rgba8> {
    match parse_components(s)?.as_slice() {
        &[r, g, b, a] => Ok(Rgba8::rgba(r, g, b, a)),
        other => Err(ReelError::validation(format!(
            "rgba colour must have 4 components (r,g,b,a), got {}",
            other.len()
        ))),
    }
}

/// Parse `#RRGGBB` or `#RRGGBBAA` (the `#` is optional, case-insensitive).
pub fn parse_hex(s: &str) -> ReelResult<Rgba8> {
    let s = s.trim();
    let hex = s.strip_prefix('#').unwrap_or(s);

    if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
        return Err(ReelError::validation(format!(
            "invalid colour \"{s}\": use hexadecimal #RRGGBB (e.g. #1E3A8A)"
        )));
    }

    let byte = |i: usize| -> ReelResult<u8> {
        let pair = &hex[i..i + 2];
        u8::from_str_radix(pair, 16)
            .map_err(|_| ReelError::validation(format!("invalid hex byte \"{pair}\" in \"{s}\"")))
    };

    let a = if hex.len() == 8 { byte(6)? } else { 255 };
    Ok(Rgba8::rgba(byte(0)?, byte(2)?, byte(4)?, a))
}

/// Parse any accepted textual form: hex, `r,g,b` or `r,g,b,a`.
pub fn parse_color(s: &str) -> ReelResult<Rgba8> {
    if s.contains(',') {
        let parts = parse_components(s)?;
        return match parts.as_slice() {
            &[r, g, b] => Ok(Rgba8::rgb(r, g, b)),
            &[r, g, b, a] => Ok(Rgba8::rgba(r, g, b, a)),
            _ => Err(ReelError::validation(format!(
                "colour \"{s}\" must have 3 or 4 components"
            ))),
        };
    }
    parse_hex(s)
}

fn parse_components(s: &str) -> ReelResult<Vec<u8>> {
    s.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<u8>().map_err(|_| {
                ReelError::validation(format!(
                    "invalid colour component \"{part}\" in \"{s}\" (expected 0-255)"
                ))
            })
        })
        .collect()
}

impl<'de> Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Obj {
                r: u8,
                g: u8,
                b: u8,
                #[serde(default = "opaque")]
                a: u8,
            },
            Arr(Vec<u8>),
        }

        fn opaque() -> u8 {
            255
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => parse_color(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                &[r, g, b] => Ok(Self::rgb(r, g, b)),
                &[r, g, b, a] => Ok(Self::rgba(r, g, b, a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_and_rgba_strings() {
        assert_eq!(parse_rgb("255,255,102").unwrap(), Rgba8::rgb(255, 255, 102));
        assert_eq!(
            parse_rgba("0, 51, 102, 128").unwrap(),
            Rgba8::rgba(0, 51, 102, 128)
        );
        assert!(parse_rgb("1,2").is_err());
        assert!(parse_rgb("1,2,300").is_err());
        assert!(parse_rgba("1,2,3").is_err());
        assert!(parse_rgb("red").is_err());
    }

    #[test]
    fn hex_strings() {
        assert_eq!(parse_hex("#1E3A8A").unwrap(), Rgba8::rgb(0x1e, 0x3a, 0x8a));
        assert_eq!(parse_hex("10b981").unwrap(), Rgba8::rgb(0x10, 0xb9, 0x81));
        assert_eq!(
            parse_hex("#FF000080").unwrap(),
            Rgba8::rgba(255, 0, 0, 0x80)
        );
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#GGGGGG").is_err());
        assert!(parse_hex("#ééé").is_err());
    }

    #[test]
    fn deserialize_accepts_all_forms() {
        let c: Rgba8 = serde_json::from_str("\"#355E3B\"").unwrap();
        assert_eq!(c, Rgba8::rgb(53, 94, 59));
        let c: Rgba8 = serde_json::from_str("\"0,51,102,128\"").unwrap();
        assert_eq!(c, Rgba8::rgba(0, 51, 102, 128));
        let c: Rgba8 = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(c, Rgba8::rgb(1, 2, 3));
        let c: Rgba8 = serde_json::from_str(r#"{"r": 4, "g": 5, "b": 6}"#).unwrap();
        assert_eq!(c, Rgba8::rgb(4, 5, 6));
        assert!(serde_json::from_str::<Rgba8>("[1, 2]").is_err());
    }
}
