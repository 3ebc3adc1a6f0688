use crate::error::{QuizError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use qrcode::render::unicode;
use qrcode::QrCode;
use rand::Rng;
use std::io::Write;

pub const SESSION_ID_LEN: usize = 15;
const FRACTION_DIGITS: usize = 13;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Characters left as-is by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Settings of the quiz the link opens.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareParams {
    pub penalty: String,
    pub nickname: String,
    pub randomize: bool,
}

/// Parses a penalty, accepting only numbers within `[0, 1]`.
pub fn validate_penalty(input: &str) -> Result<f64> {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && (0.0..=1.0).contains(&value) => Ok(value),
        _ => Err(QuizError::InvalidPenalty(input.to_string())),
    }
}

pub fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.iter().rev().map(|&d| d as char).collect()
}

/// `0.xxxx` rendering of a fraction in base 36, at most `max_digits` digits.
pub fn fraction_to_base36(mut fraction: f64, max_digits: usize) -> String {
    if fraction <= 0.0 || fraction >= 1.0 {
        return "0".to_string();
    }
    let mut out = String::from("0.");
    for _ in 0..max_digits {
        fraction *= 36.0;
        let digit = fraction.floor() as usize;
        out.push(BASE36[digit.min(35)] as char);
        fraction -= digit as f64;
        if fraction <= 0.0 {
            break;
        }
    }
    out
}

/// Time part then random part, both base 36, cut to 15 characters.
pub fn generate_session_id(now_ms: u64, fraction: f64) -> String {
    let mut id = to_base36(now_ms);
    id.push_str(&fraction_to_base36(fraction, FRACTION_DIGITS));
    id.chars().take(SESSION_ID_LEN).collect()
}

pub fn new_session_id() -> String {
    let now_ms = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
    generate_session_id(now_ms, rand::thread_rng().r#gen::<f64>())
}

/// `<base>?c=3+10+2&r=0&p=0.5&n=<nickname>&i=<session id>`
///
/// Fails on an invalid penalty so no broken link is ever opened.
pub fn build_quiz_url(
    base: &str,
    identifiers: &[usize],
    params: &ShareParams,
    session_id: &str,
) -> Result<String> {
    validate_penalty(&params.penalty)?;

    Ok(format!(
        "{}?c={}&r={}&p={}&n={}&i={}",
        base,
        crate::url_sync::serialize(identifiers),
        u8::from(params.randomize),
        utf8_percent_encode(params.penalty.trim(), URI_COMPONENT),
        utf8_percent_encode(&params.nickname, URI_COMPONENT),
        session_id
    ))
}

pub fn mailto_link(identifiers: &[usize], quiz_url: &str) -> String {
    let listed = identifiers
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let body = format!(
        "Voici un quiz personnalisé. Il contient les exercices {}.\n\nVous pouvez également accéder au quiz avec ce lien\n\n{}",
        listed, quiz_url
    );
    format!(
        "mailto:?subject={}&body={}",
        utf8_percent_encode("QUIZ", URI_COMPONENT),
        utf8_percent_encode(&body, URI_COMPONENT)
    )
}

/// QR code as text, two modules per character cell.
pub fn render_qr(text: &str) -> Result<String> {
    let code = QrCode::new(text.as_bytes()).map_err(|e| QuizError::Qr(e.to_string()))?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}

/// OSC 52 escape asking the terminal to put `text` on the clipboard.
pub fn copy_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

pub fn copy_to_clipboard<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    out.write_all(copy_sequence(text).as_bytes())?;
    out.flush()
}
