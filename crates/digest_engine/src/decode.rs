use chardetng::EncodingDetector;
use digest_logging::digest_debug;
use encoding_rs::Encoding;

use crate::FetchOutput;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub html: String,
    pub encoding_label: String,
    /// Some bytes were malformed and replaced with U+FFFD.
    pub lossy: bool,
}

/// Turns a fetched page into text: BOM, then the Content-Type charset, then detection.
pub fn decode_page(output: &FetchOutput) -> DecodedPage {
    decode_html(&output.bytes, output.content_type.as_deref())
}

pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> DecodedPage {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(encoding) = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> DecodedPage {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        digest_debug!("Replaced malformed {} bytes in a {} byte page", encoding.name(), bytes.len());
    }
    DecodedPage {
        html: text.into_owned(),
        encoding_label: encoding.name().to_string(),
        lossy: had_errors,
    }
}
