//! Content sniffing for uploads.
//!
//! Classification never trusts the uploaded filename; only magic bytes
//! decide whether a payload is routed through transcription.

/// Detect common audio container formats from magic bytes.
///
/// Returns the MIME type when the payload looks like audio, `None` otherwise.
pub fn sniff_audio(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 12 {
        return None;
    }

    if &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
        return Some("audio/wav");
    }
    if &bytes[0..3] == b"ID3" {
        return Some("audio/mpeg");
    }
    // Raw MPEG audio frame sync: 11 set bits.
    if bytes[0] == 0xFF && (bytes[1] & 0xE0) == 0xE0 {
        return Some("audio/mpeg");
    }
    if &bytes[0..4] == b"OggS" {
        return Some("audio/ogg");
    }
    if &bytes[0..4] == b"fLaC" {
        return Some("audio/flac");
    }
    // ISO base media container ("ftyp" at offset 4); M4A/MP4 audio.
    if &bytes[4..8] == b"ftyp" {
        return Some("audio/mp4");
    }
    if &bytes[0..4] == b"FORM" && &bytes[8..12] == b"AIFF" {
        return Some("audio/aiff");
    }

    None
}
