// Plaintext messages
// Text is split into UTF-16 code units, attachments into bytes

use std::fmt;

/// A plaintext message, either chat text or a raw attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Text(String),
    Bytes(Vec<u8>),
}

impl Message {
    /// The integer units encrypted one by one.
    pub fn units(&self) -> Vec<u32> {
        match self {
            Message::Text(text) => text.encode_utf16().map(u32::from).collect(),
            Message::Bytes(bytes) => bytes.iter().map(|&b| u32::from(b)).collect(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Message::Text(text) => Some(text),
            Message::Bytes(_) => None,
        }
    }

    /// Raw content; text is returned as its UTF-8 encoding.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Message::Text(text) => text.into_bytes(),
            Message::Bytes(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Message::Text(text) => text.encode_utf16().count(),
            Message::Bytes(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<&[u8]> for Message {
    fn from(bytes: &[u8]) -> Self {
        Message::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Message {
    fn from(bytes: Vec<u8>) -> Self {
        Message::Bytes(bytes)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => write!(f, "{}", text),
            Message::Bytes(bytes) => write!(f, "[{} bytes] {}", bytes.len(), hex::encode(bytes)),
        }
    }
}

/// Guess the payload type of recovered code units.
///
/// All ASCII is text; otherwise units that fit in a byte are an attachment.
/// Anything wider can only have been UTF-16 text.
pub fn classify(units: &[u16]) -> Message {
    if units.iter().all(|&u| u < 0x80) {
        return Message::Text(units.iter().map(|&u| char::from(u as u8)).collect());
    }

    if units.iter().all(|&u| u <= 0xFF) {
        return Message::Bytes(units.iter().map(|&u| u as u8).collect());
    }

    Message::Text(String::from_utf16_lossy(units))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_units_are_utf16() {
        let message = Message::from("Hé€");
        assert_eq!(message.units(), vec![0x48, 0xE9, 0x20AC]);
        assert_eq!(message.len(), 3);
    }

    #[test]
    fn test_surrogate_pairs_split_into_two_units() {
        let message = Message::from("🦀");
        assert_eq!(message.units().len(), 2);
    }

    #[test]
    fn test_byte_units() {
        let message = Message::from(vec![0u8, 127, 128, 255]);
        assert_eq!(message.units(), vec![0, 127, 128, 255]);
    }

    #[test]
    fn test_classify_ascii_as_text() {
        assert_eq!(classify(&[72, 73]), Message::Text("HI".to_string()));
        assert_eq!(classify(&[]), Message::Text(String::new()));
    }

    #[test]
    fn test_classify_high_bytes_as_bytes() {
        assert_eq!(classify(&[1, 200, 255]), Message::Bytes(vec![1, 200, 255]));
    }

    #[test]
    fn test_classify_wide_units_as_text() {
        let units: Vec<u16> = "Hé€".encode_utf16().collect();
        assert_eq!(classify(&units), Message::Text("Hé€".to_string()));
    }

    #[test]
    fn test_into_bytes() {
        assert_eq!(Message::from("Hé").into_bytes(), "Hé".as_bytes());
        assert_eq!(Message::from(vec![0u8, 200]).into_bytes(), vec![0u8, 200]);
    }

    #[test]
    fn test_display_bytes_as_hex() {
        let message = Message::from(vec![0xDEu8, 0xAD]);
        assert_eq!(message.to_string(), "[2 bytes] dead");
    }
}
