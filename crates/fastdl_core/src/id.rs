use crate::error::InvalidServerId;
use std::fmt;

/// The hexadecimal identifier namespacing a game server's stored pack.
///
/// Any length is accepted as long as the string decodes as hex; the decoded
/// bytes carry no further meaning, the original string is used as the storage
/// directory name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerId(String);

impl ServerId {
    pub fn parse(s: &str) -> Result<Self, InvalidServerId> {
        match hex::decode(s) {
            Ok(bytes) if !bytes.is_empty() => Ok(Self(s.to_string())),
            _ => Err(InvalidServerId),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
