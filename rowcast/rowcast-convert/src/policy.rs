/// How a `TINYINT` field is stored by the external system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TinyIntPolicy {
    /// Signed byte in both directions (default).
    #[default]
    Signed,
    /// Unsigned byte (`0..=255`) on the write side. Reads keep the signed
    /// byte the source returns; writes re-widen the low byte to its unsigned
    /// value as a 16-bit integer, since the external binder has no unsigned
    /// byte setter.
    Unsigned,
}

/// How a `BOOLEAN` field is stored by the external system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanPolicy {
    /// Native boolean getter and setter (default).
    #[default]
    Native,
    /// Single-byte storage: read as a byte (non-zero is `true`) into a
    /// boolean value, written back as `1` or `0`.
    Byte,
}
