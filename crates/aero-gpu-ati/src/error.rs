use thiserror::Error;

/// Errors produced by the ATI extended register file.
///
/// None of these are fatal. Guest-facing entry points log them and degrade to
/// "reads as zero, writes ignored".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AtiRageError {
    /// Access to an index outside the modeled register set. `value` is set for writes.
    #[error(
        "unhandled ATI Rage extended {} port={port:#x} index={index:#04x}{}",
        access_kind(.value),
        written_value(.value)
    )]
    UnhandledRegister {
        port: u16,
        index: u8,
        value: Option<u32>,
    },
}

fn access_kind(value: &Option<u32>) -> &'static str {
    match value {
        Some(_) => "write",
        None => "read",
    }
}

fn written_value(value: &Option<u32>) -> String {
    value.map(|v| format!(" val={v:#x}")).unwrap_or_default()
}
