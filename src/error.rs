use thiserror::Error;

/// Errors that can occur when talking to the supported chips.
///
/// This enum covers transport acquisition, chip addressing, register I/O
/// and argument validation across all drivers in the crate.
#[derive(Error, Debug)]
pub enum Error {
    /// `open` was called on a handle that already owns a transport.
    #[error("device already open")]
    AlreadyOpen,
    /// An operation was attempted on a closed (or never-opened) handle.
    #[error("device not open")]
    NotOpen,
    /// The bus device node could not be opened.
    #[error("unable to open transport '{path}': {message}")]
    TransportUnavailable {
        /// Filesystem path of the bus device node.
        path: String,
        /// Details from the underlying bus layer.
        message: String,
    },
    /// Chip addressing could not be established on the bus, or the chip at
    /// the address did not identify as the expected part.
    #[error("unable to address chip at 0x{address:02X}: {message}")]
    AddressingFailed {
        /// The bus address that was being selected.
        address: u16,
        /// Details from the underlying bus layer or identity check.
        message: String,
    },
    /// A transfer on an established handle failed or came up short. The
    /// handle is forced closed before this is returned.
    #[error("bus transfer failed: {message}")]
    IoFailure {
        /// Details from the underlying bus layer.
        message: String,
    },
    /// Pin index is outside the chip's supported range.
    #[error("pin {pin} out of range (0-{max})")]
    InvalidPin {
        /// The invalid pin number that was specified.
        pin: u8,
        /// Highest pin number the chip supports.
        max: u8,
    },
    /// A mode or value argument is outside the valid range.
    #[error("argument out of range: {0}")]
    InvalidArgument(String),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
