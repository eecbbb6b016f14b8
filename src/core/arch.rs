//! Supported target architectures
//!
//! Maps the architecture suffix of a build definition to the platform
//! string understood by `docker buildx`.

use std::fmt;
use std::str::FromStr;

/// A supported target architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// 32-bit ARMv7
    Arm32v7,
    /// 64-bit ARM
    Arm64,
    /// x86-64
    Amd64,
}

impl Architecture {
    /// Every supported architecture
    pub const ALL: [Architecture; 3] = [
        Architecture::Arm32v7,
        Architecture::Arm64,
        Architecture::Amd64,
    ];

    /// Suffix used in definition file names and image tags
    pub fn suffix(self) -> &'static str {
        match self {
            Architecture::Arm32v7 => "arm32v7",
            Architecture::Arm64 => "arm64",
            Architecture::Amd64 => "amd64",
        }
    }

    /// Platform tag passed to `buildx build --platform`
    pub fn platform(self) -> &'static str {
        match self {
            Architecture::Arm32v7 => "linux/arm/v7",
            Architecture::Arm64 => "linux/arm64",
            Architecture::Amd64 => "linux/amd64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Error for a suffix outside the supported set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownArchitecture(pub String);

impl FromStr for Architecture {
    type Err = UnknownArchitecture;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Architecture::ALL
            .into_iter()
            .find(|arch| arch.suffix() == s)
            .ok_or_else(|| UnknownArchitecture(s.to_string()))
    }
}
