//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 标准错误代码定义
//!
//! 数值与 include/uapi/asm-generic/errno.h 保持一致
//!
//! 使用方法：
//! ```rust
//! use netcore::errno::{Errno, Result};
//!
//! fn open() -> Result<()> {
//!     Err(Errno::NetworkUnreachable)
//! }
//! assert_eq!(open().unwrap_err().as_neg_i32(), -101);
//! ```

use core::fmt;

/// 网络核心统一的返回类型
pub type Result<T> = core::result::Result<T, Errno>;

/// 标准错误代码
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Errno {
    /// Operation not permitted (EPERM, 1)
    OperationNotPermitted = 1,

    /// I/O error (EIO, 5)
    IOError = 5,

    /// Try again (EAGAIN, 11)
    TryAgain = 11,

    /// Out of memory (ENOMEM, 12)
    OutOfMemory = 12,

    /// Device or resource busy (EBUSY, 16)
    DeviceOrResourceBusy = 16,

    /// File exists (EEXIST, 17)
    FileExists = 17,

    /// No such device (ENODEV, 19)
    NoSuchDevice = 19,

    /// Invalid argument (EINVAL, 22)
    InvalidArgument = 22,

    /// No space left on device (ENOSPC, 28)
    NoSpaceLeftOnDevice = 28,

    /// Function not implemented (ENOSYS, 38)
    FunctionNotImplemented = 38,

    /// Message too long (EMSGSIZE, 90)
    MessageTooLong = 90,

    /// Protocol not supported (EPROTONOSUPPORT, 93)
    ProtocolNotSupported = 93,

    /// Operation not supported (EOPNOTSUPP, 95)
    NotSupported = 95,

    /// Cannot assign requested address (EADDRNOTAVAIL, 99)
    AddressNotAvailable = 99,

    /// Network is down (ENETDOWN, 100)
    NetworkDown = 100,

    /// Network is unreachable (ENETUNREACH, 101)
    NetworkUnreachable = 101,

    /// No buffer space available (ENOBUFS, 105)
    NoBufferSpace = 105,

    /// Connection timed out (ETIMEDOUT, 110)
    TimedOut = 110,

    /// Operation Canceled (ECANCELED, 125)
    Cancelled = 125,
}

impl Errno {
    /// 获取错误代码的正数值（用于比较）
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// 获取错误代码的负数值（用于驱动风格的返回值）
    #[inline]
    pub const fn as_neg_i32(self) -> i32 {
        -(self as i32)
    }

    /// 从正数或负数错误码转换
    ///
    /// 未知错误码返回 None
    pub const fn from_i32(code: i32) -> Option<Self> {
        let code = code.wrapping_abs();
        match code {
            constants::EPERM => Some(Errno::OperationNotPermitted),
            constants::EIO => Some(Errno::IOError),
            constants::EAGAIN => Some(Errno::TryAgain),
            constants::ENOMEM => Some(Errno::OutOfMemory),
            constants::EBUSY => Some(Errno::DeviceOrResourceBusy),
            constants::EEXIST => Some(Errno::FileExists),
            constants::ENODEV => Some(Errno::NoSuchDevice),
            constants::EINVAL => Some(Errno::InvalidArgument),
            constants::ENOSPC => Some(Errno::NoSpaceLeftOnDevice),
            constants::ENOSYS => Some(Errno::FunctionNotImplemented),
            constants::EMSGSIZE => Some(Errno::MessageTooLong),
            constants::EPROTONOSUPPORT => Some(Errno::ProtocolNotSupported),
            constants::EOPNOTSUPP => Some(Errno::NotSupported),
            constants::EADDRNOTAVAIL => Some(Errno::AddressNotAvailable),
            constants::ENETDOWN => Some(Errno::NetworkDown),
            constants::ENETUNREACH => Some(Errno::NetworkUnreachable),
            constants::ENOBUFS => Some(Errno::NoBufferSpace),
            constants::ETIMEDOUT => Some(Errno::TimedOut),
            constants::ECANCELED => Some(Errno::Cancelled),
            _ => None,
        }
    }

    /// 错误描述（对应 strerror）
    pub const fn description(self) -> &'static str {
        match self {
            Errno::OperationNotPermitted => "Operation not permitted",
            Errno::IOError => "Input/output error",
            Errno::TryAgain => "Resource temporarily unavailable",
            Errno::OutOfMemory => "Cannot allocate memory",
            Errno::DeviceOrResourceBusy => "Device or resource busy",
            Errno::FileExists => "File exists",
            Errno::NoSuchDevice => "No such device",
            Errno::InvalidArgument => "Invalid argument",
            Errno::NoSpaceLeftOnDevice => "No space left on device",
            Errno::FunctionNotImplemented => "Function not implemented",
            Errno::MessageTooLong => "Message too long",
            Errno::ProtocolNotSupported => "Protocol not supported",
            Errno::NotSupported => "Operation not supported",
            Errno::AddressNotAvailable => "Cannot assign requested address",
            Errno::NetworkDown => "Network is down",
            Errno::NetworkUnreachable => "Network is unreachable",
            Errno::NoBufferSpace => "No buffer space available",
            Errno::TimedOut => "Connection timed out",
            Errno::Cancelled => "Operation canceled",
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (errno {})", self.description(), self.as_i32())
    }
}

/// 常用的错误代码常量
pub mod constants {
    pub const EPERM: i32 = 1;
    pub const EIO: i32 = 5;
    pub const EAGAIN: i32 = 11;
    pub const ENOMEM: i32 = 12;
    pub const EBUSY: i32 = 16;
    pub const EEXIST: i32 = 17;
    pub const ENODEV: i32 = 19;
    pub const EINVAL: i32 = 22;
    pub const ENOSPC: i32 = 28;
    pub const ENOSYS: i32 = 38;
    pub const EMSGSIZE: i32 = 90;
    pub const EPROTONOSUPPORT: i32 = 93;
    pub const EOPNOTSUPP: i32 = 95;
    pub const EADDRNOTAVAIL: i32 = 99;
    pub const ENETDOWN: i32 = 100;
    pub const ENETUNREACH: i32 = 101;
    pub const ENOBUFS: i32 = 105;
    pub const ETIMEDOUT: i32 = 110;
    pub const ECANCELED: i32 = 125;
}
