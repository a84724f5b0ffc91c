//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 网络设备抽象与收发调度核心
//!
//! 适配器驱动通过 `NetDeviceOps` 接入，网络层协议通过 `NetProtocol` 接入，
//! 两者之间由 `NetStack` 负责设备注册和收包分发。
//!
//! ```
//! use netcore::drivers::net::loopback_alloc;
//! use netcore::net::{NetStack, ProtocolTable};
//!
//! let mut stack = NetStack::new(ProtocolTable::empty());
//! let lo = loopback_alloc().unwrap();
//! stack.register_netdev(&lo).unwrap();
//! lo.borrow_mut().open().unwrap();
//!
//! assert_eq!(lo.borrow().name(), "net0");
//! assert_eq!(stack.step(), 0);
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod errno;
pub mod settings;
pub mod net;
pub mod drivers;

#[cfg(test)]
mod tests;
