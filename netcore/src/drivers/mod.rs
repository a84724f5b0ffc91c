//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 设备驱动模块

pub mod device;
pub mod net;
pub mod pci;
