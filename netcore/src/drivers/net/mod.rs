//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 网络设备驱动
//!
//! 参考: drivers/net/

pub mod space;
pub mod tx;
pub mod rx;
pub mod registry;
pub mod loopback;

pub use space::{
    NetDevice, NetDeviceCore, NetDeviceOps, NetDeviceRef, NetDevState, DeviceStats, TxCookie,
    alloc_netdev, netdev_get, netdev_put, netdev_refcount,
};

pub use registry::NetDeviceList;

pub use loopback::{Loopback, loopback_alloc};
