//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 总线设备描述
//!
//! 参考: include/linux/device.h
//!
//! 网络设备通过所属的总线设备来标识物理位置

use alloc::string::String;
use core::fmt;

use crate::drivers::pci;

/// 总线类型
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusType {
    Pci = 1,
    IsaPnp = 2,
    Eisa = 3,
    Mca = 4,
    Isa = 5,
}

/// 设备描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescription {
    /// 总线类型
    pub bus_type: BusType,
    /// 总线上的位置，编码方式由总线类型决定
    pub location: u32,
    /// 厂商 ID
    pub vendor: u16,
    /// 设备 ID
    pub device: u16,
}

impl DeviceDescription {
    /// PCI 设备描述
    pub fn pci(bus: u8, slot: u8, func: u8, vendor: u16, device: u16) -> Self {
        Self {
            bus_type: BusType::Pci,
            location: pci::pci_location(bus, slot, func),
            vendor,
            device,
        }
    }
}

/// 总线设备
#[derive(Debug)]
pub struct BusDevice {
    /// 设备名 (例如 "PCI00:03.0")
    pub name: String,
    pub desc: DeviceDescription,
}

impl BusDevice {
    /// 创建总线设备，设备名由总线位置生成
    pub fn new(desc: DeviceDescription) -> Self {
        let name = match desc.bus_type {
            BusType::Pci => alloc::format!("{}", pci::PciLocation(desc.location)),
            other => alloc::format!("{:?}{:#x}", other, desc.location),
        };
        Self { name, desc }
    }
}

impl fmt::Display for BusDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
