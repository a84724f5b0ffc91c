//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! PCI 设备位置
//!
//! 参考: Linux kernel drivers/pci/ (PCI_DEVFN, PCI_SLOT, PCI_FUNC)
//!
//! 位置编码: `bus << 8 | slot << 3 | func`

use core::fmt;

/// 已知厂商 ID
pub mod vendor {
    pub const RED_HAT: u16 = 0x1AF4; // QEMU VirtIO 厂商
    pub const INTEL: u16 = 0x8086;
}

/// 编码 PCI 位置
///
/// slot 只取低 5 位，func 只取低 3 位
pub const fn pci_location(bus: u8, slot: u8, func: u8) -> u32 {
    ((bus as u32) << 8) | (((slot & 0x1f) as u32) << 3) | ((func & 0x07) as u32)
}

/// 总线号
pub const fn pci_bus(location: u32) -> u8 {
    ((location >> 8) & 0xff) as u8
}

/// 插槽号
pub const fn pci_slot(location: u32) -> u8 {
    ((location >> 3) & 0x1f) as u8
}

/// 功能号
pub const fn pci_func(location: u32) -> u8 {
    (location & 0x07) as u8
}

/// PCI 位置的显示形式 "PCIbb:dd.f"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PciLocation(pub u32);

impl fmt::Display for PciLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PCI{:02x}:{:02x}.{:x}",
            pci_bus(self.0),
            pci_slot(self.0),
            pci_func(self.0)
        )
    }
}
