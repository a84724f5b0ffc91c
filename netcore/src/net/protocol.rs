//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 链路层 / 网络层协议接口
//!
//! 参考: include/linux/netdevice.h (header_ops), net/core/dev.c (packet_type)

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::drivers::net::space::{NetDeviceCore, NetDeviceRef};
use crate::errno::{Errno, Result};
use crate::net::buffer::SkBuff;

/// 硬件地址最大长度
///
/// 对应 Linux 的 MAX_ADDR_LEN
pub const MAX_ADDR_LEN: usize = 32;

/// 链路层地址
///
/// 定长存储，未使用部分保持为 0
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LlAddr {
    bytes: [u8; MAX_ADDR_LEN],
    len: u8,
}

impl LlAddr {
    /// 空地址
    pub const fn empty() -> Self {
        Self { bytes: [0; MAX_ADDR_LEN], len: 0 }
    }

    /// 从字节切片创建
    ///
    /// 超过 `MAX_ADDR_LEN` 返回 EINVAL
    pub fn from_slice(addr: &[u8]) -> Result<Self> {
        if addr.len() > MAX_ADDR_LEN {
            return Err(Errno::InvalidArgument);
        }

        let mut ll_addr = Self::empty();
        ll_addr.bytes[..addr.len()].copy_from_slice(addr);
        ll_addr.len = addr.len() as u8;
        Ok(ll_addr)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for LlAddr {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for LlAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.as_bytes().iter().enumerate() {
            if i != 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// 链路层协议
///
/// 对应 Linux 的 header_ops；每个网络设备绑定一个链路层协议
pub trait LlProtocol {
    /// 协议名 (例如 "Ethernet")
    fn name(&self) -> &'static str;

    /// 硬件类型 (ARPHRD_*)
    fn ll_proto(&self) -> u16;

    /// 链路层地址长度
    fn ll_addr_len(&self) -> usize;

    /// 链路层头部长度
    fn ll_header_len(&self) -> usize;

    /// 添加链路层头部
    ///
    /// # 参数
    /// - `skb`: 数据包，头部写入 headroom
    /// - `netdev`: 发送设备，提供源地址
    /// - `net_proto`: 上层协议号（链路层类型字段）
    /// - `ll_dest`: 目标链路层地址
    fn push(&self, skb: &mut SkBuff, netdev: &NetDeviceCore, net_proto: u16, ll_dest: &[u8]) -> Result<()>;

    /// 移除链路层头部
    ///
    /// # 返回
    /// 成功返回 (上层协议号, 源链路层地址)
    fn pull(&self, skb: &mut SkBuff, netdev: &NetDeviceCore) -> Result<(u16, LlAddr)>;

    /// 链路层地址转字符串
    fn ntoa(&self, ll_addr: &[u8]) -> String;
}

/// 网络层协议
///
/// 对应 Linux 的 packet_type
pub trait NetProtocol {
    /// 协议名 (例如 "IP", "ARP")
    fn name(&self) -> &'static str;

    /// 协议号，即链路层帧中携带的类型字段 (例如 0x0800)
    fn net_proto(&self) -> u16;

    /// 接收数据包
    ///
    /// 获得 `skb` 的所有权
    fn rx(&self, skb: SkBuff, netdev: &NetDeviceRef, ll_source: &LlAddr) -> Result<()>;
}

/// 网络层协议表
///
/// 启动时一次性构建，之后只读；按注册顺序线性查找，首个匹配生效
pub struct ProtocolTable {
    protocols: Vec<Box<dyn NetProtocol>>,
}

impl ProtocolTable {
    /// 从固定的协议列表构建
    pub fn new(protocols: Vec<Box<dyn NetProtocol>>) -> Self {
        for (i, protocol) in protocols.iter().enumerate() {
            let shadowed = protocols[..i]
                .iter()
                .any(|p| p.net_proto() == protocol.net_proto());
            if shadowed {
                log::warn!(
                    "net: protocol {} ({:#06x}) shadowed by an earlier entry",
                    protocol.name(),
                    protocol.net_proto()
                );
            }
        }

        Self { protocols }
    }

    /// 不含任何协议的表
    pub fn empty() -> Self {
        Self { protocols: Vec::new() }
    }

    /// 按协议号查找
    pub fn find(&self, net_proto: u16) -> Option<&dyn NetProtocol> {
        self.protocols
            .iter()
            .find(|p| p.net_proto() == net_proto)
            .map(|p| &**p)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn NetProtocol> + '_ {
        self.protocols.iter().map(|p| &**p)
    }

    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    struct Dummy(&'static str, u16);

    impl NetProtocol for Dummy {
        fn name(&self) -> &'static str {
            self.0
        }

        fn net_proto(&self) -> u16 {
            self.1
        }

        fn rx(&self, _skb: SkBuff, _netdev: &NetDeviceRef, _ll_source: &LlAddr) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_ll_addr_from_slice() {
        let addr = LlAddr::from_slice(&[0x52, 0x54, 0x00, 0x12, 0x34, 0x56]).unwrap();
        assert_eq!(addr.len(), 6);
        assert_eq!(addr.as_bytes(), &[0x52, 0x54, 0x00, 0x12, 0x34, 0x56]);
        assert_eq!(alloc::format!("{:?}", addr), "52:54:00:12:34:56");
    }

    #[test]
    fn test_ll_addr_too_long() {
        let long = [0u8; MAX_ADDR_LEN + 1];
        assert_eq!(LlAddr::from_slice(&long), Err(Errno::InvalidArgument));
    }

    #[test]
    fn test_table_first_match_wins() {
        let table = ProtocolTable::new(vec![
            Box::new(Dummy("IP", 0x0800)) as Box<dyn NetProtocol>,
            Box::new(Dummy("ARP", 0x0806)),
            Box::new(Dummy("IP-shadow", 0x0800)),
        ]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.find(0x0800).map(|p| p.name()), Some("IP"));
        assert_eq!(table.find(0x0806).map(|p| p.name()), Some("ARP"));
        assert!(table.find(0x86DD).is_none());
    }

    #[test]
    fn test_empty_table() {
        let table = ProtocolTable::empty();
        assert!(table.is_empty());
        assert!(table.find(0x0800).is_none());
    }
}
