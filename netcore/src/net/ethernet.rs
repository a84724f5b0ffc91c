//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 以太网层
//!
//! 参考: net/ethernet/eth.c

use alloc::string::String;

use crate::drivers::net::space::NetDeviceCore;
use crate::errno::{Errno, Result};
use crate::net::buffer::{PacketType, SkBuff};
use crate::net::protocol::{LlAddr, LlProtocol};

/// 以太网头部长度
pub const ETH_HLEN: usize = 14;

/// 以太网 MTU (使用配置值)
pub use crate::config::ETH_MTU;

/// 以太网地址长度 (MAC 地址)
pub const ETH_ALEN: usize = 6;

/// 广播 MAC 地址
pub const ETH_BROADCAST: [u8; ETH_ALEN] = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];

/// 以太网硬件类型
///
/// 对应 Linux 的 ARPHRD_ETHER
pub const ARPHRD_ETHER: u16 = 1;

/// 常用以太网协议类型 (主机字节序)
pub const ETH_P_IP: u16 = 0x0800;
pub const ETH_P_ARP: u16 = 0x0806;

/// 以太网帧头部
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthHdr {
    /// 目标 MAC 地址
    pub h_dest: [u8; ETH_ALEN],
    /// 源 MAC 地址
    pub h_source: [u8; ETH_ALEN],
    /// 协议类型 (主机字节序)
    pub h_proto: u16,
}

impl EthHdr {
    /// 从字节切片解析以太网头部
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < ETH_HLEN {
            return None;
        }

        let mut h_dest = [0u8; ETH_ALEN];
        let mut h_source = [0u8; ETH_ALEN];
        h_dest.copy_from_slice(&data[0..6]);
        h_source.copy_from_slice(&data[6..12]);

        Some(Self {
            h_dest,
            h_source,
            h_proto: u16::from_be_bytes([data[12], data[13]]),
        })
    }

    /// 写入字节切片，长度至少为 ETH_HLEN
    pub fn write_to(&self, out: &mut [u8]) {
        out[0..6].copy_from_slice(&self.h_dest);
        out[6..12].copy_from_slice(&self.h_source);
        out[12..14].copy_from_slice(&self.h_proto.to_be_bytes());
    }

    /// 检查是否为广播帧
    pub fn is_broadcast(&self) -> bool {
        eth_is_broadcast_addr(&self.h_dest)
    }

    /// 检查是否为多播帧
    pub fn is_multicast(&self) -> bool {
        eth_is_multicast_addr(&self.h_dest)
    }
}

/// 以太网链路层协议
pub struct Ethernet;

/// 以太网协议实例，所有以太网设备共享
pub static ETHERNET: Ethernet = Ethernet;

impl LlProtocol for Ethernet {
    fn name(&self) -> &'static str {
        "Ethernet"
    }

    fn ll_proto(&self) -> u16 {
        ARPHRD_ETHER
    }

    fn ll_addr_len(&self) -> usize {
        ETH_ALEN
    }

    fn ll_header_len(&self) -> usize {
        ETH_HLEN
    }

    fn push(&self, skb: &mut SkBuff, netdev: &NetDeviceCore, net_proto: u16, ll_dest: &[u8]) -> Result<()> {
        if ll_dest.len() != ETH_ALEN {
            return Err(Errno::InvalidArgument);
        }

        let mut hdr = EthHdr {
            h_dest: [0; ETH_ALEN],
            h_source: [0; ETH_ALEN],
            h_proto: net_proto,
        };
        hdr.h_dest.copy_from_slice(ll_dest);
        // 未设置地址的设备以全零源地址发送
        let src = netdev.ll_addr().as_bytes();
        if src.len() == ETH_ALEN {
            hdr.h_source.copy_from_slice(src);
        }

        let area = skb.push(ETH_HLEN).ok_or(Errno::NoBufferSpace)?;
        hdr.write_to(area);
        skb.protocol = net_proto;
        Ok(())
    }

    fn pull(&self, skb: &mut SkBuff, netdev: &NetDeviceCore) -> Result<(u16, LlAddr)> {
        let hdr = match EthHdr::from_bytes(skb.data()) {
            Some(hdr) => hdr,
            None => {
                log::debug!(
                    "netdev {}: Ethernet frame too short ({} bytes)",
                    netdev.name(),
                    skb.len()
                );
                return Err(Errno::InvalidArgument);
            }
        };

        skb.pull(ETH_HLEN).ok_or(Errno::InvalidArgument)?;
        skb.protocol = hdr.h_proto;
        skb.pkt_type = if hdr.is_broadcast() {
            PacketType::Broadcast
        } else if hdr.is_multicast() {
            PacketType::Multicast
        } else if netdev.ll_addr().as_bytes() == hdr.h_dest {
            PacketType::Host
        } else {
            PacketType::Otherhost
        };

        Ok((hdr.h_proto, LlAddr::from_slice(&hdr.h_source)?))
    }

    fn ntoa(&self, ll_addr: &[u8]) -> String {
        eth_ntoa(ll_addr)
    }
}

/// 以太网 MAC 地址转字符串
///
/// 格式为 "52:54:00:12:34:56"
pub fn eth_ntoa(addr: &[u8]) -> String {
    let mut out = String::with_capacity(addr.len() * 3);
    for (i, b) in addr.iter().enumerate() {
        if i != 0 {
            out.push(':');
        }
        out.push_str(&alloc::format!("{:02x}", b));
    }
    out
}

/// 检查以太网地址是否为多播地址
pub fn eth_is_multicast_addr(addr: &[u8; ETH_ALEN]) -> bool {
    addr[0] & 0x01 != 0
}

/// 检查以太网地址是否为广播地址
pub fn eth_is_broadcast_addr(addr: &[u8; ETH_ALEN]) -> bool {
    addr == &ETH_BROADCAST
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::net::loopback::Loopback;
    use crate::drivers::net::space::alloc_netdev;

    const MAC: [u8; 6] = [0x52, 0x54, 0x00, 0x12, 0x34, 0x56];

    #[test]
    fn test_eth_hdr_parse() {
        let frame = [
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x52, 0x54, 0x00, 0x12, 0x34, 0x56, 0x08, 0x06,
        ];
        let hdr = EthHdr::from_bytes(&frame).unwrap();
        assert!(hdr.is_broadcast());
        assert_eq!(hdr.h_source, MAC);
        assert_eq!(hdr.h_proto, ETH_P_ARP);
        assert!(EthHdr::from_bytes(&frame[..13]).is_none());
    }

    #[test]
    fn test_push_then_pull_round_trip() {
        let netdev = alloc_netdev(Loopback::new(), &ETHERNET).unwrap();
        let mut netdev = netdev.borrow_mut();
        netdev.set_ll_addr(&MAC).unwrap();

        let mut skb = SkBuff::alloc(64).unwrap();
        skb.put_data(b"payload").unwrap();
        ETHERNET.push(&mut skb, &netdev, ETH_P_IP, &MAC).unwrap();
        assert_eq!(skb.len(), ETH_HLEN + 7);
        assert_eq!(&skb.data()[12..14], &[0x08, 0x00]);

        let (proto, source) = ETHERNET.pull(&mut skb, &netdev).unwrap();
        assert_eq!(proto, ETH_P_IP);
        assert_eq!(source.as_bytes(), &MAC);
        assert_eq!(skb.data(), b"payload");
        assert_eq!(skb.pkt_type, PacketType::Host);
    }

    #[test]
    fn test_push_rejects_bad_destination() {
        let netdev = alloc_netdev(Loopback::new(), &ETHERNET).unwrap();
        let netdev = netdev.borrow();
        let mut skb = SkBuff::alloc(64).unwrap();

        assert_eq!(
            ETHERNET.push(&mut skb, &netdev, ETH_P_IP, &[1, 2, 3]),
            Err(Errno::InvalidArgument)
        );
        assert!(skb.is_empty());
    }

    #[test]
    fn test_push_without_headroom() {
        let netdev = alloc_netdev(Loopback::new(), &ETHERNET).unwrap();
        let netdev = netdev.borrow();
        let mut skb = SkBuff::alloc(64).unwrap();
        let headroom = skb.headroom();
        skb.push(headroom).unwrap();

        assert_eq!(
            ETHERNET.push(&mut skb, &netdev, ETH_P_IP, &ETH_BROADCAST),
            Err(Errno::NoBufferSpace)
        );
    }

    #[test]
    fn test_pull_short_frame() {
        let netdev = alloc_netdev(Loopback::new(), &ETHERNET).unwrap();
        let netdev = netdev.borrow();
        let mut skb = SkBuff::from_slice(&[0u8; ETH_HLEN - 1]).unwrap();

        assert_eq!(ETHERNET.pull(&mut skb, &netdev).err(), Some(Errno::InvalidArgument));
        assert_eq!(skb.len(), ETH_HLEN - 1);
    }

    #[test]
    fn test_pull_classifies_packet_type() {
        let netdev = alloc_netdev(Loopback::new(), &ETHERNET).unwrap();
        let mut netdev = netdev.borrow_mut();
        netdev.set_ll_addr(&MAC).unwrap();

        let cases: [([u8; 6], PacketType); 3] = [
            (ETH_BROADCAST, PacketType::Broadcast),
            ([0x01, 0x00, 0x5e, 0x00, 0x00, 0x01], PacketType::Multicast),
            ([0x52, 0x54, 0x00, 0x00, 0x00, 0x01], PacketType::Otherhost),
        ];
        for (dest, expected) in cases {
            let mut skb = SkBuff::alloc(64).unwrap();
            ETHERNET.push(&mut skb, &netdev, ETH_P_ARP, &dest).unwrap();
            ETHERNET.pull(&mut skb, &netdev).unwrap();
            assert_eq!(skb.pkt_type, expected);
        }
    }

    #[test]
    fn test_address_helpers() {
        assert!(!eth_is_multicast_addr(&MAC));
        assert!(eth_is_multicast_addr(&ETH_BROADCAST));
        assert!(eth_is_broadcast_addr(&ETH_BROADCAST));
        assert_eq!(eth_ntoa(&MAC), "52:54:00:12:34:56");
    }
}
