//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 网络栈
//!
//! 持有设备注册表、根配置和网络层协议表，并提供周期性的收包处理
//!
//! 参考: net/core/dev.c (net_rx_action)

use alloc::vec::Vec;

use crate::config::{NETCORE_NAME, NETCORE_VERSION};
use crate::drivers::device::BusType;
use crate::drivers::net::registry::NetDeviceList;
use crate::drivers::net::space::{netdev_get, NetDeviceRef};
use crate::errno::Result;
use crate::net::buffer::{kfree_skb, SkBuff};
use crate::net::dev;
use crate::net::protocol::{LlAddr, ProtocolTable};
use crate::settings::SettingsRoot;

/// 网络栈
pub struct NetStack {
    devices: NetDeviceList,
    settings: SettingsRoot,
    protocols: ProtocolTable,
}

impl NetStack {
    /// 创建网络栈
    ///
    /// 协议表在创建后不再改变
    pub fn new(protocols: ProtocolTable) -> Self {
        log::debug!(
            "{} {}: {} network protocol(s)",
            NETCORE_NAME,
            NETCORE_VERSION,
            protocols.len()
        );
        Self {
            devices: NetDeviceList::new(),
            settings: SettingsRoot::new(),
            protocols,
        }
    }

    /// 注册网络设备
    pub fn register_netdev(&mut self, netdev: &NetDeviceRef) -> Result<()> {
        self.devices.register(netdev, &mut self.settings)
    }

    /// 注销网络设备
    pub fn unregister_netdev(&mut self, netdev: &NetDeviceRef) {
        self.devices.unregister(netdev, &mut self.settings);
    }

    /// 按设备名查找
    pub fn find_netdev(&self, name: &str) -> Option<NetDeviceRef> {
        self.devices.find(name)
    }

    /// 按总线位置查找
    pub fn find_netdev_by_location(&self, bus_type: BusType, location: u32) -> Option<NetDeviceRef> {
        self.devices.find_by_location(bus_type, location)
    }

    pub fn devices(&self) -> &NetDeviceList {
        &self.devices
    }

    pub fn settings(&self) -> &SettingsRoot {
        &self.settings
    }

    pub fn protocols(&self) -> &ProtocolTable {
        &self.protocols
    }

    /// 把数据包交给网络层协议
    pub fn net_rx(&self, skb: SkBuff, netdev: &NetDeviceRef, net_proto: u16, ll_source: &LlAddr) -> Result<()> {
        dev::net_rx(&self.protocols, skb, netdev, net_proto, ll_source)
    }

    /// 处理一轮收包
    ///
    /// 依次轮询每个已注册设备，每个设备最多取出一个数据包，
    /// 去掉链路层头部后交给网络层协议。
    ///
    /// # 返回
    /// 本轮交给网络层的数据包数
    pub fn step(&mut self) -> usize {
        // 协议处理可能注销设备，先取快照
        let devices: Vec<NetDeviceRef> = self.devices.iter().map(netdev_get).collect();
        let mut delivered = 0;

        for netdev in &devices {
            let skb = {
                let mut dev = netdev.borrow_mut();
                dev.poll();
                dev.rx_dequeue()
            };
            let Some(mut skb) = skb else {
                continue;
            };

            let pulled = {
                let dev = netdev.borrow();
                let rc = dev.ll_protocol().pull(&mut skb, &dev);
                if let Err(err) = &rc {
                    log::debug!("netdev {}: could not parse link-layer header: {}", dev.name(), err);
                }
                rc
            };
            let (net_proto, ll_source) = match pulled {
                Ok(header) => header,
                Err(_) => {
                    kfree_skb(skb);
                    continue;
                }
            };

            delivered += 1;
            if let Err(err) = self.net_rx(skb, netdev, net_proto, &ll_source) {
                log::trace!(
                    "netdev {}: protocol {:#06x} rejected packet: {}",
                    netdev.borrow().name(),
                    net_proto,
                    err
                );
            }
        }

        delivered
    }
}
