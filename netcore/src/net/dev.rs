//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 网络层收发入口
//!
//! 参考: net/core/dev.c (dev_queue_xmit, __netif_receive_skb)

use crate::drivers::net::space::NetDeviceRef;
use crate::errno::Result;
use crate::net::buffer::{kfree_skb, SkBuff};
use crate::net::protocol::{LlAddr, NetProtocol, ProtocolTable};

/// 通过网络设备发送网络层数据包
///
/// # 参数
/// - `skb`: 网络层数据包，所有权转移
/// - `netdev`: 发送设备
/// - `net_protocol`: 上层协议，提供链路层类型字段
/// - `ll_dest`: 目标链路层地址
///
/// # 说明
/// - 发送前先轮询设备，尽量腾出发送资源
/// - 添加链路层头部失败时丢弃数据包并返回错误，设备统计不变
pub fn net_tx(mut skb: SkBuff, netdev: &NetDeviceRef, net_protocol: &dyn NetProtocol, ll_dest: &[u8]) -> Result<()> {
    let mut dev = netdev.borrow_mut();

    dev.poll();

    let ll_protocol = dev.ll_protocol();
    if let Err(err) = ll_protocol.push(&mut skb, &dev, net_protocol.net_proto(), ll_dest) {
        log::debug!(
            "netdev {}: could not add {} header for {}: {}",
            dev.name(),
            ll_protocol.name(),
            net_protocol.name(),
            err
        );
        kfree_skb(skb);
        return Err(err);
    }

    dev.transmit(skb)
}

/// 把接收到的数据包交给网络层协议
///
/// # 参数
/// - `protocols`: 协议表
/// - `skb`: 已去掉链路层头部的数据包，所有权转移
/// - `netdev`: 接收设备
/// - `net_proto`: 链路层类型字段
/// - `ll_source`: 源链路层地址
///
/// # 返回
/// 未知协议的数据包被静默丢弃并返回成功；否则返回协议处理结果
pub fn net_rx(
    protocols: &ProtocolTable,
    skb: SkBuff,
    netdev: &NetDeviceRef,
    net_proto: u16,
    ll_source: &LlAddr,
) -> Result<()> {
    match protocols.find(net_proto) {
        Some(protocol) => protocol.rx(skb, netdev, ll_source),
        None => {
            log::trace!(
                "netdev {}: unknown network protocol {:#06x}",
                netdev.borrow().name(),
                net_proto
            );
            kfree_skb(skb);
            Ok(())
        }
    }
}
