//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 网络设备接收路径
//!
//! 参考: net/core/dev.c (netif_rx)

use crate::drivers::net::space::NetDeviceCore;
use crate::errno::Errno;
use crate::net::buffer::{kfree_skb, SkBuff};

impl NetDeviceCore {
    /// 接收数据包
    ///
    /// 数据包加入接收队列尾部，所有权转移给设备。不会失败。
    pub fn rx(&mut self, skb: SkBuff) {
        log::trace!("netdev {}: received {} bytes", self.name, skb.len());
        self.rx_queue.push_back(skb);
        self.stats.rx_ok += 1;
    }

    /// 丢弃接收到的数据包并记录接收错误
    ///
    /// # 参数
    /// - `skb`: 数据包；适配器无法分配缓冲区时可以为 None
    /// - `err`: 错误原因
    pub fn rx_err(&mut self, skb: Option<SkBuff>, err: Errno) {
        log::debug!("netdev {}: failed to receive: {}", self.name, err);
        if let Some(skb) = skb {
            kfree_skb(skb);
        }
        self.stats.rx_err += 1;
    }

    /// 从接收队列头部取出数据包
    ///
    /// 所有权转移给调用者，队列为空时返回 None
    pub fn rx_dequeue(&mut self) -> Option<SkBuff> {
        self.rx_queue.pop_front()
    }

    /// 清空接收队列
    ///
    /// 所有未处理的数据包以 ECANCELED 丢弃
    pub fn rx_flush(&mut self) {
        while let Some(skb) = self.rx_dequeue() {
            self.rx_err(Some(skb), Errno::Cancelled);
        }
    }
}
