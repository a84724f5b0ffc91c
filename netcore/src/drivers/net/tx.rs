//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 网络设备发送路径
//!
//! 参考: net/core/dev.c (dev_queue_xmit)
//!
//! 数据包先无条件进入发送队列，之后的任何失败都通过“完成”离开队列，
//! 因此发送缓冲区只有一种释放方式：`tx_complete`。

use crate::drivers::net::space::{NetDevice, NetDeviceCore, TxCookie, TxEntry};
use crate::errno::{Errno, Result};
use crate::net::buffer::{kfree_skb, SkBuff};

impl NetDeviceCore {
    /// 加入发送队列尾部
    ///
    /// 返回分配的标识和队列中数据包的引用
    fn tx_enqueue(&mut self, skb: SkBuff) -> (TxCookie, &SkBuff) {
        let cookie = TxCookie::new(self.tx_seq);
        self.tx_seq += 1;

        log::trace!("netdev {}: transmitting {} ({} bytes)", self.name, cookie, skb.len());
        self.tx_queue.push_back(TxEntry { cookie, skb });

        let last = self.tx_queue.len() - 1;
        (cookie, &self.tx_queue[last].skb)
    }

    /// 完成发送
    ///
    /// # 参数
    /// - `cookie`: `transmit` 时分配的标识，必须仍在发送队列中
    /// - `status`: 发送结果
    ///
    /// # Panics
    /// 条目不在发送队列中说明所有权跟踪已经出错，直接 panic
    pub fn tx_complete(&mut self, cookie: TxCookie, status: Result<()>) {
        let pos = match self.tx_queue.iter().position(|entry| entry.cookie == cookie) {
            Some(pos) => pos,
            None => panic!(
                "netdev {}: completion of {} which is not in the TX queue",
                self.name, cookie
            ),
        };

        match status {
            Ok(()) => {
                self.stats.tx_ok += 1;
                log::trace!("netdev {}: transmission {} complete", self.name, cookie);
            }
            Err(err) => {
                self.stats.tx_err += 1;
                log::debug!("netdev {}: transmission {} failed: {}", self.name, cookie, err);
            }
        }

        if let Some(entry) = self.tx_queue.remove(pos) {
            kfree_skb(entry.skb);
        }
    }

    /// 完成最早的发送
    ///
    /// 用于无法区分具体是哪个数据包完成的适配器；队列为空时什么也不做
    pub fn tx_complete_next(&mut self, status: Result<()>) {
        if let Some(cookie) = self.tx_queue.front().map(|entry| entry.cookie) {
            self.tx_complete(cookie, status);
        }
    }

    /// 清空发送队列
    ///
    /// 所有未完成的发送以 ECANCELED 完成
    pub fn tx_flush(&mut self) {
        while !self.tx_queue.is_empty() {
            self.tx_complete_next(Err(Errno::Cancelled));
        }
    }
}

impl NetDevice {
    /// 发送数据包
    ///
    /// # 参数
    /// - `skb`: 要发送的数据包，所有权转移给设备
    ///
    /// # 返回
    /// - 设备未打开: ENETUNREACH，数据包已作为失败完成
    /// - 适配器拒绝: 适配器的错误，数据包已作为失败完成
    /// - 成功: 数据包留在队列中等待适配器完成
    pub fn transmit(&mut self, skb: SkBuff) -> Result<()> {
        let open = self.is_open();
        let (priv_, core) = self.split_mut();
        let (cookie, queued) = core.tx_enqueue(skb);

        let rc = if open {
            priv_.transmit(cookie, queued)
        } else {
            Err(Errno::NetworkUnreachable)
        };

        if let Err(err) = rc {
            core.tx_complete(cookie, Err(err));
            return Err(err);
        }
        Ok(())
    }
}
