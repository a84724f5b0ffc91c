//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 回环网络设备
//!
//! 参考: drivers/net/loopback.c
//!
//! 发送的帧在下一次 poll 时完成发送，并作为接收帧重新放入本设备的接收队列。

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::config::ETH_MTU;
use crate::drivers::net::space::{alloc_netdev, NetDeviceCore, NetDeviceOps, NetDeviceRef, TxCookie};
use crate::errno::{Errno, Result};
use crate::net::buffer::{alloc_skb, SkBuff};
use crate::net::ethernet::{ETHERNET, ETH_HLEN};

/// 回环设备的 MAC 地址 (本地管理地址)
pub const LOOPBACK_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

/// 回环设备私有数据
#[derive(Debug, Default)]
pub struct Loopback {
    /// 等待回送的帧
    pending: VecDeque<(TxCookie, Vec<u8>)>,
}

impl Loopback {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NetDeviceOps for Loopback {
    fn open(&mut self, netdev: &mut NetDeviceCore) -> Result<()> {
        log::debug!("netdev {}: loopback up", netdev.name());
        Ok(())
    }

    fn close(&mut self, netdev: &mut NetDeviceCore) {
        // 未回送的帧随发送队列一起被取消
        self.pending.clear();
        log::debug!("netdev {}: loopback down", netdev.name());
    }

    fn transmit(&mut self, cookie: TxCookie, skb: &SkBuff) -> Result<()> {
        if skb.len() > ETH_MTU + ETH_HLEN {
            return Err(Errno::MessageTooLong);
        }

        let mut frame = Vec::new();
        frame.try_reserve_exact(skb.len()).map_err(|_| Errno::OutOfMemory)?;
        frame.resize(skb.len(), 0);
        skb.copy_bits(0, &mut frame);
        self.pending.push_back((cookie, frame));
        Ok(())
    }

    fn poll(&mut self, netdev: &mut NetDeviceCore) {
        while let Some((cookie, frame)) = self.pending.pop_front() {
            match alloc_skb(frame.len()) {
                Some(mut skb) => match skb.put_data(&frame) {
                    Ok(()) => netdev.rx(skb),
                    Err(()) => netdev.rx_err(Some(skb), Errno::NoBufferSpace),
                },
                None => netdev.rx_err(None, Errno::OutOfMemory),
            }
            netdev.tx_complete(cookie, Ok(()));
        }
    }

    fn irq(&mut self, _netdev: &mut NetDeviceCore, _enable: bool) {}
}

/// 创建回环设备
///
/// 以太网链路层，使用固定的 `LOOPBACK_MAC`
pub fn loopback_alloc() -> Option<NetDeviceRef> {
    let netdev = alloc_netdev(Loopback::new(), &ETHERNET)?;
    netdev.borrow_mut().set_ll_addr(&LOOPBACK_MAC).ok()?;
    Some(netdev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_alloc() {
        let netdev = loopback_alloc().unwrap();
        let netdev = netdev.borrow();
        assert_eq!(netdev.hwaddr(), "02:00:00:00:00:01");
        assert!(!netdev.is_open());
    }

    #[test]
    fn test_loopback_echoes_on_poll() {
        let netdev = loopback_alloc().unwrap();
        let mut netdev = netdev.borrow_mut();
        netdev.open().unwrap();

        netdev.transmit(SkBuff::from_slice(b"ping").unwrap()).unwrap();
        assert_eq!(netdev.tx_queue_len(), 1);
        assert_eq!(netdev.rx_queue_len(), 0);

        netdev.poll();
        assert_eq!(netdev.tx_queue_len(), 0);
        assert_eq!(netdev.stats().tx_ok, 1);
        assert_eq!(netdev.rx_dequeue().unwrap().data(), b"ping");
    }

    #[test]
    fn test_loopback_rejects_oversized_frame() {
        let netdev = loopback_alloc().unwrap();
        let mut netdev = netdev.borrow_mut();
        netdev.open().unwrap();

        let big = alloc::vec![0u8; ETH_MTU + ETH_HLEN + 1];
        let skb = SkBuff::from_slice(&big).unwrap();
        assert_eq!(netdev.transmit(skb), Err(Errno::MessageTooLong));
        assert_eq!(netdev.stats().tx_err, 1);
    }

    #[test]
    fn test_loopback_close_cancels_pending() {
        let netdev = loopback_alloc().unwrap();
        let mut netdev = netdev.borrow_mut();
        netdev.open().unwrap();

        netdev.transmit(SkBuff::from_slice(b"a").unwrap()).unwrap();
        netdev.transmit(SkBuff::from_slice(b"b").unwrap()).unwrap();
        netdev.close();

        assert_eq!(netdev.stats().tx_err, 2);
        assert_eq!(netdev.tx_queue_len(), 0);

        // 重新打开后不会再回送旧帧
        netdev.open().unwrap();
        netdev.poll();
        assert_eq!(netdev.rx_queue_len(), 0);
    }
}
