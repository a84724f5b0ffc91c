//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 跨模块场景测试
//!
//! 使用可编排的模拟网卡 `MockNic` 驱动设备生命周期、收发路径和收包调度。

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::drivers::net::space::{alloc_netdev, NetDeviceCore, NetDeviceOps, NetDeviceRef, TxCookie};
use crate::errno::{Errno, Result};
use crate::net::buffer::SkBuff;
use crate::net::ethernet::ETHERNET;
use crate::net::protocol::{LlAddr, NetProtocol};

mod lifecycle;

/// 模拟网卡的脚本和调用记录
#[derive(Default)]
pub struct MockState {
    /// open 返回的错误
    pub fail_open: Option<Errno>,
    /// transmit 返回的错误
    pub reject_tx: Option<Errno>,
    /// poll 时是否完成所有未完成的发送
    pub complete_on_poll: bool,
    /// poll 时注入接收队列的帧
    pub inject: VecDeque<Vec<u8>>,
    /// 已接受但未完成的发送
    pub pending: Vec<TxCookie>,
    pub transmits: usize,
    pub opens: usize,
    pub closes: usize,
    pub polls: usize,
    pub irqs: Vec<bool>,
}

pub struct MockNic {
    state: Rc<RefCell<MockState>>,
}

impl NetDeviceOps for MockNic {
    fn open(&mut self, _netdev: &mut NetDeviceCore) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.opens += 1;
        match state.fail_open {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn close(&mut self, _netdev: &mut NetDeviceCore) {
        let mut state = self.state.borrow_mut();
        state.closes += 1;
        state.pending.clear();
    }

    fn transmit(&mut self, cookie: TxCookie, _skb: &SkBuff) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.transmits += 1;
        if let Some(err) = state.reject_tx {
            return Err(err);
        }
        state.pending.push(cookie);
        Ok(())
    }

    fn poll(&mut self, netdev: &mut NetDeviceCore) {
        let mut state = self.state.borrow_mut();
        state.polls += 1;

        if state.complete_on_poll {
            for cookie in core::mem::take(&mut state.pending) {
                netdev.tx_complete(cookie, Ok(()));
            }
        }

        while let Some(frame) = state.inject.pop_front() {
            match SkBuff::from_slice(&frame) {
                Some(skb) => netdev.rx(skb),
                None => netdev.rx_err(None, Errno::OutOfMemory),
            }
        }
    }

    fn irq(&mut self, _netdev: &mut NetDeviceCore, enable: bool) {
        self.state.borrow_mut().irqs.push(enable);
    }
}

pub const MOCK_MAC: [u8; 6] = [0x52, 0x54, 0x00, 0x12, 0x34, 0x56];

/// 创建以太网模拟设备，返回设备和脚本
pub fn mock_netdev() -> (NetDeviceRef, Rc<RefCell<MockState>>) {
    let state = Rc::new(RefCell::new(MockState::default()));
    let netdev = alloc_netdev(MockNic { state: state.clone() }, &ETHERNET).unwrap();
    netdev.borrow_mut().set_ll_addr(&MOCK_MAC).unwrap();
    (netdev, state)
}

/// 释放时计数的数据包
pub fn tracked(data: &[u8], freed: &Rc<Cell<usize>>) -> SkBuff {
    let mut skb = SkBuff::from_slice(data).unwrap();
    let freed = freed.clone();
    skb.set_destructor(move |_| freed.set(freed.get() + 1));
    skb
}

/// 以太网帧: 目标为 MOCK_MAC，源地址为 `src`
pub fn eth_frame(src: [u8; 6], proto: u16, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(&MOCK_MAC);
    frame.extend_from_slice(&src);
    frame.extend_from_slice(&proto.to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// 协议收到的 (数据, 源地址)
pub type Seen = Rc<RefCell<Vec<(Vec<u8>, LlAddr)>>>;

/// 记录收到的数据包的网络层协议
#[derive(Clone)]
pub struct Recorder {
    pub name: &'static str,
    pub proto: u16,
    pub seen: Seen,
}

impl Recorder {
    pub fn new(name: &'static str, proto: u16) -> Self {
        Self { name, proto, seen: Rc::new(RefCell::new(Vec::new())) }
    }
}

impl NetProtocol for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn net_proto(&self) -> u16 {
        self.proto
    }

    fn rx(&self, skb: SkBuff, _netdev: &NetDeviceRef, ll_source: &LlAddr) -> Result<()> {
        self.seen.borrow_mut().push((skb.data().to_vec(), *ll_source));
        Ok(())
    }
}
