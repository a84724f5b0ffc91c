//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 网络设备基类
//!
//! 参考: include/linux/netdevice.h, net/core/dev.c
//!
//! # 说明
//! - `NetDevice` 由适配器私有数据（实现 `NetDeviceOps`）和公共部分 `NetDeviceCore` 组成
//! - 适配器回调拿到的是 `&mut NetDeviceCore`，可以在 poll 中调用 rx / tx_complete
//! - 设备以 `NetDeviceRef` (Rc) 共享，引用计数归零时先清空收发队列再释放

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;
use core::fmt;
use core::ops::{Deref, DerefMut};

use bitflags::bitflags;

use crate::config::{NETDEV_RX_QUEUE_LEN, NETDEV_TX_QUEUE_LEN};
use crate::drivers::device::BusDevice;
use crate::errno::{Errno, Result};
use crate::net::buffer::SkBuff;
use crate::net::protocol::{LlAddr, LlProtocol};
use crate::settings::{Settings, SettingsRef};

/// 设备名最大长度
///
/// 对应 Linux 的 IFNAMSIZ
pub const IFNAMSIZ: usize = 16;

bitflags! {
    /// 设备状态标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NetDevState: u32 {
        /// 设备已打开
        const OPEN = 0x0001;
        /// 中断已使能
        const IRQ_ENABLED = 0x0002;
    }
}

/// 网络设备统计信息
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeviceStats {
    /// 发送成功数
    pub tx_ok: u64,
    /// 发送失败数
    pub tx_err: u64,
    /// 接收成功数
    pub rx_ok: u64,
    /// 接收失败数
    pub rx_err: u64,
}

/// 发送队列条目标识
///
/// 由 `transmit` 分配，适配器完成发送时凭此调用 `tx_complete`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TxCookie(u64);

impl TxCookie {
    pub(crate) const fn new(seq: u64) -> Self {
        Self(seq)
    }
}

impl fmt::Display for TxCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 发送队列中的数据包
pub(crate) struct TxEntry {
    pub(crate) cookie: TxCookie,
    pub(crate) skb: SkBuff,
}

/// 网络设备操作接口
///
/// 对应 Linux 的 net_device_ops。实现者本身就是适配器的私有数据。
/// 所有操作都必须立即返回，不能阻塞。
pub trait NetDeviceOps {
    /// 打开设备
    ///
    /// 失败时设备保持关闭状态，错误原样返回给调用者
    fn open(&mut self, netdev: &mut NetDeviceCore) -> Result<()>;

    /// 关闭设备
    ///
    /// 返回后核心会清空收发队列
    fn close(&mut self, netdev: &mut NetDeviceCore);

    /// 发送数据包
    ///
    /// 数据包仍留在发送队列中，直到适配器以 `cookie` 调用
    /// `tx_complete`（通常在 poll 中）。返回错误时由核心完成该条目。
    fn transmit(&mut self, cookie: TxCookie, skb: &SkBuff) -> Result<()>;

    /// 轮询已完成的发送和新接收的数据包
    fn poll(&mut self, netdev: &mut NetDeviceCore);

    /// 使能或禁止中断
    fn irq(&mut self, netdev: &mut NetDeviceCore, enable: bool);
}

/// 网络设备公共部分
pub struct NetDeviceCore {
    /// 设备名 (例如 "net0")，注册时分配
    pub(crate) name: String,
    /// 设备索引
    pub(crate) ifindex: u32,
    /// 设备状态
    pub(crate) state: NetDevState,
    /// 链路层协议
    ll_protocol: &'static dyn LlProtocol,
    /// 链路层地址 (MAC 地址)
    ll_addr: LlAddr,
    /// 所属总线设备
    dev: Option<Rc<BusDevice>>,
    /// 发送队列，等待完成
    pub(crate) tx_queue: VecDeque<TxEntry>,
    /// 下一个发送条目标识
    pub(crate) tx_seq: u64,
    /// 接收队列，等待处理
    pub(crate) rx_queue: VecDeque<SkBuff>,
    /// 统计信息
    pub(crate) stats: DeviceStats,
    /// 设备配置
    settings: SettingsRef,
}

impl NetDeviceCore {
    /// 获取设备名，未注册时为空
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ifindex(&self) -> u32 {
        self.ifindex
    }

    pub fn state(&self) -> NetDevState {
        self.state
    }

    /// 检查设备是否已打开
    pub fn is_open(&self) -> bool {
        self.state.contains(NetDevState::OPEN)
    }

    pub fn stats(&self) -> DeviceStats {
        self.stats
    }

    pub fn ll_protocol(&self) -> &'static dyn LlProtocol {
        self.ll_protocol
    }

    pub fn ll_addr(&self) -> &LlAddr {
        &self.ll_addr
    }

    /// 设置链路层地址
    ///
    /// 长度必须与链路层协议一致，否则返回 EINVAL
    pub fn set_ll_addr(&mut self, addr: &[u8]) -> Result<()> {
        if addr.len() != self.ll_protocol.ll_addr_len() {
            return Err(Errno::InvalidArgument);
        }
        self.ll_addr = LlAddr::from_slice(addr)?;
        Ok(())
    }

    /// 链路层地址的显示形式
    pub fn hwaddr(&self) -> String {
        self.ll_protocol.ntoa(self.ll_addr.as_bytes())
    }

    pub fn dev(&self) -> Option<&Rc<BusDevice>> {
        self.dev.as_ref()
    }

    /// 绑定所属总线设备
    pub fn set_dev(&mut self, dev: Rc<BusDevice>) {
        self.dev = Some(dev);
    }

    pub fn settings(&self) -> &SettingsRef {
        &self.settings
    }

    pub fn tx_queue_len(&self) -> usize {
        self.tx_queue.len()
    }

    pub fn rx_queue_len(&self) -> usize {
        self.rx_queue.len()
    }
}

/// 网络设备
pub struct NetDevice {
    /// 适配器私有数据
    priv_: Box<dyn NetDeviceOps>,
    core: NetDeviceCore,
}

/// 共享的网络设备引用
///
/// 强引用计数即设备引用计数
pub type NetDeviceRef = Rc<RefCell<NetDevice>>;

/// 分配网络设备
///
/// # 参数
/// - `priv_`: 适配器私有数据，同时提供设备操作
/// - `ll_protocol`: 绑定的链路层协议
///
/// # 返回
/// 队列空间分配失败时返回 None
pub fn alloc_netdev<T>(priv_: T, ll_protocol: &'static dyn LlProtocol) -> Option<NetDeviceRef>
where
    T: NetDeviceOps + 'static,
{
    let mut tx_queue = VecDeque::new();
    tx_queue.try_reserve(NETDEV_TX_QUEUE_LEN).ok()?;
    let mut rx_queue = VecDeque::new();
    rx_queue.try_reserve(NETDEV_RX_QUEUE_LEN).ok()?;

    let netdev = NetDevice {
        priv_: Box::new(priv_),
        core: NetDeviceCore {
            name: String::new(),
            ifindex: 0,
            state: NetDevState::empty(),
            ll_protocol,
            ll_addr: LlAddr::empty(),
            dev: None,
            tx_queue,
            tx_seq: 0,
            rx_queue,
            stats: DeviceStats::default(),
            settings: Rc::new(RefCell::new(Settings::new())),
        },
    };

    Some(Rc::new(RefCell::new(netdev)))
}

/// 获取设备引用
pub fn netdev_get(netdev: &NetDeviceRef) -> NetDeviceRef {
    Rc::clone(netdev)
}

/// 释放设备引用
///
/// 最后一个引用释放时设备被销毁
pub fn netdev_put(netdev: NetDeviceRef) {
    drop(netdev);
}

/// 当前引用计数
pub fn netdev_refcount(netdev: &NetDeviceRef) -> usize {
    Rc::strong_count(netdev)
}

impl NetDevice {
    /// 同时借出适配器和公共部分
    pub(crate) fn split_mut(&mut self) -> (&mut dyn NetDeviceOps, &mut NetDeviceCore) {
        (&mut *self.priv_, &mut self.core)
    }

    /// 打开设备
    ///
    /// 已打开时直接返回成功
    pub fn open(&mut self) -> Result<()> {
        if self.core.is_open() {
            return Ok(());
        }

        log::debug!("netdev {}: opening", self.core.name);
        self.priv_.open(&mut self.core)?;
        self.core.state.insert(NetDevState::OPEN);
        Ok(())
    }

    /// 关闭设备
    ///
    /// # 说明
    /// - 先让硬件停止，再清空收发队列，避免新的完成事件与清空竞争
    /// - 已关闭时什么也不做
    pub fn close(&mut self) {
        if !self.core.is_open() {
            return;
        }

        log::debug!("netdev {}: closing", self.core.name);
        self.priv_.close(&mut self.core);
        self.core.tx_flush();
        self.core.rx_flush();
        self.core.state.remove(NetDevState::OPEN);
    }

    /// 轮询设备
    ///
    /// 仅在设备打开时调用适配器的 poll
    pub fn poll(&mut self) {
        if self.core.is_open() {
            self.priv_.poll(&mut self.core);
        }
    }

    /// 使能或禁止中断
    pub fn irq(&mut self, enable: bool) {
        self.priv_.irq(&mut self.core, enable);
        self.core.state.set(NetDevState::IRQ_ENABLED, enable);
    }
}

impl Deref for NetDevice {
    type Target = NetDeviceCore;

    fn deref(&self) -> &NetDeviceCore {
        &self.core
    }
}

impl DerefMut for NetDevice {
    fn deref_mut(&mut self) -> &mut NetDeviceCore {
        &mut self.core
    }
}

impl Drop for NetDevice {
    fn drop(&mut self) {
        log::debug!(
            "netdev {}: freeing ({} tx, {} rx outstanding)",
            self.core.name,
            self.core.tx_queue.len(),
            self.core.rx_queue.len()
        );
        self.core.tx_flush();
        self.core.rx_flush();
    }
}

impl fmt::Debug for NetDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetDevice")
            .field("name", &self.core.name)
            .field("state", &self.core.state)
            .field("ll_protocol", &self.core.ll_protocol.name())
            .field("ll_addr", &self.core.ll_addr)
            .field("tx_queue", &self.core.tx_queue.len())
            .field("rx_queue", &self.core.rx_queue.len())
            .field("stats", &self.core.stats)
            .finish()
    }
}
